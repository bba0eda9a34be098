//! Handler tests for the catalog domain.
//!
//! These verify the HTTP layer only: envelope shape, status codes and error
//! bodies, with the services running over the in-memory stores.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> (Router, ProductService<InMemoryProductRepository>) {
    let products = ProductService::new(InMemoryProductRepository::new());
    let categories =
        CategoryService::new(InMemoryCategoryRepository::new(), products.clone());
    (handlers::router(products.clone(), categories), products)
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn create_product_returns_201_with_the_success_envelope() {
    let (app, _) = app();

    let response = app
        .oneshot(post(
            "/api/products/",
            json!({
                "name": "Smartphone XYZ",
                "description": "Smartphone de última geração",
                "price": 999.99,
                "categoryId": 1,
                "stock": 50
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["product"]["id"], 1);
    assert_eq!(body["data"]["product"]["name"], "Smartphone XYZ");
    assert_eq!(body["data"]["product"]["categoryId"], 1);
}

#[tokio::test]
async fn invalid_product_payload_returns_400_with_collected_errors() {
    let (app, _) = app();

    let response = app
        .oneshot(post("/api/products/", json!({ "description": "sem nome" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Dados inválidos");
    let errors = body["details"]["errors"].as_array().unwrap();
    assert_eq!(
        errors,
        &[
            "Nome do produto é obrigatório",
            "Preço deve ser um número positivo",
            "Categoria é obrigatória",
        ]
    );
}

#[tokio::test]
async fn duplicate_product_name_returns_409() {
    let (app, products) = app();

    products
        .create_product(CreateProduct {
            name: "Laptop Pro".to_string(),
            description: String::new(),
            price: 1499.99,
            category_id: 1,
            stock: 20,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(post(
            "/api/products/",
            json!({ "name": "laptop pro", "price": 100.0, "categoryId": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Produto com nome 'laptop pro' já existe");
}

#[tokio::test]
async fn list_products_carries_pagination_next_to_the_data() {
    let (app, products) = app();

    for i in 1..=12 {
        products
            .create_product(CreateProduct {
                name: format!("Produto {i}"),
                description: String::new(),
                price: i as f64,
                category_id: 1,
                stock: i,
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get("/api/products/?limit=5&page=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["pagination"]["totalItems"], 12);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["currentPage"], 2);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPreviousPage"], true);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["products"][0]["name"], "Produto 6");
}

#[tokio::test]
async fn list_products_applies_query_filters() {
    let (app, products) = app();

    products
        .create_product(CreateProduct {
            name: "Com stock".to_string(),
            description: String::new(),
            price: 150.0,
            category_id: 1,
            stock: 3,
        })
        .await
        .unwrap();
    products
        .create_product(CreateProduct {
            name: "Sem stock".to_string(),
            description: String::new(),
            price: 150.0,
            category_id: 1,
            stock: 0,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/products/?categoryId=1&minPrice=100&inStock=true"))
        .await
        .unwrap();

    let body = json_body(response.into_body()).await;
    let items = body["data"]["products"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Com stock");
}

#[tokio::test]
async fn non_numeric_product_id_returns_400() {
    let (app, _) = app();

    let response = app.oneshot(get("/api/products/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "ID do produto inválido");
}

#[tokio::test]
async fn missing_product_returns_404_with_the_error_envelope() {
    let (app, _) = app();

    let response = app.oneshot(get("/api/products/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Produto com ID 999 não encontrado");
}

#[tokio::test]
async fn update_product_returns_the_merged_entity() {
    let (app, products) = app();

    let created = products
        .create_product(CreateProduct {
            name: "Monitor".to_string(),
            description: String::new(),
            price: 700.0,
            category_id: 1,
            stock: 3,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/products/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 650.0 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["product"]["price"], 650.0);
    assert_eq!(body["data"]["product"]["name"], "Monitor");
}

#[tokio::test]
async fn delete_product_returns_204_with_no_body() {
    let (app, products) = app();

    let created = products
        .create_product(CreateProduct {
            name: "Descartável".to_string(),
            description: String::new(),
            price: 1.0,
            category_id: 1,
            stock: 0,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/products/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn category_crud_uses_the_same_envelope() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post(
            "/api/categories/",
            json!({ "name": "Eletrônicos", "description": "Dispositivos" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["category"]["name"], "Eletrônicos");

    let response = app.oneshot(get("/api/categories/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_category_with_products_returns_400_with_the_count() {
    let (app, products) = app();

    // Category created through the API so it exists in the category store
    let response = app
        .clone()
        .oneshot(post("/api/categories/", json!({ "name": "Ocupada" })))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    let category_id = body["data"]["category"]["id"].as_i64().unwrap();

    products
        .create_product(CreateProduct {
            name: "Dependente".to_string(),
            description: String::new(),
            price: 10.0,
            category_id,
            stock: 1,
        })
        .await
        .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/categories/{category_id}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        "Não é possível excluir a categoria pois existem 1 produtos associados a ela"
    );
    assert_eq!(body["details"]["productCount"], 1);
    assert_eq!(body["details"]["categoryId"], category_id);
}

#[tokio::test]
async fn non_numeric_category_id_returns_400() {
    let (app, _) = app();

    let response = app.oneshot(get("/api/categories/xyz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "ID da categoria inválido");
}
