use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{AppError, AppResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, Pagination, Product, ProductFilter, UpdateCategory,
    UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::{CategoryService, ProductService};

const PRODUCTS_TAG: &str = "Products";
const CATEGORIES_TAG: &str = "Categories";

/// OpenAPI documentation for the product endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(Product, CreateProduct, UpdateProduct, ProductFilter, Pagination)),
    tags(
        (name = PRODUCTS_TAG, description = "Product catalog endpoints"),
    )
)]
pub struct ProductsApiDoc;

/// OpenAPI documentation for the category endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(schemas(Category, CreateCategory, UpdateCategory)),
    tags(
        (name = CATEGORIES_TAG, description = "Category endpoints"),
    )
)]
pub struct CategoriesApiDoc;

/// Create the full catalog router with products and categories nested under
/// their `/api` prefixes
pub fn router<R, C>(products: ProductService<R>, categories: CategoryService<C, R>) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    Router::new()
        .nest("/api/products", products_router(products))
        .nest("/api/categories", categories_router(categories))
}

/// Product routes
pub fn products_router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Category routes
pub fn categories_router<C, P>(service: CategoryService<C, P>) -> Router
where
    C: CategoryRepository + 'static,
    P: ProductRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(shared_service)
}

// Path ids arrive as raw strings so a non-numeric id yields the catalog's own
// BadRequest instead of the framework rejection
fn parse_id(raw: &str, message: &'static str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::bad_request(message))
}

fn success(data: Value) -> Json<Value> {
    Json(json!({ "status": "success", "data": data }))
}

/// List products with filters and pagination
#[utoipa::path(
    get,
    path = "",
    tag = PRODUCTS_TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Paginated list of products"),
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Value>> {
    let page = service.list_products(filter).await?;
    Ok(Json(json!({
        "status": "success",
        "pagination": page.pagination,
        "data": { "products": page.products },
    })))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = PRODUCTS_TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Duplicate product name"),
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "product": product })),
    ))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Product not found"),
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, "ID do produto inválido")?;
    let product = service.get_product(id).await?;
    Ok(success(json!({ "product": product })))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Invalid id or validation failure"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Duplicate product name"),
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(raw_id): Path<String>,
    Json(patch): Json<UpdateProduct>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, "ID do produto inválido")?;
    let product = service.update_product(id, patch).await?;
    Ok(success(json!({ "product": product })))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Product not found"),
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "ID do produto inválido")?;
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = CATEGORIES_TAG,
    responses(
        (status = 200, description = "List of categories"),
    )
)]
async fn list_categories<C, P>(
    State(service): State<Arc<CategoryService<C, P>>>,
) -> AppResult<Json<Value>>
where
    C: CategoryRepository,
    P: ProductRepository,
{
    let categories = service.list_categories().await?;
    Ok(success(json!({ "categories": categories })))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = CATEGORIES_TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Duplicate category name"),
    )
)]
async fn create_category<C, P>(
    State(service): State<Arc<CategoryService<C, P>>>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse>
where
    C: CategoryRepository,
    P: ProductRepository,
{
    let category = service.create_category(input).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "category": category })),
    ))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Category not found"),
    )
)]
async fn get_category<C, P>(
    State(service): State<Arc<CategoryService<C, P>>>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>>
where
    C: CategoryRepository,
    P: ProductRepository,
{
    let id = parse_id(&raw_id, "ID da categoria inválido")?;
    let category = service.get_category(id).await?;
    Ok(success(json!({ "category": category })))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated"),
        (status = 400, description = "Invalid id or validation failure"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Duplicate category name"),
    )
)]
async fn update_category<C, P>(
    State(service): State<Arc<CategoryService<C, P>>>,
    Path(raw_id): Path<String>,
    Json(patch): Json<UpdateCategory>,
) -> AppResult<Json<Value>>
where
    C: CategoryRepository,
    P: ProductRepository,
{
    let id = parse_id(&raw_id, "ID da categoria inválido")?;
    let category = service.update_category(id, patch).await?;
    Ok(success(json!({ "category": category })))
}

/// Delete a category (blocked while dependent products exist)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Invalid id or dependent products exist"),
        (status = 404, description = "Category not found"),
    )
)]
async fn delete_category<C, P>(
    State(service): State<Arc<CategoryService<C, P>>>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse>
where
    C: CategoryRepository,
    P: ProductRepository,
{
    let id = parse_id(&raw_id, "ID da categoria inválido")?;
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
