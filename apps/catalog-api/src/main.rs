//! Catalog API - REST server for the product/category catalog

use axum::{Json, Router, routing::get};
use domain_catalog::{
    CategoryService, CreateCategory, CreateProduct, InMemoryCategoryRepository,
    InMemoryProductRepository, ProductService, handlers,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let products = ProductService::new(InMemoryProductRepository::new());
    let categories =
        CategoryService::new(InMemoryCategoryRepository::new(), products.clone());

    seed_demo_data(&products, &categories).await?;

    let app = Router::new()
        .merge(handlers::router(products, categories))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting Catalog API on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}

/// Basic health check
async fn health() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "API está funcionando corretamente",
        "timestamp": chrono::Utc::now(),
    }))
}

/// Serve the OpenAPI document
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Seed the in-memory stores with the demo catalog so the API is browsable
/// right after startup
async fn seed_demo_data(
    products: &ProductService<InMemoryProductRepository>,
    categories: &CategoryService<InMemoryCategoryRepository, InMemoryProductRepository>,
) -> eyre::Result<()> {
    let electronics = categories
        .create_category(CreateCategory {
            name: "Eletrônicos".to_string(),
            description: "Dispositivos eletrónicos e gadgets".to_string(),
        })
        .await?;
    let accessories = categories
        .create_category(CreateCategory {
            name: "Acessórios".to_string(),
            description: "Acessórios e periféricos".to_string(),
        })
        .await?;

    let demo_products = [
        CreateProduct {
            name: "Smartphone XYZ".to_string(),
            description: "Smartphone de última geração".to_string(),
            price: 999.99,
            category_id: electronics.id,
            stock: 50,
        },
        CreateProduct {
            name: "Laptop Pro".to_string(),
            description: "Laptop para uso profissional".to_string(),
            price: 1499.99,
            category_id: electronics.id,
            stock: 20,
        },
        CreateProduct {
            name: "Headphones".to_string(),
            description: "Headphones com cancelamento de ruído".to_string(),
            price: 199.99,
            category_id: accessories.id,
            stock: 100,
        },
    ];
    for input in demo_products {
        products.create_product(input).await?;
    }

    info!("Seeded demo catalog: 2 categories, 3 products");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
