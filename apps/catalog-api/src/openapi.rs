//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product/category catalog with filtering, pagination and uniqueness-constrained CRUD",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_catalog::handlers::ProductsApiDoc),
        (path = "/api/categories", api = domain_catalog::handlers::CategoriesApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Category endpoints")
    )
)]
pub struct ApiDoc;
