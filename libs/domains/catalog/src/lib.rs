//! Catalog Domain
//!
//! Product/category catalog with filtering, pagination and
//! uniqueness-constrained CRUD over an in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (response envelope)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Validation, filtering, pagination, delete guard
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repositories│  ← Stores (trait + in-memory implementation)
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, pagination types
//! └─────────────┘
//! ```
//!
//! The repositories own their collections and id counters; every value they
//! return is a detached clone, so callers can never mutate store state
//! through a held reference. Swapping the in-memory stores for a relational
//! backend only requires another implementation of the repository traits;
//! the service contract (including the `Conflict` raised on unique-name
//! violations) stays identical.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     repository::{InMemoryCategoryRepository, InMemoryProductRepository},
//!     service::{CategoryService, ProductService},
//! };
//!
//! let products = ProductService::new(InMemoryProductRepository::new());
//! let categories = CategoryService::new(InMemoryCategoryRepository::new(), products.clone());
//!
//! let router = handlers::router(products, categories);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use models::{
    Category, CreateCategory, CreateProduct, Pagination, Product, ProductFilter, ProductPage,
    UpdateCategory, UpdateProduct,
};
pub use repository::{
    CategoryRepository, InMemoryCategoryRepository, InMemoryProductRepository, ProductRepository,
};
pub use service::{CategoryService, ProductService};
