use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const MSG_PRODUCT_NAME_REQUIRED: &str = "Nome do produto é obrigatório";
const MSG_PRICE_POSITIVE: &str = "Preço deve ser um número positivo";
const MSG_CATEGORY_REQUIRED: &str = "Categoria é obrigatória";
const MSG_STOCK_NON_NEGATIVE: &str = "Stock deve ser um número não-negativo";
const MSG_CATEGORY_NAME_REQUIRED: &str = "Nome da categoria é obrigatório";

/// Product entity - a catalog item belonging to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned by the store and never reused
    pub id: i64,
    /// Product name (unique across the catalog, case-insensitive)
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price, strictly positive
    pub price: f64,
    /// Id of the category this product belongs to
    pub category_id: i64,
    /// Units in stock
    pub stock: i64,
    /// Creation timestamp, fixed at creation
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Category entity - groups products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier, assigned by the store and never reused
    pub id: i64,
    /// Category name (unique, case-insensitive)
    pub name: String,
    /// Category description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product.
///
/// Every field carries a serde default so that an absent field reaches the
/// validation step instead of failing deserialization: a missing name arrives
/// as `""`, a missing price as `0.0` and a missing category as `0`, each of
/// which produces the corresponding validation message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: i64,
    pub stock: i64,
}

/// DTO for updating an existing product (sparse patch, unset fields retained)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub stock: Option<i64>,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCategory {
    pub name: String,
    pub description: String,
}

/// DTO for updating an existing category
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query filters for listing products.
///
/// Filters compose conjunctively and are applied before pagination. `page`
/// is 1-based; when `limit` is absent the whole filtered set is returned.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Exact-match category filter
    pub category_id: Option<i64>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// When true, keep only products with stock > 0
    pub in_stock: Option<bool>,
    /// 1-based page number (default 1)
    pub page: Option<usize>,
    /// Page size (default: size of the filtered result)
    pub limit: Option<usize>,
}

/// Pagination summary computed over the filtered, pre-slice result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub items_per_page: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of products plus its pagination summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Validation rules shared by product creation and the merged update preview.
///
/// Errors are collected in a fixed order, never short-circuited. A zero
/// `category_id` means the field was absent from the payload.
fn product_validation_errors(
    name: &str,
    price: f64,
    category_id: i64,
    stock: i64,
) -> Vec<String> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(MSG_PRODUCT_NAME_REQUIRED.to_string());
    }

    if price.is_nan() || price <= 0.0 {
        errors.push(MSG_PRICE_POSITIVE.to_string());
    }

    if category_id == 0 {
        errors.push(MSG_CATEGORY_REQUIRED.to_string());
    }

    if stock < 0 {
        errors.push(MSG_STOCK_NON_NEGATIVE.to_string());
    }

    errors
}

impl Product {
    /// Build a product from a create DTO with both timestamps set to now
    pub fn new(id: i64, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category_id: input.category_id,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the product, returning human-readable messages (empty = valid)
    pub fn validate(&self) -> Vec<String> {
        product_validation_errors(&self.name, self.price, self.category_id, self.stock)
    }

    /// Apply a sparse patch over the current state.
    ///
    /// `id` and `created_at` are immutable; `updated_at` is refreshed.
    pub fn apply_update(&mut self, patch: UpdateProduct) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
    }
}

impl CreateProduct {
    /// Validate the payload before the store allocates an id
    pub fn validate(&self) -> Vec<String> {
        product_validation_errors(&self.name, self.price, self.category_id, self.stock)
    }
}

impl Category {
    /// Build a category from a create DTO with both timestamps set to now
    pub fn new(id: i64, input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the category, returning human-readable messages (empty = valid)
    pub fn validate(&self) -> Vec<String> {
        category_validation_errors(&self.name)
    }

    /// Apply a sparse patch over the current state, refreshing `updated_at`
    pub fn apply_update(&mut self, patch: UpdateCategory) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

impl CreateCategory {
    /// Validate the payload before the store allocates an id
    pub fn validate(&self) -> Vec<String> {
        category_validation_errors(&self.name)
    }
}

fn category_validation_errors(name: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(MSG_CATEGORY_NAME_REQUIRED.to_string());
    }

    errors
}
