use serde_json::json;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, Pagination, Product, ProductFilter, ProductPage,
    UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};

/// Service layer for product business logic: filtering, pagination and
/// uniqueness-constrained CRUD over a `ProductRepository`.
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List products, applying filters conjunctively before pagination.
    ///
    /// `page` defaults to 1 and `limit` to the filtered length; an explicit
    /// zero behaves like an absent value for both. This operation never fails
    /// on out-of-range pages, it just returns an empty slice.
    pub async fn list_products(&self, filter: ProductFilter) -> AppResult<ProductPage> {
        let mut items = self.repository.list().await?;

        if let Some(category_id) = filter.category_id {
            items.retain(|p| p.category_id == category_id);
        }
        if let Some(min_price) = filter.min_price {
            items.retain(|p| p.price >= min_price);
        }
        if let Some(max_price) = filter.max_price {
            items.retain(|p| p.price <= max_price);
        }
        if filter.in_stock.unwrap_or(false) {
            items.retain(|p| p.stock > 0);
        }

        let total_items = items.len();
        let page = match filter.page {
            None | Some(0) => 1,
            Some(p) => p,
        };
        let limit = match filter.limit {
            None | Some(0) => total_items,
            Some(l) => l,
        };

        let start = (page - 1).saturating_mul(limit);
        let end = start.saturating_add(limit).min(total_items);
        let products = if start >= total_items {
            Vec::new()
        } else {
            items[start..end].to_vec()
        };

        let pagination = Pagination {
            total_items,
            total_pages: if limit == 0 {
                0
            } else {
                total_items.div_ceil(limit)
            },
            current_page: page,
            items_per_page: limit,
            has_next_page: start.saturating_add(limit) < total_items,
            has_previous_page: start > 0,
        };

        Ok(ProductPage {
            products,
            pagination,
        })
    }

    /// Get a product by id
    pub async fn get_product(&self, id: i64) -> AppResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppError::not_found("Produto", id))
    }

    /// Create a product: validate, then insert (the store enforces the
    /// case-insensitive name uniqueness).
    ///
    /// The service never checks that `category_id` refers to an existing
    /// category; only the reverse direction (category deletion) is guarded.
    pub async fn create_product(&self, input: CreateProduct) -> AppResult<Product> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        self.repository.create(input).await
    }

    /// Update a product: merge the patch over the current state, re-validate
    /// the merged result, then persist.
    pub async fn update_product(&self, id: i64, patch: UpdateProduct) -> AppResult<Product> {
        let mut merged = self.get_product(id).await?;
        merged.apply_update(patch.clone());

        let errors = merged.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        self.repository.update(id, patch).await
    }

    /// Delete a product
    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Produto", id));
        }
        Ok(())
    }
}

/// Service layer for category business logic.
///
/// Holds the product service as well: deleting a category is blocked while
/// dependent products exist, and that count goes through the product read
/// path.
#[derive(Clone)]
pub struct CategoryService<C: CategoryRepository, P: ProductRepository> {
    repository: Arc<C>,
    products: ProductService<P>,
}

impl<C: CategoryRepository, P: ProductRepository> CategoryService<C, P> {
    pub fn new(repository: C, products: ProductService<P>) -> Self {
        Self {
            repository: Arc::new(repository),
            products,
        }
    }

    /// All categories in id order
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.list().await
    }

    /// Get a category by id
    pub async fn get_category(&self, id: i64) -> AppResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppError::not_found("Categoria", id))
    }

    /// Create a category: validate, then insert (the store enforces the
    /// case-insensitive name uniqueness, mirroring the SQL unique constraint)
    pub async fn create_category(&self, input: CreateCategory) -> AppResult<Category> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        self.repository.create(input).await
    }

    /// Update a category with the same merge/validate/conflict pattern as
    /// product updates
    pub async fn update_category(&self, id: i64, patch: UpdateCategory) -> AppResult<Category> {
        let mut merged = self.get_category(id).await?;
        merged.apply_update(patch.clone());

        let errors = merged.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        self.repository.update(id, patch).await
    }

    /// Delete a category, blocked while dependent products exist
    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        self.get_category(id).await?;

        let dependents = self
            .products
            .list_products(ProductFilter {
                category_id: Some(id),
                ..Default::default()
            })
            .await?;
        let product_count = dependents.pagination.total_items;

        if product_count > 0 {
            return Err(AppError::bad_request_with(
                format!(
                    "Não é possível excluir a categoria pois existem {product_count} produtos associados a ela"
                ),
                json!({ "categoryId": id, "productCount": product_count }),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Categoria", id));
        }
        Ok(())
    }
}
