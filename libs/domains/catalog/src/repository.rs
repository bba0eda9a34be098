use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, Product, UpdateCategory, UpdateProduct,
};

/// Repository trait for Product persistence.
///
/// Name uniqueness (case-insensitive) is enforced here, not in the service:
/// the check has to happen inside the same critical section as the mutation,
/// and a relational implementation surfaces the same `Conflict` from its
/// unique constraint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in insertion order
    async fn list(&self) -> AppResult<Vec<Product>>;

    /// Look up a product by id
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// Assign the next id and insert; fails with `Conflict` on duplicate name
    async fn create(&self, input: CreateProduct) -> AppResult<Product>;

    /// Merge the patch over the stored product; fails with `NotFound` when the
    /// id is absent and with `Conflict` when a changed name clashes
    async fn update(&self, id: i64, patch: UpdateProduct) -> AppResult<Product>;

    /// Remove a product, returning whether it existed
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories in insertion order
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Look up a category by id
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Category>>;

    /// Assign the next id and insert; fails with `Conflict` on duplicate name
    async fn create(&self, input: CreateCategory) -> AppResult<Category>;

    /// Merge the patch over the stored category; `NotFound`/`Conflict` as above
    async fn update(&self, id: i64, patch: UpdateCategory) -> AppResult<Category>;

    /// Remove a category, returning whether it existed
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    // Ids are monotonic and never reused, even after deletes
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory implementation of `ProductRepository`.
///
/// One write lock guards every read-check-then-write sequence, so no caller
/// can observe a partially applied mutation.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Table<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(Table::new())),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let table = self.products.read().await;
        Ok(table.rows.clone())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let table = self.products.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        let mut table = self.products.write().await;

        let name_taken = table
            .rows
            .iter()
            .any(|p| p.name.to_lowercase() == input.name.to_lowercase());
        if name_taken {
            return Err(AppError::conflict("Produto", "nome", input.name));
        }

        let id = table.allocate_id();
        let product = Product::new(id, input);
        table.rows.push(product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i64, patch: UpdateProduct) -> AppResult<Product> {
        let mut table = self.products.write().await;

        let index = table
            .rows
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::not_found("Produto", id))?;

        // Uniqueness is re-checked only when the name actually changes
        if let Some(ref new_name) = patch.name {
            if *new_name != table.rows[index].name {
                let name_taken = table
                    .rows
                    .iter()
                    .any(|p| p.id != id && p.name.to_lowercase() == new_name.to_lowercase());
                if name_taken {
                    return Err(AppError::conflict("Produto", "nome", new_name.clone()));
                }
            }
        }

        let product = &mut table.rows[index];
        product.apply_update(patch);
        let updated = product.clone();

        tracing::info!(product_id = id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut table = self.products.write().await;

        match table.rows.iter().position(|p| p.id == id) {
            Some(index) => {
                table.rows.remove(index);
                tracing::info!(product_id = id, "Deleted product");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory implementation of `CategoryRepository`
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<Table<Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(Table::new())),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let table = self.categories.read().await;
        Ok(table.rows.clone())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        let table = self.categories.read().await;
        Ok(table.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, input: CreateCategory) -> AppResult<Category> {
        let mut table = self.categories.write().await;

        // Same observable conflict the SQL unique constraint would raise
        let name_taken = table
            .rows
            .iter()
            .any(|c| c.name.to_lowercase() == input.name.to_lowercase());
        if name_taken {
            return Err(AppError::conflict("Categoria", "nome", input.name));
        }

        let id = table.allocate_id();
        let category = Category::new(id, input);
        table.rows.push(category.clone());

        tracing::info!(category_id = id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: i64, patch: UpdateCategory) -> AppResult<Category> {
        let mut table = self.categories.write().await;

        let index = table
            .rows
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::not_found("Categoria", id))?;

        if let Some(ref new_name) = patch.name {
            if *new_name != table.rows[index].name {
                let name_taken = table
                    .rows
                    .iter()
                    .any(|c| c.id != id && c.name.to_lowercase() == new_name.to_lowercase());
                if name_taken {
                    return Err(AppError::conflict("Categoria", "nome", new_name.clone()));
                }
            }
        }

        let category = &mut table.rows[index];
        category.apply_update(patch);
        let updated = category.clone();

        tracing::info!(category_id = id, "Updated category");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut table = self.categories.write().await;

        match table.rows.iter().position(|c| c.id == id) {
            Some(index) => {
                table.rows.remove(index);
                tracing::info!(category_id = id, "Deleted category");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_input(name: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price: 10.0,
            category_id: 1,
            stock: 5,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(product_input("Smartphone")).await.unwrap();
        let second = repo.create(product_input("Laptop")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_case_insensitively() {
        let repo = InMemoryProductRepository::new();
        repo.create(product_input("Headphones")).await.unwrap();

        let result = repo.create(product_input("HEADPHONES")).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let repo = InMemoryProductRepository::new();
        repo.create(product_input("A")).await.unwrap();
        let second = repo.create(product_input("B")).await.unwrap();

        assert!(repo.delete(second.id).await.unwrap());

        let third = repo.create(product_input("C")).await.unwrap();
        assert_eq!(third.id, 3);
        assert!(repo.get_by_id(second.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let result = repo.update(99, UpdateProduct::default()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn rename_to_own_name_is_allowed() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product_input("Monitor")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateProduct {
                    name: Some("Monitor".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Monitor");
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = InMemoryCategoryRepository::new();
        for name in ["Eletrônicos", "Roupas", "Livros"] {
            repo.create(CreateCategory {
                name: name.to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Eletrônicos", "Roupas", "Livros"]);
    }

    #[tokio::test]
    async fn returned_entities_are_detached_from_the_store() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product_input("Teclado")).await.unwrap();

        let mut fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        fetched.name = "Mutado".to_string();

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Teclado");
    }
}
