//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalog listing (grouped by shelf)
//! - CRUD for the admin surface
//! - Absolute stock updates (restocking)
//!
//! The purchase-path *decrement* is deliberately not here: it lives
//! inside the purchase unit of work so it can never be separated from
//! the transaction record that explains it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vendo_core::{Category, NewProduct, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, price_cents, quantity, category, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by shelf then name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY category, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products on one shelf, ordered by name.
    pub async fn list_by_category(&self, category: Category) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY name"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its generated id.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price_cents, quantity, category, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.price_cents)
        .bind(new.quantity)
        .bind(new.category)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's price.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update_price(&self, id: i64, price_cents: i64) -> DbResult<()> {
        debug!(id, price_cents, "Updating product price");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET price_cents = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets a product's stock to an absolute quantity (admin restock).
    ///
    /// Purchases never call this; they go through the conditional
    /// decrement in the purchase unit of work.
    pub async fn update_stock(&self, id: i64, quantity: i64) -> DbResult<()> {
        debug!(id, quantity, "Updating product stock");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET quantity = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(quantity)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Foreign keys cascade: the product's transactions and their
    /// money/change line items are removed with it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (used by the seed loader to skip reseeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, price_cents: i64, quantity: i64, category: Category) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents,
            quantity,
            category,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo
            .insert(&new_product("Ramune (Original)", 5500, 10, Category::Drink))
            .await
            .unwrap();

        assert!(product.id > 0);
        assert_eq!(product.price_cents, 5500);

        let fetched = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ramune (Original)");
        assert_eq!(fetched.quantity, 10);
        assert_eq!(fetched.category, Category::Drink);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Sando", 1500, 10, Category::Cake))
            .await
            .unwrap();
        repo.insert(&new_product("Water", 2500, 10, Category::Drink))
            .await
            .unwrap();
        repo.insert(&new_product("Biscrem", 2500, 10, Category::Cake))
            .await
            .unwrap();

        let cakes = repo.list_by_category(Category::Cake).await.unwrap();
        assert_eq!(cakes.len(), 2);
        // Alphabetical within the shelf
        assert_eq!(cakes[0].name, "Biscrem");
        assert_eq!(cakes[1].name, "Sando");

        let drinks = repo.list_by_category(Category::Drink).await.unwrap();
        assert_eq!(drinks.len(), 1);
    }

    #[tokio::test]
    async fn test_update_price_and_stock() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo
            .insert(&new_product("Motto", 2300, 10, Category::Cake))
            .await
            .unwrap();

        repo.update_price(product.id, 2500).await.unwrap();
        repo.update_stock(product.id, 42).await.unwrap();

        let fetched = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 2500);
        assert_eq!(fetched.quantity, 42);
    }

    #[tokio::test]
    async fn test_update_missing_product_fails() {
        let db = test_db().await;

        let err = db.products().update_price(999, 100).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo
            .insert(&new_product("Calpico (Calpis)", 5000, 10, Category::Drink))
            .await
            .unwrap();

        repo.delete(product.id).await.unwrap();
        assert!(repo.get_by_id(product.id).await.unwrap().is_none());

        let err = repo.delete(product.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
