//! # Purchase Repository
//!
//! The purchase unit of work and the history view.
//!
//! ## The Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    purchase(request)                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── SELECT product by id        ── none? ──► ProductNotFound        │
//! │    │                                                                    │
//! │    ├── plan_purchase (pure)        ── fail? ──► validation error       │
//! │    │                                                                    │
//! │    ├── UPDATE products                                                 │
//! │    │     SET quantity = quantity - N                                   │
//! │    │     WHERE id = ? AND quantity >= N                                │
//! │    │                               ── 0 rows? ─► InsufficientStock     │
//! │    │         (a concurrent purchase won the race; tx is dropped)       │
//! │    │                                                                    │
//! │    ├── INSERT transactions row     (stock_after = fresh quantity)      │
//! │    ├── INSERT money_inserted row   {denomination, count: 1}            │
//! │    ├── INSERT change_returned row  per breakdown line                  │
//! │    │                                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT rolls everything back: there is never a     │
//! │  stock decrement without its transaction record, or vice versa.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional decrement is what makes two concurrent purchases of
//! the last item safe: both may pass the snapshot check, but only one
//! UPDATE matches `quantity >= N`; the loser rolls back and reports the
//! real remaining stock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use vendo_core::{
    plan_purchase, ChangeReturnedLine, HistoryEntry, MoneyInsertedLine, Product, PurchaseError,
    PurchaseReceipt, PurchaseRequest, SaleTransaction,
};

/// Most transactions the history view will return.
pub const HISTORY_LIMIT: u32 = 50;

/// Repository owning the atomic purchase sequence.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Executes a purchase as one atomic unit.
    ///
    /// Validation failures and commit failures both leave the database
    /// untouched; the sqlx transaction rolls back when dropped without a
    /// commit. Commit-phase sqlx errors surface as
    /// [`PurchaseError::PersistenceFailure`].
    pub async fn purchase(
        &self,
        request: &PurchaseRequest,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        debug!(
            product_id = request.product_id,
            quantity = request.quantity,
            inserted_cents = request.inserted.cents(),
            "Processing purchase"
        );

        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, quantity, category, created_at, updated_at \
             FROM products WHERE id = ?1",
        )
        .bind(request.product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence)?
        .ok_or(PurchaseError::ProductNotFound {
            product_id: request.product_id,
        })?;

        let plan = plan_purchase(&product, request)?;

        let now = Utc::now();

        // Compare-and-decrement: the WHERE clause re-checks stock so a
        // concurrent purchase can never drive quantity negative.
        let decremented = sqlx::query(
            "UPDATE products SET quantity = quantity - ?2, updated_at = ?3 \
             WHERE id = ?1 AND quantity >= ?2",
        )
        .bind(product.id)
        .bind(request.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;

        if decremented.rows_affected() == 0 {
            // Someone else bought the last items between our snapshot
            // read and the decrement. Report what is actually left.
            let available: i64 = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(product.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(persistence)?;

            return Err(PurchaseError::InsufficientStock { available });
        }

        // Re-read rather than compute from the snapshot: under a race
        // the decrement may have started from a different base.
        let stock_after: i64 = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
            .bind(product.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(persistence)?;

        let transaction_id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions \
             (transaction_date, product_id, quantity, total_price_cents, \
              money_inserted_cents, change_returned_cents, stock_after) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             RETURNING id",
        )
        .bind(now)
        .bind(product.id)
        .bind(request.quantity)
        .bind(plan.total.cents())
        .bind(request.inserted.cents())
        .bind(plan.change.cents())
        .bind(stock_after)
        .fetch_one(&mut *tx)
        .await
        .map_err(persistence)?;

        // Single-denomination model: the customer inserts exactly one
        // bill or coin per purchase.
        sqlx::query(
            "INSERT INTO money_inserted (transaction_id, denomination, count) VALUES (?1, ?2, 1)",
        )
        .bind(transaction_id)
        .bind(request.inserted.units())
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;

        for line in &plan.breakdown {
            sqlx::query(
                "INSERT INTO change_returned (transaction_id, denomination, count) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(transaction_id)
            .bind(line.denomination as i64)
            .bind(line.count as i64)
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;
        }

        tx.commit().await.map_err(persistence)?;

        info!(
            transaction_id,
            product = %product.name,
            quantity = request.quantity,
            change_cents = plan.change.cents(),
            stock_after,
            "Purchase recorded"
        );

        Ok(PurchaseReceipt {
            transaction_id,
            product_name: product.name,
            quantity: request.quantity,
            total_price_cents: plan.total.cents(),
            change_cents: plan.change.cents(),
            change_breakdown: plan.breakdown,
            stock_left: stock_after,
        })
    }

    /// Returns the most recent transactions, newest first, joined with
    /// the name of the product bought.
    pub async fn history(&self, limit: u32) -> DbResult<Vec<HistoryEntry>> {
        let limit = limit.min(HISTORY_LIMIT);

        let entries = sqlx::query_as::<_, HistoryEntry>(
            "SELECT t.id, t.transaction_date, p.name AS product_name, t.quantity, \
                    t.total_price_cents, t.money_inserted_cents, t.change_returned_cents, \
                    t.stock_after \
             FROM transactions t \
             INNER JOIN products p ON p.id = t.product_id \
             ORDER BY t.id DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Gets one persisted transaction row.
    pub async fn get_transaction(&self, id: i64) -> DbResult<Option<SaleTransaction>> {
        let transaction = sqlx::query_as::<_, SaleTransaction>(
            "SELECT id, transaction_date, product_id, quantity, total_price_cents, \
                    money_inserted_cents, change_returned_cents, stock_after \
             FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Money line items for one transaction (receipt detail / tests).
    pub async fn money_lines(&self, transaction_id: i64) -> DbResult<Vec<MoneyInsertedLine>> {
        let lines = sqlx::query_as::<_, MoneyInsertedLine>(
            "SELECT id, transaction_id, denomination, count \
             FROM money_inserted WHERE transaction_id = ?1 ORDER BY id",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Change line items for one transaction, largest denomination first.
    pub async fn change_lines(&self, transaction_id: i64) -> DbResult<Vec<ChangeReturnedLine>> {
        let lines = sqlx::query_as::<_, ChangeReturnedLine>(
            "SELECT id, transaction_id, denomination, count \
             FROM change_returned WHERE transaction_id = ?1 ORDER BY denomination DESC",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts all transaction rows (tests / diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn persistence(err: sqlx::Error) -> PurchaseError {
    PurchaseError::PersistenceFailure(err.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use vendo_core::{Category, Money, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, price_cents: i64, quantity: i64) -> Product {
        db.products()
            .insert(&NewProduct {
                name: "Mirinda (raspberry)".to_string(),
                price_cents,
                quantity,
                category: Category::Drink,
            })
            .await
            .unwrap()
    }

    fn request(product_id: i64, quantity: i64, inserted_units: i64) -> PurchaseRequest {
        PurchaseRequest {
            product_id,
            quantity,
            inserted: Money::from_units(inserted_units),
        }
    }

    #[tokio::test]
    async fn test_purchase_success_records_everything() {
        let db = test_db().await;
        let product = seed_product(&db, 3000, 10).await;

        let receipt = db
            .purchases()
            .purchase(&request(product.id, 2, 100))
            .await
            .unwrap();

        assert_eq!(receipt.product_name, "Mirinda (raspberry)");
        assert_eq!(receipt.total_price_cents, 6000);
        assert_eq!(receipt.change_cents, 4000);
        assert_eq!(receipt.stock_left, 8);

        // Stock decremented on the product row
        let fresh = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fresh.quantity, 8);

        // Persisted transaction row carries the computed fields
        let row = db
            .purchases()
            .get_transaction(receipt.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.product_id, product.id);
        assert_eq!(row.total_price_cents, 6000);
        assert_eq!(row.money_inserted_cents, 10000);
        assert_eq!(row.change_returned_cents, 4000);
        assert_eq!(row.stock_after, 8);

        // One money_inserted row: {100, 1}
        let money = db.purchases().money_lines(receipt.transaction_id).await.unwrap();
        assert_eq!(money.len(), 1);
        assert_eq!(money[0].denomination, 100);
        assert_eq!(money[0].count, 1);

        // Change rows mirror the greedy breakdown of 40: 25 + 10 + 5
        let change = db.purchases().change_lines(receipt.transaction_id).await.unwrap();
        let pairs: Vec<(i64, i64)> = change.iter().map(|l| (l.denomination, l.count)).collect();
        assert_eq!(pairs, vec![(25, 1), (10, 1), (5, 1)]);
    }

    #[tokio::test]
    async fn test_purchase_exact_payment_writes_no_change_rows() {
        let db = test_db().await;
        let product = seed_product(&db, 2500, 5).await;

        let receipt = db
            .purchases()
            .purchase(&request(product.id, 1, 25))
            .await
            .unwrap();

        assert_eq!(receipt.change_cents, 0);
        assert!(receipt.change_breakdown.is_empty());
        assert!(db
            .purchases()
            .change_lines(receipt.transaction_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let db = test_db().await;

        let err = db.purchases().purchase(&request(999, 1, 100)).await.unwrap_err();
        assert!(matches!(err, PurchaseError::ProductNotFound { product_id: 999 }));
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_no_trace() {
        let db = test_db().await;
        let product = seed_product(&db, 3000, 3).await;

        let err = db
            .purchases()
            .purchase(&request(product.id, 5, 100))
            .await
            .unwrap_err();

        match err {
            PurchaseError::InsufficientStock { available } => assert_eq!(available, 3),
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing persisted, nothing decremented
        assert_eq!(db.purchases().count().await.unwrap(), 0);
        let fresh = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fresh.quantity, 3);
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_no_trace() {
        let db = test_db().await;
        let product = seed_product(&db, 3000, 10).await;

        let err = db
            .purchases()
            .purchase(&request(product.id, 2, 50))
            .await
            .unwrap_err();

        match err {
            PurchaseError::InsufficientFunds { needed } => assert_eq!(needed.cents(), 6000),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(db.purchases().count().await.unwrap(), 0);
        let fresh = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fresh.quantity, 10);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_purchases_of_last_item() {
        let db = test_db().await;
        let product = seed_product(&db, 2500, 1).await;

        let db_a = db.clone();
        let db_b = db.clone();
        let id = product.id;

        let a = tokio::spawn(async move { db_a.purchases().purchase(&request(id, 1, 25)).await });
        let b = tokio::spawn(async move { db_b.purchases().purchase(&request(id, 1, 25)).await });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let stock_losses = results
            .iter()
            .filter(|r| matches!(r, Err(PurchaseError::InsufficientStock { .. })))
            .count();

        // Exactly one wins; the loser sees the honest stock count.
        assert_eq!(successes, 1);
        assert_eq!(stock_losses, 1);

        let fresh = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fresh.quantity, 0);
        assert_eq!(db.purchases().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_history_newest_first_with_product_name() {
        let db = test_db().await;
        let product = seed_product(&db, 2500, 10).await;

        db.purchases().purchase(&request(product.id, 1, 25)).await.unwrap();
        db.purchases().purchase(&request(product.id, 2, 100)).await.unwrap();

        let history = db.purchases().history(50).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first: the two-item purchase came second
        assert_eq!(history[0].quantity, 2);
        assert_eq!(history[0].product_name, "Mirinda (raspberry)");
        assert_eq!(history[0].total_price_cents, 5000);
        assert_eq!(history[0].stock_after, 7);
        assert_eq!(history[1].quantity, 1);
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_to_history() {
        let db = test_db().await;
        let product = seed_product(&db, 3000, 10).await;

        let receipt = db
            .purchases()
            .purchase(&request(product.id, 2, 100))
            .await
            .unwrap();

        db.products().delete(product.id).await.unwrap();

        assert_eq!(db.purchases().count().await.unwrap(), 0);
        assert!(db.purchases().history(50).await.unwrap().is_empty());
        assert!(db
            .purchases()
            .money_lines(receipt.transaction_id)
            .await
            .unwrap()
            .is_empty());
        assert!(db
            .purchases()
            .change_lines(receipt.transaction_id)
            .await
            .unwrap()
            .is_empty());
    }
}
