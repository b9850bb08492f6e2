//! # Domain Types
//!
//! Core domain types used throughout Vendo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │    Product      │   │ SaleTransaction  │   │  MoneyInsertedLine │   │
//! │  │  ─────────────  │   │  ──────────────  │   │  ChangeReturnedLine│   │
//! │  │  id             │   │  id              │   │  ────────────────  │   │
//! │  │  name           │   │  product_id (FK) │   │  transaction_id    │   │
//! │  │  price_cents    │   │  total_price     │   │  denomination      │   │
//! │  │  quantity       │   │  stock_after     │   │  count             │   │
//! │  │  category       │   └──────────────────┘   └────────────────────┘   │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  SaleTransaction is append-only: written once by the purchase unit     │
//! │  of work, never updated, deleted only by product cascade.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::change::ChangeLine;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The shelf a product lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cake,
    Drink,
}

impl Category {
    /// Human-readable shelf label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cake => "Cakes",
            Category::Drink => "Soft Drinks",
        }
    }

    /// Parses a category from its wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "cake" => Some(Category::Cake),
            "drink" => Some(Category::Drink),
            _ => None,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product slot in the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Row id; also the slot number customers key in.
    pub id: i64,

    /// Display name shown on the shelf and on receipts.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub quantity: i64,

    /// Shelf the product belongs to.
    pub category: Category,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product is in stock.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// Fields needed to create a product (admin surface / seed loader).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub category: Category,
}

// =============================================================================
// Sale Transaction
// =============================================================================

/// A completed purchase, as persisted.
///
/// Immutable once created. `stock_after` snapshots the product's quantity
/// right after the decrement, so history reads don't depend on the
/// product's current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleTransaction {
    pub id: i64,
    pub transaction_date: DateTime<Utc>,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub money_inserted_cents: i64,
    pub change_returned_cents: i64,
    pub stock_after: i64,
}

/// Cash the customer put in: one row per transaction in the current
/// single-denomination model ({denomination, count: 1}).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MoneyInsertedLine {
    pub id: i64,
    pub transaction_id: i64,
    pub denomination: i64,
    pub count: i64,
}

/// Cash the machine gave back: one row per denomination in the breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ChangeReturnedLine {
    pub id: i64,
    pub transaction_id: i64,
    pub denomination: i64,
    pub count: i64,
}

// =============================================================================
// Receipt & History
// =============================================================================

/// What the customer gets back from a successful purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub transaction_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub change_cents: i64,
    pub change_breakdown: Vec<ChangeLine>,
    pub stock_left: i64,
}

/// One row of the purchase history view: a transaction joined with the
/// name of the product it bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HistoryEntry {
    pub id: i64,
    pub transaction_date: DateTime<Utc>,
    pub product_name: String,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub money_inserted_cents: i64,
    pub change_returned_cents: i64,
    pub stock_after: i64,
}

// =============================================================================
// Staff
// =============================================================================

/// A staff account allowed into the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StaffAccount {
    pub id: i64,
    pub username: String,
    /// argon2 PHC string; never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
