//! # Error Types
//!
//! Domain-specific error types for vendo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendo-core errors (this file)                                         │
//! │  ├── PurchaseError    - Why a purchase was refused                     │
//! │  └── ValidationError  - Admin input validation failures                │
//! │                                                                         │
//! │  vendo-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Server errors (in app)                                                │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (available stock, amount owed)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a customer-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Purchase Error
// =============================================================================

/// Every way a purchase can be refused.
///
/// The first five variants are validation failures detected before any
/// state changes; `PersistenceFailure` means the commit itself failed and
/// was rolled back. Each variant's `Display` text is the message shown to
/// the customer, so the wording matters.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// A field was missing or failed to parse.
    #[error("{0}")]
    InvalidInput(String),

    /// The inserted amount is not a single accepted bill or coin.
    ///
    /// Fractional amounts land here too: the machine takes whole
    /// denominations only.
    #[error("Invalid denomination. Use: 1, 5, 10, 20, 25, 50, or 100")]
    InvalidDenomination,

    /// No product with the requested id.
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: i64 },

    /// Requested quantity is zero or negative.
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    /// Requested quantity exceeds what is on the shelf.
    ///
    /// Also returned when a concurrent purchase grabs the last items
    /// between the stock check and the decrement.
    #[error("Not enough stock. Only {available} left")]
    InsufficientStock { available: i64 },

    /// Inserted cash does not cover the total price.
    #[error("Insufficient funds. Need {needed}")]
    InsufficientFunds { needed: Money },

    /// The commit sequence failed; everything was rolled back.
    #[error("Purchase could not be recorded: {0}")]
    PersistenceFailure(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for the admin surface.
///
/// These occur when staff input doesn't meet requirements; nothing is
/// persisted when one is returned.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
