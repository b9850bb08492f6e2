//! # Purchase Planning
//!
//! The pure half of the purchase engine: boundary parsing and the
//! fail-fast validation/computation chain. The transactional half (stock
//! decrement + record writes) lives in vendo-db, which calls into this
//! module with a product snapshot.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PurchaseRequest::from_parts          (at the HTTP boundary)            │
//! │    1. fields present and parseable    → InvalidInput                    │
//! │    2. inserted cash is one accepted   → InvalidDenomination             │
//! │       whole-unit bill/coin                                              │
//! │                                                                         │
//! │  plan_purchase                        (inside the unit of work)         │
//! │    3. product exists                  → ProductNotFound (lookup, db)    │
//! │    4. quantity > 0                    → InvalidQuantity                 │
//! │    5. quantity <= stock               → InsufficientStock               │
//! │    6. total = price × quantity                                          │
//! │    7. inserted >= total               → InsufficientFunds               │
//! │    8. change + greedy breakdown                                         │
//! │                                                                         │
//! │  First failing check wins; nothing is persisted on any failure.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::change::{decompose, is_valid_denomination, ChangeLine};
use crate::error::PurchaseError;
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Purchase Request
// =============================================================================

/// A validated purchase request: typed, whole fields only.
///
/// Built from raw boundary input via [`PurchaseRequest::from_parts`];
/// by the time a value of this type exists, the inserted cash is known to
/// be a single accepted denomination.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub product_id: i64,
    pub quantity: i64,
    pub inserted: Money,
}

impl PurchaseRequest {
    /// Parses raw boundary input into a typed request.
    ///
    /// Missing or unparseable fields fail with `InvalidInput`. The
    /// inserted amount must be an exact whole number of units and a
    /// member of the denomination table; anything else (including
    /// fractional amounts like 20.50) fails with `InvalidDenomination`.
    pub fn from_parts(
        product_id: Option<i64>,
        quantity: Option<i64>,
        money_inserted: Option<f64>,
    ) -> Result<Self, PurchaseError> {
        let product_id = product_id
            .ok_or_else(|| PurchaseError::InvalidInput("product_id is required".to_string()))?;
        let quantity = quantity
            .ok_or_else(|| PurchaseError::InvalidInput("quantity is required".to_string()))?;
        let money_inserted = money_inserted
            .ok_or_else(|| PurchaseError::InvalidInput("money_inserted is required".to_string()))?;

        if !money_inserted.is_finite() || money_inserted < 0.0 {
            return Err(PurchaseError::InvalidInput(
                "money_inserted must be a non-negative amount".to_string(),
            ));
        }

        // Convert to cents once, at the boundary. No float survives
        // past this point.
        let scaled = money_inserted * 100.0;
        let cents = scaled.round() as i64;
        if (scaled - cents as f64).abs() > 1e-6 {
            // Sub-cent input cannot be a bill or coin.
            return Err(PurchaseError::InvalidDenomination);
        }

        if cents % 100 != 0 {
            return Err(PurchaseError::InvalidDenomination);
        }

        let units = cents / 100;
        let accepted = u32::try_from(units)
            .map(is_valid_denomination)
            .unwrap_or(false);
        if !accepted {
            return Err(PurchaseError::InvalidDenomination);
        }

        Ok(PurchaseRequest {
            product_id,
            quantity,
            inserted: Money::from_cents(cents),
        })
    }
}

// =============================================================================
// Purchase Plan
// =============================================================================

/// The computed money side of a purchase, before anything is persisted.
#[derive(Debug, Clone)]
pub struct PurchasePlan {
    /// price × quantity
    pub total: Money,
    /// inserted − total
    pub change: Money,
    /// Greedy breakdown of the whole-unit part of the change.
    pub breakdown: Vec<ChangeLine>,
}

/// Runs the validation/computation chain against a product snapshot.
///
/// Pure: the caller (the purchase unit of work) is responsible for
/// holding the snapshot and the decrement inside one database
/// transaction.
pub fn plan_purchase(
    product: &Product,
    request: &PurchaseRequest,
) -> Result<PurchasePlan, PurchaseError> {
    if request.quantity <= 0 {
        return Err(PurchaseError::InvalidQuantity);
    }

    if request.quantity > product.quantity {
        return Err(PurchaseError::InsufficientStock {
            available: product.quantity,
        });
    }

    let total = product.price().multiply_quantity(request.quantity);

    if request.inserted < total {
        return Err(PurchaseError::InsufficientFunds { needed: total });
    }

    let change = request.inserted - total;
    let breakdown = decompose(change.units() as u64);

    Ok(PurchasePlan {
        total,
        change,
        breakdown,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
