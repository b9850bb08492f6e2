//! # vendo-core: Pure Business Logic for Vendo
//!
//! This crate is the **heart** of Vendo. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    catalog ──► purchase ──► history ──► admin                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  change   │  │ purchase  │  │   │
//! │  │   │  Product  │  │   Money   │  │ decompose │  │  planning │  │   │
//! │  │   │  Receipt  │  │  (cents)  │  │  (greedy) │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendo-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, purchase unit of work      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleTransaction, receipt types)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`change`] - Denomination table and greedy change decomposition
//! - [`purchase`] - Purchase request parsing and planning
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation for the admin surface
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

pub mod change;
pub mod error;
pub mod money;
pub mod purchase;
pub mod types;
pub mod validation;

// Re-exports so callers can do `use vendo_core::Money` instead of
// `use vendo_core::money::Money`
pub use change::{decompose, is_valid_denomination, ChangeLine, DENOMINATIONS};
pub use error::{PurchaseError, ValidationError};
pub use money::Money;
pub use purchase::{plan_purchase, PurchasePlan, PurchaseRequest};
pub use types::*;
