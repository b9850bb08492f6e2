//! # vendo-db: Database Layer for Vendo
//!
//! SQLite persistence for products, staff and the purchase log.
//!
//! ## Layout
//! - [`pool`] - Connection pool configuration and the [`Database`] handle
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Per-entity repositories; [`repository::purchase`]
//!   owns the atomic purchase unit of work
//! - [`error`] - [`DbError`] and conversions from sqlx
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./vendo.db")).await?;
//! let products = db.products().list_all().await?;
//! let receipt = db.purchases().purchase(&request).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::staff::StaffRepository;
