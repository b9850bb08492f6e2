//! # Vendo Server
//!
//! HTTP API for the vending terminal: catalog, purchase, history, and a
//! JWT-gated admin surface, over vendo-core + vendo-db.
//!
//! The library crate exists so integration tests can build the router
//! without binding a socket; the binary in `main.rs` is a thin wrapper.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::router;
pub use state::AppState;
