//! Shared application state.
//!
//! One clone of this struct is handed to every handler by axum. The
//! database handle is pool-backed and cheap to clone; the JWT manager is
//! behind an Arc.

use std::sync::Arc;

use crate::auth::JwtManager;
use vendo_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (pool-backed).
    pub db: Database,

    /// JWT manager for the admin surface.
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
        }
    }
}
