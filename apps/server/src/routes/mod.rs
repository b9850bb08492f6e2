//! # Route Layer
//!
//! All HTTP routes, grouped by surface:
//!
//! - [`catalog`] - `GET /api/catalog` (public)
//! - [`purchase`] - `POST /api/purchase` (public)
//! - [`history`] - `GET /api/history` (public)
//! - [`admin`] - login + product management (JWT-gated)

pub mod admin;
pub mod catalog;
pub mod history;
pub mod purchase;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/catalog", get(catalog::get_catalog))
        .route("/api/purchase", post(purchase::process_purchase))
        .route("/api/history", get(history::get_history))
        .route("/api/admin/login", post(admin::login))
        .route(
            "/api/admin/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/api/admin/products/:id",
            put(admin::update_product).delete(admin::delete_product),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness probe: checks the database can execute queries.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(HealthResponse { status: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "database unavailable",
            }),
        )
    }
}
