//! Admin surface: staff login and product management.
//!
//! Every route except `login` requires a Bearer token via the
//! [`StaffClaims`] extractor. Mutating routes answer with a flash-style
//! `{success, message}` body; failures reject before touching state.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::StaffClaims;
use crate::error::ApiError;
use crate::state::AppState;
use vendo_core::validation::{validate_price_cents, validate_product_name, validate_stock_quantity};
use vendo_core::{Category, NewProduct, Product};

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

/// `POST /api/admin/login`
///
/// The response does not reveal whether the username or the password was
/// wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .db
        .staff()
        .verify_login(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password."))?;

    let token = state.jwt.generate_access_token(&account)?;

    info!(username = %account.username, "Staff login");

    Ok(Json(LoginResponse {
        token,
        message: format!("Welcome back, {}!", account.username),
    }))
}

// =============================================================================
// Product Management
// =============================================================================

/// Flash-style outcome for mutating admin operations.
#[derive(Debug, Serialize)]
pub struct FlashResponse {
    pub success: bool,
    pub message: String,
}

impl FlashResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(FlashResponse {
            success: true,
            message: message.into(),
        })
    }
}

/// `GET /api/admin/products`
pub async fn list_products(
    StaffClaims(_claims): StaffClaims,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list_all().await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
}

/// `POST /api/admin/products`
pub async fn create_product(
    StaffClaims(claims): StaffClaims,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<FlashResponse>, ApiError> {
    let (Some(name), Some(price_cents), Some(quantity), Some(category)) = (
        request.name,
        request.price_cents,
        request.quantity,
        request.category,
    ) else {
        return Err(ApiError::validation("Please fill in all required fields."));
    };

    let name = validate_product_name(&name)?;
    validate_price_cents(price_cents)?;
    validate_stock_quantity(quantity)?;
    let category = Category::parse(&category)
        .ok_or_else(|| ApiError::validation("category must be 'cake' or 'drink'"))?;

    let product = state
        .db
        .products()
        .insert(&NewProduct {
            name,
            price_cents,
            quantity,
            category,
        })
        .await?;

    info!(staff = %claims.username, product = %product.name, "Product created");

    Ok(FlashResponse::ok(format!(
        "Product \"{}\" added successfully!",
        product.name
    )))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
}

/// `PUT /api/admin/products/:id`
///
/// Updates price and/or stock; absent fields are left untouched. Both
/// values are validated before either write, so a bad pair changes
/// nothing.
pub async fn update_product(
    StaffClaims(claims): StaffClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<FlashResponse>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    if let Some(price_cents) = request.price_cents {
        validate_price_cents(price_cents)?;
    }
    if let Some(quantity) = request.quantity {
        validate_stock_quantity(quantity)?;
    }

    if let Some(price_cents) = request.price_cents {
        state.db.products().update_price(id, price_cents).await?;
    }
    if let Some(quantity) = request.quantity {
        state.db.products().update_stock(id, quantity).await?;
    }

    info!(staff = %claims.username, product = %product.name, "Product updated");

    Ok(FlashResponse::ok(format!(
        "Product \"{}\" updated successfully!",
        product.name
    )))
}

/// `DELETE /api/admin/products/:id`
///
/// Hard delete; the product's transactions and their line items go with
/// it (foreign key cascade).
pub async fn delete_product(
    StaffClaims(claims): StaffClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlashResponse>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    state.db.products().delete(id).await?;

    info!(staff = %claims.username, product = %product.name, "Product deleted");

    Ok(FlashResponse::ok(format!(
        "Product \"{}\" deleted successfully!",
        product.name
    )))
}
