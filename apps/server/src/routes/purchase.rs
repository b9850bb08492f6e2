//! Purchase route.
//!
//! The one route that never returns an `ApiError`: a refused purchase is
//! a normal business outcome, so every path — including malformed input
//! and commit failures — answers HTTP 200 with a structured
//! `{success, message, ...}` body the terminal can show directly.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::state::AppState;
use vendo_core::{ChangeLine, PurchaseError, PurchaseReceipt, PurchaseRequest};

/// Raw boundary input; everything optional so missing fields produce a
/// customer-readable message instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub money_inserted: Option<f64>,
}

/// Purchase outcome, mirroring the terminal's display contract.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_breakdown: Option<Vec<ChangeLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_left: Option<i64>,
}

impl PurchaseResponse {
    fn success(receipt: &PurchaseReceipt) -> Self {
        PurchaseResponse {
            success: true,
            message: format!(
                "Purchase successful! Bought {} {}",
                receipt.quantity, receipt.product_name
            ),
            // Display value only; all arithmetic happened in cents.
            change: Some(receipt.change_cents as f64 / 100.0),
            change_breakdown: Some(receipt.change_breakdown.clone()),
            stock_left: Some(receipt.stock_left),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        PurchaseResponse {
            success: false,
            message: message.into(),
            change: None,
            change_breakdown: None,
            stock_left: None,
        }
    }
}

/// `POST /api/purchase`
pub async fn process_purchase(
    State(state): State<AppState>,
    form: Result<Json<PurchaseForm>, JsonRejection>,
) -> Json<PurchaseResponse> {
    // A body that isn't even JSON (or has wrongly-typed fields) gets the
    // same shape of answer as any other invalid input.
    let Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(%rejection, "Rejected purchase body");
            return Json(PurchaseResponse::failure("Invalid request"));
        }
    };

    let request =
        match PurchaseRequest::from_parts(form.product_id, form.quantity, form.money_inserted) {
            Ok(request) => request,
            Err(err) => return Json(PurchaseResponse::failure(err.to_string())),
        };

    match state.db.purchases().purchase(&request).await {
        Ok(receipt) => Json(PurchaseResponse::success(&receipt)),
        Err(err) => {
            if let PurchaseError::PersistenceFailure(ref detail) = err {
                error!(%detail, "Purchase commit failed and was rolled back");
            }
            Json(PurchaseResponse::failure(err.to_string()))
        }
    }
}
