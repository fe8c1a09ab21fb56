//! Trade draft order API.
//!
//! Accepts the order form submission, runs it through the
//! [`OrderWorkflow`](crate::workflow::OrderWorkflow) and reports the outcome
//! as JSON.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::workflow::{OrderConfirmation, OrderSubmission};

/// Message returned with every created draft order.
pub const CREATED_MESSAGE: &str = "Draft order created and checkout link emailed";

/// Message returned when the body is not a JSON submission.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";

/// Response body for a created draft order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderCreatedResponse {
    pub success: bool,
    pub draft_order_id: Option<String>,
    pub invoice_url: String,
    pub message: &'static str,
}

impl From<OrderConfirmation> for DraftOrderCreatedResponse {
    fn from(confirmation: OrderConfirmation) -> Self {
        Self {
            success: true,
            draft_order_id: confirmation.draft_order_id,
            invoice_url: confirmation.invoice_url,
            message: CREATED_MESSAGE,
        }
    }
}

/// Create a discounted draft order and email its checkout link.
///
/// The body is parsed here rather than with the `Json` extractor so that a
/// malformed body gets the same `{ "error": ... }` shape as every other
/// failure.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let submission: OrderSubmission = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected unreadable submission");
        AppError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    })?;

    let confirmation = state.workflow().submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(DraftOrderCreatedResponse::from(confirmation)),
    )
        .into_response())
}

/// Fallback for any method other than POST.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_created_response_shape() {
        let body = DraftOrderCreatedResponse::from(OrderConfirmation {
            draft_order_id: Some("gid://shopify/DraftOrder/1".to_string()),
            invoice_url: "https://shop/checkout/1".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "success": true,
                "draftOrderId": "gid://shopify/DraftOrder/1",
                "invoiceUrl": "https://shop/checkout/1",
                "message": "Draft order created and checkout link emailed"
            })
        );
    }
}
