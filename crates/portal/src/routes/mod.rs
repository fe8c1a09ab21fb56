//! HTTP route handlers for the trade portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /salon-order-form    - Order form page
//! POST /api/draft-order     - Create draft order and email checkout link
//!      (any other method)   - 405 JSON
//! ```

pub mod api;
pub mod order_form;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the router for all portal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/salon-order-form", get(order_form::show))
        .route(
            "/api/draft-order",
            post(api::draft_order::create).fallback(api::draft_order::method_not_allowed),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify or Brevo.
async fn health() -> &'static str {
    "ok"
}
