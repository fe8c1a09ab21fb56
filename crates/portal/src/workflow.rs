//! Salon order submission workflow.
//!
//! ```text
//! Received ──► Validating ──► Rejected ──► (validation email) ──► 400
//!                  │
//!                  └────────► Creating ──► Notifying ──► (checkout email) ──► 201
//! ```
//!
//! Every step runs at most once and in order. A failure at any step ends the
//! workflow; nothing already done (a created draft order) is rolled back.

use std::sync::Arc;

use restyla_trade_core::{
    Email, LineItem, OrderRequest, QuantityError, validate_quantity,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::services::email::{EmailError, EmailMessage, Mailer};
use crate::shopify::{DraftOrderCreator, ShopifyError};

/// Message returned when the submission lacks an email or line items.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing email or variants";

/// Message returned when the email is present but not an address.
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

/// Ways a submission can fail to produce a draft order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Incomplete or malformed submission. No external service was contacted.
    #[error("{0}")]
    BadRequest(String),

    /// The quantity rules rejected the order and the salon was emailed.
    #[error("{0}")]
    QuantityRejected(QuantityError),

    /// Shopify failed or rejected the draft order.
    #[error(transparent)]
    Platform(#[from] ShopifyError),

    /// An email could not be rendered or delivered.
    #[error(transparent)]
    Notification(#[from] EmailError),

    /// Shopify created the draft order but returned no checkout link.
    #[error("Draft order was created without an invoice URL")]
    MissingInvoiceUrl,
}

/// A submission exactly as posted; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderSubmission {
    pub email: Option<String>,
    pub variants: Option<Vec<LineItem>>,
}

impl OrderSubmission {
    /// Check required fields and build an [`OrderRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::BadRequest`] if the email or variants are
    /// missing or empty, or the email is not an address.
    pub fn into_order_request(self) -> Result<OrderRequest, OrderError> {
        let email = self.email.filter(|e| !e.trim().is_empty());
        let variants = self.variants.filter(|v| !v.is_empty());

        let (Some(email), Some(variants)) = (email, variants) else {
            return Err(OrderError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let email =
            Email::parse(&email).map_err(|_| OrderError::BadRequest(INVALID_EMAIL_MESSAGE.to_string()))?;

        OrderRequest::new(email, variants)
            .map_err(|_| OrderError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()))
    }
}

/// A draft order that was created and whose checkout link was emailed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Shopify draft order ID, if Shopify returned one.
    pub draft_order_id: Option<String>,
    /// Checkout link sent to the salon.
    pub invoice_url: String,
}

/// Runs submissions through validation, draft order creation and email.
///
/// Holds no per-request state; one instance serves all requests.
#[derive(Clone)]
pub struct OrderWorkflow {
    shopify: Arc<dyn DraftOrderCreator>,
    mailer: Arc<dyn Mailer>,
}

impl OrderWorkflow {
    /// Create a workflow over the given Shopify client and mailer.
    #[must_use]
    pub fn new(shopify: Arc<dyn DraftOrderCreator>, mailer: Arc<dyn Mailer>) -> Self {
        Self { shopify, mailer }
    }

    /// Process one submission.
    ///
    /// # Errors
    ///
    /// - [`OrderError::BadRequest`] before any external call.
    /// - [`OrderError::QuantityRejected`] after the rejection email was sent.
    /// - [`OrderError::Notification`] if either email fails, including the
    ///   rejection email.
    /// - [`OrderError::Platform`] / [`OrderError::MissingInvoiceUrl`] if the
    ///   draft order could not be created or has no checkout link.
    #[instrument(skip_all, fields(email = tracing::field::Empty))]
    pub async fn submit(&self, submission: OrderSubmission) -> Result<OrderConfirmation, OrderError> {
        let request = submission.into_order_request()?;
        tracing::Span::current().record("email", request.email().as_str());

        if let Err(rejection) = validate_quantity(request.items()) {
            return Err(self.reject(&request, rejection).await?);
        }

        add_breadcrumb("order", "Creating draft order", None);
        let draft = self
            .shopify
            .create_draft_order(request.email(), request.items())
            .await?;

        let invoice_url = draft.invoice_url.ok_or(OrderError::MissingInvoiceUrl)?;

        add_breadcrumb("order", "Sending checkout email", None);
        let message = EmailMessage::checkout(request.email().clone(), &invoice_url)?;
        self.mailer.send(&message).await?;

        tracing::info!(
            draft_order_id = draft.id.as_deref(),
            "Draft order created and checkout link emailed"
        );

        Ok(OrderConfirmation {
            draft_order_id: draft.id,
            invoice_url,
        })
    }

    /// Email the rejection and return it as the outcome.
    ///
    /// A failed email is returned as the error instead of the rejection.
    async fn reject(
        &self,
        request: &OrderRequest,
        rejection: QuantityError,
    ) -> Result<OrderError, OrderError> {
        tracing::info!(reason = %rejection, "Order rejected by quantity rules");

        let message = EmailMessage::validation_error(request.email().clone(), &rejection.to_string())?;
        self.mailer.send(&message).await?;

        Ok(OrderError::QuantityRejected(rejection))
    }
}
