//! Shopify Admin API integration.
//!
//! # Architecture
//!
//! - `graphql_client` request/response envelopes, reqwest for transport
//! - Shopify is the source of truth for draft orders; nothing is stored locally
//! - The workflow depends on the [`DraftOrderCreator`] trait, not on
//!   [`AdminClient`] directly, so it can run against in-memory fakes
//!
//! # Example
//!
//! ```rust,ignore
//! use restyla_trade_portal::shopify::{AdminClient, DraftOrderCreator};
//!
//! let client = AdminClient::new(&config.shopify, config.http_timeout)?;
//! let draft = client.create_draft_order(&email, &items).await?;
//! println!("{:?}", draft.invoice_url);
//! ```

mod admin;

pub use admin::{
    AdminClient, ORDER_SOURCE_ATTRIBUTE, TRADE_DISCOUNT_DESCRIPTION, TRADE_DISCOUNT_PERCENTAGE,
    TRADE_DISCOUNT_TITLE, queries,
};

use async_trait::async_trait;
use restyla_trade_core::{Email, LineItem};
use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Request could not be sent or the response body was unreadable.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// GraphQL query returned top-level errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    /// The mutation was rejected by Shopify validation (first `userErrors` entry).
    #[error("Shopify API Error: {0}")]
    UserError(String),
}

/// A draft order as returned by `draftOrderCreate`.
///
/// Either field may be absent if Shopify omitted it; callers must check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOrder {
    /// Global ID, e.g. `gid://shopify/DraftOrder/123`.
    pub id: Option<String>,
    /// Hosted checkout link for paying the draft order.
    pub invoice_url: Option<String>,
}

/// Something that can create trade draft orders.
#[async_trait]
pub trait DraftOrderCreator: Send + Sync {
    /// Create a discounted draft order for `email` containing `items`.
    ///
    /// Sends exactly one request.
    async fn create_draft_order(
        &self,
        email: &Email,
        items: &[LineItem],
    ) -> Result<DraftOrder, ShopifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_display() {
        let err = ShopifyError::UserError("Variant is invalid".to_string());
        assert_eq!(err.to_string(), "Shopify API Error: Variant is invalid");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL(vec![
            "Field not found".to_string(),
            "Access denied".to_string(),
        ]);
        assert_eq!(err.to_string(), "GraphQL errors: Field not found; Access denied");
    }

    #[test]
    fn test_status_error_display() {
        let err = ShopifyError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Shopify returned HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }
}
