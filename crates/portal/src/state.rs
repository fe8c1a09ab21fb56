//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::PortalConfig;
use crate::services::email::{BrevoClient, EmailError, Mailer};
use crate::shopify::{AdminClient, DraftOrderCreator, ShopifyError};
use crate::workflow::OrderWorkflow;

/// Error building the outbound clients at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to build Shopify client: {0}")]
    Shopify(#[from] ShopifyError),
    #[error("failed to build email client: {0}")]
    Email(#[from] EmailError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The HTTP clients inside are built once and
/// reused for every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    workflow: OrderWorkflow,
}

impl AppState {
    /// Create application state with the real Shopify and Brevo clients.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client fails to build.
    pub fn new(config: PortalConfig) -> Result<Self, StateError> {
        let shopify = AdminClient::new(&config.shopify, config.http_timeout)?;
        let mailer = BrevoClient::new(&config.brevo, config.http_timeout)?;

        tracing::debug!(endpoint = shopify.endpoint(), "Shopify Admin client ready");

        Ok(Self::from_parts(config, Arc::new(shopify), Arc::new(mailer)))
    }

    /// Create application state over arbitrary Shopify and mail backends.
    #[must_use]
    pub fn from_parts(
        config: PortalConfig,
        shopify: Arc<dyn DraftOrderCreator>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                workflow: OrderWorkflow::new(shopify, mailer),
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the order workflow.
    #[must_use]
    pub fn workflow(&self) -> &OrderWorkflow {
        &self.inner.workflow
    }
}
