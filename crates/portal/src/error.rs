//! HTTP error responses with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before the JSON body is written. Unlike most portals, the message
//! of a downstream failure is returned to the caller: the order form shows
//! it to the salon verbatim.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::workflow::OrderError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// The order workflow failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Request body could not be read as a submission.
    #[error("{0}")]
    BadRequest(String),

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_sent: Option<bool>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Order(OrderError::BadRequest(_) | OrderError::QuantityRejected(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Order(
                OrderError::Platform(_)
                | OrderError::Notification(_)
                | OrderError::MissingInvoiceUrl,
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let email_sent = matches!(self, Self::Order(OrderError::QuantityRejected(_))).then_some(true);

        let body = ErrorBody {
            error: self.to_string(),
            email_sent,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb to the current Sentry scope.
///
/// Breadcrumbs appear in Sentry error reports to show the steps leading up
/// to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("order", "Creating draft order", Some(&[("line_items", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
