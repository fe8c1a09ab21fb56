//! Transactional email for order outcomes.
//!
//! Messages are rendered from Askama HTML templates and delivered through
//! the Brevo transactional email API. One request per message; nothing is
//! queued or retried.

use std::time::Duration;

use askama::Template;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use restyla_trade_core::Email;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::BrevoConfig;

/// Footer shown on every customer email.
const BRAND: &str = "Restyla Salon Trade";

/// Subject for quantity rejection emails.
pub const VALIDATION_ERROR_SUBJECT: &str = "Order Quantity Issue - Restyla";

/// Subject for checkout link emails.
pub const CHECKOUT_SUBJECT: &str = "Complete Your Restyla Order";

/// HTML template for a rejected order.
#[derive(Template)]
#[template(path = "email/validation_error.html")]
struct ValidationErrorEmailHtml<'a> {
    message: &'a str,
    brand: &'a str,
}

/// HTML template for the checkout link.
#[derive(Template)]
#[template(path = "email/checkout.html")]
struct CheckoutEmailHtml<'a> {
    invoice_url: &'a str,
    brand: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Request could not be sent.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Brevo answered with a non-success status.
    #[error("Email API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API key cannot be used as a header value.
    #[error("Invalid API key format: {0}")]
    InvalidHeader(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: Email,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    /// Email telling the salon why their order was rejected.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn validation_error(recipient: Email, message: &str) -> Result<Self, EmailError> {
        Ok(Self {
            recipient,
            subject: VALIDATION_ERROR_SUBJECT.to_string(),
            html_body: validation_error_html(message)?,
        })
    }

    /// Email carrying the draft order's checkout link.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn checkout(recipient: Email, invoice_url: &str) -> Result<Self, EmailError> {
        Ok(Self {
            recipient,
            subject: CHECKOUT_SUBJECT.to_string(),
            html_body: checkout_html(invoice_url)?,
        })
    }
}

/// Render the rejection email body. `message` is inserted as-is.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn validation_error_html(message: &str) -> Result<String, askama::Error> {
    ValidationErrorEmailHtml {
        message,
        brand: BRAND,
    }
    .render()
}

/// Render the checkout email body. `invoice_url` is inserted as-is, both as
/// the button target and as a plain-text fallback.
///
/// # Errors
///
/// Returns error if the template fails to render.
pub fn checkout_html(invoice_url: &str) -> Result<String, askama::Error> {
    CheckoutEmailHtml {
        invoice_url,
        brand: BRAND,
    }
    .render()
}

/// Confirmation that the provider accepted a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailReceipt {
    /// Provider-assigned message ID, when one was returned.
    pub message_id: Option<String>,
}

/// Something that can deliver an [`EmailMessage`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns error if the provider rejects the message or cannot be reached.
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailError>;
}

// =============================================================================
// Brevo
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

/// Brevo transactional email client.
#[derive(Clone)]
pub struct BrevoClient {
    client: reqwest::Client,
    api_url: String,
    sender_name: String,
    sender_email: String,
}

impl BrevoClient {
    /// Create a new Brevo client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BrevoConfig, timeout: Duration) -> Result<Self, EmailError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| EmailError::InvalidHeader(e.to_string()))?;
        api_key.set_sensitive(true);
        headers.insert("api-key", api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            sender_name: config.sender_name.clone(),
            sender_email: config.sender_email.clone(),
        })
    }
}

#[async_trait]
impl Mailer for BrevoClient {
    #[instrument(skip(self, message), fields(to = %message.recipient, subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailError> {
        let body = SendEmailRequest {
            sender: Contact {
                name: Some(&self.sender_name),
                email: &self.sender_email,
            },
            to: [Contact {
                name: None,
                email: message.recipient.as_str(),
            }],
            subject: &message.subject,
            html_content: &message.html_body,
        };

        let response = self.client.post(&self.api_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %message, "Email send failed");
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The message ID is informational; an unexpected body still counts as sent.
        let text = response.text().await.unwrap_or_default();
        let message_id = serde_json::from_str::<SendEmailResponse>(&text)
            .ok()
            .and_then(|r| r.message_id);

        tracing::info!(message_id = message_id.as_deref(), "Email sent successfully");
        Ok(EmailReceipt { message_id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_validation_error_html_contains_message() {
        let html = validation_error_html(
            "Total quantity (3) exceeds maximum of 2. Please resubmit with 2 or fewer items.",
        )
        .unwrap();
        assert!(html.contains("There was an issue with your order"));
        assert!(html.contains("Total quantity (3) exceeds maximum of 2."));
        assert!(html.contains("Restyla Salon Trade"));
    }

    #[test]
    fn test_checkout_html_links_and_repeats_url() {
        let url = "https://shop/checkout/1?key=abc&step=2";
        let html = checkout_html(url).unwrap();
        assert!(html.contains(&format!("href=\"{url}\"")));
        assert!(html.contains(&format!("<code>{url}</code>")));
        assert!(html.contains("Complete Your Order"));
    }

    #[test]
    fn test_message_constructors_set_subjects() {
        let to = Email::parse("a@b.com").unwrap();

        let rejected = EmailMessage::validation_error(to.clone(), "Please select at least 1 item.")
            .unwrap();
        assert_eq!(rejected.subject, "Order Quantity Issue - Restyla");
        assert_eq!(rejected.recipient, to);

        let checkout = EmailMessage::checkout(to, "https://shop/checkout/1").unwrap();
        assert_eq!(checkout.subject, "Complete Your Restyla Order");
        assert!(checkout.html_body.contains("https://shop/checkout/1"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = SendEmailRequest {
            sender: Contact {
                name: Some("Restyla Salon Trade"),
                email: "noreply@restyla.com",
            },
            to: [Contact {
                name: None,
                email: "a@b.com",
            }],
            subject: "Subject",
            html_content: "<p>Hi</p>",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sender": {"name": "Restyla Salon Trade", "email": "noreply@restyla.com"},
                "to": [{"email": "a@b.com"}],
                "subject": "Subject",
                "htmlContent": "<p>Hi</p>"
            })
        );
    }

    #[test]
    fn test_new_rejects_unusable_api_key() {
        let config = BrevoConfig {
            api_key: SecretString::from("bad\nkey"),
            api_url: "https://api.brevo.com/v3/smtp/email".to_string(),
            sender_name: "Restyla Salon Trade".to_string(),
            sender_email: "noreply@restyla.com".to_string(),
        };
        assert!(matches!(
            BrevoClient::new(&config, Duration::from_secs(5)),
            Err(EmailError::InvalidHeader(_))
        ));
    }
}
