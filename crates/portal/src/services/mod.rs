//! Outbound services other than Shopify.

pub mod email;

pub use email::{BrevoClient, EmailError, EmailMessage, EmailReceipt, Mailer};
