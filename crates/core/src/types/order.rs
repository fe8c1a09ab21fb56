//! Order submission types.
//!
//! These are built per request from the submitted form and handed to the
//! quantity rules and the draft order client. Nothing here is persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Opaque Shopify product variant identifier.
///
/// Usually a global ID such as `gid://shopify/ProductVariant/47262548074675`,
/// but the portal never inspects it; Shopify decides whether it is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Wrap a variant identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for VariantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One requested variant and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Variant being ordered.
    pub variant_id: VariantId,
    /// Units requested. Zero is allowed here; the quantity rules decide.
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub fn new(variant_id: impl Into<VariantId>, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// Errors building an [`OrderRequest`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderRequestError {
    /// The submission contained no line items.
    #[error("order must contain at least one line item")]
    NoLineItems,
}

/// A salon's order submission: who to email and what they asked for.
///
/// Always holds at least one line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    email: Email,
    items: Vec<LineItem>,
}

impl OrderRequest {
    /// Create an order request.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRequestError::NoLineItems`] if `items` is empty.
    pub fn new(email: Email, items: Vec<LineItem>) -> Result<Self, OrderRequestError> {
        if items.is_empty() {
            return Err(OrderRequestError::NoLineItems);
        }
        Ok(Self { email, items })
    }

    /// Customer email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Requested line items, in submission order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_uses_camel_case() {
        let item: LineItem =
            serde_json::from_str(r#"{"variantId":"gid://shopify/ProductVariant/1","quantity":2}"#)
                .unwrap();
        assert_eq!(item.variant_id.as_str(), "gid://shopify/ProductVariant/1");
        assert_eq!(item.quantity, 2);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["variantId"], "gid://shopify/ProductVariant/1");
    }

    #[test]
    fn test_line_item_rejects_negative_quantity() {
        let result = serde_json::from_str::<LineItem>(r#"{"variantId":"v1","quantity":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_order_request_requires_items() {
        let email = Email::parse("a@b.com").unwrap();
        assert_eq!(
            OrderRequest::new(email.clone(), vec![]),
            Err(OrderRequestError::NoLineItems)
        );

        let request = OrderRequest::new(email, vec![LineItem::new("v1", 1)]).unwrap();
        assert_eq!(request.items().len(), 1);
        assert_eq!(request.email().as_str(), "a@b.com");
    }
}
