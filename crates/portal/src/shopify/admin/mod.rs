//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a static Admin API access token (custom app) and
//! creates trade draft orders. Each call is a single POST; nothing is
//! retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use graphql_client::GraphQLQuery;
use restyla_trade_core::{Email, LineItem};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{DraftOrder, DraftOrderCreator, ShopifyError};

pub mod queries;

use queries::{
    DraftOrderCreate,
    draft_order_create::{
        AttributeInput, DraftOrderAppliedDiscountInput, DraftOrderAppliedDiscountType,
        DraftOrderInput, DraftOrderLineItemInput, ResponseData, Variables,
    },
};

/// Title of the discount applied to every trade draft order.
pub const TRADE_DISCOUNT_TITLE: &str = "Salon Trade";

/// Customer-visible description of the trade discount.
pub const TRADE_DISCOUNT_DESCRIPTION: &str = "Salon Trade 50% Discount";

/// Trade discount, in percent.
pub const TRADE_DISCOUNT_PERCENTAGE: f64 = 50.0;

/// Custom attribute key/value tagging where a draft order came from.
pub const ORDER_SOURCE_ATTRIBUTE: (&str, &str) = ("order_source", "salon_trade_app");

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    /// * `timeout` - Total timeout for each request
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ShopifyAdminConfig, timeout: Duration) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split('.').next())
                .and_then(|s| s.parse().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let graphql_response: graphql_client::Response<Q::ResponseData> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        graphql_response
            .data
            .ok_or_else(|| ShopifyError::GraphQL(vec!["No data in response".to_string()]))
    }
}

#[async_trait]
impl DraftOrderCreator for AdminClient {
    #[instrument(skip(self, email, items), fields(email = %email, line_items = items.len()))]
    async fn create_draft_order(
        &self,
        email: &Email,
        items: &[LineItem],
    ) -> Result<DraftOrder, ShopifyError> {
        let variables = draft_order_variables(email, items);

        let response = self
            .execute::<DraftOrderCreate>(variables)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Draft order creation failed"))?;

        let draft_order = draft_order_from_response(response)
            .inspect_err(|e| tracing::warn!(error = %e, "Shopify rejected draft order"))?;

        tracing::info!(
            draft_order_id = draft_order.id.as_deref().unwrap_or("<missing>"),
            "Draft order created"
        );
        Ok(draft_order)
    }
}

/// Build the `draftOrderCreate` input for a trade order.
fn draft_order_variables(email: &Email, items: &[LineItem]) -> Variables {
    let (key, value) = ORDER_SOURCE_ATTRIBUTE;

    Variables {
        input: DraftOrderInput {
            line_items: items
                .iter()
                .map(|item| DraftOrderLineItemInput {
                    variant_id: item.variant_id.to_string(),
                    quantity: i64::from(item.quantity),
                })
                .collect(),
            email: email.to_string(),
            applied_discount: DraftOrderAppliedDiscountInput {
                title: TRADE_DISCOUNT_TITLE.to_string(),
                description: TRADE_DISCOUNT_DESCRIPTION.to_string(),
                value: TRADE_DISCOUNT_PERCENTAGE,
                value_type: DraftOrderAppliedDiscountType::Percentage,
            },
            custom_attributes: vec![AttributeInput {
                key: key.to_string(),
                value: value.to_string(),
            }],
        },
    }
}

/// Extract the created draft order, surfacing the first user error if any.
///
/// Missing fields in an otherwise successful payload are passed through as
/// `None`.
fn draft_order_from_response(response: ResponseData) -> Result<DraftOrder, ShopifyError> {
    let Some(payload) = response.draft_order_create else {
        return Ok(DraftOrder::default());
    };

    if let Some(first) = payload.user_errors.into_iter().next() {
        return Err(ShopifyError::UserError(first.message));
    }

    Ok(payload
        .draft_order
        .map(|draft| DraftOrder {
            id: draft.id,
            invoice_url: draft.invoice_url,
        })
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> ResponseData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_variables_shape() {
        let email = Email::parse("a@b.com").unwrap();
        let items = [LineItem::new("v1", 1), LineItem::new("v2", 1)];

        let body = DraftOrderCreate::build_query(draft_order_variables(&email, &items));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "DraftOrderCreate");
        assert!(json["query"].as_str().unwrap().contains("draftOrderCreate"));

        let input = &json["variables"]["input"];
        assert_eq!(input["email"], "a@b.com");
        assert_eq!(
            input["lineItems"],
            json!([
                {"variantId": "v1", "quantity": 1},
                {"variantId": "v2", "quantity": 1}
            ])
        );
        assert_eq!(
            input["appliedDiscount"],
            json!({
                "title": "Salon Trade",
                "description": "Salon Trade 50% Discount",
                "value": 50.0,
                "valueType": "PERCENTAGE"
            })
        );
        assert_eq!(
            input["customAttributes"],
            json!([{"key": "order_source", "value": "salon_trade_app"}])
        );
    }

    #[test]
    fn test_response_success() {
        let response = parse(json!({
            "draftOrderCreate": {
                "draftOrder": {
                    "id": "gid://shopify/DraftOrder/1",
                    "invoiceUrl": "https://shop/checkout/1",
                    "order": null
                },
                "userErrors": []
            }
        }));

        let draft = draft_order_from_response(response).unwrap();
        assert_eq!(draft.id.as_deref(), Some("gid://shopify/DraftOrder/1"));
        assert_eq!(draft.invoice_url.as_deref(), Some("https://shop/checkout/1"));
    }

    #[test]
    fn test_response_first_user_error_only() {
        let response = parse(json!({
            "draftOrderCreate": {
                "draftOrder": null,
                "userErrors": [
                    {"field": ["lineItems", "0", "variantId"], "message": "X"},
                    {"field": null, "message": "Y"}
                ]
            }
        }));

        match draft_order_from_response(response) {
            Err(ShopifyError::UserError(message)) => assert_eq!(message, "X"),
            other => panic!("expected user error, got {other:?}"),
        }
    }

    #[test]
    fn test_response_missing_fields_are_absent() {
        let response = parse(json!({
            "draftOrderCreate": {
                "draftOrder": {"id": "gid://shopify/DraftOrder/2"},
                "userErrors": []
            }
        }));
        let draft = draft_order_from_response(response).unwrap();
        assert_eq!(draft.id.as_deref(), Some("gid://shopify/DraftOrder/2"));
        assert_eq!(draft.invoice_url, None);

        let empty = draft_order_from_response(parse(json!({"draftOrderCreate": null}))).unwrap();
        assert_eq!(empty, DraftOrder::default());
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ShopifyAdminConfig {
            shop: "restyla.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            access_token: SecretString::from("shpat_token"),
            endpoint_override: None,
        };
        let client = AdminClient::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://restyla.myshopify.com/admin/api/2024-01/graphql.json"
        );
    }
}
