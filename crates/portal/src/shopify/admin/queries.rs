//! GraphQL operation definitions for the Shopify Admin API.
//!
//! The operations are written against `graphql_client`'s `GraphQLQuery`
//! trait by hand rather than derived, so no copy of the Admin schema has to
//! ship with the crate. Only the fields the portal reads are modelled.

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// Draft orders
// =============================================================================

/// `draftOrderCreate` mutation.
pub struct DraftOrderCreate;

impl GraphQLQuery for DraftOrderCreate {
    type Variables = draft_order_create::Variables;
    type ResponseData = draft_order_create::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: draft_order_create::QUERY,
            operation_name: draft_order_create::OPERATION_NAME,
        }
    }
}

pub mod draft_order_create {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "DraftOrderCreate";
    pub const QUERY: &str = include_str!("../../../graphql/admin/draft_order_create.graphql");

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: DraftOrderInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderInput {
        pub line_items: Vec<DraftOrderLineItemInput>,
        pub email: String,
        pub applied_discount: DraftOrderAppliedDiscountInput,
        pub custom_attributes: Vec<AttributeInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderLineItemInput {
        pub variant_id: String,
        pub quantity: i64,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderAppliedDiscountInput {
        pub title: String,
        pub description: String,
        pub value: f64,
        pub value_type: DraftOrderAppliedDiscountType,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum DraftOrderAppliedDiscountType {
        #[serde(rename = "PERCENTAGE")]
        Percentage,
        #[serde(rename = "FIXED_AMOUNT")]
        FixedAmount,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct AttributeInput {
        pub key: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        #[serde(rename = "draftOrderCreate")]
        pub draft_order_create: Option<DraftOrderCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderCreatePayload {
        pub draft_order: Option<DraftOrderCreateDraftOrder>,
        #[serde(default)]
        pub user_errors: Vec<DraftOrderCreateUserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderCreateDraftOrder {
        pub id: Option<String>,
        pub invoice_url: Option<String>,
        pub order: Option<DraftOrderCreateDraftOrderOrder>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DraftOrderCreateDraftOrderOrder {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DraftOrderCreateUserErrors {
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}
