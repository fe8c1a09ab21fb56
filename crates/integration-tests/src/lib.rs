//! Integration test harness for the Restyla salon trade portal.
//!
//! Each [`TestContext`] starts three servers on ephemeral local ports:
//!
//! - a stub Shopify Admin GraphQL endpoint
//! - a stub Brevo transactional email endpoint
//! - the real portal router, configured to call the two stubs
//!
//! The stubs record every request they receive so tests can assert on what
//! the portal sent. No network access or credentials are required.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::new(ShopifyBehavior::created(), BrevoBehavior::Accept).await;
//! let (status, body) = ctx.post_order(json!({"email": "a@b.com", "variants": []})).await;
//! assert_eq!(status, StatusCode::BAD_REQUEST);
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use restyla_trade_portal::config::{BrevoConfig, LogFormat, PortalConfig, ShopifyAdminConfig};
use restyla_trade_portal::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Admin API token the portal is configured with.
pub const SHOPIFY_TOKEN: &str = "shpat_integration_test_token";

/// Brevo API key the portal is configured with.
pub const BREVO_API_KEY: &str = "xkeysib-integration-test-key";

const SHOPIFY_PATH: &str = "/admin/api/2024-01/graphql.json";
const BREVO_PATH: &str = "/v3/smtp/email";

/// How the stub Shopify endpoint answers `draftOrderCreate`.
#[derive(Debug, Clone)]
pub enum ShopifyBehavior {
    /// Draft order created.
    Created {
        id: String,
        invoice_url: Option<String>,
    },
    /// Mutation rejected with these `userErrors` messages.
    UserErrors(Vec<String>),
    /// Non-2xx HTTP response.
    Status(u16, String),
}

impl ShopifyBehavior {
    /// A successful draft order with an invoice URL.
    #[must_use]
    pub fn created() -> Self {
        Self::Created {
            id: "gid://shopify/DraftOrder/1001".to_string(),
            invoice_url: Some("https://restyla-test.myshopify.com/invoices/abc123".to_string()),
        }
    }
}

/// How the stub Brevo endpoint answers.
#[derive(Debug, Clone)]
pub enum BrevoBehavior {
    /// 201 with a message ID.
    Accept,
    /// Non-2xx HTTP response.
    Fail(u16, String),
}

/// A request received by one of the stubs.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct Stub<B> {
    behavior: B,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl<B> Stub<B> {
    fn new(behavior: B) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, headers: HeaderMap, body: Value) {
        self.requests
            .lock()
            .expect("stub request log poisoned")
            .push(RecordedRequest { headers, body });
    }

    fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("stub request log poisoned")
            .clone()
    }
}

async fn shopify_graphql(
    State(stub): State<Stub<ShopifyBehavior>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record(headers, body);

    match &stub.behavior {
        ShopifyBehavior::Created { id, invoice_url } => Json(json!({
            "data": {
                "draftOrderCreate": {
                    "draftOrder": {"id": id, "invoiceUrl": invoice_url, "order": null},
                    "userErrors": []
                }
            }
        }))
        .into_response(),
        ShopifyBehavior::UserErrors(messages) => {
            let errors: Vec<Value> = messages
                .iter()
                .map(|m| json!({"field": ["lineItems"], "message": m}))
                .collect();
            Json(json!({
                "data": {
                    "draftOrderCreate": {"draftOrder": null, "userErrors": errors}
                }
            }))
            .into_response()
        }
        ShopifyBehavior::Status(status, body) => (status_code(*status), body.clone()).into_response(),
    }
}

async fn brevo_send(
    State(stub): State<Stub<BrevoBehavior>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record(headers, body);

    match &stub.behavior {
        BrevoBehavior::Accept => (
            StatusCode::CREATED,
            Json(json!({"messageId": "<202401010000.1@smtp-relay.mailin.fr>"})),
        )
            .into_response(),
        BrevoBehavior::Fail(status, body) => {
            (status_code(*status), Json(json!({"message": body}))).into_response()
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("stub configured with invalid status code")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}

/// A running portal wired to stub Shopify and Brevo servers.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    shopify: Stub<ShopifyBehavior>,
    brevo: Stub<BrevoBehavior>,
}

impl TestContext {
    /// Start the stubs and the portal.
    pub async fn new(shopify: ShopifyBehavior, brevo: BrevoBehavior) -> Self {
        let shopify = Stub::new(shopify);
        let brevo = Stub::new(brevo);

        let shopify_addr = serve(
            Router::new()
                .route(SHOPIFY_PATH, post(shopify_graphql))
                .with_state(shopify.clone()),
        )
        .await;
        let brevo_addr = serve(
            Router::new()
                .route(BREVO_PATH, post(brevo_send))
                .with_state(brevo.clone()),
        )
        .await;

        let config = PortalConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            http_timeout: Duration::from_secs(5),
            log_format: LogFormat::Pretty,
            shopify: ShopifyAdminConfig {
                shop: "restyla-test.myshopify.com".to_string(),
                api_version: "2024-01".to_string(),
                access_token: SecretString::from(SHOPIFY_TOKEN),
                endpoint_override: Some(format!("http://{shopify_addr}{SHOPIFY_PATH}")),
            },
            brevo: BrevoConfig {
                api_key: SecretString::from(BREVO_API_KEY),
                api_url: format!("http://{brevo_addr}{BREVO_PATH}"),
                sender_name: "Restyla Salon Trade".to_string(),
                sender_email: "trade@restyla.test".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("Failed to initialize application state");
        let portal_addr = serve(restyla_trade_portal::app(state)).await;

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{portal_addr}"),
            shopify,
            brevo,
        }
    }

    /// URL of a portal path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body to `/api/draft-order` and decode the JSON reply.
    pub async fn post_order(&self, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url("/api/draft-order"))
            .json(&body)
            .send()
            .await
            .expect("Failed to reach portal");
        decode(response).await
    }

    /// Requests received by the Shopify stub.
    #[must_use]
    pub fn shopify_requests(&self) -> Vec<RecordedRequest> {
        self.shopify.recorded()
    }

    /// Requests received by the Brevo stub.
    #[must_use]
    pub fn emails(&self) -> Vec<RecordedRequest> {
        self.brevo.recorded()
    }
}

/// Read status and JSON body from a portal response.
pub async fn decode(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json().await.expect("Response body was not JSON");
    (status, body)
}
