//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_SHOP` - Shopify store domain (e.g., restyla.myshopify.com)
//! - `SHOPIFY_ADMIN_API_TOKEN` - Admin API access token with `write_draft_orders`
//! - `BREVO_API_KEY` - Brevo transactional email API key
//!
//! ## Optional
//! - `TRADE_HOST` - Bind address (default: 127.0.0.1)
//! - `TRADE_PORT` - Listen port (default: 3000)
//! - `TRADE_HTTP_TIMEOUT_SECS` - Timeout for Shopify and Brevo calls (default: 30)
//! - `TRADE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-01)
//! - `SHOPIFY_ADMIN_ENDPOINT` - Full GraphQL endpoint, overrides the one derived from the shop
//! - `BREVO_API_URL` - Transactional email endpoint (default: Brevo v3 SMTP API)
//! - `BREVO_SENDER_NAME` - Sender display name (default: Restyla Salon Trade)
//! - `BREVO_SENDER_EMAIL` - Sender address (default: noreply@restyla.com)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";
const DEFAULT_SENDER_NAME: &str = "Restyla Salon Trade";
const DEFAULT_SENDER_EMAIL: &str = "noreply@restyla.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shipping.
    Json,
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAdminConfig,
    /// Brevo email configuration
    pub brevo: BrevoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., restyla.myshopify.com)
    pub shop: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Explicit GraphQL endpoint, used instead of the shop-derived URL
    pub endpoint_override: Option<String>,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("shop", &self.shop)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

impl ShopifyAdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            shop: get_required_env("SHOPIFY_SHOP")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: get_validated_secret("SHOPIFY_ADMIN_API_TOKEN")?,
            endpoint_override: get_optional_env("SHOPIFY_ADMIN_ENDPOINT")
                .map(|v| validate_http_url("SHOPIFY_ADMIN_ENDPOINT", v))
                .transpose()?,
        })
    }

    /// The Admin GraphQL endpoint for this shop.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        self.endpoint_override.clone().unwrap_or_else(|| {
            format!(
                "https://{}/admin/api/{}/graphql.json",
                self.shop, self.api_version
            )
        })
    }
}

/// Brevo transactional email configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BrevoConfig {
    /// Brevo API key
    pub api_key: SecretString,
    /// Transactional email endpoint
    pub api_url: String,
    /// Sender display name
    pub sender_name: String,
    /// Sender email address
    pub sender_email: String,
}

impl std::fmt::Debug for BrevoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("sender_name", &self.sender_name)
            .field("sender_email", &self.sender_email)
            .finish()
    }
}

impl BrevoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("BREVO_API_KEY")?,
            api_url: validate_http_url(
                "BREVO_API_URL",
                get_env_or_default("BREVO_API_URL", DEFAULT_BREVO_API_URL),
            )?,
            sender_name: get_env_or_default("BREVO_SENDER_NAME", DEFAULT_SENDER_NAME),
            sender_email: get_env_or_default("BREVO_SENDER_EMAIL", DEFAULT_SENDER_EMAIL),
        })
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets look like placeholders.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("TRADE_HOST", "127.0.0.1")?;
        let port = parse_env("TRADE_PORT", "3000")?;
        let http_timeout = Duration::from_secs(parse_env("TRADE_HTTP_TIMEOUT_SECS", "30")?);
        let log_format = parse_log_format(&get_env_or_default("TRADE_LOG_FORMAT", "pretty"))?;

        Ok(Self {
            host,
            port,
            http_timeout,
            log_format,
            shopify: ShopifyAdminConfig::from_env()?,
            brevo: BrevoConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::InvalidEnvVar(
            "TRADE_LOG_FORMAT".to_string(),
            format!("expected 'pretty' or 'json', got '{other}'"),
        )),
    }
}

/// Require an absolute `http` or `https` URL.
fn validate_http_url(key: &str, value: String) -> Result<String, ConfigError> {
    let url = Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
        ));
    }

    Ok(value)
}

/// Reject empty secrets and values copied unchanged from an example file.
fn validate_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(get_required_env(key)?);
    validate_secret(&secret, key)?;
    Ok(secret)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify_config() -> ShopifyAdminConfig {
        ShopifyAdminConfig {
            shop: "restyla.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            access_token: SecretString::from("shpat_super_secret_token"),
            endpoint_override: None,
        }
    }

    #[test]
    fn test_graphql_endpoint_from_shop() {
        assert_eq!(
            shopify_config().graphql_endpoint(),
            "https://restyla.myshopify.com/admin/api/2024-01/graphql.json"
        );
    }

    #[test]
    fn test_graphql_endpoint_override() {
        let config = ShopifyAdminConfig {
            endpoint_override: Some("http://127.0.0.1:9000/graphql.json".to_string()),
            ..shopify_config()
        };
        assert_eq!(
            config.graphql_endpoint(),
            "http://127.0.0.1:9000/graphql.json"
        );
    }

    #[test]
    fn test_validate_secret_placeholder() {
        let result = validate_secret(&SecretString::from("your-admin-token"), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));

        let result = validate_secret(&SecretString::from("CHANGEME"), "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_empty() {
        let result = validate_secret(&SecretString::from("   "), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_valid() {
        let result = validate_secret(&SecretString::from("xkeysib-3f9a0c7e2b"), "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("BREVO_API_URL", DEFAULT_BREVO_API_URL.to_string()).is_ok());
        assert!(
            validate_http_url("SHOPIFY_ADMIN_ENDPOINT", "http://127.0.0.1:9000/graphql".to_string())
                .is_ok()
        );
        assert!(matches!(
            validate_http_url("BREVO_API_URL", "api.brevo.com/v3".to_string()),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "BREVO_API_URL"
        ));
        assert!(validate_http_url("BREVO_API_URL", "ftp://api.brevo.com".to_string()).is_err());
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("json").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format("PRETTY").unwrap(), LogFormat::Pretty);
        assert!(parse_log_format("yaml").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = PortalConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            http_timeout: Duration::from_secs(30),
            log_format: LogFormat::Pretty,
            shopify: shopify_config(),
            brevo: BrevoConfig {
                api_key: SecretString::from("brevo_key"),
                api_url: DEFAULT_BREVO_API_URL.to_string(),
                sender_name: DEFAULT_SENDER_NAME.to_string(),
                sender_email: DEFAULT_SENDER_EMAIL.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let shopify = format!("{:?}", shopify_config());
        assert!(shopify.contains("restyla.myshopify.com"));
        assert!(shopify.contains("[REDACTED]"));
        assert!(!shopify.contains("shpat_super_secret_token"));

        let brevo = BrevoConfig {
            api_key: SecretString::from("xkeysib-very-secret"),
            api_url: DEFAULT_BREVO_API_URL.to_string(),
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            sender_email: DEFAULT_SENDER_EMAIL.to_string(),
        };
        let debug_output = format!("{brevo:?}");
        assert!(debug_output.contains("noreply@restyla.com"));
        assert!(!debug_output.contains("xkeysib-very-secret"));
    }
}
