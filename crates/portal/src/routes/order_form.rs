//! Salon order form page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use restyla_trade_core::MAX_UNITS_PER_ORDER;
use tracing::instrument;

/// A product salons can order through the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogProduct {
    pub variant_id: &'static str,
    pub name: &'static str,
}

/// Products offered on the trade form.
pub const CATALOG: &[CatalogProduct] = &[
    CatalogProduct {
        variant_id: "gid://shopify/ProductVariant/47262548074675",
        name: "Restyla Air 2.0 Pink Units",
    },
    CatalogProduct {
        variant_id: "gid://shopify/ProductVariant/47262548107443",
        name: "Restyla Air 2.0 White Units",
    },
];

/// Order form template.
#[derive(Template, WebTemplate)]
#[template(path = "order_form.html")]
pub struct OrderFormTemplate {
    pub products: &'static [CatalogProduct],
    pub max_units: u64,
}

/// Display the salon order form.
#[instrument]
pub async fn show() -> impl IntoResponse {
    OrderFormTemplate {
        products: CATALOG,
        max_units: MAX_UNITS_PER_ORDER,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_lists_catalog_and_limit() {
        let html = OrderFormTemplate {
            products: CATALOG,
            max_units: MAX_UNITS_PER_ORDER,
        }
        .render()
        .unwrap();

        assert!(html.contains("Restyla Air 2.0 Pink Units"));
        assert!(html.contains("gid://shopify/ProductVariant/47262548107443"));
        assert!(html.contains("Max 2 Units Per Order"));
        assert!(html.contains("/api/draft-order"));
    }
}
