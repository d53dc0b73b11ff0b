//! Page-level checkout configuration.
//!
//! The hosting page embeds this object (as `checkoutConfig`) to tell the
//! loader which view to render.

use serde::{Deserialize, Serialize};

use super::id::{CheckoutId, OrderId};

/// Configuration supplied by the page hosting the checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// ID of the DOM element the app mounts into.
    pub container_id: String,
    /// Present on the order confirmation page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    /// Present on the checkout page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_id: Option<CheckoutId>,
    /// Base URL the app's assets are served from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Error-reporting options for the rendered app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentry_config: Option<SentryConfig>,
}

impl CheckoutConfig {
    /// Minimal configuration with only a container.
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            order_id: None,
            checkout_id: None,
            public_path: None,
            sentry_config: None,
        }
    }

    /// Set the order ID.
    #[must_use]
    pub const fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Set the checkout ID.
    #[must_use]
    pub fn with_checkout_id(mut self, checkout_id: impl Into<CheckoutId>) -> Self {
        self.checkout_id = Some(checkout_id.into());
        self
    }
}

/// Error-reporting (Sentry) options passed through to the app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    /// Fraction of errors to report (0.0 - 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_order_confirmation_config() {
        let config: CheckoutConfig =
            serde_json::from_str(r#"{"containerId":"x","orderId":456}"#).unwrap();
        assert_eq!(config, CheckoutConfig::new("x").with_order_id(OrderId::new(456)));
    }

    #[test]
    fn test_deserialize_full_config() {
        let config: CheckoutConfig = serde_json::from_value(serde_json::json!({
            "containerId": "checkout-app",
            "checkoutId": "abc",
            "publicPath": "https://cdn.example.com/checkout/",
            "sentryConfig": { "dsn": "https://key@sentry.example.com/1", "sampleRate": 0.5 }
        }))
        .unwrap();

        assert_eq!(config.checkout_id, Some(CheckoutId::new("abc")));
        assert_eq!(
            config.public_path.as_deref(),
            Some("https://cdn.example.com/checkout/")
        );
        assert_eq!(config.sentry_config.unwrap().sample_rate, Some(0.5));
    }

    #[test]
    fn test_container_id_required() {
        assert!(serde_json::from_str::<CheckoutConfig>(r#"{"orderId":1}"#).is_err());
    }
}
