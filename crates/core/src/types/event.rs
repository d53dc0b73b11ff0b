//! Checkout lifecycle events and data-layer entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form payload forwarded to the business analytics (BODL) service.
///
/// The checkout UI builds these objects ad hoc (e.g. `{"methodName": "card"}`),
/// so they stay untyped and are passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodlEventsPayload(Map<String, Value>);

impl BodlEventsPayload {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, returning the payload for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for BodlEventsPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A checkout lifecycle event as emitted by the checkout UI.
///
/// Serialized with an `event` tag carrying the handler name, which lets a
/// recorded session be replayed:
///
/// ```
/// use checkout_analytics_core::CheckoutEvent;
///
/// let event: CheckoutEvent =
///     serde_json::from_str(r#"{"event":"trackStepViewed","step":"shipping"}"#).unwrap();
/// assert_eq!(event, CheckoutEvent::TrackStepViewed { step: "shipping".into() });
/// assert_eq!(event.name(), "trackStepViewed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CheckoutEvent {
    CheckoutBegin,
    TrackStepCompleted {
        step: String,
    },
    TrackStepViewed {
        step: String,
    },
    OrderPurchased,
    CustomerEmailEntry {
        email: String,
    },
    CustomerSuggestionInit {
        #[serde(default)]
        payload: BodlEventsPayload,
    },
    CustomerSuggestionExecute,
    CustomerPaymentMethodExecuted {
        #[serde(default)]
        payload: BodlEventsPayload,
    },
    ShowShippingMethods,
    SelectedPaymentMethod {
        method_name: String,
        method_id: String,
    },
    ClickPayButton {
        #[serde(default)]
        payload: BodlEventsPayload,
    },
    PaymentRejected,
    PaymentComplete,
    ExitCheckout,
    WalletButtonClick {
        method_id: String,
    },
}

impl CheckoutEvent {
    /// The handler name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CheckoutBegin => "checkoutBegin",
            Self::TrackStepCompleted { .. } => "trackStepCompleted",
            Self::TrackStepViewed { .. } => "trackStepViewed",
            Self::OrderPurchased => "orderPurchased",
            Self::CustomerEmailEntry { .. } => "customerEmailEntry",
            Self::CustomerSuggestionInit { .. } => "customerSuggestionInit",
            Self::CustomerSuggestionExecute => "customerSuggestionExecute",
            Self::CustomerPaymentMethodExecuted { .. } => "customerPaymentMethodExecuted",
            Self::ShowShippingMethods => "showShippingMethods",
            Self::SelectedPaymentMethod { .. } => "selectedPaymentMethod",
            Self::ClickPayButton { .. } => "clickPayButton",
            Self::PaymentRejected => "paymentRejected",
            Self::PaymentComplete => "paymentComplete",
            Self::ExitCheckout => "exitCheckout",
            Self::WalletButtonClick { .. } => "walletButtonClick",
        }
    }
}

/// An entry appended to the tag manager's data layer.
///
/// Serializes as a flat object: `{"event": "<name>", ...fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLayerEvent {
    pub event: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DataLayerEvent {
    /// Create an event with no extra fields.
    #[must_use]
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            fields: Map::new(),
        }
    }

    /// Add a field, returning the event for chaining.
    ///
    /// An `event` key replaces the event name, like a JS object spread would.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "event" {
            if let Value::String(name) = value {
                self.event = name;
                return self;
            }
        }
        self.fields.insert(key, value);
        self
    }

    /// Merge every field of a JSON object into the event.
    #[must_use]
    pub fn with_fields(self, fields: Map<String, Value>) -> Self {
        fields
            .into_iter()
            .fold(self, |event, (key, value)| event.with_field(key, value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_event_roundtrip_shape() {
        let json = serde_json::to_value(CheckoutEvent::PaymentComplete).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "paymentComplete" }));
    }

    #[test]
    fn test_struct_event_fields_are_camel_case() {
        let event: CheckoutEvent = serde_json::from_value(serde_json::json!({
            "event": "selectedPaymentMethod",
            "methodName": "Credit Card",
            "methodId": "braintree"
        }))
        .unwrap();

        assert_eq!(
            event,
            CheckoutEvent::SelectedPaymentMethod {
                method_name: "Credit Card".to_string(),
                method_id: "braintree".to_string(),
            }
        );
    }

    #[test]
    fn test_payload_defaults_to_empty() {
        let event: CheckoutEvent =
            serde_json::from_str(r#"{"event":"clickPayButton"}"#).unwrap();
        assert_eq!(
            event,
            CheckoutEvent::ClickPayButton {
                payload: BodlEventsPayload::new()
            }
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<CheckoutEvent>(r#"{"event":"teleport"}"#).is_err());
    }

    #[test]
    fn test_data_layer_event_flattens_fields() {
        let event = DataLayerEvent::new("gtm.js").with_field("gtm.start", 1_700_000_000_000_i64);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({ "event": "gtm.js", "gtm.start": 1_700_000_000_000_i64 })
        );
    }

    #[test]
    fn test_data_layer_event_field_overrides_name() {
        let event = DataLayerEvent::new("purchase").with_field("event", "refund");
        assert_eq!(event.event, "refund");
        assert!(event.fields.is_empty());
    }
}
