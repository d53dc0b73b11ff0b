//! Checkout session access.
//!
//! The checkout SDK owns the session state; analytics only ever needs a
//! read-only view of the current order.

use std::sync::{PoisonError, RwLock};

use checkout_analytics_core::Order;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CheckoutError;

/// A checkout session as seen by the analytics layer.
pub trait CheckoutService: Send + Sync {
    /// The order currently held in the session state.
    ///
    /// Returns `Ok(None)` when no order has been placed yet. Implementations
    /// must read the state on every call; callers never cache the result.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the state cannot be read or the order in
    /// it is malformed.
    fn order(&self) -> Result<Option<Order>, CheckoutError>;
}

/// Checkout session backed by the SDK's serialized state.
///
/// The state is the JSON snapshot the SDK exposes (`{"data": {"order": ...}}`).
/// The order is deserialized on every read, so replacing the state is
/// immediately visible to the next [`CheckoutService::order`] call.
#[derive(Debug, Default)]
pub struct JsonCheckoutState {
    state: RwLock<Value>,
}

impl JsonCheckoutState {
    /// Create a session from an SDK state snapshot.
    #[must_use]
    pub const fn new(state: Value) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Replace the state snapshot (the SDK publishes a new one on every change).
    pub fn replace(&self, state: Value) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl CheckoutService for JsonCheckoutState {
    fn order(&self) -> Result<Option<Order>, CheckoutError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        if state.is_null() {
            return Err(CheckoutError::Unavailable(
                "state has not been loaded".to_string(),
            ));
        }

        match state.pointer("/data/order") {
            None | Some(Value::Null) => Ok(None),
            Some(order) => Ok(Some(Order::deserialize(order)?)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order_json() -> Value {
        serde_json::json!({
            "orderId": 123,
            "orderAmount": 25,
            "currency": { "code": "USD" },
            "lineItems": { "physicalItems": [], "digitalItems": [] }
        })
    }

    #[test]
    fn test_reads_order_from_state() {
        let checkout = JsonCheckoutState::new(serde_json::json!({ "data": { "order": order_json() } }));
        let order = checkout.order().unwrap().unwrap();
        assert_eq!(order.order_id.as_i64(), 123);
    }

    #[test]
    fn test_no_order_is_none() {
        let checkout = JsonCheckoutState::new(serde_json::json!({ "data": {} }));
        assert!(checkout.order().unwrap().is_none());

        checkout.replace(serde_json::json!({ "data": { "order": null } }));
        assert!(checkout.order().unwrap().is_none());
    }

    #[test]
    fn test_unloaded_state_is_unavailable() {
        let checkout = JsonCheckoutState::default();
        assert!(matches!(checkout.order(), Err(CheckoutError::Unavailable(_))));
    }

    #[test]
    fn test_malformed_order() {
        let checkout = JsonCheckoutState::new(
            serde_json::json!({ "data": { "order": { "orderId": "not-a-number" } } }),
        );
        assert!(matches!(checkout.order(), Err(CheckoutError::Malformed(_))));
    }

    #[test]
    fn test_replace_is_visible_on_next_read() {
        let checkout = JsonCheckoutState::new(serde_json::json!({ "data": {} }));
        assert!(checkout.order().unwrap().is_none());

        checkout.replace(serde_json::json!({ "data": { "order": order_json() } }));
        assert!(checkout.order().unwrap().is_some());
    }
}
