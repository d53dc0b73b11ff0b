//! Integration tests for checkout analytics.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p checkout-analytics-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_session` - Event fan-out over a JSON-backed checkout session
//! - `page_bootstrap` - Page bootstrap and rendering with the analytics data
//!   layer
//!
//! This crate only holds shared fixtures.

use serde_json::{Value, json};

/// Checkout state holding a two-item USD order (ID 123, total 25).
#[must_use]
pub fn reference_order_state() -> Value {
    json!({
        "data": {
            "order": {
                "orderId": 123,
                "orderAmount": 25,
                "currency": { "code": "USD", "name": "US Dollar", "symbol": "$", "decimalPlaces": 2 },
                "lineItems": {
                    "physicalItems": [
                        { "id": 1, "sku": "A", "name": "Shirt", "quantity": 2, "salePrice": 10, "listPrice": 12 }
                    ],
                    "digitalItems": [
                        { "id": 2, "sku": "B", "name": "EBook", "quantity": 1, "salePrice": 5 }
                    ],
                    "giftCertificates": []
                }
            }
        }
    })
}

/// The purchase record pushed for [`reference_order_state`].
#[must_use]
pub fn reference_purchase_event() -> Value {
    json!({
        "event": "purchase",
        "transaction_id": "123",
        "value": 25.0,
        "currency": "USD",
        "items": [
            { "item_id": "A", "item_name": "Shirt", "quantity": 2, "price": 10.0 },
            { "item_id": "B", "item_name": "EBook", "quantity": 1, "price": 5.0 }
        ]
    })
}

/// Checkout state before the order is placed.
#[must_use]
pub fn empty_checkout_state() -> Value {
    json!({ "data": {} })
}
