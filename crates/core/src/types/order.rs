//! Order snapshot read from the checkout session.
//!
//! These types mirror the shape of the order object held in the checkout
//! SDK's state (camelCase JSON). They are read-only projections: the session
//! is queried again every time an order is needed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::money::Currency;

/// A completed (or in-progress) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Numeric order identifier.
    pub order_id: OrderId,
    /// Grand total of the order.
    pub order_amount: Decimal,
    /// Order currency, absent when the store has not set one.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Line items grouped by kind.
    #[serde(default)]
    pub line_items: LineItemMap,
}

impl Order {
    /// Physical items followed by digital items, in declaration order.
    pub fn purchasable_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items
            .physical_items
            .iter()
            .chain(self.line_items.digital_items.iter())
    }
}

/// Line items of an order, grouped the way the checkout SDK groups them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemMap {
    #[serde(default)]
    pub physical_items: Vec<LineItem>,
    #[serde(default)]
    pub digital_items: Vec<LineItem>,
    #[serde(default)]
    pub gift_certificates: Vec<GiftCertificate>,
}

/// A physical or digital line item.
///
/// Only the fields a purchase record needs are read; the SDK's item id
/// (a number or a UUID string depending on the cart) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price after discounts.
    pub sale_price: Decimal,
    /// Unit price before discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<Decimal>,
}

/// A gift certificate purchased as part of the order.
///
/// Gift certificates are not products and never appear in purchase records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCertificate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}
