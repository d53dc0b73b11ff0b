//! Normalized purchase record pushed to the tag manager.
//!
//! Field names follow the GA4 ecommerce `purchase` event, so they are
//! serialized in snake case and monetary values as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::{LineItem, Order};

/// Purchase summary derived from an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Order ID rendered as a string.
    pub transaction_id: String,
    /// Order total.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// ISO currency code; omitted when the order has no currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub items: Vec<PurchaseItem>,
}

/// One purchased product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&LineItem> for PurchaseItem {
    fn from(item: &LineItem) -> Self {
        Self {
            item_id: item.sku.clone(),
            item_name: item.name.clone(),
            quantity: item.quantity,
            price: item.sale_price,
        }
    }
}

impl From<&Order> for PurchaseRecord {
    fn from(order: &Order) -> Self {
        Self {
            transaction_id: order.order_id.to_string(),
            value: order.order_amount,
            currency: order.currency.as_ref().map(|c| c.code.clone()),
            items: order.purchasable_items().map(PurchaseItem::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Currency, LineItemMap, OrderId};

    fn item(sku: &str, name: &str, quantity: u32, price: i64) -> LineItem {
        LineItem {
            sku: sku.to_string(),
            name: name.to_string(),
            quantity,
            sale_price: Decimal::from(price),
            list_price: None,
        }
    }

    #[test]
    fn test_record_from_order() {
        let order = Order {
            order_id: OrderId::new(123),
            order_amount: Decimal::from(25),
            currency: Some(Currency::from_code("USD")),
            line_items: LineItemMap {
                physical_items: vec![item("A", "Shirt", 2, 10)],
                digital_items: vec![item("B", "EBook", 1, 5)],
                gift_certificates: Vec::new(),
            },
        };

        let record = PurchaseRecord::from(&order);
        assert_eq!(record.transaction_id, "123");
        assert_eq!(record.value, Decimal::from(25));
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert_eq!(
            record.items,
            vec![
                PurchaseItem {
                    item_id: "A".to_string(),
                    item_name: "Shirt".to_string(),
                    quantity: 2,
                    price: Decimal::from(10),
                },
                PurchaseItem {
                    item_id: "B".to_string(),
                    item_name: "EBook".to_string(),
                    quantity: 1,
                    price: Decimal::from(5),
                },
            ]
        );
    }

    #[test]
    fn test_serializes_numbers_and_omits_missing_currency() {
        let record = PurchaseRecord {
            transaction_id: "7".to_string(),
            value: Decimal::new(1950, 2),
            currency: None,
            items: Vec::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "transaction_id": "7", "value": 19.5, "items": [] })
        );
    }
}
