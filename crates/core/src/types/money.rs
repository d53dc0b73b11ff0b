//! Currency information attached to orders.

use serde::{Deserialize, Serialize};

/// Currency of an order, as reported by the checkout SDK.
///
/// Only `code` is guaranteed; the display fields depend on store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// ISO 4217 currency code (e.g., "USD").
    pub code: String,
    /// Human readable name (e.g., "US Dollars").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display symbol (e.g., "$").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Number of decimal places used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
}

impl Currency {
    /// Create a currency from its ISO code only.
    #[must_use]
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            symbol: None,
            decimal_places: None,
        }
    }
}
