//! Purchase record extraction.
//!
//! When payment completes, the order is read back from the session and
//! summarized as a GA4-style `purchase` event on the data layer.

use checkout_analytics_core::PurchaseRecord;

use crate::checkout::CheckoutService;
use crate::data_layer::{DataLayer, push_to_data_layer};
use crate::error::PurchaseError;

/// Data layer event name for purchase records.
pub const PURCHASE_EVENT: &str = "purchase";

/// Read the session's order and push its purchase record.
///
/// Returns the pushed record, or `None` when the session has no order (in
/// which case nothing is pushed).
///
/// # Errors
///
/// Returns [`PurchaseError`] if the order cannot be read or the push fails.
pub fn send_purchase_analytics(
    checkout: &dyn CheckoutService,
    data_layer: &dyn DataLayer,
) -> Result<Option<PurchaseRecord>, PurchaseError> {
    let Some(order) = checkout.order()? else {
        tracing::debug!("No order in checkout state, skipping purchase analytics");
        return Ok(None);
    };

    let record = PurchaseRecord::from(&order);
    push_to_data_layer(data_layer, PURCHASE_EVENT, &record)?;

    tracing::debug!(
        transaction_id = %record.transaction_id,
        items = record.items.len(),
        "Purchase analytics sent"
    );
    Ok(Some(record))
}
