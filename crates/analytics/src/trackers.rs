//! Tracker services supplied by the checkout SDK.
//!
//! Each trait lists the lifecycle methods the SDK's tracker exposes. Every
//! method has a no-op default, so an implementation only overrides the events
//! it cares about; the fan-out calls every method unconditionally.

use std::fmt;
use std::sync::Arc;

use checkout_analytics_core::BodlEventsPayload;

use crate::checkout::CheckoutService;
use crate::error::TrackerError;

/// Result of a single tracker call.
pub type TrackResult = Result<(), TrackerError>;

/// The tracker services known to the fan-out, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackerKind {
    StepTracker,
    BodlService,
    BraintreeAnalyticTracker,
    PayPalCommerceAnalyticTracker,
}

impl TrackerKind {
    /// All tracker kinds in registry order.
    pub const ALL: [Self; 4] = [
        Self::StepTracker,
        Self::BodlService,
        Self::BraintreeAnalyticTracker,
        Self::PayPalCommerceAnalyticTracker,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StepTracker => "StepTracker",
            Self::BodlService => "BodlService",
            Self::BraintreeAnalyticTracker => "BraintreeAnalyticTracker",
            Self::PayPalCommerceAnalyticTracker => "PayPalCommerceAnalyticTracker",
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout funnel step tracking.
pub trait StepTracker: Send + Sync {
    fn track_checkout_started(&self) -> TrackResult {
        Ok(())
    }

    fn track_step_completed(&self, _step: &str) -> TrackResult {
        Ok(())
    }

    fn track_step_viewed(&self, _step: &str) -> TrackResult {
        Ok(())
    }

    fn track_order_complete(&self) -> TrackResult {
        Ok(())
    }
}

/// Business analytics (BODL) event service.
pub trait BodlService: Send + Sync {
    fn checkout_begin(&self) -> TrackResult {
        Ok(())
    }

    fn step_completed(&self, _step: &str) -> TrackResult {
        Ok(())
    }

    fn order_purchased(&self) -> TrackResult {
        Ok(())
    }

    fn customer_email_entry(&self, _email: &str) -> TrackResult {
        Ok(())
    }

    fn customer_suggestion_init(&self, _payload: &BodlEventsPayload) -> TrackResult {
        Ok(())
    }

    fn customer_suggestion_execute(&self) -> TrackResult {
        Ok(())
    }

    fn customer_payment_method_executed(&self, _payload: &BodlEventsPayload) -> TrackResult {
        Ok(())
    }

    fn show_shipping_methods(&self) -> TrackResult {
        Ok(())
    }

    fn selected_payment_method(&self, _method_name: &str) -> TrackResult {
        Ok(())
    }

    fn click_pay_button(&self, _payload: &BodlEventsPayload) -> TrackResult {
        Ok(())
    }

    fn payment_rejected(&self) -> TrackResult {
        Ok(())
    }

    fn payment_complete(&self) -> TrackResult {
        Ok(())
    }

    fn exit_checkout(&self) -> TrackResult {
        Ok(())
    }
}

/// Payment-provider analytics (Braintree, PayPal Commerce).
///
/// Both providers expose the same surface, keyed by payment method ID.
pub trait PaymentAnalyticTracker: Send + Sync {
    fn customer_payment_method_executed(&self) -> TrackResult {
        Ok(())
    }

    fn payment_complete(&self) -> TrackResult {
        Ok(())
    }

    fn selected_payment_method(&self, _method_id: &str) -> TrackResult {
        Ok(())
    }

    fn wallet_button_click(&self, _method_id: &str) -> TrackResult {
        Ok(())
    }
}

/// Builds tracker services for a checkout session.
///
/// This is the checkout SDK's `create*` family. Each constructor receives the
/// session the tracker observes.
pub trait TrackerFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] if the tracker cannot be built.
    fn create_step_tracker(
        &self,
        checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn StepTracker>, TrackerError>;

    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] if the service cannot be built.
    fn create_bodl_service(
        &self,
        checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn BodlService>, TrackerError>;

    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] if the tracker cannot be built.
    fn create_braintree_analytic_tracker(
        &self,
        checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError>;

    /// # Errors
    ///
    /// Returns [`TrackerError::Construction`] if the tracker cannot be built.
    fn create_paypal_commerce_analytic_tracker(
        &self,
        checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError>;
}
