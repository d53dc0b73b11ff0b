//! Trackers that log instead of reporting.
//!
//! Useful when replaying a recorded checkout session locally: every tracker
//! call becomes a `tracing` event, and nothing leaves the process.

use std::sync::Arc;

use checkout_analytics_core::BodlEventsPayload;

use crate::checkout::CheckoutService;
use crate::error::TrackerError;
use crate::trackers::{
    BodlService, PaymentAnalyticTracker, StepTracker, TrackResult, TrackerFactory, TrackerKind,
};

/// Builds [`LoggingTracker`]s for every tracker kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTrackerFactory;

impl LoggingTrackerFactory {
    fn build(kind: TrackerKind) -> Arc<LoggingTracker> {
        tracing::debug!(tracker = %kind, "Creating logging tracker");
        Arc::new(LoggingTracker { kind })
    }
}

impl TrackerFactory for LoggingTrackerFactory {
    fn create_step_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn StepTracker>, TrackerError> {
        Ok(Self::build(TrackerKind::StepTracker))
    }

    fn create_bodl_service(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn BodlService>, TrackerError> {
        Ok(Self::build(TrackerKind::BodlService))
    }

    fn create_braintree_analytic_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        Ok(Self::build(TrackerKind::BraintreeAnalyticTracker))
    }

    fn create_paypal_commerce_analytic_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        Ok(Self::build(TrackerKind::PayPalCommerceAnalyticTracker))
    }
}

/// Tracker that logs each call at `info`.
#[derive(Debug)]
pub struct LoggingTracker {
    kind: TrackerKind,
}

impl LoggingTracker {
    #[allow(clippy::unnecessary_wraps)]
    fn log(&self, method: &'static str, argument: Option<&str>) -> TrackResult {
        tracing::info!(
            tracker = %self.kind,
            method,
            argument = argument.unwrap_or_default(),
            "Tracked"
        );
        Ok(())
    }

    fn log_payload(&self, method: &'static str, payload: &BodlEventsPayload) -> TrackResult {
        let json = serde_json::to_string(payload).unwrap_or_default();
        self.log(method, Some(&json))
    }
}

impl StepTracker for LoggingTracker {
    fn track_checkout_started(&self) -> TrackResult {
        self.log("track_checkout_started", None)
    }

    fn track_step_completed(&self, step: &str) -> TrackResult {
        self.log("track_step_completed", Some(step))
    }

    fn track_step_viewed(&self, step: &str) -> TrackResult {
        self.log("track_step_viewed", Some(step))
    }

    fn track_order_complete(&self) -> TrackResult {
        self.log("track_order_complete", None)
    }
}

impl BodlService for LoggingTracker {
    fn checkout_begin(&self) -> TrackResult {
        self.log("checkout_begin", None)
    }

    fn step_completed(&self, step: &str) -> TrackResult {
        self.log("step_completed", Some(step))
    }

    fn order_purchased(&self) -> TrackResult {
        self.log("order_purchased", None)
    }

    fn customer_email_entry(&self, email: &str) -> TrackResult {
        self.log("customer_email_entry", Some(email))
    }

    fn customer_suggestion_init(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.log_payload("customer_suggestion_init", payload)
    }

    fn customer_suggestion_execute(&self) -> TrackResult {
        self.log("customer_suggestion_execute", None)
    }

    fn customer_payment_method_executed(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.log_payload("customer_payment_method_executed", payload)
    }

    fn show_shipping_methods(&self) -> TrackResult {
        self.log("show_shipping_methods", None)
    }

    fn selected_payment_method(&self, method_name: &str) -> TrackResult {
        self.log("selected_payment_method", Some(method_name))
    }

    fn click_pay_button(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.log_payload("click_pay_button", payload)
    }

    fn payment_rejected(&self) -> TrackResult {
        self.log("payment_rejected", None)
    }

    fn payment_complete(&self) -> TrackResult {
        self.log("payment_complete", None)
    }

    fn exit_checkout(&self) -> TrackResult {
        self.log("exit_checkout", None)
    }
}

impl PaymentAnalyticTracker for LoggingTracker {
    fn customer_payment_method_executed(&self) -> TrackResult {
        self.log("customer_payment_method_executed", None)
    }

    fn payment_complete(&self) -> TrackResult {
        self.log("payment_complete", None)
    }

    fn selected_payment_method(&self, method_id: &str) -> TrackResult {
        self.log("selected_payment_method", Some(method_id))
    }

    fn wallet_button_click(&self, method_id: &str) -> TrackResult {
        self.log("wallet_button_click", Some(method_id))
    }
}
