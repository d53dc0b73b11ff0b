//! Recording trackers and checkout sessions for tests.
//!
//! [`RecordingTrackerFactory`] builds trackers that append every call to a
//! shared log, so tests can assert on fan-out order and arguments. Failures
//! can be injected per tracker kind (construction) or per method.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use checkout_analytics_core::{BodlEventsPayload, Order};

use crate::checkout::CheckoutService;
use crate::error::{CheckoutError, TrackerError};
use crate::trackers::{
    BodlService, PaymentAnalyticTracker, StepTracker, TrackResult, TrackerFactory, TrackerKind,
};

/// One recorded tracker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerCall {
    pub tracker: TrackerKind,
    pub method: &'static str,
    /// The forwarded argument; payloads are recorded as compact JSON.
    pub argument: Option<String>,
}

impl TrackerCall {
    #[must_use]
    pub const fn new(tracker: TrackerKind, method: &'static str) -> Self {
        Self {
            tracker,
            method,
            argument: None,
        }
    }

    #[must_use]
    pub fn with_arg(tracker: TrackerKind, method: &'static str, argument: &str) -> Self {
        Self {
            tracker,
            method,
            argument: Some(argument.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<TrackerCall>>,
    constructions: Mutex<HashMap<TrackerKind, usize>>,
    failing_methods: HashSet<(TrackerKind, &'static str)>,
}

/// Tracker factory whose trackers record their calls.
#[derive(Debug, Default)]
pub struct RecordingTrackerFactory {
    recorder: Arc<Recorder>,
    failing_constructions: HashSet<TrackerKind>,
}

impl RecordingTrackerFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make construction of `kind` fail.
    #[must_use]
    pub fn fail_construction(mut self, kind: TrackerKind) -> Self {
        self.failing_constructions.insert(kind);
        self
    }

    /// Make `method` on `kind` fail. Failed calls are not recorded.
    ///
    /// # Panics
    ///
    /// Panics if trackers have already been built from this factory.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn fail_method(mut self, kind: TrackerKind, method: &'static str) -> Self {
        Arc::get_mut(&mut self.recorder)
            .expect("configure failures before building trackers")
            .failing_methods
            .insert((kind, method));
        self
    }

    /// Every successful call so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.recorder
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times a tracker of `kind` was built.
    #[must_use]
    pub fn constructions(&self, kind: TrackerKind) -> usize {
        self.recorder
            .constructions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    fn build(&self, kind: TrackerKind) -> Result<Arc<RecordingTracker>, TrackerError> {
        if self.failing_constructions.contains(&kind) {
            return Err(TrackerError::Construction {
                tracker: kind,
                message: "construction disabled by test".to_string(),
            });
        }

        *self
            .recorder
            .constructions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default() += 1;

        Ok(Arc::new(RecordingTracker {
            kind,
            recorder: Arc::clone(&self.recorder),
        }))
    }
}

impl TrackerFactory for RecordingTrackerFactory {
    fn create_step_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn StepTracker>, TrackerError> {
        Ok(self.build(TrackerKind::StepTracker)?)
    }

    fn create_bodl_service(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn BodlService>, TrackerError> {
        Ok(self.build(TrackerKind::BodlService)?)
    }

    fn create_braintree_analytic_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        Ok(self.build(TrackerKind::BraintreeAnalyticTracker)?)
    }

    fn create_paypal_commerce_analytic_tracker(
        &self,
        _checkout: Arc<dyn CheckoutService>,
    ) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        Ok(self.build(TrackerKind::PayPalCommerceAnalyticTracker)?)
    }
}

/// A tracker of any kind that records its calls.
#[derive(Debug)]
pub struct RecordingTracker {
    kind: TrackerKind,
    recorder: Arc<Recorder>,
}

impl RecordingTracker {
    fn record(&self, method: &'static str, argument: Option<String>) -> TrackResult {
        if self.recorder.failing_methods.contains(&(self.kind, method)) {
            return Err(TrackerError::Invocation {
                tracker: self.kind,
                method,
                message: "failure injected by test".to_string(),
            });
        }

        self.recorder
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TrackerCall {
                tracker: self.kind,
                method,
                argument,
            });
        Ok(())
    }

    fn record_payload(&self, method: &'static str, payload: &BodlEventsPayload) -> TrackResult {
        let json = serde_json::to_string(payload).unwrap_or_default();
        self.record(method, Some(json))
    }
}

impl StepTracker for RecordingTracker {
    fn track_checkout_started(&self) -> TrackResult {
        self.record("track_checkout_started", None)
    }

    fn track_step_completed(&self, step: &str) -> TrackResult {
        self.record("track_step_completed", Some(step.to_string()))
    }

    fn track_step_viewed(&self, step: &str) -> TrackResult {
        self.record("track_step_viewed", Some(step.to_string()))
    }

    fn track_order_complete(&self) -> TrackResult {
        self.record("track_order_complete", None)
    }
}

impl BodlService for RecordingTracker {
    fn checkout_begin(&self) -> TrackResult {
        self.record("checkout_begin", None)
    }

    fn step_completed(&self, step: &str) -> TrackResult {
        self.record("step_completed", Some(step.to_string()))
    }

    fn order_purchased(&self) -> TrackResult {
        self.record("order_purchased", None)
    }

    fn customer_email_entry(&self, email: &str) -> TrackResult {
        self.record("customer_email_entry", Some(email.to_string()))
    }

    fn customer_suggestion_init(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.record_payload("customer_suggestion_init", payload)
    }

    fn customer_suggestion_execute(&self) -> TrackResult {
        self.record("customer_suggestion_execute", None)
    }

    fn customer_payment_method_executed(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.record_payload("customer_payment_method_executed", payload)
    }

    fn show_shipping_methods(&self) -> TrackResult {
        self.record("show_shipping_methods", None)
    }

    fn selected_payment_method(&self, method_name: &str) -> TrackResult {
        self.record("selected_payment_method", Some(method_name.to_string()))
    }

    fn click_pay_button(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.record_payload("click_pay_button", payload)
    }

    fn payment_rejected(&self) -> TrackResult {
        self.record("payment_rejected", None)
    }

    fn payment_complete(&self) -> TrackResult {
        self.record("payment_complete", None)
    }

    fn exit_checkout(&self) -> TrackResult {
        self.record("exit_checkout", None)
    }
}

impl PaymentAnalyticTracker for RecordingTracker {
    fn customer_payment_method_executed(&self) -> TrackResult {
        self.record("customer_payment_method_executed", None)
    }

    fn payment_complete(&self) -> TrackResult {
        self.record("payment_complete", None)
    }

    fn selected_payment_method(&self, method_id: &str) -> TrackResult {
        self.record("selected_payment_method", Some(method_id.to_string()))
    }

    fn wallet_button_click(&self, method_id: &str) -> TrackResult {
        self.record("wallet_button_click", Some(method_id.to_string()))
    }
}

/// Checkout session returning a fixed order (or failure), counting reads.
#[derive(Debug)]
pub struct MockCheckoutService {
    order: Result<Option<Order>, String>,
    reads: AtomicUsize,
}

impl MockCheckoutService {
    /// Session with no order.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            order: Ok(None),
            reads: AtomicUsize::new(0),
        }
    }

    /// Session whose state cannot be read.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            order: Err(reason.to_string()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of `order()` calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CheckoutService for MockCheckoutService {
    fn order(&self) -> Result<Option<Order>, CheckoutError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.order.clone().map_err(CheckoutError::Unavailable)
    }
}
