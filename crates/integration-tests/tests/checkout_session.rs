//! Integration tests for event fan-out over a JSON-backed checkout session.
//!
//! These tests run a full checkout session through the public
//! `checkout_analytics` API: the session state is the SDK's serialized JSON,
//! and trackers are recording mocks.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use checkout_analytics::mock::{RecordingTrackerFactory, TrackerCall};
use checkout_analytics::{
    AnalyticsEvents, AnalyticsProvider, CheckoutService, DataLayer, InMemoryDataLayer,
    JsonCheckoutState, TrackerFactory, TrackerKind,
};
use checkout_analytics_core::{BodlEventsPayload, CheckoutEvent};
use checkout_analytics_integration_tests::{
    empty_checkout_state, reference_order_state, reference_purchase_event,
};

struct Session {
    state: Arc<JsonCheckoutState>,
    factory: Arc<RecordingTrackerFactory>,
    data_layer: Arc<InMemoryDataLayer>,
    provider: AnalyticsProvider,
}

fn session(factory: RecordingTrackerFactory) -> Session {
    let state = Arc::new(JsonCheckoutState::new(empty_checkout_state()));
    let factory = Arc::new(factory);
    let data_layer = Arc::new(InMemoryDataLayer::new());
    let provider = AnalyticsProvider::new(
        Arc::clone(&state) as Arc<dyn CheckoutService>,
        Arc::clone(&factory) as Arc<dyn TrackerFactory>,
        Arc::clone(&data_layer) as Arc<dyn DataLayer>,
    );

    Session {
        state,
        factory,
        data_layer,
        provider,
    }
}

// =============================================================================
// Full Session Tests
// =============================================================================

#[test]
fn test_full_checkout_session() {
    use TrackerKind::{
        BodlService, BraintreeAnalyticTracker, PayPalCommerceAnalyticTracker, StepTracker,
    };

    let s = session(RecordingTrackerFactory::new());

    s.provider.checkout_begin().unwrap();
    s.provider.track_step_viewed("customer").unwrap();
    s.provider.customer_email_entry("jane@example.com").unwrap();
    s.provider.track_step_completed("customer").unwrap();
    s.provider.show_shipping_methods().unwrap();
    s.provider
        .selected_payment_method("Credit Card", "braintree")
        .unwrap();
    s.provider
        .click_pay_button(&BodlEventsPayload::new().with("paymentMethod", "braintree"))
        .unwrap();

    // The order only exists once payment went through.
    s.state.replace(reference_order_state());
    s.provider.payment_complete().unwrap();
    s.provider.order_purchased().unwrap();

    assert_eq!(
        s.factory.calls(),
        vec![
            TrackerCall::new(StepTracker, "track_checkout_started"),
            TrackerCall::new(BodlService, "checkout_begin"),
            TrackerCall::with_arg(StepTracker, "track_step_viewed", "customer"),
            TrackerCall::with_arg(BodlService, "customer_email_entry", "jane@example.com"),
            TrackerCall::with_arg(StepTracker, "track_step_completed", "customer"),
            TrackerCall::with_arg(BodlService, "step_completed", "customer"),
            TrackerCall::new(BodlService, "show_shipping_methods"),
            TrackerCall::with_arg(BodlService, "selected_payment_method", "Credit Card"),
            TrackerCall::with_arg(BraintreeAnalyticTracker, "selected_payment_method", "braintree"),
            TrackerCall::with_arg(PayPalCommerceAnalyticTracker, "selected_payment_method", "braintree"),
            TrackerCall::with_arg(BodlService, "click_pay_button", r#"{"paymentMethod":"braintree"}"#),
            TrackerCall::new(BodlService, "payment_complete"),
            TrackerCall::new(BraintreeAnalyticTracker, "payment_complete"),
            TrackerCall::new(PayPalCommerceAnalyticTracker, "payment_complete"),
            TrackerCall::new(StepTracker, "track_order_complete"),
            TrackerCall::new(BodlService, "order_purchased"),
        ]
    );

    for kind in TrackerKind::ALL {
        assert_eq!(s.factory.constructions(kind), 1, "{kind} built more than once");
    }

    assert_eq!(
        s.data_layer.to_json().unwrap(),
        serde_json::json!([reference_purchase_event()])
    );
}

#[test]
fn test_payment_complete_before_order_exists() {
    let s = session(RecordingTrackerFactory::new());

    s.provider.payment_complete().unwrap();

    assert!(s.data_layer.is_empty());
    assert_eq!(s.factory.calls().len(), 3);
}

#[test]
fn test_malformed_order_does_not_break_payment_complete() {
    let s = session(RecordingTrackerFactory::new());
    s.state
        .replace(serde_json::json!({ "data": { "order": { "orderId": "not-a-number" } } }));

    s.provider.payment_complete().unwrap();

    assert!(s.data_layer.is_empty());
    assert_eq!(
        s.factory.calls().last(),
        Some(&TrackerCall::new(
            TrackerKind::PayPalCommerceAnalyticTracker,
            "payment_complete"
        ))
    );
}

#[test]
fn test_each_payment_complete_pushes_current_order() {
    let s = session(RecordingTrackerFactory::new());
    s.state.replace(reference_order_state());

    s.provider.payment_complete().unwrap();
    s.provider.payment_complete().unwrap();

    assert_eq!(s.data_layer.events_named("purchase").len(), 2);
}

// =============================================================================
// Failure Propagation Tests
// =============================================================================

#[test]
fn test_payment_tracker_failure_propagates() {
    let s = session(
        RecordingTrackerFactory::new()
            .fail_method(TrackerKind::BraintreeAnalyticTracker, "payment_complete"),
    );
    s.state.replace(reference_order_state());

    let err = s.provider.payment_complete().unwrap_err();

    assert_eq!(err.tracker(), TrackerKind::BraintreeAnalyticTracker);
    // Fan-out stopped before PayPal and the purchase push.
    assert_eq!(
        s.factory.calls(),
        vec![TrackerCall::new(TrackerKind::BodlService, "payment_complete")]
    );
    assert!(s.data_layer.is_empty());
}

#[test]
fn test_construction_failure_is_retried_on_next_event() {
    let s = session(RecordingTrackerFactory::new().fail_construction(TrackerKind::BodlService));

    assert!(s.provider.exit_checkout().is_err());
    assert!(s.provider.exit_checkout().is_err());
    assert!(!s.provider.is_tracker_initialized(TrackerKind::BodlService));

    // Other trackers are unaffected.
    s.provider.wallet_button_click("applepay").unwrap();
    assert!(s.provider.is_tracker_initialized(TrackerKind::BraintreeAnalyticTracker));
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_recorded_events_dispatch_like_direct_calls() {
    let recorded = [
        r#"{"event":"checkoutBegin"}"#,
        r#"{"event":"customerSuggestionInit","payload":{"provider":"loqate"}}"#,
        r#"{"event":"customerSuggestionExecute"}"#,
        r#"{"event":"customerPaymentMethodExecuted"}"#,
        r#"{"event":"paymentRejected"}"#,
        r#"{"event":"walletButtonClick","methodId":"googlepay"}"#,
    ];

    let replayed = session(RecordingTrackerFactory::new());
    for line in recorded {
        let event: CheckoutEvent = serde_json::from_str(line).unwrap();
        replayed.provider.dispatch(&event).unwrap();
    }

    let direct = session(RecordingTrackerFactory::new());
    direct.provider.checkout_begin().unwrap();
    direct
        .provider
        .customer_suggestion_init(&BodlEventsPayload::new().with("provider", "loqate"))
        .unwrap();
    direct.provider.customer_suggestion_execute().unwrap();
    direct
        .provider
        .customer_payment_method_executed(&BodlEventsPayload::new())
        .unwrap();
    direct.provider.payment_rejected().unwrap();
    direct.provider.wallet_button_click("googlepay").unwrap();

    assert_eq!(replayed.factory.calls(), direct.factory.calls());
}
