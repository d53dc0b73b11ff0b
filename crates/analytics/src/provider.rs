//! Checkout event fan-out.
//!
//! [`AnalyticsProvider`] owns one lazily built instance of each tracker for
//! a checkout session and forwards every lifecycle event to the trackers
//! that care about it, always in the same order:
//!
//! | Event | Trackers |
//! |---|---|
//! | `checkout_begin` | step, BODL |
//! | `track_step_completed` | step, BODL |
//! | `track_step_viewed` | step |
//! | `order_purchased` | step, BODL |
//! | `customer_email_entry` | BODL |
//! | `customer_suggestion_init` | BODL |
//! | `customer_suggestion_execute` | BODL |
//! | `customer_payment_method_executed` | BODL, Braintree, PayPal |
//! | `show_shipping_methods` | BODL |
//! | `selected_payment_method` | BODL, Braintree, PayPal |
//! | `click_pay_button` | BODL |
//! | `payment_rejected` | BODL |
//! | `payment_complete` | BODL, Braintree, PayPal, purchase record |
//! | `exit_checkout` | BODL |
//! | `wallet_button_click` | Braintree, PayPal |
//!
//! Tracker failures stop the handler and are returned. The purchase record
//! push in `payment_complete` is the exception: it is logged and ignored.

use std::fmt;
use std::sync::Arc;

use checkout_analytics_core::{BodlEventsPayload, CheckoutEvent};

use crate::checkout::CheckoutService;
use crate::data_layer::DataLayer;
use crate::error::TrackerError;
use crate::lazy::LazyService;
use crate::purchase::send_purchase_analytics;
use crate::trackers::{
    BodlService, PaymentAnalyticTracker, StepTracker, TrackResult, TrackerFactory, TrackerKind,
};

/// The analytics handle handed to checkout UI code.
pub trait AnalyticsEvents {
    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn checkout_begin(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn track_step_completed(&self, step: &str) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn track_step_viewed(&self, step: &str) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn order_purchased(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn customer_email_entry(&self, email: &str) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn customer_suggestion_init(&self, payload: &BodlEventsPayload) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn customer_suggestion_execute(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn customer_payment_method_executed(&self, payload: &BodlEventsPayload) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn show_shipping_methods(&self) -> TrackResult;

    /// BODL receives the display name; payment trackers receive the method ID.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn selected_payment_method(&self, method_name: &str, method_id: &str) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn click_pay_button(&self, payload: &BodlEventsPayload) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn payment_rejected(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track. Purchase
    /// record failures are never returned.
    fn payment_complete(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn exit_checkout(&self) -> TrackResult;

    /// # Errors
    ///
    /// Returns [`TrackerError`] if a tracker fails to build or track.
    fn wallet_button_click(&self, method_id: &str) -> TrackResult;

    /// Route an event value to its handler.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    fn dispatch(&self, event: &CheckoutEvent) -> TrackResult {
        tracing::debug!(event = event.name(), "Dispatching checkout event");

        match event {
            CheckoutEvent::CheckoutBegin => self.checkout_begin(),
            CheckoutEvent::TrackStepCompleted { step } => self.track_step_completed(step),
            CheckoutEvent::TrackStepViewed { step } => self.track_step_viewed(step),
            CheckoutEvent::OrderPurchased => self.order_purchased(),
            CheckoutEvent::CustomerEmailEntry { email } => self.customer_email_entry(email),
            CheckoutEvent::CustomerSuggestionInit { payload } => {
                self.customer_suggestion_init(payload)
            }
            CheckoutEvent::CustomerSuggestionExecute => self.customer_suggestion_execute(),
            CheckoutEvent::CustomerPaymentMethodExecuted { payload } => {
                self.customer_payment_method_executed(payload)
            }
            CheckoutEvent::ShowShippingMethods => self.show_shipping_methods(),
            CheckoutEvent::SelectedPaymentMethod {
                method_name,
                method_id,
            } => self.selected_payment_method(method_name, method_id),
            CheckoutEvent::ClickPayButton { payload } => self.click_pay_button(payload),
            CheckoutEvent::PaymentRejected => self.payment_rejected(),
            CheckoutEvent::PaymentComplete => self.payment_complete(),
            CheckoutEvent::ExitCheckout => self.exit_checkout(),
            CheckoutEvent::WalletButtonClick { method_id } => self.wallet_button_click(method_id),
        }
    }
}

/// Tracker registry and event fan-out for one checkout session.
pub struct AnalyticsProvider {
    checkout: Arc<dyn CheckoutService>,
    data_layer: Arc<dyn DataLayer>,
    step_tracker: LazyService<dyn StepTracker, TrackerError>,
    bodl_service: LazyService<dyn BodlService, TrackerError>,
    braintree_tracker: LazyService<dyn PaymentAnalyticTracker, TrackerError>,
    paypal_commerce_tracker: LazyService<dyn PaymentAnalyticTracker, TrackerError>,
}

type Bindings = (Arc<dyn TrackerFactory>, Arc<dyn CheckoutService>);

impl AnalyticsProvider {
    /// Bind the trackers to `checkout`. No tracker is built until its first
    /// event.
    #[must_use]
    pub fn new(
        checkout: Arc<dyn CheckoutService>,
        factory: Arc<dyn TrackerFactory>,
        data_layer: Arc<dyn DataLayer>,
    ) -> Self {
        let bindings: Bindings = (factory, Arc::clone(&checkout));

        Self {
            step_tracker: LazyService::new(
                TrackerKind::StepTracker.as_str(),
                bindings.clone(),
                |(factory, checkout): &Bindings| factory.create_step_tracker(Arc::clone(checkout)),
            ),
            bodl_service: LazyService::new(
                TrackerKind::BodlService.as_str(),
                bindings.clone(),
                |(factory, checkout): &Bindings| factory.create_bodl_service(Arc::clone(checkout)),
            ),
            braintree_tracker: LazyService::new(
                TrackerKind::BraintreeAnalyticTracker.as_str(),
                bindings.clone(),
                |(factory, checkout): &Bindings| {
                    factory.create_braintree_analytic_tracker(Arc::clone(checkout))
                },
            ),
            paypal_commerce_tracker: LazyService::new(
                TrackerKind::PayPalCommerceAnalyticTracker.as_str(),
                bindings,
                |(factory, checkout): &Bindings| {
                    factory.create_paypal_commerce_analytic_tracker(Arc::clone(checkout))
                },
            ),
            checkout,
            data_layer,
        }
    }

    fn step_tracker(&self) -> Result<Arc<dyn StepTracker>, TrackerError> {
        self.step_tracker.get()
    }

    fn bodl_service(&self) -> Result<Arc<dyn BodlService>, TrackerError> {
        self.bodl_service.get()
    }

    fn braintree_tracker(&self) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        self.braintree_tracker.get()
    }

    fn paypal_commerce_tracker(&self) -> Result<Arc<dyn PaymentAnalyticTracker>, TrackerError> {
        self.paypal_commerce_tracker.get()
    }

    /// Whether the tracker of the given kind has been built.
    #[must_use]
    pub fn is_tracker_initialized(&self, kind: TrackerKind) -> bool {
        match kind {
            TrackerKind::StepTracker => self.step_tracker.is_initialized(),
            TrackerKind::BodlService => self.bodl_service.is_initialized(),
            TrackerKind::BraintreeAnalyticTracker => self.braintree_tracker.is_initialized(),
            TrackerKind::PayPalCommerceAnalyticTracker => {
                self.paypal_commerce_tracker.is_initialized()
            }
        }
    }
}

impl fmt::Debug for AnalyticsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsProvider")
            .field("step_tracker", &self.step_tracker)
            .field("bodl_service", &self.bodl_service)
            .field("braintree_tracker", &self.braintree_tracker)
            .field("paypal_commerce_tracker", &self.paypal_commerce_tracker)
            .finish_non_exhaustive()
    }
}

impl AnalyticsEvents for AnalyticsProvider {
    fn checkout_begin(&self) -> TrackResult {
        self.step_tracker()?.track_checkout_started()?;
        self.bodl_service()?.checkout_begin()
    }

    fn track_step_completed(&self, step: &str) -> TrackResult {
        self.step_tracker()?.track_step_completed(step)?;
        self.bodl_service()?.step_completed(step)
    }

    fn track_step_viewed(&self, step: &str) -> TrackResult {
        self.step_tracker()?.track_step_viewed(step)
    }

    fn order_purchased(&self) -> TrackResult {
        self.step_tracker()?.track_order_complete()?;
        self.bodl_service()?.order_purchased()
    }

    fn customer_email_entry(&self, email: &str) -> TrackResult {
        self.bodl_service()?.customer_email_entry(email)
    }

    fn customer_suggestion_init(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.bodl_service()?.customer_suggestion_init(payload)
    }

    fn customer_suggestion_execute(&self) -> TrackResult {
        self.bodl_service()?.customer_suggestion_execute()
    }

    fn customer_payment_method_executed(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.bodl_service()?.customer_payment_method_executed(payload)?;
        self.braintree_tracker()?.customer_payment_method_executed()?;
        self.paypal_commerce_tracker()?.customer_payment_method_executed()
    }

    fn show_shipping_methods(&self) -> TrackResult {
        self.bodl_service()?.show_shipping_methods()
    }

    fn selected_payment_method(&self, method_name: &str, method_id: &str) -> TrackResult {
        self.bodl_service()?.selected_payment_method(method_name)?;
        self.braintree_tracker()?.selected_payment_method(method_id)?;
        self.paypal_commerce_tracker()?.selected_payment_method(method_id)
    }

    fn click_pay_button(&self, payload: &BodlEventsPayload) -> TrackResult {
        self.bodl_service()?.click_pay_button(payload)
    }

    fn payment_rejected(&self) -> TrackResult {
        self.bodl_service()?.payment_rejected()
    }

    fn payment_complete(&self) -> TrackResult {
        self.bodl_service()?.payment_complete()?;
        self.braintree_tracker()?.payment_complete()?;
        self.paypal_commerce_tracker()?.payment_complete()?;

        // Purchase analytics failures are logged, never returned.
        if let Err(error) = send_purchase_analytics(self.checkout.as_ref(), self.data_layer.as_ref())
        {
            tracing::warn!(%error, "Failed to send purchase analytics");
        }

        Ok(())
    }

    fn exit_checkout(&self) -> TrackResult {
        self.bodl_service()?.exit_checkout()
    }

    fn wallet_button_click(&self, method_id: &str) -> TrackResult {
        self.braintree_tracker()?.wallet_button_click(method_id)?;
        self.paypal_commerce_tracker()?.wallet_button_click(method_id)
    }
}
