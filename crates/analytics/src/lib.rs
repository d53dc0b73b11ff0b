//! Checkout Analytics - fan-out of checkout lifecycle events to trackers.
//!
//! The checkout UI reports lifecycle events (checkout started, step viewed,
//! payment complete, ...) through a single [`AnalyticsEvents`] handle. Each
//! event is forwarded to a fixed, ordered set of tracker services supplied by
//! the checkout SDK:
//!
//! - `StepTracker` - checkout funnel steps
//! - `BodlService` - business analytics (BODL) events
//! - Braintree and PayPal Commerce payment trackers
//!
//! Trackers are built lazily (see [`lazy`]) on first use and cached for the
//! lifetime of the [`AnalyticsProvider`], which is bound to one checkout
//! session.
//!
//! When payment completes, a purchase summary is also pushed onto the tag
//! manager's data layer (see [`purchase`]). That push is best effort: its
//! failures are logged and never reach the caller, whereas tracker failures
//! propagate.
//!
//! # Modules
//!
//! - [`checkout`] - Checkout session access
//! - [`trackers`] - Tracker traits and the factory that builds them
//! - [`lazy`] - Construct-once service accessor
//! - [`provider`] - The event fan-out
//! - [`purchase`] - Purchase record extraction
//! - [`data_layer`] - Data layer sinks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod data_layer;
pub mod error;
pub mod lazy;
pub mod logging;
pub mod provider;
pub mod purchase;
pub mod trackers;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use checkout::{CheckoutService, JsonCheckoutState};
pub use data_layer::{DataLayer, GlobalDataLayer, InMemoryDataLayer, push_to_data_layer};
pub use error::{CheckoutError, DataLayerError, PurchaseError, TrackerError};
pub use lazy::LazyService;
pub use logging::LoggingTrackerFactory;
pub use provider::{AnalyticsEvents, AnalyticsProvider};
pub use trackers::{BodlService, PaymentAnalyticTracker, StepTracker, TrackerFactory, TrackerKind};
