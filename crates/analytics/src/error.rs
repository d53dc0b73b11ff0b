//! Error types for tracker dispatch and purchase analytics.

use thiserror::Error;

use crate::trackers::TrackerKind;

/// A tracker could not be built or one of its methods failed.
///
/// These errors propagate out of the event handlers unchanged.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The checkout SDK failed to construct the tracker.
    #[error("failed to create {tracker}: {message}")]
    Construction {
        tracker: TrackerKind,
        message: String,
    },

    /// A tracker method reported a failure.
    #[error("{tracker}.{method} failed: {message}")]
    Invocation {
        tracker: TrackerKind,
        method: &'static str,
        message: String,
    },
}

impl TrackerError {
    /// The tracker the error originated from.
    #[must_use]
    pub const fn tracker(&self) -> TrackerKind {
        match self {
            Self::Construction { tracker, .. } | Self::Invocation { tracker, .. } => *tracker,
        }
    }
}

/// Reading the checkout session state failed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The session has no state to read from (e.g. not yet loaded).
    #[error("checkout state unavailable: {0}")]
    Unavailable(String),

    /// The order in the session state does not have the expected shape.
    #[error("malformed order in checkout state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Appending to the data layer failed.
#[derive(Debug, Error)]
pub enum DataLayerError {
    /// Event data must serialize to a JSON object so it can be spread
    /// alongside the `event` key.
    #[error("data layer payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Event data could not be serialized.
    #[error("failed to serialize data layer payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sending purchase analytics failed.
///
/// Callers log this and carry on; it never aborts checkout completion.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("could not read order: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("could not push purchase event: {0}")]
    DataLayer(#[from] DataLayerError),
}
