//! Event replay command.
//!
//! # Usage
//!
//! ```bash
//! checkout-cli replay --state state.json --events events.jsonl
//! ```
//!
//! `state.json` is a checkout state snapshot (`{"data": {"order": ...}}`).
//! `events.jsonl` holds one checkout event per line, e.g.
//! `{"event":"trackStepViewed","step":"shipping"}`. Every event is dispatched
//! through logging trackers; the resulting data layer is printed as JSON.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use checkout_analytics::{
    AnalyticsEvents, AnalyticsProvider, DataLayer, InMemoryDataLayer, JsonCheckoutState,
    LoggingTrackerFactory, TrackerError, TrackerFactory,
};
use checkout_analytics_core::CheckoutEvent;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid checkout state: {0}")]
    State(serde_json::Error),

    #[error("Invalid event on line {line}: {source}")]
    Event {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Event {event} failed: {source}")]
    Tracker {
        event: &'static str,
        source: TrackerError,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize data layer: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Replay `events_path` against `state_path` and print the data layer.
///
/// # Errors
///
/// Returns `ReplayError` if an input is unreadable or invalid, or a tracker
/// fails.
pub fn run(state_path: &Path, events_path: &Path) -> Result<(), ReplayError> {
    let state: Value = serde_json::from_str(&read(state_path)?).map_err(ReplayError::State)?;
    let events = parse_events(&read(events_path)?)?;

    tracing::info!(events = events.len(), "Replaying checkout events");

    let data_layer = replay(state, &events, Arc::new(LoggingTrackerFactory))?;
    let json = serde_json::to_string_pretty(&data_layer.to_json()?)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Parse one event per line. Blank lines are skipped; line numbers in
/// errors are 1-based.
///
/// # Errors
///
/// Returns `ReplayError::Event` for the first line that is not an event.
pub fn parse_events(text: &str) -> Result<Vec<CheckoutEvent>, ReplayError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ReplayError::Event {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Dispatch `events` in order for a session holding `state`.
///
/// Stops at the first tracker failure.
///
/// # Errors
///
/// Returns `ReplayError::Tracker` naming the event that failed.
pub fn replay(
    state: Value,
    events: &[CheckoutEvent],
    factory: Arc<dyn TrackerFactory>,
) -> Result<Arc<InMemoryDataLayer>, ReplayError> {
    let data_layer = Arc::new(InMemoryDataLayer::new());
    let provider = AnalyticsProvider::new(
        Arc::new(JsonCheckoutState::new(state)),
        factory,
        Arc::clone(&data_layer) as Arc<dyn DataLayer>,
    );

    for event in events {
        provider
            .dispatch(event)
            .map_err(|source| ReplayError::Tracker {
                event: event.name(),
                source,
            })?;
    }

    Ok(data_layer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use checkout_analytics::TrackerKind;
    use checkout_analytics::mock::{RecordingTrackerFactory, TrackerCall};

    use super::*;

    fn state() -> Value {
        serde_json::json!({
            "data": {
                "order": {
                    "orderId": 9,
                    "orderAmount": 10,
                    "currency": { "code": "EUR" },
                    "lineItems": {
                        "physicalItems": [
                            { "id": 1, "sku": "MUG", "name": "Mug", "quantity": 1, "salePrice": 10 }
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_events_skips_blank_lines() {
        let events = parse_events(
            "{\"event\":\"checkoutBegin\"}\n\n{\"event\":\"trackStepViewed\",\"step\":\"shipping\"}\n",
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                CheckoutEvent::CheckoutBegin,
                CheckoutEvent::TrackStepViewed {
                    step: "shipping".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_events_reports_line() {
        let err = parse_events("{\"event\":\"checkoutBegin\"}\n{\"event\":\"nope\"}").unwrap_err();
        assert!(matches!(err, ReplayError::Event { line: 2, .. }));
    }

    #[test]
    fn test_replay_dispatches_in_order_and_pushes_purchase() {
        let factory = Arc::new(RecordingTrackerFactory::new());
        let events = vec![
            CheckoutEvent::WalletButtonClick {
                method_id: "paypalcommerce".to_string(),
            },
            CheckoutEvent::PaymentComplete,
        ];

        let data_layer = replay(state(), &events, Arc::clone(&factory) as Arc<dyn TrackerFactory>)
            .unwrap();

        assert_eq!(
            factory.calls(),
            vec![
                TrackerCall::with_arg(
                    TrackerKind::BraintreeAnalyticTracker,
                    "wallet_button_click",
                    "paypalcommerce"
                ),
                TrackerCall::with_arg(
                    TrackerKind::PayPalCommerceAnalyticTracker,
                    "wallet_button_click",
                    "paypalcommerce"
                ),
                TrackerCall::new(TrackerKind::BodlService, "payment_complete"),
                TrackerCall::new(TrackerKind::BraintreeAnalyticTracker, "payment_complete"),
                TrackerCall::new(TrackerKind::PayPalCommerceAnalyticTracker, "payment_complete"),
            ]
        );
        assert_eq!(data_layer.events_named("purchase").len(), 1);
    }

    #[test]
    fn test_replay_stops_at_tracker_failure() {
        let factory = Arc::new(
            RecordingTrackerFactory::new().fail_construction(TrackerKind::StepTracker),
        );
        let events = vec![CheckoutEvent::ExitCheckout, CheckoutEvent::CheckoutBegin, CheckoutEvent::ExitCheckout];

        let err = replay(state(), &events, Arc::clone(&factory) as Arc<dyn TrackerFactory>)
            .unwrap_err();

        assert!(matches!(err, ReplayError::Tracker { event: "checkoutBegin", .. }));
        assert_eq!(
            factory.calls(),
            vec![TrackerCall::new(TrackerKind::BodlService, "exit_checkout")]
        );
    }
}
