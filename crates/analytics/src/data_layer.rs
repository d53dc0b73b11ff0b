//! Data layer sinks.
//!
//! The tag manager consumes an append-only queue of event objects (the
//! browser's `window.dataLayer`). Code never touches that queue directly; it
//! pushes through the [`DataLayer`] trait, which keeps the global state
//! mockable.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use checkout_analytics_core::DataLayerEvent;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DataLayerError;

/// An append-only event queue read by the tag manager.
pub trait DataLayer: Send + Sync {
    /// Append an event.
    ///
    /// # Errors
    ///
    /// Returns [`DataLayerError`] if the event cannot be appended.
    fn push(&self, event: DataLayerEvent) -> Result<(), DataLayerError>;
}

/// Serialize `data` and push it as `{"event": event_name, ...data}`.
///
/// `data` must serialize to a JSON object (or `null`, treated as no fields).
///
/// # Errors
///
/// Returns [`DataLayerError`] if `data` fails to serialize, is not an
/// object, or the sink rejects the event.
pub fn push_to_data_layer<T>(
    data_layer: &dyn DataLayer,
    event_name: &str,
    data: &T,
) -> Result<(), DataLayerError>
where
    T: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(data)? {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => return Err(DataLayerError::NotAnObject(json_type_name(&other))),
    };

    data_layer.push(DataLayerEvent::new(event_name).with_fields(fields))
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Data layer held in memory, one per page.
#[derive(Debug, Default)]
pub struct InMemoryDataLayer {
    events: Mutex<Vec<DataLayerEvent>>,
}

impl InMemoryDataLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event pushed so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<DataLayerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events with the given name, oldest first.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<DataLayerEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.event == name)
            .collect()
    }

    /// The queue as the JSON array the tag manager would see.
    ///
    /// # Errors
    ///
    /// Returns an error if an event fails to serialize.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.events())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DataLayer for InMemoryDataLayer {
    fn push(&self, event: DataLayerEvent) -> Result<(), DataLayerError> {
        tracing::debug!(event = %event.event, "Data layer push");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

/// Process-wide data layer, created on first use.
///
/// Mirrors the page-global queue: every handle returned by
/// [`GlobalDataLayer::shared`] appends to the same events.
#[derive(Debug, Clone)]
pub struct GlobalDataLayer(Arc<InMemoryDataLayer>);

impl GlobalDataLayer {
    #[must_use]
    pub fn shared() -> Self {
        static INSTANCE: LazyLock<Arc<InMemoryDataLayer>> =
            LazyLock::new(|| Arc::new(InMemoryDataLayer::new()));
        Self(Arc::clone(&INSTANCE))
    }

    #[must_use]
    pub fn inner(&self) -> &InMemoryDataLayer {
        &self.0
    }
}

impl DataLayer for GlobalDataLayer {
    fn push(&self, event: DataLayerEvent) -> Result<(), DataLayerError> {
        self.0.push(event)
    }
}
