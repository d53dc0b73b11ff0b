//! Tag manager snippet.
//!
//! The equivalent of the standard Google Tag Manager head snippet: push a
//! start marker onto the data layer and load `gtm.js` asynchronously.

use checkout_analytics::{DataLayer, DataLayerError};
use checkout_analytics_core::DataLayerEvent;
use url::form_urlencoded;

use crate::document::{Document, ScriptElement};

/// Container loaded when none is configured.
pub const DEFAULT_CONTAINER_ID: &str = "GTM-PG6644C";

/// Script endpoint; the container ID goes in the `id` query parameter.
pub const GTM_SCRIPT_URL: &str = "https://www.googletagmanager.com/gtm.js";

/// Event name of the start marker.
pub const START_EVENT: &str = "gtm.js";

/// Field carrying the start timestamp (Unix milliseconds).
pub const START_FIELD: &str = "gtm.start";

/// A tag manager container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagManager {
    container_id: String,
}

impl Default for TagManager {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_ID)
    }
}

impl TagManager {
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// URL of the container's `gtm.js`.
    #[must_use]
    pub fn script_url(&self) -> String {
        let id: String = form_urlencoded::byte_serialize(self.container_id.as_bytes()).collect();
        format!("{GTM_SCRIPT_URL}?id={id}")
    }

    /// The async script element that loads the container.
    #[must_use]
    pub fn script_element(&self) -> ScriptElement {
        ScriptElement::external_async(self.script_url())
    }

    /// Start marker for the given time.
    #[must_use]
    pub fn start_event(started_at_ms: i64) -> DataLayerEvent {
        DataLayerEvent::new(START_EVENT).with_field(START_FIELD, started_at_ms)
    }

    /// Push the start marker, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DataLayerError`] if the data layer rejects the event.
    pub fn initialize(&self, data_layer: &dyn DataLayer) -> Result<(), DataLayerError> {
        let now = chrono::Utc::now().timestamp_millis();
        tracing::debug!(container_id = %self.container_id, "Tag manager start");
        data_layer.push(Self::start_event(now))
    }

    /// Insert the container script before the first script of `document`.
    ///
    /// Returns whether the script was inserted.
    pub fn inject(&self, document: &mut Document) -> bool {
        document.insert_before_first_script(self.script_element())
    }
}
