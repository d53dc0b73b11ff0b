//! One-time page bootstrap.

use std::sync::Arc;

use checkout_analytics::{DataLayer, GlobalDataLayer};
use checkout_analytics_core::{CheckoutConfig, CheckoutId, OrderId};

use crate::document::Document;
use crate::error::BootstrapError;
use crate::gtm::TagManager;
use crate::render::{
    CheckoutAppProps, CheckoutRenderer, OrderConfirmationAppProps, RenderModuleLoader,
};

/// The page the bootstrap runs against.
pub struct Page {
    /// The page's `checkoutConfig` object, if it has one.
    pub config: Option<CheckoutConfig>,
    pub document: Document,
    pub data_layer: Arc<dyn DataLayer>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// A page without configuration that pushes to the process-wide data
    /// layer.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            config: None,
            document,
            data_layer: Arc::new(GlobalDataLayer::shared()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CheckoutConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_data_layer(mut self, data_layer: Arc<dyn DataLayer>) -> Self {
        self.data_layer = data_layer;
        self
    }
}

/// Which view the bootstrap rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    OrderConfirmation(OrderId),
    Checkout(CheckoutId),
    /// The config names neither an order nor a checkout.
    Idle,
}

/// Pick the view for `config`.
///
/// An order ID wins over a checkout ID. A zero order ID and an empty
/// checkout ID count as absent.
#[must_use]
pub fn select_view(config: &CheckoutConfig) -> BootstrapOutcome {
    if let Some(order_id) = config.order_id.filter(|id| id.as_i64() != 0) {
        return BootstrapOutcome::OrderConfirmation(order_id);
    }
    match &config.checkout_id {
        Some(checkout_id) if !checkout_id.is_empty() => {
            BootstrapOutcome::Checkout(checkout_id.clone())
        }
        _ => BootstrapOutcome::Idle,
    }
}

/// Bootstrap `page`.
///
/// Pushes the tag manager start marker, injects the tag manager script,
/// then requires a config, resolves the render module and renders the
/// selected view. The first two steps happen even when the config is
/// missing.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingConfig`] before any render module is
/// resolved if the page has no config, or the data layer / render error
/// that stopped the bootstrap.
pub async fn auto_load<L>(
    page: &mut Page,
    tag_manager: &TagManager,
    loader: &L,
) -> Result<BootstrapOutcome, BootstrapError>
where
    L: RenderModuleLoader,
{
    tag_manager.initialize(page.data_layer.as_ref())?;

    if !tag_manager.inject(&mut page.document) {
        tracing::debug!("No script element to anchor on, tag manager not injected");
    }

    let Some(config) = page.config.as_ref() else {
        return Err(BootstrapError::MissingConfig);
    };

    let outcome = select_view(config);
    let module = loader.load_files().await?;

    match &outcome {
        BootstrapOutcome::OrderConfirmation(order_id) => {
            tracing::info!(%order_id, "Rendering order confirmation");
            module.render_order_confirmation(OrderConfirmationAppProps::new(config, *order_id))?;
        }
        BootstrapOutcome::Checkout(checkout_id) => {
            tracing::info!(%checkout_id, "Rendering checkout");
            module.render_checkout(CheckoutAppProps::new(config, checkout_id.clone()))?;
        }
        BootstrapOutcome::Idle => {
            tracing::info!("Config has neither an order nor a checkout, nothing to render");
        }
    }

    Ok(outcome)
}
