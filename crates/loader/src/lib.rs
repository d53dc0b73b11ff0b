//! Checkout Loader - one-time page bootstrap for the checkout app.
//!
//! [`auto_load`] runs once per page:
//!
//! 1. Initializes the data layer and pushes the tag manager start marker.
//! 2. Injects the tag manager script before the first script on the page.
//! 3. Validates that the page carries a [`CheckoutConfig`].
//! 4. Resolves the render module and renders either the order confirmation
//!    view (when an order ID is present) or the checkout view (when a
//!    checkout ID is present).
//!
//! # Modules
//!
//! - [`bootstrap`] - The bootstrap sequence and the page it runs against
//! - [`config`] - Environment configuration
//! - [`document`] - Script element model and page rendering
//! - [`gtm`] - Tag manager snippet
//! - [`render`] - Render module collaborator, asset manifest and HTML views
//!
//! [`CheckoutConfig`]: checkout_analytics_core::CheckoutConfig

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod config;
pub mod document;
pub mod error;
pub mod gtm;
pub mod render;

pub use bootstrap::{BootstrapOutcome, Page, auto_load, select_view};
pub use config::{LoaderConfig, SentrySettings, read_checkout_config};
pub use document::{Document, ScriptElement};
pub use error::{BootstrapError, ConfigError, RenderError};
pub use gtm::TagManager;
pub use render::{
    AssetManifest, CheckoutAppProps, CheckoutRenderer, HtmlRenderer, ManifestModuleLoader,
    OrderConfirmationAppProps, RenderModuleLoader, RenderedView, StaticModuleLoader, ViewKind,
};
