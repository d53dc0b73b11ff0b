//! Render module collaborator.
//!
//! The checkout app's render functions live in a separately built module that
//! is resolved asynchronously before the first render. [`RenderModuleLoader`]
//! models that resolution; [`CheckoutRenderer`] is what it resolves to.
//!
//! [`HtmlRenderer`] is the server-side implementation: it renders the app
//! shell for either view with askama and records the result, together with
//! the asset URLs listed in the build's [`AssetManifest`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use askama::Template;
use checkout_analytics_core::{CheckoutConfig, CheckoutId, OrderId, SentryConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::document::script_safe_json;
use crate::error::RenderError;

// =============================================================================
// Props
// =============================================================================

/// Props for the checkout view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAppProps {
    pub container_id: String,
    pub checkout_id: CheckoutId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentry_config: Option<SentryConfig>,
}

impl CheckoutAppProps {
    /// Shared page config plus the checkout to render.
    #[must_use]
    pub fn new(config: &CheckoutConfig, checkout_id: CheckoutId) -> Self {
        Self {
            container_id: config.container_id.clone(),
            checkout_id,
            public_path: config.public_path.clone(),
            sentry_config: config.sentry_config.clone(),
        }
    }
}

/// Props for the order confirmation view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmationAppProps {
    pub container_id: String,
    pub order_id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentry_config: Option<SentryConfig>,
}

impl OrderConfirmationAppProps {
    /// Shared page config plus the order to confirm.
    #[must_use]
    pub fn new(config: &CheckoutConfig, order_id: OrderId) -> Self {
        Self {
            container_id: config.container_id.clone(),
            order_id,
            public_path: config.public_path.clone(),
            sentry_config: config.sentry_config.clone(),
        }
    }
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// The resolved render module.
pub trait CheckoutRenderer: Send + Sync {
    /// Render the checkout view.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the view cannot be rendered.
    fn render_checkout(&self, props: CheckoutAppProps) -> Result<(), RenderError>;

    /// Render the order confirmation view.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the view cannot be rendered.
    fn render_order_confirmation(
        &self,
        props: OrderConfirmationAppProps,
    ) -> Result<(), RenderError>;
}

impl<R: CheckoutRenderer + ?Sized> CheckoutRenderer for Arc<R> {
    fn render_checkout(&self, props: CheckoutAppProps) -> Result<(), RenderError> {
        (**self).render_checkout(props)
    }

    fn render_order_confirmation(
        &self,
        props: OrderConfirmationAppProps,
    ) -> Result<(), RenderError> {
        (**self).render_order_confirmation(props)
    }
}

/// Resolves the render module.
pub trait RenderModuleLoader: Send + Sync {
    type Module: CheckoutRenderer;

    /// Resolve the module. Called at most once per bootstrap.
    fn load_files(&self) -> impl Future<Output = Result<Self::Module, RenderError>> + Send;
}

/// Loader for a module that is already in memory.
#[derive(Debug, Clone)]
pub struct StaticModuleLoader<R> {
    module: R,
}

impl<R> StaticModuleLoader<R> {
    #[must_use]
    pub const fn new(module: R) -> Self {
        Self { module }
    }
}

impl<R> RenderModuleLoader for StaticModuleLoader<R>
where
    R: CheckoutRenderer + Clone,
{
    type Module = R;

    fn load_files(&self) -> impl Future<Output = Result<R, RenderError>> + Send {
        let module = self.module.clone();
        async move { Ok(module) }
    }
}

// =============================================================================
// Asset manifest
// =============================================================================

/// Build output listing the app's entry assets.
///
/// ```json
/// { "appVersion": "1.2.0", "js": ["checkout.js"], "css": ["checkout.css"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default)]
    pub js: Vec<String>,
    #[serde(default)]
    pub css: Vec<String>,
}

impl AssetManifest {
    /// Parse a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Manifest`] if the JSON is invalid or is not an
    /// object.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| RenderError::Manifest(e.to_string()))?;
        if !value.is_object() {
            return Err(RenderError::Manifest(
                "manifest must be a JSON object".to_string(),
            ));
        }
        Self::deserialize(value).map_err(|e| RenderError::Manifest(e.to_string()))
    }

    /// Script URLs, resolved against `public_path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Manifest`] if an entry cannot be joined.
    pub fn script_urls(&self, public_path: Option<&str>) -> Result<Vec<String>, RenderError> {
        self.js
            .iter()
            .map(|file| asset_url(public_path, file))
            .collect()
    }

    /// Stylesheet URLs, resolved against `public_path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Manifest`] if an entry cannot be joined.
    pub fn stylesheet_urls(&self, public_path: Option<&str>) -> Result<Vec<String>, RenderError> {
        self.css
            .iter()
            .map(|file| asset_url(public_path, file))
            .collect()
    }
}

/// Resolve `file` against `public_path`.
///
/// Absolute URLs are left alone. Every other entry lives under the public
/// path, with or without a leading `/`, whether the base is an absolute URL
/// or a bare path.
fn asset_url(public_path: Option<&str>, file: &str) -> Result<String, RenderError> {
    if Url::parse(file).is_ok() {
        return Ok(file.to_string());
    }

    let Some(base) = public_path.filter(|base| !base.is_empty()) else {
        return Ok(file.to_string());
    };
    let base = format!("{}/", base.trim_end_matches('/'));
    let file = file.trim_start_matches('/');

    match Url::parse(&base) {
        Ok(base_url) => base_url
            .join(file)
            .map(String::from)
            .map_err(|e| RenderError::Manifest(format!("{file}: {e}"))),
        Err(_) => Ok(format!("{base}{file}")),
    }
}

/// Loads the app's asset manifest from disk and builds an [`HtmlRenderer`].
#[derive(Debug, Clone)]
pub struct ManifestModuleLoader {
    path: PathBuf,
    public_path: Option<String>,
}

impl ManifestModuleLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, public_path: Option<String>) -> Self {
        Self {
            path: path.into(),
            public_path,
        }
    }
}

impl RenderModuleLoader for ManifestModuleLoader {
    type Module = Arc<HtmlRenderer>;

    fn load_files(&self) -> impl Future<Output = Result<Self::Module, RenderError>> + Send {
        let path = self.path.clone();
        let public_path = self.public_path.clone();

        async move {
            let json = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| RenderError::ModuleLoad(format!("{}: {e}", path.display())))?;
            let manifest = AssetManifest::from_json(&json)?;

            tracing::debug!(
                path = %path.display(),
                app_version = manifest.app_version.as_deref().unwrap_or_default(),
                "Loaded asset manifest"
            );

            Ok(Arc::new(HtmlRenderer::new(
                manifest.script_urls(public_path.as_deref())?,
                manifest.stylesheet_urls(public_path.as_deref())?,
            )))
        }
    }
}

// =============================================================================
// HTML renderer
// =============================================================================

/// Which view was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Checkout,
    OrderConfirmation,
}

/// A rendered app shell and the assets it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub kind: ViewKind,
    pub html: String,
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
}

#[derive(Template)]
#[template(path = "checkout.html")]
struct CheckoutTemplate<'a> {
    container_id: &'a str,
    checkout_id: &'a str,
    props_json: String,
}

#[derive(Template)]
#[template(path = "order_confirmation.html")]
struct OrderConfirmationTemplate<'a> {
    container_id: &'a str,
    order_id: i64,
    props_json: String,
}

/// Renders app shells to HTML and keeps them until taken.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    scripts: Vec<String>,
    stylesheets: Vec<String>,
    rendered: Mutex<Vec<RenderedView>>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(scripts: Vec<String>, stylesheets: Vec<String>) -> Self {
        Self {
            scripts,
            stylesheets,
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Views rendered so far.
    #[must_use]
    pub fn rendered(&self) -> Vec<RenderedView> {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the views rendered so far.
    #[must_use]
    pub fn take_rendered(&self) -> Vec<RenderedView> {
        std::mem::take(&mut *self.rendered.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn store(&self, kind: ViewKind, html: String) {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RenderedView {
                kind,
                html,
                scripts: self.scripts.clone(),
                stylesheets: self.stylesheets.clone(),
            });
    }
}

impl CheckoutRenderer for HtmlRenderer {
    fn render_checkout(&self, props: CheckoutAppProps) -> Result<(), RenderError> {
        let html = CheckoutTemplate {
            container_id: &props.container_id,
            checkout_id: props.checkout_id.as_str(),
            props_json: script_safe_json(&props)?,
        }
        .render()?;

        self.store(ViewKind::Checkout, html);
        Ok(())
    }

    fn render_order_confirmation(
        &self,
        props: OrderConfirmationAppProps,
    ) -> Result<(), RenderError> {
        let html = OrderConfirmationTemplate {
            container_id: &props.container_id,
            order_id: props.order_id.as_i64(),
            props_json: script_safe_json(&props)?,
        }
        .render()?;

        self.store(ViewKind::OrderConfirmation, html);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_props_omit_unset_fields() {
        let config = CheckoutConfig::new("x");
        let props = OrderConfirmationAppProps::new(&config, OrderId::new(456));
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            serde_json::json!({ "containerId": "x", "orderId": 456 })
        );

        let props = CheckoutAppProps::new(&config, CheckoutId::new("abc"));
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            serde_json::json!({ "containerId": "x", "checkoutId": "abc" })
        );
    }

    #[test]
    fn test_props_carry_shared_config() {
        let mut config = CheckoutConfig::new("x");
        config.public_path = Some("/assets/".to_string());
        let props = CheckoutAppProps::new(&config, CheckoutId::new("abc"));
        assert_eq!(props.public_path.as_deref(), Some("/assets/"));
    }

    #[test]
    fn test_asset_urls() {
        let manifest = AssetManifest {
            app_version: None,
            js: vec![
                "checkout.js".to_string(),
                "https://cdn.example.com/vendor.js".to_string(),
            ],
            css: vec!["/checkout.css".to_string()],
        };

        assert_eq!(
            manifest.script_urls(Some("https://cdn.example.com/checkout/")).unwrap(),
            vec![
                "https://cdn.example.com/checkout/checkout.js",
                "https://cdn.example.com/vendor.js",
            ]
        );
        assert_eq!(
            manifest.stylesheet_urls(Some("/static/")).unwrap(),
            vec!["/static/checkout.css"]
        );
        assert_eq!(manifest.script_urls(None).unwrap()[0], "checkout.js");
    }

    #[test]
    fn test_root_relative_assets_keep_base_path() {
        let manifest = AssetManifest {
            app_version: None,
            js: vec!["/app.js".to_string()],
            css: vec!["/app.css".to_string()],
        };

        for base in ["https://cdn.example.com/checkout", "https://cdn.example.com/checkout/"] {
            assert_eq!(
                manifest.stylesheet_urls(Some(base)).unwrap(),
                vec!["https://cdn.example.com/checkout/app.css"]
            );
        }
        assert_eq!(
            manifest.script_urls(Some("/static")).unwrap(),
            vec!["/static/app.js"]
        );
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest =
            AssetManifest::from_json(r#"{"appVersion":"1.2.0","js":["a.js"]}"#).unwrap();
        assert_eq!(manifest.app_version.as_deref(), Some("1.2.0"));
        assert!(manifest.css.is_empty());

        for invalid in ["[]", "\"checkout.js\"", "null", "{\"js\":"] {
            assert!(matches!(
                AssetManifest::from_json(invalid),
                Err(RenderError::Manifest(_))
            ));
        }
    }

    #[test]
    fn test_html_renderer_records_views() {
        let renderer = HtmlRenderer::new(vec!["/checkout.js".to_string()], Vec::new());
        let config = CheckoutConfig::new("checkout-app");

        renderer
            .render_order_confirmation(OrderConfirmationAppProps::new(&config, OrderId::new(456)))
            .unwrap();

        let views = renderer.take_rendered();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].kind, ViewKind::OrderConfirmation);
        assert_eq!(views[0].scripts, vec!["/checkout.js"]);
        assert!(views[0].html.contains(r#"data-order-id="456""#));
        assert!(views[0].html.contains(r#"{"containerId":"checkout-app","orderId":456}"#));
        assert!(renderer.rendered().is_empty());
    }

    #[test]
    fn test_html_renderer_escapes_checkout_id() {
        let renderer = HtmlRenderer::default();
        let config = CheckoutConfig::new("checkout-app");

        renderer
            .render_checkout(CheckoutAppProps::new(&config, CheckoutId::new("</script>")))
            .unwrap();

        let html = &renderer.rendered()[0].html;
        assert!(!html.contains("</script><"));
        assert!(html.contains(r#"data-view="checkout""#));
    }

    #[tokio::test]
    async fn test_manifest_loader_missing_file() {
        let loader = ManifestModuleLoader::new("/nonexistent/manifest.json", None);
        assert!(matches!(
            loader.load_files().await,
            Err(RenderError::ModuleLoad(_))
        ));
    }

    #[tokio::test]
    async fn test_static_loader_returns_module() {
        let renderer = Arc::new(HtmlRenderer::default());
        let loader = StaticModuleLoader::new(Arc::clone(&renderer));

        let module = loader.load_files().await.unwrap();
        assert!(Arc::ptr_eq(&module, &renderer));
    }
}
