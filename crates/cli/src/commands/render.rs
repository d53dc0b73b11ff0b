//! Page render command.
//!
//! # Usage
//!
//! ```bash
//! # Render with the config from CHECKOUT_CONFIG / CHECKOUT_CONFIG_PATH
//! checkout-cli render
//!
//! # Render a specific config against a build's manifest
//! checkout-cli render -c checkout.json -m dist/manifest.json -o page.html
//! ```
//!
//! The page starts with a single `auto-loader.js` script under the public
//! path, so the tag manager script is injected in front of it. The rendered
//! view's assets are appended after the bootstrap, and the data layer is
//! embedded as `window.dataLayer`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use checkout_analytics::{DataLayer, InMemoryDataLayer};
use checkout_loader::{
    BootstrapError, BootstrapOutcome, Document, HtmlRenderer, LoaderConfig,
    ManifestModuleLoader, Page, RenderError, RenderModuleLoader, ScriptElement,
    StaticModuleLoader, TagManager, auto_load,
};
use thiserror::Error;

/// Errors that can occur while rendering a page.
#[derive(Debug, Error)]
pub enum RenderCommandError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Options from the command line.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub manifest_path: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub title: String,
}

/// Render the page and write it to the output.
///
/// # Errors
///
/// Returns `RenderCommandError` if the config is missing, the bootstrap
/// fails, or the output cannot be written.
pub async fn run(config: LoaderConfig, options: RenderOptions) -> Result<(), RenderCommandError> {
    let manifest_path = options.manifest_path.or_else(|| config.manifest_path.clone());
    let public_path = config
        .checkout_config
        .as_ref()
        .and_then(|checkout| checkout.public_path.clone());

    let tag_manager = config.tag_manager();
    let page = Page::new(initial_document(&options.title, public_path.as_deref()));
    let page = match config.checkout_config {
        Some(checkout) => page.with_config(checkout),
        None => page,
    };

    let (outcome, html) = match manifest_path {
        Some(path) => {
            tracing::info!(manifest = %path.display(), "Rendering with asset manifest");
            render_page(page, &tag_manager, ManifestModuleLoader::new(path, public_path)).await?
        }
        None => {
            let loader = StaticModuleLoader::new(Arc::new(HtmlRenderer::default()));
            render_page(page, &tag_manager, loader).await?
        }
    };

    tracing::info!(?outcome, "Page rendered");

    match &options.out {
        Some(path) => std::fs::write(path, html)?,
        None => std::io::stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}

/// The page before bootstrap: one loader script under `public_path`.
#[must_use]
pub fn initial_document(title: &str, public_path: Option<&str>) -> Document {
    let base = public_path.unwrap_or_default().trim_end_matches('/');
    Document::new(title).with_script(ScriptElement::external(format!("{base}/auto-loader.js")))
}

/// Bootstrap `page` with `loader` and render the resulting HTML.
///
/// The page's data layer is replaced with a fresh in-memory one so the
/// output only contains this render's events.
///
/// # Errors
///
/// Returns `RenderCommandError` if the bootstrap or rendering fails.
pub async fn render_page<L>(
    page: Page,
    tag_manager: &TagManager,
    loader: L,
) -> Result<(BootstrapOutcome, String), RenderCommandError>
where
    L: RenderModuleLoader<Module = Arc<HtmlRenderer>>,
{
    let data_layer = Arc::new(InMemoryDataLayer::new());
    let mut page = page.with_data_layer(Arc::clone(&data_layer) as Arc<dyn DataLayer>);
    let loader = CapturingLoader::new(loader);

    let outcome = auto_load(&mut page, tag_manager, &loader).await?;

    let mut body = String::new();
    if let Some(renderer) = loader.into_module() {
        for view in renderer.take_rendered() {
            for src in view.scripts {
                page.document.append_script(ScriptElement::external(src));
            }
            for href in view.stylesheets {
                page.document.append_stylesheet(href);
            }
            body.push_str(&view.html);
        }
    }

    let events = data_layer.events();
    let html = page.document.render_page(&body, &events)?;
    Ok((outcome, html))
}

/// Keeps a handle on the module the bootstrap resolved.
struct CapturingLoader<L: RenderModuleLoader> {
    inner: L,
    module: Mutex<Option<L::Module>>,
}

impl<L: RenderModuleLoader> CapturingLoader<L> {
    const fn new(inner: L) -> Self {
        Self {
            inner,
            module: Mutex::new(None),
        }
    }

    fn into_module(self) -> Option<L::Module> {
        self.module
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L> RenderModuleLoader for CapturingLoader<L>
where
    L: RenderModuleLoader,
    L::Module: Clone,
{
    type Module = L::Module;

    async fn load_files(&self) -> Result<Self::Module, RenderError> {
        let module = self.inner.load_files().await?;
        *self.module.lock().unwrap_or_else(PoisonError::into_inner) = Some(module.clone());
        Ok(module)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use checkout_analytics_core::{CheckoutConfig, OrderId};

    use super::*;

    fn static_loader() -> StaticModuleLoader<Arc<HtmlRenderer>> {
        StaticModuleLoader::new(Arc::new(HtmlRenderer::new(
            vec!["/checkout.js".to_string()],
            vec!["/checkout.css".to_string()],
        )))
    }

    #[test]
    fn test_initial_document_uses_public_path() {
        let document = initial_document("Checkout", Some("https://cdn.example.com/app/"));
        assert_eq!(
            document.scripts(),
            &[ScriptElement::external("https://cdn.example.com/app/auto-loader.js")]
        );

        let document = initial_document("Checkout", None);
        assert_eq!(document.scripts(), &[ScriptElement::external("/auto-loader.js")]);
    }

    #[tokio::test]
    async fn test_render_order_confirmation_page() {
        let page = Page::new(initial_document("Order", None))
            .with_config(CheckoutConfig::new("checkout-app").with_order_id(OrderId::new(456)));

        let (outcome, html) = render_page(page, &TagManager::default(), static_loader())
            .await
            .unwrap();

        assert_eq!(outcome, BootstrapOutcome::OrderConfirmation(OrderId::new(456)));
        assert!(html.contains(r#"data-view="order-confirmation""#));
        assert!(html.contains(r#"<script src="/checkout.js"></script>"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/checkout.css">"#));
        assert!(html.contains(r#""event":"gtm.js""#));

        let gtm = html.find("googletagmanager.com/gtm.js").unwrap();
        let auto_loader = html.find("/auto-loader.js").unwrap();
        assert!(gtm < auto_loader);
    }

    #[tokio::test]
    async fn test_render_without_view_has_empty_body() {
        let page = Page::new(initial_document("Checkout", None))
            .with_config(CheckoutConfig::new("checkout-app"));

        let (outcome, html) = render_page(page, &TagManager::default(), static_loader())
            .await
            .unwrap();

        assert_eq!(outcome, BootstrapOutcome::Idle);
        assert!(!html.contains("data-view"));
        assert!(!html.contains("/checkout.js"));
    }

    #[tokio::test]
    async fn test_render_missing_config() {
        let page = Page::new(initial_document("Checkout", None));

        let err = render_page(page, &TagManager::default(), static_loader())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RenderCommandError::Bootstrap(BootstrapError::MissingConfig)
        ));
    }
}
