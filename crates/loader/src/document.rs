//! Script element model and page rendering.
//!
//! The loader only ever touches a page's script elements (to anchor the tag
//! manager) and stylesheets, so that is all [`Document`] models.

use askama::Template;
use serde::Serialize;

use crate::error::RenderError;

/// A `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    /// External source URL; `None` for inline scripts.
    pub src: Option<String>,
    pub is_async: bool,
    /// Inline script body.
    pub body: Option<String>,
}

impl ScriptElement {
    /// A blocking external script.
    #[must_use]
    pub fn external(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            is_async: false,
            body: None,
        }
    }

    /// An asynchronously loaded external script.
    #[must_use]
    pub fn external_async(src: impl Into<String>) -> Self {
        Self {
            is_async: true,
            ..Self::external(src)
        }
    }

    /// An inline script.
    #[must_use]
    pub fn inline(body: impl Into<String>) -> Self {
        Self {
            src: None,
            is_async: false,
            body: Some(body.into()),
        }
    }
}

/// The parts of an HTML page the loader works with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: String,
    scripts: Vec<ScriptElement>,
    stylesheets: Vec<String>,
}

impl Document {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append a script element.
    #[must_use]
    pub fn with_script(mut self, script: ScriptElement) -> Self {
        self.scripts.push(script);
        self
    }

    /// Append a script element in place.
    pub fn append_script(&mut self, script: ScriptElement) {
        self.scripts.push(script);
    }

    /// Append a stylesheet link.
    pub fn append_stylesheet(&mut self, href: impl Into<String>) {
        self.stylesheets.push(href.into());
    }

    /// Script elements in document order.
    #[must_use]
    pub fn scripts(&self) -> &[ScriptElement] {
        &self.scripts
    }

    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Insert `script` immediately before the first script element.
    ///
    /// Returns `false` (and leaves the document untouched) when the document
    /// has no script element to anchor on.
    pub fn insert_before_first_script(&mut self, script: ScriptElement) -> bool {
        if self.scripts.is_empty() {
            return false;
        }
        self.scripts.insert(0, script);
        true
    }

    /// Render the full page with `body` as the body markup and
    /// `data_layer` as the initial `window.dataLayer` contents.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if serialization or templating fails.
    pub fn render_page<T>(&self, body: &str, data_layer: &T) -> Result<String, RenderError>
    where
        T: Serialize + ?Sized,
    {
        let scripts = self
            .scripts
            .iter()
            .map(|script| ScriptView {
                src: script.src.as_deref().unwrap_or_default(),
                is_async: script.is_async,
                body: script.body.as_deref().unwrap_or_default(),
            })
            .collect();

        let page = PageTemplate {
            title: &self.title,
            stylesheets: &self.stylesheets,
            scripts,
            data_layer_json: script_safe_json(data_layer)?,
            body,
        };
        Ok(page.render()?)
    }
}

struct ScriptView<'a> {
    src: &'a str,
    is_async: bool,
    body: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    stylesheets: &'a [String],
    scripts: Vec<ScriptView<'a>>,
    data_layer_json: String,
    body: &'a str,
}

/// Serialize `value` as JSON that can be embedded in a `<script>` block.
///
/// `<`, `>` and `&` are escaped so string content cannot close the element.
pub(crate) fn script_safe_json<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}
