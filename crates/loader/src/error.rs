//! Loader error types.

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to read {0}: {1}")]
    Io(String, String),
}

/// Rendering a view or page failed.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The render module could not be resolved.
    #[error("Failed to load render module: {0}")]
    ModuleLoad(String),

    /// Asset manifest is unreadable or invalid.
    #[error("Invalid asset manifest: {0}")]
    Manifest(String),

    /// Serializing embedded page data failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal page bootstrap errors.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The page has no checkout configuration object.
    #[error("Checkout config is missing.")]
    MissingConfig,

    /// The start marker could not be pushed onto the data layer.
    #[error("Data layer error: {0}")]
    DataLayer(#[from] checkout_analytics::DataLayerError),

    /// The render module failed to load or render.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
