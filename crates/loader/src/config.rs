//! Loader configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CHECKOUT_CONFIG` - Page configuration object as JSON
//! - `CHECKOUT_CONFIG_PATH` - Path to a JSON file holding the page
//!   configuration (used when `CHECKOUT_CONFIG` is unset)
//! - `CHECKOUT_MANIFEST_PATH` - Path to the app's asset manifest
//! - `GTM_CONTAINER_ID` - Tag manager container (default: GTM-PG6644C)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! A page configuration file given explicitly (the CLI's `--config`) takes
//! precedence over both page configuration variables, which are then not read.
//!
//! A missing page configuration is not a configuration error: the bootstrap
//! reports it once it runs.

use std::path::{Path, PathBuf};

use checkout_analytics_core::CheckoutConfig;

use crate::error::ConfigError;
use crate::gtm::{DEFAULT_CONTAINER_ID, TagManager};

/// Loader configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// The page's checkout configuration
    pub checkout_config: Option<CheckoutConfig>,
    /// Tag manager container ID
    pub gtm_container_id: String,
    /// Asset manifest of the app build
    pub manifest_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Error-reporting settings resolved from the environment and the page's
/// `sentryConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentrySettings {
    pub dsn: String,
    pub environment: Option<String>,
    pub release: Option<String>,
    /// Fraction of errors to report (0.0 - 1.0).
    pub sample_rate: Option<f32>,
}

impl LoaderConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. When
    /// `config_path` is given, the page configuration is read from it
    /// instead of `CHECKOUT_CONFIG` / `CHECKOUT_CONFIG_PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the page configuration is unreadable or
    /// invalid.
    pub fn from_env(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok(), config_path)
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the page configuration is unreadable or
    /// invalid.
    pub fn from_vars<F>(lookup: F, config_path: Option<&Path>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let checkout_config = match config_path {
            Some(path) => Some(read_checkout_config(&path.to_string_lossy())?),
            None => checkout_config_from_vars(&lookup)?,
        };

        Ok(Self {
            checkout_config,
            gtm_container_id: get_or_default(&lookup, "GTM_CONTAINER_ID", DEFAULT_CONTAINER_ID),
            manifest_path: get_optional(&lookup, "CHECKOUT_MANIFEST_PATH").map(PathBuf::from),
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// The configured tag manager container.
    #[must_use]
    pub fn tag_manager(&self) -> TagManager {
        TagManager::new(self.gtm_container_id.clone())
    }

    /// Sentry settings, or `None` when no DSN is configured.
    ///
    /// Environment variables win over the page's `sentryConfig`; release and
    /// sample rate only come from the page.
    #[must_use]
    pub fn sentry_settings(&self) -> Option<SentrySettings> {
        let page = self
            .checkout_config
            .as_ref()
            .and_then(|checkout| checkout.sentry_config.as_ref());

        let dsn = self
            .sentry_dsn
            .clone()
            .or_else(|| page?.dsn.clone())?;

        Some(SentrySettings {
            dsn,
            environment: self
                .sentry_environment
                .clone()
                .or_else(|| page?.environment.clone()),
            release: page.and_then(|page| page.release.clone()),
            sample_rate: page.and_then(|page| page.sample_rate),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read and parse a page configuration file.
///
/// # Errors
///
/// Returns `ConfigError` if the file is unreadable or not a valid config.
pub fn read_checkout_config(path: &str) -> Result<CheckoutConfig, ConfigError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(path.to_string(), e.to_string()))?;
    parse_checkout_config(path, &json)
}

fn checkout_config_from_vars<F>(lookup: &F) -> Result<Option<CheckoutConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(json) = get_optional(lookup, "CHECKOUT_CONFIG") {
        return parse_checkout_config("CHECKOUT_CONFIG", &json).map(Some);
    }
    get_optional(lookup, "CHECKOUT_CONFIG_PATH")
        .map(|path| read_checkout_config(&path))
        .transpose()
}

fn parse_checkout_config(source: &str, json: &str) -> Result<CheckoutConfig, ConfigError> {
    serde_json::from_str(json)
        .map_err(|e| ConfigError::InvalidEnvVar(source.to_string(), e.to_string()))
}

/// Get an optional variable; empty values count as unset.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use checkout_analytics_core::OrderId;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<LoaderConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LoaderConfig::from_vars(|key| vars.get(key).cloned(), None)
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.checkout_config.is_none());
        assert_eq!(config.gtm_container_id, "GTM-PG6644C");
        assert!(config.manifest_path.is_none());
        assert!(config.sentry_settings().is_none());
    }

    #[test]
    fn test_inline_checkout_config() {
        let config = load(&[
            ("CHECKOUT_CONFIG", r#"{"containerId":"x","orderId":456}"#),
            ("GTM_CONTAINER_ID", "GTM-TEST"),
        ])
        .unwrap();

        assert_eq!(
            config.checkout_config,
            Some(CheckoutConfig::new("x").with_order_id(OrderId::new(456)))
        );
        assert_eq!(config.tag_manager().container_id(), "GTM-TEST");
    }

    #[test]
    fn test_invalid_checkout_config() {
        let err = load(&[("CHECKOUT_CONFIG", r#"{"orderId":456}"#)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CHECKOUT_CONFIG"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load(&[("CHECKOUT_CONFIG_PATH", "/nonexistent/checkout.json")]).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[("CHECKOUT_CONFIG", "  "), ("GTM_CONTAINER_ID", "")]).unwrap();
        assert!(config.checkout_config.is_none());
        assert_eq!(config.gtm_container_id, DEFAULT_CONTAINER_ID);
    }

    #[test]
    fn test_sentry_settings_fall_back_to_page_config() {
        let config = load(&[(
            "CHECKOUT_CONFIG",
            r#"{"containerId":"x","sentryConfig":{"dsn":"https://key@sentry.example.com/1","environment":"staging","release":"app@1.2.0","sampleRate":0.25}}"#,
        )])
        .unwrap();
        assert_eq!(
            config.sentry_settings(),
            Some(SentrySettings {
                dsn: "https://key@sentry.example.com/1".to_string(),
                environment: Some("staging".to_string()),
                release: Some("app@1.2.0".to_string()),
                sample_rate: Some(0.25),
            })
        );
    }

    #[test]
    fn test_sentry_env_vars_win_over_page_config() {
        let config = load(&[
            (
                "CHECKOUT_CONFIG",
                r#"{"containerId":"x","sentryConfig":{"dsn":"page","environment":"staging","sampleRate":0.5}}"#,
            ),
            ("SENTRY_DSN", "env"),
            ("SENTRY_ENVIRONMENT", "production"),
        ])
        .unwrap();
        let settings = config.sentry_settings().unwrap();
        assert_eq!(settings.dsn, "env");
        assert_eq!(settings.environment.as_deref(), Some("production"));
        assert_eq!(settings.sample_rate, Some(0.5));
    }

    #[test]
    fn test_config_path_overrides_invalid_env_config() {
        let path = std::env::temp_dir().join(format!(
            "checkout-loader-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"containerId":"from-file","checkoutId":"abc"}"#).unwrap();

        let vars: HashMap<String, String> =
            HashMap::from([("CHECKOUT_CONFIG".to_string(), "{not json".to_string())]);
        let config =
            LoaderConfig::from_vars(|key| vars.get(key).cloned(), Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.checkout_config,
            Some(CheckoutConfig::new("from-file").with_checkout_id("abc"))
        );
    }
}
