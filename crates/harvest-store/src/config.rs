//! # Backend Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HARVEST_BACKEND_URL   https://<project>.example.co                    │
//! │  HARVEST_BACKEND_KEY   anon/service key sent as apikey + Bearer        │
//! │                                                                         │
//! │  Both set      → RestBackend                                           │
//! │  Either unset  → OfflineBackend (reads fall back, writes rejected)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::OrderBackend;
use crate::offline::OfflineBackend;
use crate::rest::RestBackend;

pub const BACKEND_URL_VAR: &str = "HARVEST_BACKEND_URL";
pub const BACKEND_KEY_VAR: &str = "HARVEST_BACKEND_KEY";

/// Connection settings for the hosted backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    pub url: String,
    pub api_key: String,
}

// The key is a credential; keep it out of logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        BackendConfig {
            url: url.into().trim().trim_end_matches('/').to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Reads the backend settings from the environment.
    ///
    /// Returns `None` when either variable is missing or blank.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(
            std::env::var(BACKEND_URL_VAR).ok(),
            std::env::var(BACKEND_KEY_VAR).ok(),
        )
    }

    /// Builds a config from already-read values.
    pub fn from_vars(url: Option<String>, api_key: Option<String>) -> Option<Self> {
        let url = url.filter(|v| !v.trim().is_empty());
        let api_key = api_key.filter(|v| !v.trim().is_empty());

        match (url, api_key) {
            (Some(url), Some(key)) => Some(BackendConfig::new(url, key)),
            (None, None) => None,
            (Some(_), None) => {
                warn!("{} is set but {} is not; running offline", BACKEND_URL_VAR, BACKEND_KEY_VAR);
                None
            }
            (None, Some(_)) => {
                warn!("{} is set but {} is not; running offline", BACKEND_KEY_VAR, BACKEND_URL_VAR);
                None
            }
        }
    }
}

/// Builds the backend the session should use.
///
/// A missing config, or one the HTTP client rejects, yields an
/// [`OfflineBackend`] carrying the reason.
pub fn connect(config: Option<BackendConfig>) -> Arc<dyn OrderBackend> {
    let Some(config) = config else {
        warn!(
            "Backend environment variables are not set; using fallback data. Provide {} and {}.",
            BACKEND_URL_VAR, BACKEND_KEY_VAR
        );
        return Arc::new(OfflineBackend::new(format!(
            "{} and {} are not set",
            BACKEND_URL_VAR, BACKEND_KEY_VAR
        )));
    };

    match RestBackend::new(&config) {
        Ok(backend) => {
            info!(url = %config.url, "Connected to hosted backend");
            Arc::new(backend)
        }
        Err(e) => {
            warn!(error = %e, "Backend configuration unusable; running offline");
            Arc::new(OfflineBackend::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_vars_required() {
        assert!(BackendConfig::from_vars(None, None).is_none());
        assert!(BackendConfig::from_vars(Some("https://x.example.co".into()), None).is_none());
        assert!(BackendConfig::from_vars(None, Some("key".into())).is_none());
        assert!(BackendConfig::from_vars(Some("  ".into()), Some("key".into())).is_none());
    }

    #[test]
    fn test_url_normalised() {
        let config =
            BackendConfig::from_vars(Some(" https://x.example.co/ ".into()), Some("key".into()))
                .unwrap();
        assert_eq!(config.url, "https://x.example.co");
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = BackendConfig::new("https://x.example.co", "secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_connect_without_config_is_offline() {
        let backend = connect(None);
        assert_eq!(backend.name(), "offline");
    }

    #[test]
    fn test_connect_with_config_is_rest() {
        let backend = connect(Some(BackendConfig::new("https://x.example.co", "key")));
        assert_eq!(backend.name(), "rest");
    }
}
