// src/utils/config.rs
//! Interceptor configuration
//!
//! Configuration is layered: built-in defaults, then an optional file, then
//! environment variables prefixed with `HTTP_TAP_` (for example
//! `HTTP_TAP_SIMULATE_ONLY=true`).

use crate::utils::errors::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HTTP_TAP";

/// Default component tag written at the start of every transcript line
pub const DEFAULT_COMPONENT: &str = "http_tap";

/// Configuration for the interceptor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Never perform network I/O; answer every request with a synthetic 200
    pub simulate_only: bool,

    /// Component tag for transcript lines
    pub component: String,

    /// Maximum number of body bytes written to the transcript.
    /// The response handed back to the caller is never truncated.
    pub max_logged_body_bytes: Option<usize>,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            simulate_only: false,
            component: DEFAULT_COMPONENT.to_string(),
            max_logged_body_bytes: None,
        }
    }
}

impl InterceptorConfig {
    /// Configuration that never touches the network
    pub fn simulated() -> Self {
        Self {
            simulate_only: true,
            ..Self::default()
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    pub fn with_max_logged_body_bytes(mut self, limit: usize) -> Self {
        self.max_logged_body_bytes = Some(limit);
        self
    }

    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!("Loaded interceptor configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a file, overridden by the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!("Loaded interceptor configuration from {:?}: {:?}", path, config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = InterceptorConfig::default();
        assert!(!config.simulate_only);
        assert_eq!(config.component, "http_tap");
        assert_eq!(config.max_logged_body_bytes, None);
    }

    #[test]
    fn test_simulated() {
        let config = InterceptorConfig::simulated().with_component("billing");
        assert!(config.simulate_only);
        assert_eq!(config.component, "billing");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "simulate_only = true").unwrap();
        writeln!(file, "component = \"payments\"").unwrap();
        writeln!(file, "max_logged_body_bytes = 512").unwrap();

        let config = InterceptorConfig::load_from(file.path()).unwrap();
        assert!(config.simulate_only);
        assert_eq!(config.component, "payments");
        assert_eq!(config.max_logged_body_bytes, Some(512));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = InterceptorConfig::load_from("/nonexistent/http-tap.toml");
        assert!(result.is_err());
    }
}
