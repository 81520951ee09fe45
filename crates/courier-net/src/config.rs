//! Manager configuration, loadable from TOML.
//!
//! ```toml
//! base_url = "https://example.com/api/"
//! timeout_secs = 20
//! user_agent = "MyApp/2.1"
//!
//! [default_headers]
//! Accept = "application/json"
//! ```
//!
//! Every key is optional; missing keys take the [`ApiConfig::default`] value.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::{DEFAULT_BASE_URL, EndpointRegistry};
use crate::error::{NetworkError, Result};
use crate::http::{HttpClient, HttpClientBuilder, ParamMap};

/// Settings for a [`RequestManager`](crate::http::RequestManager).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL endpoint paths are appended to.
    pub base_url: String,
    /// Whole-request timeout in seconds. `0` disables it.
    pub timeout_secs: u64,
    /// Connect timeout in seconds. `0` disables it.
    pub connect_timeout_secs: u64,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Proxy URL.
    pub proxy: Option<String>,
    /// Headers added to every request made through the manager.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: None,
            proxy: None,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ApiConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| NetworkError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: "courier_net::config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NetworkError::Config(e.to_string()))
    }

    /// The endpoint registry for `base_url`.
    pub fn registry(&self) -> EndpointRegistry {
        EndpointRegistry::new(self.base_url.clone())
    }

    /// Default headers as a [`ParamMap`].
    pub fn default_headers(&self) -> ParamMap {
        self.default_headers.iter().collect::<ParamMap>()
    }

    /// A client builder carrying the timeouts, user agent and proxy.
    pub fn client_builder(&self) -> HttpClientBuilder {
        let mut builder = HttpClient::builder();
        builder = match self.timeout_secs {
            0 => builder.no_timeout(),
            secs => builder.timeout(Duration::from_secs(secs)),
        };
        builder = match self.connect_timeout_secs {
            0 => builder.no_connect_timeout(),
            secs => builder.connect_timeout(Duration::from_secs(secs)),
        };
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(ref proxy) = self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ApiConfig::from_toml_str("").unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.registry().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn parses_all_fields() {
        let config = ApiConfig::from_toml_str(
            r#"
            base_url = "https://api.test/v1/"
            timeout_secs = 5
            connect_timeout_secs = 0
            user_agent = "Test/1.0"

            [default_headers]
            Accept = "application/json"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.test/v1/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 0);
        assert_eq!(config.user_agent.as_deref(), Some("Test/1.0"));
        assert_eq!(config.default_headers().get("Accept"), Some("application/json"));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = ApiConfig::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, NetworkError::Config(_)));
    }

    #[test]
    fn client_builder_applies_transport_settings() {
        let config = ApiConfig::from_toml_str(
            r#"
            timeout_secs = 12
            connect_timeout_secs = 0
            user_agent = "MyApp/2.1"
            "#,
        )
        .unwrap();
        let client = config.client_builder().build().unwrap();

        assert_eq!(client.config().timeout, Some(Duration::from_secs(12)));
        assert_eq!(client.config().connect_timeout, None);
        assert_eq!(client.config().user_agent, "MyApp/2.1");
    }

    #[test]
    fn toml_round_trip() {
        let mut config = ApiConfig::default();
        config.default_headers.insert("X-App".to_string(), "courier".to_string());
        let text = config.to_toml_string().unwrap();
        assert_eq!(ApiConfig::from_toml_str(&text).unwrap(), config);
    }
}
