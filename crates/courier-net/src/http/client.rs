//! Shared reqwest client behind every request the manager makes.

use std::sync::Arc;
use std::time::Duration;

use super::request::{HttpMethod, RequestBuilder};
use crate::error::{NetworkError, Result};

/// Transport settings applied to every request a client sends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Proxy URL for all schemes.
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: format!("Courier/{} (Rust)", env!("CARGO_PKG_VERSION")),
            proxy: None,
        }
    }
}

/// Builds an [`HttpClient`]; [`ApiConfig::client_builder`](crate::ApiConfig::client_builder)
/// fills it from a config file.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Start from [`HttpClientConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the whole-request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Disable the connect timeout.
    pub fn no_connect_timeout(mut self) -> Self {
        self.config.connect_timeout = None;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Route every request through `proxy_url`.
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy_url.into());
        self
    }

    /// Build the client. An unparsable proxy URL is a [`NetworkError::Proxy`].
    pub fn build(self) -> Result<HttpClient> {
        let HttpClientBuilder { config } = self;
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy_url) = config.proxy.as_deref() {
            let proxy =
                reqwest::Proxy::all(proxy_url).map_err(|e| NetworkError::Proxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        tracing::debug!(target: "courier_net::client", ?config, "Built HTTP client");

        Ok(HttpClient {
            inner: Arc::new(ClientShared { client, config }),
        })
    }
}

struct ClientShared {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// Cheaply cloneable handle to one connection pool.
///
/// Each call hands out a fresh [`RequestBuilder`], so clones can issue
/// requests concurrently.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientShared>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// A client with [`HttpClientConfig::default`].
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised. Use
    /// [`HttpClient::builder`] to handle that case.
    pub fn new() -> Self {
        HttpClientBuilder::new()
            .build()
            .expect("Failed to create HTTP client with default configuration")
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Start a GET request.
    pub fn get(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Get, url)
    }

    /// Start a request for `method`.
    pub fn request(&self, method: HttpMethod, url: impl AsRef<str>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, url.as_ref().to_string())
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpClient").field(&self.inner.config).finish()
    }
}
