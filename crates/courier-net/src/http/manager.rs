//! Endpoint-aware request manager.
//!
//! `RequestManager` ties an [`HttpClient`] to an [`EndpointRegistry`] and a
//! set of default headers. It is immutable once built: each call starts a
//! fresh [`RequestBuilder`], so parameters set for one request never leak
//! into the next and one manager can be shared freely across threads.
//!
//! # Example
//!
//! ```ignore
//! use courier_net::{ApiEndpoint, HttpMethod, RequestManager};
//!
//! let manager = RequestManager::new();
//!
//! let handle = manager
//!     .endpoint(HttpMethod::Post, &ApiEndpoint::Login)
//!     .content_type("application/json")
//!     .param("user", "john")
//!     .param("password", "secret")
//!     .dispatch(|result| match result {
//!         Ok(response) => println!("status {}", response.status()),
//!         Err(e) => eprintln!("login failed: {e}"),
//!     });
//! ```

use std::sync::Arc;

use bytes::Bytes;

use super::client::HttpClient;
use super::dispatch::{self, RequestHandle};
use super::params::ParamMap;
use super::request::{HttpMethod, RequestBuilder};
use super::response::ApiResponse;
use crate::config::ApiConfig;
use crate::endpoint::{Endpoint, EndpointRegistry};
use crate::error::{NetworkError, Result};

struct RequestManagerInner {
    client: HttpClient,
    registry: EndpointRegistry,
    default_headers: ParamMap,
}

/// Issues requests against the configured API.
#[derive(Clone)]
pub struct RequestManager {
    inner: Arc<RequestManagerInner>,
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestManager {
    /// Create a manager with the default client and registry.
    pub fn new() -> Self {
        Self::with_client(HttpClient::new(), EndpointRegistry::default())
    }

    /// Create a manager from an existing client and registry.
    pub fn with_client(client: HttpClient, registry: EndpointRegistry) -> Self {
        Self {
            inner: Arc::new(RequestManagerInner {
                client,
                registry,
                default_headers: ParamMap::new(),
            }),
        }
    }

    /// Create a manager from an [`ApiConfig`].
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = config.client_builder().build()?;
        Ok(Self {
            inner: Arc::new(RequestManagerInner {
                client,
                registry: config.registry(),
                default_headers: config.default_headers(),
            }),
        })
    }

    /// The endpoint registry.
    pub fn registry(&self) -> &EndpointRegistry {
        &self.inner.registry
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.inner.client
    }

    /// Headers added to every request.
    pub fn default_headers(&self) -> &ParamMap {
        &self.inner.default_headers
    }

    /// Start a request to an absolute URL.
    pub fn request(&self, method: HttpMethod, url: impl AsRef<str>) -> RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .headers(self.inner.default_headers.iter())
    }

    /// Start a request to a registered endpoint.
    pub fn endpoint(&self, method: HttpMethod, endpoint: &dyn Endpoint) -> RequestBuilder {
        self.request(method, self.inner.registry.url_string(endpoint))
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Post, url)
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Put, url)
    }

    /// Create a PATCH request builder.
    pub fn patch(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Patch, url)
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.request(HttpMethod::Delete, url)
    }

    /// Issue a bare request and report the result to `on_complete`.
    ///
    /// Equivalent to `self.request(method, url).dispatch(on_complete)`.
    pub fn issue_request<F>(
        &self,
        url: impl AsRef<str>,
        method: HttpMethod,
        on_complete: F,
    ) -> RequestHandle
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        self.request(method, url).dispatch(on_complete)
    }

    /// GET `url` and return the body bytes, whatever the status.
    pub async fn get_data(&self, url: impl AsRef<str>) -> Result<Bytes> {
        let response = self.inner.client.get(url).send().await?;
        Ok(response.into_data())
    }

    /// GET `url` and decode the body as an image.
    pub async fn fetch_image(&self, url: impl AsRef<str>) -> Result<image::DynamicImage> {
        let data = self.get_data(url).await?;
        decode_image(&data)
    }

    /// Callback form of [`get_data`](Self::get_data).
    pub fn get_data_async<F>(&self, url: impl AsRef<str>, on_complete: F) -> RequestHandle
    where
        F: FnOnce(Result<Bytes>) + Send + 'static,
    {
        self.inner
            .client
            .get(url)
            .dispatch(move |result| on_complete(result.map(ApiResponse::into_data)))
    }

    /// Callback form of [`fetch_image`](Self::fetch_image).
    pub fn fetch_image_async<F>(&self, url: impl AsRef<str>, on_complete: F) -> RequestHandle
    where
        F: FnOnce(Result<image::DynamicImage>) + Send + 'static,
    {
        let request = self.inner.client.get(url);
        let fetch = async move { request.send().await };
        dispatch::spawn_request(fetch, move |result| {
            on_complete(result.and_then(|response| decode_image(response.data())))
        })
    }
}

impl std::fmt::Debug for RequestManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestManager")
            .field("base_url", &self.inner.registry.base_url())
            .field("default_headers", &self.inner.default_headers.len())
            .finish()
    }
}

fn decode_image(data: &[u8]) -> Result<image::DynamicImage> {
    image::load_from_memory(data).map_err(|e| {
        tracing::warn!(target: "courier_net::manager", "Failed to decode image ({} bytes): {}", data.len(), e);
        NetworkError::InvalidBody(e.to_string())
    })
}
