//! HTTP request types and builder.
//!
//! A [`RequestBuilder`] collects headers, query parameters, body parameters
//! and an optional raw body for exactly one call. Nothing is shared between
//! builders, so a client can run any number of requests concurrently.
//!
//! Sending goes through [`HttpRequest::prepare`], which turns the descriptor
//! into a [`PreparedRequest`]: the final URL, validated headers and the
//! encoded body. Preparation never touches the network.

use std::time::Duration;

use bytes::Bytes;

use super::client::HttpClient;
use super::dispatch::{self, RequestHandle};
use super::encoding::{self, BodyEncoding};
use super::params::ParamMap;
use super::response::ApiResponse;
use crate::error::{NetworkError, Result};

const CONTENT_TYPE: &str = "Content-Type";

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP PATCH method.
    Patch,
    /// HTTP DELETE method.
    Delete,
}

impl HttpMethod {
    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(NetworkError::Request(format!("unsupported method: {other}"))),
        }
    }
}

/// Everything needed to issue one request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The request URL, before query parameters are added.
    pub url: String,
    /// Request headers, copied verbatim onto the wire. Names must be unique
    /// ignoring case; see [`ParamMap::set_ignore_case`].
    pub headers: ParamMap,
    /// Query parameters.
    pub query: ParamMap,
    /// Body parameters, encoded according to the body encoding.
    pub params: ParamMap,
    /// Raw body bytes, used by [`BodyEncoding::Raw`].
    pub body: Option<Bytes>,
    /// Explicit body encoding. When unset it is inferred from `Content-Type`.
    pub encoding: Option<BodyEncoding>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create an empty request descriptor.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: ParamMap::new(),
            query: ParamMap::new(),
            params: ParamMap::new(),
            body: None,
            encoding: None,
            timeout: None,
        }
    }

    /// The body encoding this request will use.
    ///
    /// GET requests have none. Otherwise an explicit encoding wins over the
    /// one inferred from the `Content-Type` header.
    pub fn body_encoding(&self) -> Option<BodyEncoding> {
        if self.method == HttpMethod::Get {
            return None;
        }
        Some(self.encoding.clone().unwrap_or_else(|| {
            BodyEncoding::from_content_type(self.headers.get_ignore_case(CONTENT_TYPE))
        }))
    }

    /// Resolve the URL, headers and body without sending anything.
    pub fn prepare(&self) -> Result<PreparedRequest> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query.iter() {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = self.headers.clone();
        let encoding = self.body_encoding();
        let body = match &encoding {
            None => None,
            Some(encoding) => {
                let body = encoding.encode(&self.params, self.body.as_ref())?;
                // Multipart needs its boundary on the header; an explicit
                // encoding relabels whatever Content-Type the caller set.
                let relabel = match encoding {
                    BodyEncoding::Raw => false,
                    BodyEncoding::Multipart { .. } => true,
                    BodyEncoding::Json | BodyEncoding::UrlEncoded => {
                        self.encoding.is_some() || headers.get_ignore_case(CONTENT_TYPE).is_none()
                    }
                };
                if relabel && let Some(content_type) = encoding.content_type() {
                    headers.set_ignore_case(CONTENT_TYPE, content_type);
                }
                body
            }
        };

        let mut header_map = http::HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            let name = http::HeaderName::from_bytes(name.as_bytes())?;
            let value = http::HeaderValue::from_str(value)?;
            header_map.insert(name, value);
        }

        Ok(PreparedRequest {
            method: self.method,
            url,
            headers: header_map,
            body,
            encoding,
            timeout: self.timeout,
        })
    }

    /// Prepare and send the request on `client`.
    pub(crate) async fn execute(&self, client: &HttpClient) -> Result<ApiResponse> {
        let prepared = self.prepare().inspect_err(|e| {
            tracing::error!(target: "courier_net::http", "Failed to build {} {}: {}", self.method, self.url, e);
        })?;

        tracing::debug!(
            target: "courier_net::http",
            method = %prepared.method,
            url = %prepared.url,
            encoding = prepared.encoding.as_ref().map(BodyEncoding::name).unwrap_or("none"),
            "Sending request"
        );

        let mut req_builder = client
            .reqwest_client()
            .request(prepared.method.to_reqwest(), prepared.url.clone())
            .headers(prepared.headers);

        if let Some(timeout) = prepared.timeout {
            req_builder = req_builder.timeout(timeout);
        }
        if let Some(body) = prepared.body {
            req_builder = req_builder.body(body);
        }

        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = NetworkError::from(e);
                tracing::warn!(target: "courier_net::http", "{} {} failed: {}", prepared.method, prepared.url, err);
                return Err(err);
            }
        };

        let response = ApiResponse::from_reqwest(response).await?;
        tracing::debug!(
            target: "courier_net::http",
            status = response.status(),
            bytes = response.data().len(),
            "Request finished"
        );
        Ok(response)
    }
}

/// A request resolved down to what goes on the wire.
#[derive(Debug)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Final URL including the query string.
    pub url: url::Url,
    /// Validated headers, including any rewritten `Content-Type`.
    pub headers: http::HeaderMap,
    /// Encoded body. Always `None` for GET.
    pub body: Option<Bytes>,
    /// The encoding that produced `body`.
    pub encoding: Option<BodyEncoding>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Get a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Builder for a single request.
pub struct RequestBuilder {
    client: HttpClient,
    request: HttpRequest,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub(crate) fn new(client: HttpClient, method: HttpMethod, url: String) -> Self {
        Self {
            client,
            request: HttpRequest::new(method, url),
        }
    }

    /// Add a header, replacing any previous value for the same name in any
    /// letter case.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.set_ignore_case(name, value);
        self
    }

    /// Add multiple headers, with the same replacement rule as
    /// [`header`](Self::header).
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.request.headers.set_ignore_case(name, value);
        }
        self
    }

    /// Set the `Content-Type` header.
    pub fn content_type(self, value: impl Into<String>) -> Self {
        self.header(CONTENT_TYPE, value)
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.set(key, value);
        self
    }

    /// Add multiple query parameters.
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request.query.extend(pairs);
        self
    }

    /// Add a body parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.params.set(key, value);
        self
    }

    /// Add multiple body parameters.
    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request.params.extend(params);
        self
    }

    /// Attach image bytes as a base64 body parameter under `key`.
    ///
    /// Multipart bodies send the `image` key as a JPEG file part; other keys
    /// and other encodings carry the base64 text as-is.
    pub fn attach_image(mut self, bytes: impl AsRef<[u8]>, key: impl Into<String>) -> Self {
        self.request
            .params
            .set(key, encoding::encode_image(bytes.as_ref()));
        self
    }

    /// Set a raw body, sent unchanged by [`BodyEncoding::Raw`].
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Choose the body encoding instead of inferring it from `Content-Type`.
    pub fn encoding(mut self, encoding: BodyEncoding) -> Self {
        self.request.encoding = Some(encoding);
        self
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        self.request
    }

    /// Send the request and wait for the response.
    pub async fn send(self) -> Result<ApiResponse> {
        self.request.execute(&self.client).await
    }

    /// Send the request in the background and report the result to
    /// `on_complete` exactly once.
    ///
    /// Construction errors (such as an invalid URL) are delivered through the
    /// callback as well, without any network call. Cancelling the returned
    /// handle delivers [`NetworkError::Cancelled`].
    pub fn dispatch<F>(self, on_complete: F) -> RequestHandle
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let Self { client, request } = self;
        dispatch::spawn_request(async move { request.execute(&client).await }, on_complete)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("request", &self.request)
            .finish()
    }
}
