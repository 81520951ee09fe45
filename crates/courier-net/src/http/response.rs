//! HTTP response types.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::params::ParamMap;
use crate::error::{NetworkError, Result};

/// A completed HTTP response with its body fully read.
///
/// Any status code is a valid `ApiResponse`; 4xx and 5xx are left for the
/// caller to inspect.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: u16,
    headers: ParamMap,
    url: String,
    data: Bytes,
}

impl ApiResponse {
    /// Build a response from its parts.
    pub fn new(status: u16, headers: ParamMap, url: impl Into<String>, data: Bytes) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
            data,
        }
    }

    /// Read a reqwest response to completion.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = ParamMap::from(response.headers());
        let url = response.url().to_string();
        let data = response.bytes().await?;
        Ok(Self::new(status, headers, url, data))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response is a client error (4xx status).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response is a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response headers. Names are lowercase.
    pub fn headers(&self) -> &ParamMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_ignore_case(name)
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the response body.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Take the response body.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.data.to_vec())
            .map_err(|e| NetworkError::InvalidBody(e.to_string()))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.data)?)
    }

    /// Turn a non-2xx status into [`NetworkError::HttpStatus`], using the
    /// body as the message when it is text.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self.text().ok().filter(|m| !m.is_empty());
        Err(NetworkError::HttpStatus {
            status: self.status,
            message,
        })
    }
}
