//! Request manager for talking to a single REST backend from a mobile app.
//!
//! This crate provides:
//!
//! - **Endpoint registry**: symbolic endpoints resolved against a base URL
//! - **Request builder**: per-call headers, query parameters and body
//!   parameters, with JSON, URL-encoded, multipart or raw bodies
//! - **Dispatch**: futures or exactly-once callbacks, with cancellation
//!
//! # Issuing a request
//!
//! ```ignore
//! use courier_net::{ApiEndpoint, HttpMethod, RequestManager};
//!
//! let manager = RequestManager::new();
//!
//! let response = manager
//!     .endpoint(HttpMethod::Post, &ApiEndpoint::Register)
//!     .content_type("application/x-www-form-urlencoded")
//!     .param("email", "john@example.com")
//!     .param("name", "John Doe")
//!     .send()
//!     .await?;
//!
//! // Non-2xx statuses are not errors
//! if !response.is_success() {
//!     println!("rejected with {}", response.status());
//! }
//! ```
//!
//! ## Uploading an image
//!
//! ```ignore
//! let handle = manager
//!     .endpoint(HttpMethod::Post, &ApiEndpoint::UploadAvatar)
//!     .content_type("multipart/form-data")
//!     .param("caption", "me")
//!     .attach_image(jpeg_bytes, "image")
//!     .dispatch(|result| {
//!         // called exactly once
//!     });
//!
//! // Abort if the screen goes away
//! handle.cancel();
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! let config = courier_net::ApiConfig::load("courier.toml")?;
//! let manager = RequestManager::from_config(&config)?;
//! ```

pub mod config;
pub mod endpoint;
mod error;
pub mod http;

pub use config::ApiConfig;
pub use endpoint::{ApiEndpoint, DEFAULT_BASE_URL, Endpoint, EndpointRegistry};
pub use error::{NetworkError, Result};

// Re-export commonly used types at the crate root
pub use http::{
    ApiResponse, BodyEncoding, HttpClient, HttpClientBuilder, HttpMethod, HttpRequest, ParamMap,
    PreparedRequest, RequestBuilder, RequestHandle, RequestId, RequestManager,
};
