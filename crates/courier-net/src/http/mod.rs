//! HTTP request building, body encoding and dispatch.
//!
//! # Example
//!
//! ```ignore
//! use courier_net::http::{BodyEncoding, HttpClient, HttpMethod};
//!
//! let client = HttpClient::new();
//!
//! // Content-Type picks the body encoding
//! let response = client
//!     .request(HttpMethod::Post, "https://example.com/api/users")
//!     .content_type("application/json")
//!     .param("name", "John")
//!     .send()
//!     .await?;
//!
//! // Or choose it explicitly
//! let response = client
//!     .request(HttpMethod::Post, "https://example.com/api/avatar")
//!     .encoding(BodyEncoding::multipart())
//!     .attach_image(jpeg_bytes, "image")
//!     .send()
//!     .await?;
//! ```

mod client;
mod dispatch;
pub mod encoding;
mod manager;
mod params;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use dispatch::{RequestHandle, RequestId};
pub use encoding::BodyEncoding;
pub use manager::RequestManager;
pub use params::ParamMap;
pub use request::{HttpMethod, HttpRequest, PreparedRequest, RequestBuilder};
pub use response::ApiResponse;
