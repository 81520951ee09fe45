//! Request body encoding.
//!
//! Body parameters are turned into bytes according to a [`BodyEncoding`].
//! The encoding is either chosen explicitly on the request builder or
//! inferred once from the `Content-Type` header:
//!
//! | Media type                          | Encoding                 |
//! |-------------------------------------|--------------------------|
//! | `application/json`                  | [`BodyEncoding::Json`]       |
//! | `application/x-www-form-urlencoded` | [`BodyEncoding::UrlEncoded`] |
//! | `multipart/form-data`               | [`BodyEncoding::Multipart`]  |
//! | anything else, or no header         | [`BodyEncoding::Raw`]        |

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::{BufMut, Bytes, BytesMut};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::params::ParamMap;
use crate::error::Result;

/// MIME type for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// MIME type for URL-encoded form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// MIME type for multipart form bodies.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Body parameter that multipart bodies emit as a JPEG file part.
pub const IMAGE_PARAM: &str = "image";

const IMAGE_FILENAME: &str = "image.jpg";
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Characters left as-is in form values: ASCII alphanumerics and `-._~`.
const FORM_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How body parameters become the request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyEncoding {
    /// JSON object with sorted keys, pretty-printed.
    Json,
    /// `key=value&...` with percent-encoded values.
    UrlEncoded,
    /// `multipart/form-data` using the given boundary.
    Multipart {
        /// Part delimiter, without the leading `--`.
        boundary: String,
    },
    /// The raw body bytes are sent unchanged.
    Raw,
}

impl BodyEncoding {
    /// Multipart encoding with a freshly generated boundary.
    pub fn multipart() -> Self {
        Self::Multipart {
            boundary: generate_boundary(),
        }
    }

    /// Infer the encoding from a `Content-Type` header value.
    ///
    /// Only the media type is compared (case-insensitively); parameters such
    /// as `charset` are ignored. Multipart always gets a fresh boundary.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return Self::Raw;
        };
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            JSON_CONTENT_TYPE => Self::Json,
            FORM_CONTENT_TYPE => Self::UrlEncoded,
            MULTIPART_CONTENT_TYPE => Self::multipart(),
            _ => Self::Raw,
        }
    }

    /// The `Content-Type` value this encoding sends, if it dictates one.
    ///
    /// `Raw` leaves the caller's header alone.
    pub fn content_type(&self) -> Option<String> {
        match self {
            Self::Json => Some(JSON_CONTENT_TYPE.to_string()),
            Self::UrlEncoded => Some(FORM_CONTENT_TYPE.to_string()),
            Self::Multipart { boundary } => {
                Some(format!("{MULTIPART_CONTENT_TYPE}; boundary={boundary}"))
            }
            Self::Raw => None,
        }
    }

    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::UrlEncoded => "urlencoded",
            Self::Multipart { .. } => "multipart",
            Self::Raw => "raw",
        }
    }

    /// Encode `params` (or pass `raw` through) into a request body.
    ///
    /// Returns `None` when there is nothing to send, which only happens for
    /// `Raw` without a raw body.
    pub fn encode(&self, params: &ParamMap, raw: Option<&Bytes>) -> Result<Option<Bytes>> {
        match self {
            Self::Json => encode_json(params).map(Some),
            Self::UrlEncoded => Ok(Some(encode_form(params))),
            Self::Multipart { boundary } => encode_multipart(params, boundary).map(Some),
            Self::Raw => Ok(raw.cloned()),
        }
    }
}

/// Generate a `Boundary-<uuid>` token.
pub fn generate_boundary() -> String {
    format!("Boundary-{}", uuid::Uuid::new_v4())
}

/// Encode image bytes as the base64 text attached images travel in.
pub fn encode_image(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Serialize `params` as a JSON object with sorted keys.
pub fn encode_json(params: &ParamMap) -> Result<Bytes> {
    let object: BTreeMap<&str, &str> = params.iter().collect();
    let body = serde_json::to_vec_pretty(&object)?;
    Ok(Bytes::from(body))
}

/// Join `key=value` pairs with `&`, percent-encoding values only.
pub fn encode_form(params: &ParamMap) -> Bytes {
    let body = params
        .iter()
        .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, FORM_VALUE_ENCODE_SET)))
        .collect::<Vec<_>>()
        .join("&");
    Bytes::from(body)
}

/// Build a `multipart/form-data` body delimited by `boundary`.
///
/// Every parameter except [`IMAGE_PARAM`] becomes a plain form field. The
/// image parameter is base64-decoded and sent only as a trailing JPEG file
/// part; its base64 text is deliberately not repeated as a form field.
pub fn encode_multipart(params: &ParamMap, boundary: &str) -> Result<Bytes> {
    let mut body = BytesMut::new();

    for (name, value) in params.iter().filter(|(k, _)| *k != IMAGE_PARAM) {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.put_slice(value.as_bytes());
        body.put_slice(b"\r\n");
    }

    if let Some(encoded) = params.get(IMAGE_PARAM) {
        let image = BASE64.decode(encoded)?;
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{IMAGE_PARAM}\"; filename=\"{IMAGE_FILENAME}\"\r\n"
            )
            .as_bytes(),
        );
        body.put_slice(format!("Content-Type: {IMAGE_CONTENT_TYPE}\r\n\r\n").as_bytes());
        body.put_slice(&image);
        body.put_slice(b"\r\n");
    }

    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(body.freeze())
}
