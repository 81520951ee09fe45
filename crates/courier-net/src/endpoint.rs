//! Endpoint registry: symbolic endpoint names mapped to URLs.
//!
//! A URL is the registry's base URL followed by the endpoint's path segment,
//! concatenated verbatim. The base therefore normally ends with `/`:
//!
//! ```
//! use courier_net::{ApiEndpoint, EndpointRegistry};
//!
//! let registry = EndpointRegistry::new("https://example.com/api/");
//! assert_eq!(registry.url_string(&ApiEndpoint::Login), "https://example.com/api/login");
//! ```

use url::Url;

use crate::error::{NetworkError, Result};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://example.com/api/";

/// Anything that names a path below the API base URL.
pub trait Endpoint {
    /// Path segment appended to the base URL.
    fn path(&self) -> &str;
}

/// The application's API endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    /// Sign in.
    Login,
    /// Sign out.
    Logout,
    /// Create an account.
    Register,
    /// The signed-in user's profile.
    Profile,
    /// Profile picture upload.
    UploadAvatar,
    /// Home feed.
    Feed,
    /// Search.
    Search,
}

impl ApiEndpoint {
    /// Every endpoint, in declaration order.
    pub const ALL: [ApiEndpoint; 7] = [
        Self::Login,
        Self::Logout,
        Self::Register,
        Self::Profile,
        Self::UploadAvatar,
        Self::Feed,
        Self::Search,
    ];
}

impl Endpoint for ApiEndpoint {
    fn path(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Register => "register",
            Self::Profile => "profile",
            Self::UploadAvatar => "profile/avatar",
            Self::Feed => "feed",
            Self::Search => "search",
        }
    }
}

/// Builds endpoint URLs from a fixed base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointRegistry {
    base_url: String,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl EndpointRegistry {
    /// Create a registry rooted at `base_url`. The base is kept as given.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url + endpoint.path()`, without validation.
    pub fn url_string(&self, endpoint: &dyn Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// The endpoint's URL, or [`NetworkError::InvalidUrl`] if the
    /// concatenation is not a well-formed URL.
    pub fn url_for(&self, endpoint: &dyn Endpoint) -> Result<Url> {
        let url = self.url_string(endpoint);
        Url::parse(&url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Custom(&'static str);

    impl Endpoint for Custom {
        fn path(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn url_is_base_plus_path() {
        let registry = EndpointRegistry::new("https://example.com/api/");
        for endpoint in ApiEndpoint::ALL {
            assert_eq!(
                registry.url_string(&endpoint),
                format!("https://example.com/api/{}", endpoint.path())
            );
            assert_eq!(
                registry.url_for(&endpoint).unwrap().as_str(),
                registry.url_string(&endpoint)
            );
        }
    }

    #[test]
    fn login_example() {
        let registry = EndpointRegistry::new("https://example.com/api/");
        assert_eq!(
            registry.url_for(&ApiEndpoint::Login).unwrap().as_str(),
            "https://example.com/api/login"
        );
    }

    #[test]
    fn custom_endpoints() {
        let registry = EndpointRegistry::default();
        assert_eq!(
            registry.url_string(&Custom("v2/status")),
            "https://example.com/api/v2/status"
        );
    }

    #[test]
    fn malformed_base_is_rejected() {
        let registry = EndpointRegistry::new("not a url/");
        let err = registry.url_for(&ApiEndpoint::Feed).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl(_)));
    }
}
