//! Authentication headers for billing API requests.

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::HttpBackendError;

/// Generates authentication headers for every request.
///
/// Implement this trait for signed or refreshed credentials; the headers
/// are requested anew for each call.
pub trait AuthProvider: Send + Sync {
    /// Returns the headers to attach to the next request.
    fn auth_headers(&self) -> HeaderMap;
}

impl<F> AuthProvider for F
where
    F: Fn() -> HeaderMap + Send + Sync,
{
    fn auth_headers(&self) -> HeaderMap {
        self()
    }
}

/// [`AuthProvider`] sending the same headers with every request.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthProvider {
    headers: HeaderMap,
}

impl StaticAuthProvider {
    /// Creates a provider from a fixed set of headers.
    #[must_use]
    pub const fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Creates a provider from a single bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`HttpBackendError::HeaderValue`] if `token` contains invalid
    /// header characters.
    pub fn bearer(token: &str) -> Result<Self, HttpBackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        Ok(Self { headers })
    }
}

impl AuthProvider for StaticAuthProvider {
    fn auth_headers(&self) -> HeaderMap {
        self.headers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer() {
        let provider = StaticAuthProvider::bearer("t0k3n").unwrap();
        assert_eq!(provider.auth_headers()[AUTHORIZATION], "Bearer t0k3n");
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        assert!(matches!(
            StaticAuthProvider::bearer("bad\ntoken"),
            Err(HttpBackendError::HeaderValue(_))
        ));
    }

    #[test]
    fn test_closure_provider() {
        let provider = || {
            let mut headers = HeaderMap::new();
            headers.insert("x-ovh-consumer", HeaderValue::from_static("ck"));
            headers
        };
        assert_eq!(provider.auth_headers()["x-ovh-consumer"], "ck");
    }
}
