//! Errors raised while configuring an [`HttpBackend`](crate::HttpBackend).
//!
//! Request failures are not reported here: they surface as
//! [`paymethod::BackendError`] so the adapter can forward them unchanged.

/// Errors that can occur while building an HTTP backend.
#[derive(Debug, thiserror::Error)]
pub enum HttpBackendError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// Invalid header name.
    #[error("invalid header name: {0}")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value.
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] http::header::InvalidHeaderValue),
}
