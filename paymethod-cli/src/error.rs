//! Error types for the command-line client.

use paymethod::PaymentMethodError;
use paymethod::iban::IbanError;
use paymethod::proto::{ErrorPayload, ProtoError};
use paymethod_http::HttpBackendError;

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A market code or payment mean type is not known.
    #[error("{0}")]
    Market(#[from] ProtoError),

    /// A configured header name is invalid.
    #[error("invalid header name: {0}")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    /// A configured header value is invalid.
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The HTTP backend could not be built.
    #[error(transparent)]
    Http(#[from] HttpBackendError),

    /// A command argument is not valid JSON.
    #[error("invalid JSON argument: {0}")]
    Json(#[from] serde_json::Error),

    /// An IBAN or BIC failed validation.
    #[error(transparent)]
    Iban(#[from] IbanError),

    /// The adapter rejected the operation.
    #[error(transparent)]
    Service(#[from] PaymentMethodError),
}

impl CliError {
    /// Returns the payload to print for this error.
    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        match self {
            Self::Service(err) => err.payload(),
            other => ErrorPayload::message(0, other.to_string()),
        }
    }
}
