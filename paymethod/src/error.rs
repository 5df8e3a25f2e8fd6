//! Error types for the payment method adapter.
//!
//! Every failure exposes a status code and an [`ErrorPayload`], the shape
//! client applications already handle: `{status, message}` for guards raised
//! by the adapter itself, `{status, data: {message}}` for removed endpoints,
//! and whatever the backend sent for backend failures.

use paymethod_proto::{ErrorPayload, Market, ProtoError};

/// Status for operations a market structurally cannot support.
pub const STATUS_UNSUPPORTED: u16 = 403;

/// Status for legacy endpoints removed server-side.
pub const STATUS_REMOVED: u16 = 404;

/// Status for malformed input handed to the adapter.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// A rejection reported by a remote resource accessor.
///
/// Propagated to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("backend error {}: {}", self.status(), self.payload.text())]
pub struct BackendError {
    payload: ErrorPayload,
}

impl BackendError {
    /// Wraps a backend payload.
    #[must_use]
    pub const fn new(payload: ErrorPayload) -> Self {
        Self { payload }
    }

    /// Creates a backend error with a top-level message.
    #[must_use]
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorPayload::message(status, message))
    }

    /// Creates a backend error with a message nested under `data`.
    #[must_use]
    pub fn data(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorPayload::data(status, message))
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.payload.status()
    }

    /// Returns the payload as sent by the backend.
    #[must_use]
    pub const fn payload(&self) -> &ErrorPayload {
        &self.payload
    }
}

/// Errors returned by every adapter operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentMethodError {
    /// The operation does not exist for the configured market.
    #[error("{operation} is not available for {market} world part")]
    UnsupportedForMarket {
        /// Name of the rejected operation.
        operation: &'static str,
        /// The configured market.
        market: Market,
    },

    /// The legacy route backing the operation was removed server-side.
    #[error("{route} is no longer available.")]
    EndpointRemoved {
        /// HTTP verb and route (e.g. `"POST /me/paymentMethod"`).
        route: &'static str,
    },

    /// The backend rejected the call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The payment mean type is unknown or not configured for the market.
    #[error("unknown payment mean type: {0}")]
    UnknownPaymentType(String),

    /// A record handed to a mutating operation lacks a required field.
    #[error("invalid payment mean record: missing {0}")]
    InvalidRecord(&'static str),

    /// The market configuration is invalid.
    #[error("invalid market configuration: {0}")]
    Configuration(String),
}

impl PaymentMethodError {
    /// Returns the status code reported to callers.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::UnsupportedForMarket { .. } => STATUS_UNSUPPORTED,
            Self::EndpointRemoved { .. } => STATUS_REMOVED,
            Self::Backend(err) => err.status(),
            Self::UnknownPaymentType(_) | Self::InvalidRecord(_) | Self::Configuration(_) => {
                STATUS_BAD_REQUEST
            }
        }
    }

    /// Returns the payload reported to callers.
    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        match self {
            Self::Backend(err) => err.payload().clone(),
            Self::EndpointRemoved { .. } => ErrorPayload::data(self.status(), self.to_string()),
            _ => ErrorPayload::message(self.status(), self.to_string()),
        }
    }
}

impl From<ProtoError> for PaymentMethodError {
    fn from(err: ProtoError) -> Self {
        match err {
            ProtoError::UnknownPaymentMeanType(value) => Self::UnknownPaymentType(value),
            other => Self::Configuration(other.to_string()),
        }
    }
}

impl serde::Serialize for PaymentMethodError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}
