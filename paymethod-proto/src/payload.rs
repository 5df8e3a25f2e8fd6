//! Error payload shape exposed to callers.
//!
//! Failures carry a status and a message, the latter either at the top level
//! or nested under `data`, depending on where the failure originated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested error data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Human-readable message.
    pub message: String,
    /// Any other field of the body (e.g. the API error `class`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Externally visible failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    /// `{status, data: {message}}`
    Data {
        /// Status code.
        status: u16,
        /// Nested data.
        data: ErrorData,
    },
    /// `{status, message}`
    Message {
        /// Status code.
        status: u16,
        /// Human-readable message.
        message: String,
    },
}

impl ErrorPayload {
    /// Creates a `{status, message}` payload.
    #[must_use]
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self::Message {
            status,
            message: message.into(),
        }
    }

    /// Creates a `{status, data: {message}}` payload.
    #[must_use]
    pub fn data(status: u16, message: impl Into<String>) -> Self {
        Self::Data {
            status,
            data: ErrorData {
                message: message.into(),
                extra: Map::new(),
            },
        }
    }

    /// Creates a `{status, data}` payload from an API error body, keeping
    /// every field. `None` when the body has no string `message`.
    #[must_use]
    pub fn from_body(status: u16, body: Value) -> Option<Self> {
        let Value::Object(mut extra) = body else {
            return None;
        };
        let message = match extra.remove("message") {
            Some(Value::String(message)) => message,
            _ => return None,
        };
        Some(Self::Data {
            status,
            data: ErrorData { message, extra },
        })
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Data { status, .. } | Self::Message { status, .. } => *status,
        }
    }

    /// Returns the message, wherever it is nested.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Data { data, .. } => &data.message,
            Self::Message { message, .. } => message,
        }
    }
}
