//! HTTP backend for the payment method adapter.
//!
//! [`HttpBackend`] implements [`paymethod::PaymentMeanBackend`] on top of the
//! billing REST API: one accessor per `/me/paymentMean/{type}` sub-resource
//! plus `/me/availableAutomaticPaymentMeans`. Non-success responses become
//! [`paymethod::BackendError`]s carrying the status and message the API sent.
//!
//! # Modules
//!
//! - [`auth`] - Request authentication headers
//! - [`client`] - The reqwest-based backend and its accessors
//! - [`constants`] - Routes and default endpoints per market
//! - [`error`] - Construction errors

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;

pub use auth::{AuthProvider, StaticAuthProvider};
pub use client::HttpBackend;
pub use error::HttpBackendError;
