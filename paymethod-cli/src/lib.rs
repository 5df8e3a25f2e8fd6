//! Command-line client for the payment method adapter.
//!
//! Wires the HTTP backend into a [`PaymentMethodService`] configured from a
//! TOML file and the environment.
//!
//! # Modules
//!
//! - [`config`] - Configuration with environment variable expansion
//! - [`error`] - CLI error types

pub mod config;
pub mod error;

use paymethod::{NavigationMode, PaymentMethodService};
use paymethod_http::HttpBackend;

use crate::config::CliConfig;
use crate::error::CliError;

/// Builds the HTTP backend described by the configuration.
///
/// # Errors
///
/// Returns an error if the endpoint or a header is invalid.
pub fn build_backend(config: &CliConfig) -> Result<HttpBackend, CliError> {
    let mut backend = HttpBackend::try_from(config.endpoint())?.with_headers(config.header_map()?);
    if let Some(timeout) = config.timeout() {
        backend = backend.with_timeout(timeout);
    }
    Ok(backend)
}

/// Builds the service described by the configuration.
///
/// Registration URLs cannot be opened from a terminal; they are logged
/// for the user to follow.
///
/// # Errors
///
/// Returns an error if the backend cannot be built or the market table is
/// invalid.
pub fn build_service(config: &CliConfig) -> Result<PaymentMethodService, CliError> {
    let mut builder = PaymentMethodService::builder(build_backend(config)?)
        .market(config.target)
        .translator(config.translator())
        .navigator(|url: &str, mode: NavigationMode| {
            tracing::info!(url, ?mode, "Open this URL to complete the registration");
        });
    if let Some(markets) = &config.markets {
        builder = builder.markets(markets.clone());
    }
    Ok(builder.build()?)
}
