//! Data types for the payment-method adapter.
//!
//! This crate defines the serialization-level data structures shared by the
//! adapter core, the HTTP backend and the CLI. It has minimal dependencies
//! (`serde`, `serde_json` and `thiserror`) and carries no behaviour beyond parsing
//! and validation of its own values.
//!
//! # Modules
//!
//! - [`market`] - Market codes, payment mean type identifiers and the market table
//! - [`method`] - Unified `PaymentMethod` / `PaymentMethodType` records
//! - [`options`] - Listing options
//! - [`payload`] - The error payload shape exposed to callers

pub mod market;
pub mod method;
pub mod options;
pub mod payload;

pub use market::{Market, MarketEntry, MarketTable, PaymentMeanType};
pub use method::{DisplayValue, Icon, ListedPaymentMean, PaymentMethod, PaymentMethodType};
pub use options::FetchOptions;
pub use payload::{ErrorData, ErrorPayload};

/// Raw record as returned by the billing backend.
///
/// Kept as an untyped JSON value so that normalized records can carry the
/// backend record verbatim.
pub type RawRecord = serde_json::Value;

/// Numeric identifier of a payment mean.
pub type PaymentMeanId = u64;

/// Errors that can occur when parsing adapter data types.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The value is not one of the known payment mean type identifiers.
    #[error("unknown payment mean type: {0}")]
    UnknownPaymentMeanType(String),

    /// The value is not one of the known market codes.
    #[error("unknown market: {0}")]
    UnknownMarket(String),

    /// A market lists the same payment mean type more than once.
    #[error("market {market} lists payment mean type {value} more than once")]
    DuplicateEntry {
        /// The offending market.
        market: Market,
        /// The duplicated type.
        value: PaymentMeanType,
    },
}
