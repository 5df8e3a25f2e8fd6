//! Backend strategies.
//!
//! A market is served by exactly one strategy, chosen when the service is
//! built:
//!
//! - [`PaymentMeanStrategy`] - EU and CA, `/me/paymentMean/*` routes
//! - [`LegacyUsStrategy`] - US, the decommissioned `/me/paymentMethod` routes
//!
//! Both implement [`PaymentStrategy`], so the service issues one interface
//! call per operation and never branches on the market itself.

mod mean;
mod us;

pub use mean::*;
pub use us::*;

use std::sync::Arc;

use paymethod_proto::{
    FetchOptions, ListedPaymentMean, Market, MarketEntry, PaymentMeanId, PaymentMeanType,
    PaymentMethodType, RawRecord,
};
use serde_json::Value;

use crate::backend::{AvailableMeansResource, BoxFuture, Params};
use crate::error::PaymentMethodError;
use crate::normalize::{Normalizer, id_field, string_field};

/// Result of a strategy operation.
pub type StrategyResult<T> = Result<T, PaymentMethodError>;

/// Capability interface shared by every backend strategy.
pub trait PaymentStrategy: Send + Sync {
    /// Returns the market this strategy serves.
    fn market(&self) -> Market;

    /// Lists the payment methods of the caller.
    fn list(&self, options: FetchOptions) -> BoxFuture<'_, StrategyResult<Vec<ListedPaymentMean>>>;

    /// Registers a new payment method of the given type.
    fn add(&self, kind: PaymentMeanType, params: Params) -> BoxFuture<'_, StrategyResult<RawRecord>>;

    /// Edits a payment method.
    fn edit<'a>(
        &'a self,
        record: &'a RawRecord,
        params: Params,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>>;

    /// Makes a payment method the default one.
    fn set_default<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>>;

    /// Answers the validation challenge of a payment method.
    fn challenge<'a>(
        &'a self,
        record: &'a RawRecord,
        challenge: String,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>>;

    /// Deletes a payment method.
    fn delete<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>>;

    /// Lists the payment method types the caller may register.
    fn list_types(&self) -> BoxFuture<'_, StrategyResult<Vec<PaymentMethodType>>>;
}

/// State shared by the strategies of a service.
#[derive(Clone)]
pub struct StrategyContext {
    market: Market,
    entries: Vec<MarketEntry>,
    normalizer: Normalizer,
    available: Arc<dyn AvailableMeansResource>,
}

impl std::fmt::Debug for StrategyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("market", &self.market)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl StrategyContext {
    /// Creates a context for a market and its configured entries.
    #[must_use]
    pub fn new(
        market: Market,
        entries: Vec<MarketEntry>,
        normalizer: Normalizer,
        available: Arc<dyn AvailableMeansResource>,
    ) -> Self {
        Self {
            market,
            entries,
            normalizer,
            available,
        }
    }

    /// Returns the market.
    #[must_use]
    pub const fn market(&self) -> Market {
        self.market
    }

    /// Returns the configured entries, in enumeration order.
    #[must_use]
    pub fn entries(&self) -> &[MarketEntry] {
        &self.entries
    }

    /// Returns the normalizer.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Lists the configured types that are both available to the caller
    /// and registerable. Ineligible types are left out silently.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the available-means accessor.
    pub async fn available_types(&self) -> StrategyResult<Vec<PaymentMethodType>> {
        let available = self.available.available().await?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| is_truthy(available.get(entry.value.as_str())))
            .filter(|entry| entry.registerable)
            .map(|entry| self.normalizer.type_to_payment_method_type(entry))
            .collect())
    }
}

/// Identity of a payment mean, read from its raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanRef {
    /// Type of the payment mean.
    pub kind: PaymentMeanType,
    /// Identifier of the payment mean.
    pub id: PaymentMeanId,
}

impl MeanRef {
    /// Reads `paymentType` and `id` from a record.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentMethodError::InvalidRecord`] if a field is missing and
    /// [`PaymentMethodError::UnknownPaymentType`] if the type is not known.
    pub fn from_record(record: &RawRecord) -> StrategyResult<Self> {
        let kind = string_field(record, "paymentType")
            .ok_or(PaymentMethodError::InvalidRecord("paymentType"))?
            .parse::<PaymentMeanType>()?;
        let id = id_field(record, "id").ok_or(PaymentMethodError::InvalidRecord("id"))?;
        Ok(Self { kind, id })
    }
}

/// Loose truthiness of an optional JSON value.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
