//! Legacy US strategy.
//!
//! The US market used the `/me/paymentMethod` routes, which were removed
//! server-side. Listing resolves to nothing and every mutating operation
//! rejects with a 404 naming the removed route, without any network call,
//! so callers still on this path get a stable, documented rejection.

use paymethod_proto::{
    FetchOptions, ListedPaymentMean, Market, PaymentMeanType, PaymentMethodType, RawRecord,
};
use serde_json::Value;

use super::{PaymentStrategy, StrategyContext, StrategyResult};
use crate::backend::{BoxFuture, Params};
use crate::error::PaymentMethodError;

/// Removed route for registering a US payment method.
pub const ADD_ROUTE: &str = "POST /me/paymentMethod";

/// Removed route for editing a US payment method.
pub const EDIT_ROUTE: &str = "PUT /me/paymentMethod/{paymentMethodId}";

/// Removed route for deleting a US payment method.
pub const DELETE_ROUTE: &str = "DELETE /me/paymentMethod/{paymentMethodId}";

/// Strategy for the decommissioned US payment method API.
#[derive(Debug, Clone)]
pub struct LegacyUsStrategy {
    context: StrategyContext,
}

impl LegacyUsStrategy {
    /// Creates the strategy.
    #[must_use]
    pub const fn new(context: StrategyContext) -> Self {
        Self { context }
    }

    fn removed(route: &'static str) -> StrategyResult<RawRecord> {
        #[cfg(feature = "telemetry")]
        tracing::warn!(route, "Legacy US payment method route called");
        Err(PaymentMethodError::EndpointRemoved { route })
    }

    /// Registering a US payment method is no longer possible.
    ///
    /// # Errors
    ///
    /// Always fails with status 404.
    #[deprecated(note = "POST /me/paymentMethod was removed server-side")]
    pub fn add_us_payment_method(&self, _params: &Params) -> StrategyResult<RawRecord> {
        Self::removed(ADD_ROUTE)
    }

    /// Editing a US payment method is no longer possible.
    ///
    /// # Errors
    ///
    /// Always fails with status 404.
    #[deprecated(note = "PUT /me/paymentMethod/{paymentMethodId} was removed server-side")]
    pub fn edit_us_payment_method(
        &self,
        _method: &RawRecord,
        _params: &Params,
    ) -> StrategyResult<RawRecord> {
        Self::removed(EDIT_ROUTE)
    }

    /// Deleting a US payment method is no longer possible.
    ///
    /// # Errors
    ///
    /// Always fails with status 404.
    #[deprecated(note = "DELETE /me/paymentMethod/{paymentMethodId} was removed server-side")]
    pub fn delete_us_payment_method(&self, _method: &RawRecord) -> StrategyResult<RawRecord> {
        Self::removed(DELETE_ROUTE)
    }
}

#[allow(deprecated)]
impl PaymentStrategy for LegacyUsStrategy {
    fn market(&self) -> Market {
        self.context.market()
    }

    fn list(&self, _options: FetchOptions) -> BoxFuture<'_, StrategyResult<Vec<ListedPaymentMean>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn add(&self, kind: PaymentMeanType, params: Params) -> BoxFuture<'_, StrategyResult<RawRecord>> {
        let mut body = Params::new();
        body.insert("paymentType".to_owned(), Value::from(kind.as_str()));
        body.extend(params);
        let result = self.add_us_payment_method(&body);
        Box::pin(async move { result })
    }

    fn edit<'a>(
        &'a self,
        record: &'a RawRecord,
        params: Params,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        let result = self.edit_us_payment_method(record, &params);
        Box::pin(async move { result })
    }

    fn set_default<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        let mut params = Params::new();
        params.insert("default".to_owned(), Value::Bool(true));
        self.edit(record, params)
    }

    fn challenge<'a>(
        &'a self,
        _record: &'a RawRecord,
        _challenge: String,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        let market = self.context.market();
        Box::pin(async move {
            Err(PaymentMethodError::UnsupportedForMarket {
                operation: "challengePaymentMean",
                market,
            })
        })
    }

    fn delete<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        let result = self.delete_us_payment_method(record);
        Box::pin(async move { result })
    }

    fn list_types(&self) -> BoxFuture<'_, StrategyResult<Vec<PaymentMethodType>>> {
        Box::pin(self.context.available_types())
    }
}
