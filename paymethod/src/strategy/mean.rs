//! Payment mean strategy, serving the EU and CA markets.
//!
//! Payment means live under one sub-resource per type. Listings fan out over
//! every configured type, then over every identifier of a type, and join
//! with all-or-nothing semantics: the first failing fetch fails the listing.

use std::sync::Arc;

use futures_util::future::try_join_all;
use paymethod_proto::{
    FetchOptions, ListedPaymentMean, Market, PaymentMeanType, PaymentMethodType, RawRecord,
};
use serde_json::Value;

use super::{MeanRef, PaymentStrategy, StrategyContext, StrategyResult, is_truthy};
use crate::backend::{BoxFuture, Params};
use crate::error::PaymentMethodError;
use crate::navigation::{Navigate, NavigationMode};
use crate::registry::ResourceRegistry;

/// State filter applied to bank account listings when only valid ones are requested.
pub const VALID_STATE: &str = "valid";

/// Strategy backed by the `/me/paymentMean/*` routes.
#[derive(Clone)]
pub struct PaymentMeanStrategy {
    context: StrategyContext,
    resources: ResourceRegistry,
    navigator: Arc<dyn Navigate>,
}

impl std::fmt::Debug for PaymentMeanStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMeanStrategy")
            .field("context", &self.context)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

impl PaymentMeanStrategy {
    /// Creates the strategy.
    #[must_use]
    pub fn new(
        context: StrategyContext,
        resources: ResourceRegistry,
        navigator: Arc<dyn Navigate>,
    ) -> Self {
        Self {
            context,
            resources,
            navigator,
        }
    }

    /// Rejects every operation when the strategy was built for the US market,
    /// which has no payment means API.
    const fn guard(&self, operation: &'static str) -> StrategyResult<()> {
        let market = self.context.market();
        if market.uses_payment_means() {
            Ok(())
        } else {
            Err(PaymentMethodError::UnsupportedForMarket { operation, market })
        }
    }

    /// Lists the payment means of every configured type, flattened in
    /// market configuration order.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, or with the first failure of
    /// any per-type listing.
    pub async fn get_payment_means(
        &self,
        options: FetchOptions,
    ) -> StrategyResult<Vec<ListedPaymentMean>> {
        self.guard("getPaymentMeans")?;

        let per_type = try_join_all(
            self.context
                .entries()
                .iter()
                .map(|entry| self.get_payment_means_of_type(entry.value, options)),
        )
        .await?;

        Ok(per_type.into_iter().flatten().collect())
    }

    /// Lists the payment means of one type.
    ///
    /// Bank accounts are restricted to valid ones when `options.only_valid`
    /// is set. Every fetched record is tagged with its `paymentType`.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, when the type is not
    /// configured, or with the first backend failure.
    pub async fn get_payment_means_of_type(
        &self,
        kind: PaymentMeanType,
        options: FetchOptions,
    ) -> StrategyResult<Vec<ListedPaymentMean>> {
        self.guard("getPaymentMethodOfType")?;

        let resource = self.resources.require(kind)?;
        let state = (kind == PaymentMeanType::BankAccount && options.only_valid)
            .then_some(VALID_STATE);
        let ids = resource.query(state).await?;

        let normalizer = self.context.normalizer();
        try_join_all(ids.into_iter().map(move |id| async move {
            let mut mean = resource.get(id).await?;
            if let Value::Object(fields) = &mut mean {
                fields.insert("paymentType".to_owned(), Value::from(kind.as_str()));
            }
            Ok::<_, PaymentMethodError>(if options.transform {
                ListedPaymentMean::Method(Box::new(normalizer.mean_to_method(&mean)))
            } else {
                ListedPaymentMean::Raw(mean)
            })
        }))
        .await
    }

    /// Registers a payment mean.
    ///
    /// A `default` parameter is sent as `setDefault`. When the backend
    /// answers with a `url` (PayPal agreement, card form), the navigator
    /// opens it: in a new context, or in place when `returnUrl` is set.
    /// Bank accounts never navigate.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, when the type is not
    /// configured, or with the backend failure.
    pub async fn add_payment_mean(
        &self,
        kind: PaymentMeanType,
        params: Params,
    ) -> StrategyResult<RawRecord> {
        self.guard("addPaymentMean")?;

        let resource = self.resources.require(kind)?;
        let mut body = params;
        if let Some(value) = body.remove("default") {
            body.insert("setDefault".to_owned(), value);
        }
        let mode = if is_truthy(body.get("returnUrl")) {
            NavigationMode::Redirect
        } else {
            NavigationMode::NewContext
        };

        let result = resource.create(body).await?;

        if kind != PaymentMeanType::BankAccount {
            if let Some(url) = result.get("url").and_then(Value::as_str).filter(|u| !u.is_empty()) {
                #[cfg(feature = "telemetry")]
                tracing::debug!(kind = %kind, url, mode = ?mode, "Navigating to payment mean registration");
                self.navigator.navigate(url, mode);
            }
        }

        Ok(result)
    }

    /// Edits a payment mean.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, on an invalid record, or
    /// with the backend failure.
    pub async fn edit_payment_mean(
        &self,
        mean: &RawRecord,
        params: Params,
    ) -> StrategyResult<RawRecord> {
        self.guard("editPaymentMean")?;
        let target = MeanRef::from_record(mean)?;
        let resource = self.resources.require(target.kind)?;
        Ok(resource.edit(target.id, params).await?)
    }

    /// Makes a payment mean the default one.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, on an invalid record, or
    /// with the backend failure.
    pub async fn set_payment_mean_as_default(&self, mean: &RawRecord) -> StrategyResult<RawRecord> {
        self.guard("setPaymentMeanAsDefault")?;
        let target = MeanRef::from_record(mean)?;
        let resource = self.resources.require(target.kind)?;
        Ok(resource.choose_as_default(target.id).await?)
    }

    /// Deletes a payment mean.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, on an invalid record, or
    /// with the backend failure.
    pub async fn delete_payment_mean(&self, mean: &RawRecord) -> StrategyResult<RawRecord> {
        self.guard("deletePaymentMean")?;
        let target = MeanRef::from_record(mean)?;
        let resource = self.resources.require(target.kind)?;
        Ok(resource.delete(target.id).await?)
    }

    /// Answers the validation challenge of a payment mean.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market, on an invalid record, or
    /// with the backend failure.
    pub async fn challenge_payment_mean(
        &self,
        mean: &RawRecord,
        challenge: String,
    ) -> StrategyResult<RawRecord> {
        self.guard("challengePaymentMean")?;
        let target = MeanRef::from_record(mean)?;
        let resource = self.resources.require(target.kind)?;

        let mut body = Params::new();
        body.insert("challenge".to_owned(), Value::String(challenge));
        Ok(resource.challenge(target.id, body).await?)
    }
}

impl PaymentStrategy for PaymentMeanStrategy {
    fn market(&self) -> Market {
        self.context.market()
    }

    fn list(&self, options: FetchOptions) -> BoxFuture<'_, StrategyResult<Vec<ListedPaymentMean>>> {
        Box::pin(self.get_payment_means(options))
    }

    fn add(&self, kind: PaymentMeanType, params: Params) -> BoxFuture<'_, StrategyResult<RawRecord>> {
        Box::pin(self.add_payment_mean(kind, params))
    }

    fn edit<'a>(
        &'a self,
        record: &'a RawRecord,
        params: Params,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        Box::pin(self.edit_payment_mean(record, params))
    }

    fn set_default<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        Box::pin(self.set_payment_mean_as_default(record))
    }

    fn challenge<'a>(
        &'a self,
        record: &'a RawRecord,
        challenge: String,
    ) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        Box::pin(self.challenge_payment_mean(record, challenge))
    }

    fn delete<'a>(&'a self, record: &'a RawRecord) -> BoxFuture<'a, StrategyResult<RawRecord>> {
        Box::pin(self.delete_payment_mean(record))
    }

    fn list_types(&self) -> BoxFuture<'_, StrategyResult<Vec<PaymentMethodType>>> {
        Box::pin(self.context.available_types())
    }
}
