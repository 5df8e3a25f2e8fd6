//! Market-agnostic payment method service.
//!
//! [`PaymentMethodService`] is the single entry point client applications
//! use. It is configured once with a market, and picks the backend strategy
//! for that market at construction:
//!
//! | market | strategy                                    |
//! |--------|---------------------------------------------|
//! | EU, CA | [`PaymentMeanStrategy`]                     |
//! | US     | [`LegacyUsStrategy`] (decommissioned API)   |
//!
//! # Example
//!
//! ```rust,ignore
//! use paymethod::{FetchOptions, Market, PaymentMethodService};
//!
//! let service = PaymentMethodService::builder(backend)
//!     .market(Market::Ca)
//!     .translator(|key: &str| catalog.lookup(key))
//!     .build()?;
//!
//! let methods = service
//!     .get_payment_methods(FetchOptions::transformed())
//!     .await?;
//! ```

use std::sync::Arc;

use paymethod_proto::{
    FetchOptions, ListedPaymentMean, Market, MarketEntry, MarketTable, PaymentMeanType,
    PaymentMethodType, RawRecord,
};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::backend::{Params, PaymentMeanBackend};
use crate::error::PaymentMethodError;
use crate::i18n::{KeyTranslator, Translate};
use crate::navigation::{Navigate, NoNavigation};
use crate::normalize::Normalizer;
use crate::registry::ResourceRegistry;
use crate::strategy::{LegacyUsStrategy, PaymentMeanStrategy, PaymentStrategy, StrategyContext};

/// Builder for [`PaymentMethodService`].
pub struct PaymentMethodServiceBuilder {
    backend: Arc<dyn PaymentMeanBackend>,
    market: Market,
    markets: MarketTable,
    translator: Arc<dyn Translate>,
    navigator: Arc<dyn Navigate>,
}

impl std::fmt::Debug for PaymentMethodServiceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodServiceBuilder")
            .field("market", &self.market)
            .field("markets", &self.markets)
            .finish_non_exhaustive()
    }
}

impl PaymentMethodServiceBuilder {
    /// Sets the market. Defaults to [`Market::Eu`].
    #[must_use]
    pub const fn market(mut self, market: Market) -> Self {
        self.market = market;
        self
    }

    /// Replaces the built-in market table.
    #[must_use]
    pub fn markets(mut self, markets: MarketTable) -> Self {
        self.markets = markets;
        self
    }

    /// Sets the translator. Defaults to [`KeyTranslator`].
    #[must_use]
    pub fn translator(mut self, translator: impl Translate + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    /// Sets the navigator. Defaults to [`NoNavigation`].
    #[must_use]
    pub fn navigator(mut self, navigator: impl Navigate + 'static) -> Self {
        self.navigator = Arc::new(navigator);
        self
    }

    /// Sets a shared navigator.
    #[must_use]
    pub fn shared_navigator(mut self, navigator: Arc<dyn Navigate>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Builds the service, selecting the strategy of the configured market.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentMethodError::Configuration`] if the market table
    /// lists a type twice for one market.
    pub fn build(self) -> Result<PaymentMethodService, PaymentMethodError> {
        self.markets.validate()?;

        let entries = self.markets.entries(self.market).to_vec();
        let context = StrategyContext::new(
            self.market,
            entries,
            Normalizer::new(self.translator),
            self.backend.available_means(),
        );

        let strategy: Box<dyn PaymentStrategy> = if self.market.uses_payment_means() {
            let resources = ResourceRegistry::from_entries(context.entries(), &*self.backend);
            Box::new(PaymentMeanStrategy::new(context, resources, self.navigator))
        } else {
            Box::new(LegacyUsStrategy::new(context))
        };

        #[cfg(feature = "telemetry")]
        tracing::debug!(market = %self.market, "Payment method service configured");

        Ok(PaymentMethodService {
            strategy,
            markets: self.markets,
        })
    }
}

/// Unified payment method operations for one market.
pub struct PaymentMethodService {
    strategy: Box<dyn PaymentStrategy>,
    markets: MarketTable,
}

impl std::fmt::Debug for PaymentMethodService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodService")
            .field("market", &self.market())
            .finish_non_exhaustive()
    }
}

impl PaymentMethodService {
    /// Starts building a service on top of a backend.
    #[must_use]
    pub fn builder(backend: impl PaymentMeanBackend + 'static) -> PaymentMethodServiceBuilder {
        PaymentMethodServiceBuilder {
            backend: Arc::new(backend),
            market: Market::default(),
            markets: MarketTable::default(),
            translator: Arc::new(KeyTranslator),
            navigator: Arc::new(NoNavigation),
        }
    }

    /// Returns the configured market.
    #[must_use]
    pub fn market(&self) -> Market {
        self.strategy.market()
    }

    /// Returns the configured entries of the market, in enumeration order.
    #[must_use]
    pub fn market_entries(&self) -> &[MarketEntry] {
        self.markets.entries(self.market())
    }

    /// Lists the caller's payment methods.
    ///
    /// Always empty for the US market, whose listing API no longer exists.
    ///
    /// # Errors
    ///
    /// Propagates the first backend failure; no partial results.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.get_payment_methods", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn get_payment_methods(
        &self,
        options: FetchOptions,
    ) -> Result<Vec<ListedPaymentMean>, PaymentMethodError> {
        self.strategy.list(options).await
    }

    /// Registers a new payment method.
    ///
    /// # Errors
    ///
    /// Fails with status 404 for the US market, otherwise propagates the
    /// backend failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.add_payment_method", skip(self, params), fields(market = %self.market()), err)
    )]
    pub async fn add_payment_method(
        &self,
        kind: PaymentMeanType,
        params: Params,
    ) -> Result<RawRecord, PaymentMethodError> {
        self.strategy.add(kind, params).await
    }

    /// Edits a payment method, given its backend record.
    ///
    /// # Errors
    ///
    /// Fails with status 404 for the US market, otherwise propagates the
    /// backend failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.edit_payment_method", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn edit_payment_method(
        &self,
        method: &RawRecord,
        params: Params,
    ) -> Result<RawRecord, PaymentMethodError> {
        self.strategy.edit(method, params).await
    }

    /// Makes a payment method the default one.
    ///
    /// # Errors
    ///
    /// Fails with status 404 for the US market, otherwise propagates the
    /// backend failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.set_payment_method_as_default", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn set_payment_method_as_default(
        &self,
        method: &RawRecord,
    ) -> Result<RawRecord, PaymentMethodError> {
        self.strategy.set_default(method).await
    }

    /// Answers the validation challenge of a payment method.
    ///
    /// # Errors
    ///
    /// Fails with status 403 for the US market without calling the backend,
    /// otherwise propagates the backend failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.challenge_payment_method", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn challenge_payment_method(
        &self,
        method: &RawRecord,
        challenge: impl Into<String>,
    ) -> Result<RawRecord, PaymentMethodError> {
        self.strategy.challenge(method, challenge.into()).await
    }

    /// Deletes a payment method.
    ///
    /// # Errors
    ///
    /// Fails with status 404 for the US market, otherwise propagates the
    /// backend failure.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.delete_payment_method", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn delete_payment_method(
        &self,
        method: &RawRecord,
    ) -> Result<RawRecord, PaymentMethodError> {
        self.strategy.delete(method).await
    }

    /// Lists the payment method types the caller may register: configured for
    /// the market, flagged registerable, and reported available by the backend.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the available-means query.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paymethod.get_available_payment_method_types", skip_all, fields(market = %self.market()), err)
    )]
    pub async fn get_available_payment_method_types(
        &self,
    ) -> Result<Vec<PaymentMethodType>, PaymentMethodError> {
        self.strategy.list_types().await
    }
}
