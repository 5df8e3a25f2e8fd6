#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Market-aware payment method adapter.
//!
//! The billing provider exposes payment instruments through two generations
//! of API: the payment mean routes (`/me/paymentMean/*`, EU and CA) and the
//! US payment method routes (`/me/paymentMethod`, decommissioned). This crate
//! hides both behind one set of operations and one record shape.
//!
//! # Overview
//!
//! A [`PaymentMethodService`] is built for one market. It selects the backend
//! strategy of that market once, then routes every operation through it.
//! Backend records are optionally normalized into [`PaymentMethod`] and
//! [`PaymentMethodType`] records that keep the original under `original`.
//!
//! The crate performs no I/O itself: the host supplies remote accessors
//! ([`backend`]), a translator ([`i18n`]) and a navigator ([`navigation`]).
//!
//! # Modules
//!
//! - [`backend`] - Remote resource accessor traits
//! - [`error`] - Error type and status codes
//! - [`i18n`] - Translation of display keys
//! - [`iban`] - IBAN/BIC structural checks
//! - [`navigation`] - URL navigation side effect
//! - [`normalize`] - Mapping of backend records into unified records
//! - [`registry`] - Payment mean accessors keyed by type
//! - [`service`] - The market-agnostic service
//! - [`strategy`] - Backend strategies per market
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod backend;
pub mod error;
pub mod i18n;
pub mod iban;
pub mod navigation;
pub mod normalize;
pub mod registry;
pub mod service;
pub mod strategy;

#[cfg(test)]
mod fixtures;

pub use backend::{AvailableMeansResource, BoxFuture, Params, PaymentMeanBackend, PaymentMeanResource};
pub use error::{BackendError, PaymentMethodError};
pub use i18n::{CatalogTranslator, KeyTranslator, Translate};
pub use navigation::{Navigate, NavigationMode, NoNavigation, RecordingNavigator};
pub use normalize::Normalizer;
pub use service::{PaymentMethodService, PaymentMethodServiceBuilder};

pub use paymethod_proto as proto;
pub use paymethod_proto::{
    ErrorPayload, FetchOptions, ListedPaymentMean, Market, MarketEntry, MarketTable, PaymentMeanId,
    PaymentMeanType, PaymentMethod, PaymentMethodType, RawRecord,
};
