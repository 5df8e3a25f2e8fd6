//! Remote resource accessors consumed by the adapter.
//!
//! The adapter performs no I/O of its own. The host application supplies a
//! [`PaymentMeanBackend`] that hands out one [`PaymentMeanResource`] per
//! payment mean type plus the market-level [`AvailableMeansResource`].
//!
//! All methods are async (returning [`BoxFuture`]) so that the traits stay
//! dyn-compatible; the main implementation lives in `paymethod-http`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use paymethod_proto::{PaymentMeanId, PaymentMeanType, RawRecord};

use crate::error::BackendError;

/// A pinned, boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Request body of create/edit calls.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Result of a remote accessor call.
pub type BackendResult<T> = Result<T, BackendError>;

/// Accessor for one payment mean sub-resource (e.g. `/me/paymentMean/creditCard`).
pub trait PaymentMeanResource: Send + Sync {
    /// Lists the identifiers of the payment means, optionally filtered by state.
    fn query<'a>(
        &'a self,
        state: Option<&'a str>,
    ) -> BoxFuture<'a, BackendResult<Vec<PaymentMeanId>>>;

    /// Fetches one payment mean.
    fn get(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>>;

    /// Creates a payment mean.
    fn create(&self, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>>;

    /// Updates a payment mean.
    fn edit(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>>;

    /// Makes a payment mean the default one. Sends no body.
    fn choose_as_default(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>>;

    /// Deletes a payment mean. Sends no body.
    fn delete(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>>;

    /// Answers the validation challenge of a payment mean.
    fn challenge(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>>;
}

/// Accessor for the payment mean types the caller may currently use
/// for automatic payment.
pub trait AvailableMeansResource: Send + Sync {
    /// Returns a record keyed by backend type identifier; a truthy value
    /// marks the type as available.
    fn available(&self) -> BoxFuture<'_, BackendResult<RawRecord>>;
}

/// Factory of remote accessors, supplied by the host application.
pub trait PaymentMeanBackend: Send + Sync {
    /// Returns the accessor for a payment mean type.
    fn payment_mean(&self, kind: PaymentMeanType) -> Arc<dyn PaymentMeanResource>;

    /// Returns the available-means accessor.
    fn available_means(&self) -> Arc<dyn AvailableMeansResource>;
}

impl<T: PaymentMeanBackend + ?Sized> PaymentMeanBackend for Arc<T> {
    fn payment_mean(&self, kind: PaymentMeanType) -> Arc<dyn PaymentMeanResource> {
        (**self).payment_mean(kind)
    }

    fn available_means(&self) -> Arc<dyn AvailableMeansResource> {
        (**self).available_means()
    }
}
