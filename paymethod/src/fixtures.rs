//! In-memory backend used by unit tests. Records every call so tests can
//! assert that no remote call happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use paymethod_proto::{PaymentMeanId, PaymentMeanType, RawRecord};
use serde_json::{Value, json};

use crate::backend::{
    AvailableMeansResource, BackendResult, BoxFuture, Params, PaymentMeanBackend,
    PaymentMeanResource,
};
use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Query(Option<String>),
    Get(PaymentMeanId),
    Create(Params),
    Edit(PaymentMeanId, Params),
    ChooseAsDefault(PaymentMeanId),
    Delete(PaymentMeanId),
    Challenge(PaymentMeanId, Params),
    Available,
}

#[derive(Debug, Default)]
pub(crate) struct FakeResource {
    means: Mutex<Vec<RawRecord>>,
    create_result: Mutex<Option<RawRecord>>,
    failure: Mutex<Option<BackendError>>,
    get_failures: Mutex<HashMap<PaymentMeanId, BackendError>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeResource {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> BackendResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ack(id: PaymentMeanId) -> RawRecord {
        json!({"id": id})
    }
}

impl PaymentMeanResource for FakeResource {
    fn query<'a>(
        &'a self,
        state: Option<&'a str>,
    ) -> BoxFuture<'a, BackendResult<Vec<PaymentMeanId>>> {
        Box::pin(async move {
            self.record(Call::Query(state.map(str::to_owned)))?;
            let means = self.means.lock().unwrap();
            Ok(means
                .iter()
                .filter(|m| state.is_none_or(|s| m.get("state").and_then(Value::as_str) == Some(s)))
                .filter_map(|m| m.get("id").and_then(Value::as_u64))
                .collect())
        })
    }

    fn get(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::Get(id))?;
            if let Some(err) = self.get_failures.lock().unwrap().get(&id) {
                return Err(err.clone());
            }
            self.means
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.get("id").and_then(Value::as_u64) == Some(id))
                .cloned()
                .ok_or_else(|| BackendError::message(404, "This payment mean does not exist"))
        })
    }

    fn create(&self, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::Create(body))?;
            Ok(self
                .create_result
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| json!({})))
        })
    }

    fn edit(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::Edit(id, body))?;
            Ok(Self::ack(id))
        })
    }

    fn choose_as_default(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::ChooseAsDefault(id))?;
            Ok(Self::ack(id))
        })
    }

    fn delete(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::Delete(id))?;
            Ok(Self::ack(id))
        })
    }

    fn challenge(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.record(Call::Challenge(id, body))?;
            Ok(Self::ack(id))
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeAvailable {
    value: Mutex<RawRecord>,
    failure: Mutex<Option<BackendError>>,
    calls: Mutex<Vec<Call>>,
}

impl AvailableMeansResource for FakeAvailable {
    fn available(&self) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Available);
            if let Some(err) = self.failure.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self.value.lock().unwrap().clone())
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeBackend {
    resources: HashMap<PaymentMeanType, Arc<FakeResource>>,
    available: Arc<FakeAvailable>,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            resources: PaymentMeanType::ALL
                .into_iter()
                .map(|kind| (kind, Arc::new(FakeResource::default())))
                .collect(),
            available: Arc::new(FakeAvailable {
                value: Mutex::new(json!({})),
                failure: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }),
        })
    }

    pub(crate) fn resource(&self, kind: PaymentMeanType) -> Arc<FakeResource> {
        Arc::clone(&self.resources[&kind])
    }

    pub(crate) fn set_means(&self, kind: PaymentMeanType, means: Vec<RawRecord>) {
        *self.resources[&kind].means.lock().unwrap() = means;
    }

    pub(crate) fn set_create_result(&self, kind: PaymentMeanType, result: RawRecord) {
        *self.resources[&kind].create_result.lock().unwrap() = Some(result);
    }

    pub(crate) fn fail(&self, kind: PaymentMeanType, err: BackendError) {
        *self.resources[&kind].failure.lock().unwrap() = Some(err);
    }

    /// Fails the fetch of a single record while listing keeps working.
    pub(crate) fn fail_get(&self, kind: PaymentMeanType, id: PaymentMeanId, err: BackendError) {
        self.resources[&kind]
            .get_failures
            .lock()
            .unwrap()
            .insert(id, err);
    }

    pub(crate) fn fail_available(&self, err: BackendError) {
        *self.available.failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn set_available(&self, value: RawRecord) {
        *self.available.value.lock().unwrap() = value;
    }

    pub(crate) fn available_calls(&self) -> usize {
        self.available
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == Call::Available)
            .count()
    }

    /// Number of payment mean calls across every type.
    pub(crate) fn mean_calls(&self) -> usize {
        self.resources.values().map(|r| r.calls().len()).sum()
    }
}

impl PaymentMeanBackend for FakeBackend {
    fn payment_mean(&self, kind: PaymentMeanType) -> Arc<dyn PaymentMeanResource> {
        self.resource(kind)
    }

    fn available_means(&self) -> Arc<dyn AvailableMeansResource> {
        Arc::<FakeAvailable>::clone(&self.available)
    }
}
