//! A [`PaymentMeanBackend`] talking to the billing API over HTTP.
//!
//! [`HttpBackend`] hands out one [`PaymentMeanEndpoint`] per payment mean
//! type and an [`AvailableMeansEndpoint`], all sharing the same reqwest
//! client, headers and timeout.
//!
//! ## Routes
//!
//! | accessor call         | request                                                   |
//! |-----------------------|-----------------------------------------------------------|
//! | `query(state)`        | `GET me/paymentMean/{type}[?state=]`                      |
//! | `get(id)`             | `GET me/paymentMean/{type}/{id}`                          |
//! | `create(body)`        | `POST me/paymentMean/{type}`                              |
//! | `edit(id, body)`      | `PUT me/paymentMean/{type}/{id}`                          |
//! | `choose_as_default`   | `POST me/paymentMean/{type}/{id}/chooseAsDefaultPaymentMean` |
//! | `delete(id)`          | `DELETE me/paymentMean/{type}/{id}`                       |
//! | `challenge(id, body)` | `POST me/paymentMean/{type}/{id}/challenge`               |
//! | `available()`         | `GET me/availableAutomaticPaymentMeans`                   |
//!
//! ## Error Handling
//!
//! Every failure becomes a [`BackendError`]:
//! - non-success JSON bodies carrying a `message` are kept whole under `data`
//! - other non-success responses keep their status and the raw body text
//! - transport failures use status [`STATUS_TRANSPORT`]
//! - undecodable success bodies keep the response status

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method};
use paymethod::backend::{
    AvailableMeansResource, BackendResult, BoxFuture, Params, PaymentMeanBackend,
    PaymentMeanResource,
};
use paymethod::{BackendError, ErrorPayload, Market, PaymentMeanId, PaymentMeanType, RawRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::auth::AuthProvider;
use crate::constants::{
    AVAILABLE_MEANS_ROUTE, CHALLENGE_ACTION, CHOOSE_AS_DEFAULT_ACTION, PAYMENT_MEAN_ROUTE,
    STATE_PARAM, STATUS_TRANSPORT, default_endpoint,
};
use crate::error::HttpBackendError;

/// HTTP implementation of [`PaymentMeanBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    /// Base URL of the API, ending with a slash (e.g. `https://eu.api.ovh.com/1.0/`)
    base_url: Url,
    /// Shared reqwest HTTP client
    client: Client,
    /// Custom headers sent with each request
    headers: HeaderMap,
    /// Optional request timeout
    timeout: Option<Duration>,
    /// Optional per-request authentication
    auth: Option<Arc<dyn AuthProvider>>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("authenticated", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpBackend {
    /// Constructs a backend from a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`HttpBackendError::UrlParse`] if the API routes cannot be
    /// resolved against `base_url`.
    pub fn try_new(base_url: Url) -> Result<Self, HttpBackendError> {
        base_url
            .join(PAYMENT_MEAN_ROUTE)
            .map_err(|e| HttpBackendError::UrlParse {
                context: "Failed to construct payment mean URL",
                source: e,
            })?;
        Ok(Self {
            base_url,
            client: Client::new(),
            headers: HeaderMap::new(),
            timeout: None,
            auth: None,
        })
    }

    /// Constructs a backend for the default endpoint of a market.
    ///
    /// # Errors
    ///
    /// Returns [`HttpBackendError::UrlParse`] if the endpoint cannot be parsed.
    pub fn for_market(market: Market) -> Result<Self, HttpBackendError> {
        Self::try_from(default_endpoint(market))
    }

    /// Returns the base URL used by this backend.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the custom headers configured on the backend.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Attaches custom headers to all future requests.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets a timeout for all future requests.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Authenticates all future requests.
    #[must_use]
    pub fn with_auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Replaces the reqwest client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, path: &str) -> BackendResult<Url> {
        self.base_url.join(path).map_err(|e| {
            BackendError::message(STATUS_TRANSPORT, format!("Failed to construct {path} URL: {e}"))
        })
    }

    fn mean_url(&self, kind: PaymentMeanType, suffix: &str) -> BackendResult<Url> {
        self.url(&format!("{PAYMENT_MEAN_ROUTE}/{}{suffix}", kind.as_str()))
    }

    /// Sends one request and decodes the JSON answer.
    ///
    /// An empty success body decodes as JSON `null`.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "paymethod.http.request",
            skip(self, body),
            fields(otel.status_code = tracing::field::Empty, error.message = tracing::field::Empty),
            err
        )
    )]
    async fn request<R>(&self, method: Method, url: Url, body: Option<&Params>) -> BackendResult<R>
    where
        R: DeserializeOwned,
    {
        let mut req = self.client.request(method, url).headers(self.headers.clone());
        if let Some(auth) = &self.auth {
            req = req.headers(auth.auth_headers());
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let result = match req.send().await {
            Ok(response) => decode(response).await,
            Err(e) => Err(BackendError::message(STATUS_TRANSPORT, e.to_string())),
        };

        record_result_on_span(&result);

        result
    }
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> BackendResult<R> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::message(status.as_u16(), e.to_string()))?;

    if !status.is_success() {
        if let Some(payload) = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|body| ErrorPayload::from_body(status.as_u16(), body))
        {
            return Err(BackendError::new(payload));
        }
        let text = String::from_utf8_lossy(&bytes);
        let message = (!text.trim().is_empty())
            .then(|| text.trim().to_owned())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_owned());
        return Err(BackendError::message(status.as_u16(), message));
    }

    let decoded = if bytes.is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(&bytes)
    };
    decoded.map_err(|e| {
        BackendError::message(status.as_u16(), format!("Failed to deserialize JSON: {e}"))
    })
}

/// Normalizes the URL (single trailing slash) and calls [`HttpBackend::try_new`].
impl TryFrom<&str> for HttpBackend {
    type Error = HttpBackendError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut normalized = value.trim_end_matches('/').to_owned();
        normalized.push('/');
        let url = Url::parse(&normalized).map_err(|e| HttpBackendError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;
        Self::try_new(url)
    }
}

impl TryFrom<String> for HttpBackend {
    type Error = HttpBackendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl PaymentMeanBackend for HttpBackend {
    fn payment_mean(&self, kind: PaymentMeanType) -> Arc<dyn PaymentMeanResource> {
        Arc::new(PaymentMeanEndpoint {
            backend: self.clone(),
            kind,
        })
    }

    fn available_means(&self) -> Arc<dyn AvailableMeansResource> {
        Arc::new(AvailableMeansEndpoint {
            backend: self.clone(),
        })
    }
}

/// Accessor for one `/me/paymentMean/{type}` sub-resource.
#[derive(Debug, Clone)]
pub struct PaymentMeanEndpoint {
    backend: HttpBackend,
    kind: PaymentMeanType,
}

impl PaymentMeanEndpoint {
    /// Returns the payment mean type served by this accessor.
    #[must_use]
    pub const fn kind(&self) -> PaymentMeanType {
        self.kind
    }

    async fn call(
        &self,
        method: Method,
        suffix: String,
        body: Option<&Params>,
    ) -> BackendResult<RawRecord> {
        let url = self.backend.mean_url(self.kind, &suffix)?;
        self.backend.request(method, url, body).await
    }
}

impl PaymentMeanResource for PaymentMeanEndpoint {
    fn query<'a>(
        &'a self,
        state: Option<&'a str>,
    ) -> BoxFuture<'a, BackendResult<Vec<PaymentMeanId>>> {
        Box::pin(async move {
            let mut url = self.backend.mean_url(self.kind, "")?;
            if let Some(state) = state {
                url.query_pairs_mut().append_pair(STATE_PARAM, state);
            }
            self.backend.request(Method::GET, url, None).await
        })
    }

    fn get(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(self.call(Method::GET, format!("/{id}"), None))
    }

    fn create(&self, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move { self.call(Method::POST, String::new(), Some(&body)).await })
    }

    fn edit(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move { self.call(Method::PUT, format!("/{id}"), Some(&body)).await })
    }

    fn choose_as_default(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(self.call(Method::POST, format!("/{id}/{CHOOSE_AS_DEFAULT_ACTION}"), None))
    }

    fn delete(&self, id: PaymentMeanId) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(self.call(Method::DELETE, format!("/{id}"), None))
    }

    fn challenge(&self, id: PaymentMeanId, body: Params) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            self.call(Method::POST, format!("/{id}/{CHALLENGE_ACTION}"), Some(&body))
                .await
        })
    }
}

/// Accessor for `/me/availableAutomaticPaymentMeans`.
#[derive(Debug, Clone)]
pub struct AvailableMeansEndpoint {
    backend: HttpBackend,
}

impl AvailableMeansResource for AvailableMeansEndpoint {
    fn available(&self) -> BoxFuture<'_, BackendResult<RawRecord>> {
        Box::pin(async move {
            let url = self.backend.url(AVAILABLE_MEANS_ROUTE)?;
            self.backend.request(Method::GET, url, None).await
        })
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to billing API failed");
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuthProvider;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::try_from(server.uri()).unwrap()
    }

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_try_from_normalizes_trailing_slash() {
        let backend = HttpBackend::try_from("https://eu.api.ovh.com/1.0//").unwrap();
        assert_eq!(backend.base_url().as_str(), "https://eu.api.ovh.com/1.0/");
        assert_eq!(
            backend
                .mean_url(PaymentMeanType::CreditCard, "/3")
                .unwrap()
                .as_str(),
            "https://eu.api.ovh.com/1.0/me/paymentMean/creditCard/3"
        );
    }

    #[test]
    fn test_for_market_uses_default_endpoint() {
        let backend = HttpBackend::for_market(Market::Us).unwrap();
        assert_eq!(backend.base_url().as_str(), "https://api.us.ovhcloud.com/1.0/");
        assert!(HttpBackend::try_from("not a url").is_err());
    }

    #[tokio::test]
    async fn test_query_with_state_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/paymentMean/bankAccount"))
            .and(query_param("state", "valid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .expect(1)
            .mount(&server)
            .await;

        let resource = backend(&server).payment_mean(PaymentMeanType::BankAccount);
        assert_eq!(resource.query(Some("valid")).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_get_and_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/paymentMean/paypal/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "email": "a@b.c"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me/availableAutomaticPaymentMeans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paypal": true})))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let mean = backend.payment_mean(PaymentMeanType::Paypal).get(7).await.unwrap();
        assert_eq!(mean, json!({"id": 7, "email": "a@b.c"}));
        let available = backend.available_means().available().await.unwrap();
        assert_eq!(available["paypal"], true);
    }

    #[tokio::test]
    async fn test_mutations_use_expected_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/paymentMean/creditCard"))
            .and(body_json(json!({"setDefault": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://pay"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/me/paymentMean/creditCard/3"))
            .and(body_json(json!({"description": "main"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/me/paymentMean/creditCard/3/chooseAsDefaultPaymentMean"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/me/paymentMean/creditCard/3/challenge"))
            .and(body_json(json!({"challenge": "1234"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/me/paymentMean/creditCard/3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let resource = backend(&server).payment_mean(PaymentMeanType::CreditCard);
        let created = resource.create(params(json!({"setDefault": true}))).await.unwrap();
        assert_eq!(created["url"], "https://pay");
        assert_eq!(
            resource.edit(3, params(json!({"description": "main"}))).await.unwrap(),
            Value::Null
        );
        resource.choose_as_default(3).await.unwrap();
        resource.challenge(3, params(json!({"challenge": "1234"}))).await.unwrap();
        resource.delete(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_body_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/paymentMean/paypal/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "class": "Client::NotFound",
                "message": "The requested object (id = 9) does not exist"
            })))
            .mount(&server)
            .await;

        let err = backend(&server)
            .payment_mean(PaymentMeanType::Paypal)
            .get(9)
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.payload().text(), "The requested object (id = 9) does not exist");
        assert_eq!(
            serde_json::to_value(err.payload()).unwrap(),
            json!({
                "status": 404,
                "data": {
                    "class": "Client::NotFound",
                    "message": "The requested object (id = 9) does not exist"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_plain_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/availableAutomaticPaymentMeans"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = backend(&server).available_means().available().await.unwrap_err();
        assert_eq!(err, BackendError::message(503, "maintenance"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let backend = HttpBackend::try_from("http://127.0.0.1:9/1.0").unwrap();
        let err = backend
            .payment_mean(PaymentMeanType::Paypal)
            .query(None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), STATUS_TRANSPORT);
    }

    #[tokio::test]
    async fn test_headers_and_auth_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.0/me/paymentMean/paypal"))
            .and(header("x-ovh-application", "app"))
            .and(header("authorization", "Bearer t0k3n"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-ovh-application", http::HeaderValue::from_static("app"));
        let backend = HttpBackend::try_from(format!("{}/1.0", server.uri()))
            .unwrap()
            .with_headers(headers)
            .with_timeout(Duration::from_secs(5))
            .with_auth(StaticAuthProvider::bearer("t0k3n").unwrap());

        let ids = backend.payment_mean(PaymentMeanType::Paypal).query(None).await.unwrap();
        assert!(ids.is_empty());
        assert_eq!(backend.timeout(), Some(Duration::from_secs(5)));
    }
}
