//! Mapping of backend records into unified records.
//!
//! Pure functions over borrowed records: nothing here performs I/O or
//! mutates its input. Field access never fails; a missing or mistyped
//! field reads as `None` (or `false` for flags).

use std::sync::Arc;

use heck::{ToShoutySnakeCase, ToSnakeCase};
use paymethod_proto::{
    DisplayValue, Icon, MarketEntry, PaymentMeanId, PaymentMethod, PaymentMethodType, RawRecord,
};
use serde_json::{Value, json};

use crate::i18n::Translate;

/// Prefix of payment type translation keys.
pub const PAYMENT_TYPE_KEY_PREFIX: &str = "ovh_payment_type_";

/// Prefix of payment status translation keys.
pub const PAYMENT_STATUS_KEY_PREFIX: &str = "ovh_payment_status_";

/// Fixed key for bank accounts waiting for their supporting documents.
pub const WAITING_FOR_DOCUMENTS_KEY: &str = "ovh_payment_status_waiting_for_documents";

/// Returns the upper-snake-case form of an identifier (`creditCard` → `CREDIT_CARD`).
#[must_use]
pub fn upper_snake(value: &str) -> String {
    value.to_shouty_snake_case()
}

/// Returns the snake-case form of an identifier (`creditCard` → `credit_card`).
#[must_use]
pub fn snake(value: &str) -> String {
    value.to_snake_case()
}

/// Reads a scalar field as a string.
pub(crate) fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a boolean flag, `false` when absent.
pub(crate) fn flag_field(record: &Value, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Reads a numeric identifier, accepting numeric strings.
pub(crate) fn id_field(record: &Value, key: &str) -> Option<PaymentMeanId> {
    match record.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Builds unified records from backend records.
#[derive(Clone)]
pub struct Normalizer {
    translator: Arc<dyn Translate>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Normalizer {
    /// Creates a normalizer using the given translator.
    #[must_use]
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self { translator }
    }

    /// Normalizes a backend type identifier.
    #[must_use]
    pub fn to_payment_type(&self, payment_type: Option<&str>) -> DisplayValue {
        let snake = payment_type.map(snake).unwrap_or_default();
        DisplayValue {
            value: snake.to_uppercase(),
            text: self
                .translator
                .translate(&format!("{PAYMENT_TYPE_KEY_PREFIX}{snake}")),
        }
    }

    /// Normalizes a backend state.
    ///
    /// Bank accounts pending validation are waiting for documents from the
    /// customer and get a dedicated text.
    #[must_use]
    pub fn to_payment_status(&self, status: Option<&str>, payment_type: Option<&str>) -> DisplayValue {
        let snake = status.map(snake).unwrap_or_default();
        let key = if payment_type == Some("bankAccount") && status == Some("pendingValidation") {
            WAITING_FOR_DOCUMENTS_KEY.to_owned()
        } else {
            format!("{PAYMENT_STATUS_KEY_PREFIX}{snake}")
        };
        DisplayValue {
            value: snake.to_uppercase(),
            text: self.translator.translate(&key),
        }
    }

    /// Builds a unified record from a payment mean tagged with its `paymentType`.
    #[must_use]
    pub fn mean_to_method(&self, mean: &RawRecord) -> PaymentMethod {
        let payment_type = string_field(mean, "paymentType");
        let status = string_field(mean, "state");

        let label_key = match payment_type.as_deref() {
            Some("paypal") => "email",
            Some("creditCard") => "number",
            Some("bankAccount") => "iban",
            _ => "label",
        };

        PaymentMethod {
            payment_sub_type: string_field(mean, "type"),
            icon: Icon::default(),
            status: self.to_payment_status(status.as_deref(), payment_type.as_deref()),
            payment_method_id: id_field(mean, "id"),
            is_default: flag_field(mean, "defaultPaymentMean"),
            description: string_field(mean, "description"),
            payment_type: self.to_payment_type(payment_type.as_deref()),
            billing_contact_id: None,
            creation_date: string_field(mean, "creationDate"),
            last_update: None,
            label: string_field(mean, label_key),
            expiration_date: string_field(mean, "expirationDate"),
            original: mean.clone(),
        }
    }

    /// Builds a unified record from a legacy US payment method.
    #[must_use]
    pub fn us_method_to_method(&self, method: &RawRecord) -> PaymentMethod {
        let payment_type = string_field(method, "paymentType");
        let status = string_field(method, "status");

        PaymentMethod {
            payment_sub_type: string_field(method, "paymentSubType"),
            icon: Icon::default(),
            status: self.to_payment_status(status.as_deref(), payment_type.as_deref()),
            payment_method_id: id_field(method, "id"),
            is_default: flag_field(method, "default"),
            description: string_field(method, "description"),
            payment_type: self.to_payment_type(payment_type.as_deref()),
            billing_contact_id: method
                .get("billingContactId")
                .filter(|v| !v.is_null())
                .cloned(),
            creation_date: string_field(method, "creationDate"),
            last_update: None,
            label: string_field(method, "publicLabel"),
            expiration_date: None,
            original: method.clone(),
        }
    }

    /// Builds a unified type descriptor from a market configuration entry.
    #[must_use]
    pub fn type_to_payment_method_type(&self, entry: &MarketEntry) -> PaymentMethodType {
        PaymentMethodType {
            oneshot: true,
            icon: Icon::default(),
            registerable: entry.registerable,
            payment_type: self.to_payment_type(Some(entry.value.as_str())),
            original: json!({
                "value": entry.value.as_str(),
                "registerable": entry.registerable,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::KeyTranslator;
    use paymethod_proto::PaymentMeanType;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(KeyTranslator))
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(upper_snake("creditCard"), "CREDIT_CARD");
        assert_eq!(upper_snake("deferredPaymentAccount"), "DEFERRED_PAYMENT_ACCOUNT");
        assert_eq!(snake("pendingValidation"), "pending_validation");
        assert_eq!(snake("VALID"), "valid");
    }

    #[test]
    fn test_to_payment_type() {
        let value = normalizer().to_payment_type(Some("bankAccount"));
        assert_eq!(value.value, "BANK_ACCOUNT");
        assert_eq!(value.text, "ovh_payment_type_bank_account");
    }

    #[test]
    fn test_pending_bank_account_waits_for_documents() {
        let status = normalizer().to_payment_status(Some("pendingValidation"), Some("bankAccount"));
        assert_eq!(status.value, "PENDING_VALIDATION");
        assert_eq!(status.text, WAITING_FOR_DOCUMENTS_KEY);
    }

    #[test]
    fn test_pending_credit_card_uses_generic_key() {
        let status = normalizer().to_payment_status(Some("pendingValidation"), Some("creditCard"));
        assert_eq!(status.value, "PENDING_VALIDATION");
        assert_eq!(status.text, "ovh_payment_status_pending_validation");
    }

    #[test]
    fn test_missing_status_does_not_fail() {
        let status = normalizer().to_payment_status(None, None);
        assert_eq!(status.value, "");
        assert_eq!(status.text, "ovh_payment_status_");
    }

    #[test]
    fn test_mean_to_method_labels() {
        let n = normalizer();
        let paypal = json!({"id": 1, "paymentType": "paypal", "email": "a@b.c", "state": "valid"});
        let card = json!({"id": 2, "paymentType": "creditCard", "number": "XXXX1234"});
        let bank = json!({"id": 3, "paymentType": "bankAccount", "iban": "FR76..."});
        let deferred = json!({"id": 4, "paymentType": "deferredPaymentAccount", "label": "DPA"});
        let deferred_unlabeled = json!({"id": 5, "paymentType": "deferredPaymentAccount"});

        assert_eq!(n.mean_to_method(&paypal).label.as_deref(), Some("a@b.c"));
        assert_eq!(n.mean_to_method(&card).label.as_deref(), Some("XXXX1234"));
        assert_eq!(n.mean_to_method(&bank).label.as_deref(), Some("FR76..."));
        assert_eq!(n.mean_to_method(&deferred).label.as_deref(), Some("DPA"));
        assert_eq!(n.mean_to_method(&deferred_unlabeled).label, None);
    }

    #[test]
    fn test_mean_to_method_fields() {
        let mean = json!({
            "id": 12,
            "paymentType": "creditCard",
            "state": "tooManyFailures",
            "type": "VISA",
            "defaultPaymentMean": true,
            "description": "work card",
            "creationDate": "2019-01-01",
            "expirationDate": "2023-12-31",
            "number": "XXXX4242",
        });
        let method = normalizer().mean_to_method(&mean);
        assert_eq!(method.payment_method_id, Some(12));
        assert_eq!(method.payment_sub_type.as_deref(), Some("VISA"));
        assert_eq!(method.status.value, "TOO_MANY_FAILURES");
        assert_eq!(method.payment_type.value, "CREDIT_CARD");
        assert!(method.is_default);
        assert_eq!(method.billing_contact_id, None);
        assert_eq!(method.last_update, None);
        assert_eq!(method.expiration_date.as_deref(), Some("2023-12-31"));
        assert_eq!(method.original, mean);
    }

    #[test]
    fn test_mean_to_method_defaults() {
        let method = normalizer().mean_to_method(&json!({}));
        assert!(!method.is_default);
        assert_eq!(method.payment_method_id, None);
        assert_eq!(method.description, None);
        assert_eq!(method.payment_type.value, "");
    }

    #[test]
    fn test_us_method_to_method() {
        let raw = json!({
            "id": 99,
            "paymentType": "CREDIT_CARD",
            "paymentSubType": "AMERICAN_EXPRESS",
            "status": "VALID",
            "default": true,
            "billingContactId": 7,
            "publicLabel": "XXXX0005",
            "creationDate": "2020-02-02",
            "lastUpdate": "2021-01-01",
        });
        let method = normalizer().us_method_to_method(&raw);
        assert_eq!(method.payment_type.value, "CREDIT_CARD");
        assert_eq!(method.payment_type.text, "ovh_payment_type_credit_card");
        assert_eq!(method.status.value, "VALID");
        assert_eq!(method.billing_contact_id, Some(json!(7)));
        assert_eq!(method.label.as_deref(), Some("XXXX0005"));
        assert!(method.is_default);
        assert_eq!(method.last_update, None);
        assert_eq!(method.expiration_date, None);
        assert_eq!(method.original, raw);
    }

    #[test]
    fn test_us_method_keeps_billing_contact_as_sent() {
        let method = normalizer()
            .us_method_to_method(&json!({"id": 1, "billingContactId": "contact-42"}));
        assert_eq!(method.billing_contact_id, Some(json!("contact-42")));
    }

    #[test]
    fn test_us_method_defaults() {
        let method = normalizer().us_method_to_method(&json!({"id": 1}));
        assert!(!method.is_default);
        assert_eq!(method.billing_contact_id, None);
        assert_eq!(method.creation_date, None);
        assert_eq!(method.description, None);
    }

    #[test]
    fn test_type_to_payment_method_type() {
        let entry = MarketEntry::new(PaymentMeanType::DeferredPaymentAccount, false);
        let ty = normalizer().type_to_payment_method_type(&entry);
        assert!(ty.oneshot);
        assert!(!ty.registerable);
        assert_eq!(ty.payment_type.value, "DEFERRED_PAYMENT_ACCOUNT");
        assert_eq!(
            ty.original,
            json!({"value": "deferredPaymentAccount", "registerable": false})
        );
    }
}
