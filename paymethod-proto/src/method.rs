//! Unified payment method records.
//!
//! These are the shapes handed to client applications regardless of which
//! backend protocol produced them. Each record keeps the untransformed
//! backend record under `original`.

use serde::{Deserialize, Serialize};

use crate::{PaymentMeanId, RawRecord};

/// A machine value paired with its translated, human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValue {
    /// Upper-snake-case machine value (e.g. `"CREDIT_CARD"`).
    pub value: String,
    /// Translated text.
    pub text: String,
}

/// Icon descriptor. The legacy APIs never provide one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Icon name.
    pub name: Option<String>,
    /// Icon data (e.g. a base64 image).
    pub data: Option<String>,
}

/// Unified payment instrument.
///
/// `payment_method_id` and `payment_type.value` together identify the
/// instrument within a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Backend sub type (e.g. the card network).
    pub payment_sub_type: Option<String>,
    /// Icon descriptor.
    pub icon: Icon,
    /// Normalized status.
    pub status: DisplayValue,
    /// Backend identifier of the instrument.
    pub payment_method_id: Option<PaymentMeanId>,
    /// Whether this is the default payment method of the account.
    #[serde(rename = "default")]
    pub is_default: bool,
    /// Free-form description.
    pub description: Option<String>,
    /// Normalized payment type.
    pub payment_type: DisplayValue,
    /// Billing contact, as sent by the legacy API. Not modelled by the
    /// payment means API.
    pub billing_contact_id: Option<serde_json::Value>,
    /// Creation date as sent by the backend.
    pub creation_date: Option<String>,
    /// Last update date. Never tracked by the legacy APIs.
    pub last_update: Option<String>,
    /// Human-readable label (IBAN, masked card number, e-mail...).
    pub label: Option<String>,
    /// Expiration date, only produced from payment means.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// The backend record this method was built from, verbatim.
    pub original: RawRecord,
}

/// Unified capability descriptor of a payment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodType {
    /// Whether the type can be used for a one-shot payment.
    pub oneshot: bool,
    /// Icon descriptor.
    pub icon: Icon,
    /// Whether new instruments of this type may be registered.
    pub registerable: bool,
    /// Normalized payment type.
    pub payment_type: DisplayValue,
    /// The market configuration entry this type was built from.
    pub original: RawRecord,
}

/// One element of a payment mean listing.
///
/// Listings return raw backend records unless normalization was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListedPaymentMean {
    /// Raw backend record, tagged with its `paymentType`.
    Raw(RawRecord),
    /// Normalized record.
    Method(Box<PaymentMethod>),
}

impl ListedPaymentMean {
    /// Returns the backend record, whichever form this element has.
    #[must_use]
    pub fn original(&self) -> &RawRecord {
        match self {
            Self::Raw(raw) => raw,
            Self::Method(method) => &method.original,
        }
    }

    /// Returns the normalized record, if any.
    #[must_use]
    pub fn as_method(&self) -> Option<&PaymentMethod> {
        match self {
            Self::Raw(_) => None,
            Self::Method(method) => Some(method),
        }
    }

    /// Consumes the element and returns the normalized record, if any.
    #[must_use]
    pub fn into_method(self) -> Option<PaymentMethod> {
        match self {
            Self::Raw(_) => None,
            Self::Method(method) => Some(*method),
        }
    }
}
