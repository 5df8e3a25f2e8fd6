//! Markets, payment mean types and the market configuration table.
//!
//! The billing backend exposes one sub-resource per payment mean type
//! (`/me/paymentMean/bankAccount`, `/me/paymentMean/creditCard`, ...). Which
//! of those types exist, and which may be newly registered, depends on the
//! market the adapter is configured for.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Backend payment mean type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMeanType {
    /// SEPA bank account (direct debit).
    BankAccount,
    /// PayPal agreement.
    Paypal,
    /// Credit card.
    CreditCard,
    /// Deferred payment account. Informational only, never registerable.
    DeferredPaymentAccount,
}

impl PaymentMeanType {
    /// All known types, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::BankAccount,
        Self::Paypal,
        Self::CreditCard,
        Self::DeferredPaymentAccount,
    ];

    /// Returns the backend identifier (e.g. `"bankAccount"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankAccount => "bankAccount",
            Self::Paypal => "paypal",
            Self::CreditCard => "creditCard",
            Self::DeferredPaymentAccount => "deferredPaymentAccount",
        }
    }

    /// Returns the sub-resource name in capitalized-word form (e.g. `"BankAccount"`).
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::BankAccount => "BankAccount",
            Self::Paypal => "Paypal",
            Self::CreditCard => "CreditCard",
            Self::DeferredPaymentAccount => "DeferredPaymentAccount",
        }
    }
}

impl fmt::Display for PaymentMeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PaymentMeanType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PaymentMeanType {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownPaymentMeanType(s.to_owned()))
    }
}

/// World part the adapter is configured for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Market {
    /// Europe. Payment means API.
    #[default]
    #[serde(rename = "EU")]
    Eu,
    /// Canada. Payment means API.
    #[serde(rename = "CA")]
    Ca,
    /// United States. Legacy payment method API, decommissioned server-side.
    #[serde(rename = "US")]
    Us,
}

impl Market {
    /// Returns the market code (e.g. `"EU"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eu => "EU",
            Self::Ca => "CA",
            Self::Us => "US",
        }
    }

    /// Returns `true` if this market is served by the payment means API.
    #[must_use]
    pub const fn uses_payment_means(self) -> bool {
        !matches!(self, Self::Us)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Market {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EU" => Ok(Self::Eu),
            "CA" => Ok(Self::Ca),
            "US" => Ok(Self::Us),
            _ => Err(ProtoError::UnknownMarket(s.to_owned())),
        }
    }
}

/// One configured payment mean type of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEntry {
    /// Backend type identifier.
    pub value: PaymentMeanType,
    /// Whether new payment means of this type may be registered.
    pub registerable: bool,
}

impl MarketEntry {
    /// Creates a new entry.
    #[must_use]
    pub const fn new(value: PaymentMeanType, registerable: bool) -> Self {
        Self {
            value,
            registerable,
        }
    }
}

/// Static mapping from market to its ordered list of payment mean types.
///
/// Entry order is the enumeration order of aggregate listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketTable(BTreeMap<Market, Vec<MarketEntry>>);

impl Default for MarketTable {
    fn default() -> Self {
        use PaymentMeanType::{BankAccount, CreditCard, DeferredPaymentAccount, Paypal};

        let mut table = BTreeMap::new();
        table.insert(
            Market::Eu,
            vec![
                MarketEntry::new(BankAccount, true),
                MarketEntry::new(Paypal, true),
                MarketEntry::new(CreditCard, true),
                MarketEntry::new(DeferredPaymentAccount, false),
            ],
        );
        table.insert(
            Market::Ca,
            vec![
                MarketEntry::new(Paypal, true),
                MarketEntry::new(CreditCard, true),
                MarketEntry::new(DeferredPaymentAccount, false),
            ],
        );
        table.insert(
            Market::Us,
            vec![
                MarketEntry::new(CreditCard, true),
                MarketEntry::new(DeferredPaymentAccount, false),
            ],
        );
        Self(table)
    }
}

impl MarketTable {
    /// Builds a table from explicit entries, rejecting duplicated types.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::DuplicateEntry`] if a market lists the same type twice.
    pub fn try_from_entries(
        entries: impl IntoIterator<Item = (Market, Vec<MarketEntry>)>,
    ) -> Result<Self, ProtoError> {
        let table = Self(entries.into_iter().collect());
        table.validate()?;
        Ok(table)
    }

    /// Checks that no market lists the same type twice.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::DuplicateEntry`] for the first duplicate found.
    pub fn validate(&self) -> Result<(), ProtoError> {
        for (market, entries) in &self.0 {
            let mut seen = HashSet::new();
            for entry in entries {
                if !seen.insert(entry.value) {
                    return Err(ProtoError::DuplicateEntry {
                        market: *market,
                        value: entry.value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the configured entries of a market, empty if not configured.
    #[must_use]
    pub fn entries(&self, market: Market) -> &[MarketEntry] {
        self.0.get(&market).map_or(&[], Vec::as_slice)
    }

    /// Returns the configured entry of a type within a market.
    #[must_use]
    pub fn entry(&self, market: Market, value: PaymentMeanType) -> Option<&MarketEntry> {
        self.entries(market).iter().find(|e| e.value == value)
    }
}
