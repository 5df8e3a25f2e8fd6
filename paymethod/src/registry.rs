//! Payment mean resource registry.
//!
//! [`ResourceRegistry`] maps each payment mean type configured for a market
//! to its remote accessor. It is built once, when the service is
//! constructed, so operations never derive a resource from a type name at
//! call time.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use paymethod_proto::{MarketEntry, PaymentMeanType};

use crate::backend::{PaymentMeanBackend, PaymentMeanResource};
use crate::error::PaymentMethodError;

/// Registry of payment mean accessors, keyed by type.
#[derive(Default, Clone)]
pub struct ResourceRegistry(HashMap<PaymentMeanType, Arc<dyn PaymentMeanResource>>);

impl Debug for ResourceRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.0.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_tuple("ResourceRegistry").field(&kinds).finish()
    }
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builds a registry holding one accessor per configured entry.
    #[must_use]
    pub fn from_entries(entries: &[MarketEntry], backend: &dyn PaymentMeanBackend) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry.value, backend.payment_mean(entry.value));
        }
        registry
    }

    /// Registers an accessor, replacing any previous one for the same type.
    pub fn register(&mut self, kind: PaymentMeanType, resource: Arc<dyn PaymentMeanResource>) {
        self.0.insert(kind, resource);
    }

    /// Returns the accessor of a type.
    #[must_use]
    pub fn get(&self, kind: PaymentMeanType) -> Option<&dyn PaymentMeanResource> {
        self.0.get(&kind).map(|r| &**r)
    }

    /// Returns the accessor of a type, failing when the type is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentMethodError::UnknownPaymentType`] if no accessor is registered.
    pub fn require(&self, kind: PaymentMeanType) -> Result<&dyn PaymentMeanResource, PaymentMethodError> {
        self.get(kind)
            .ok_or_else(|| PaymentMethodError::UnknownPaymentType(kind.as_str().to_owned()))
    }

    /// Returns the number of registered accessors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no accessor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeBackend;

    #[test]
    fn test_from_entries_registers_configured_types_only() {
        let backend = FakeBackend::new();
        let entries = [
            MarketEntry::new(PaymentMeanType::Paypal, true),
            MarketEntry::new(PaymentMeanType::CreditCard, false),
        ];
        let registry = ResourceRegistry::from_entries(&entries, &backend);

        assert_eq!(registry.len(), 2);
        assert!(registry.get(PaymentMeanType::Paypal).is_some());
        assert!(registry.get(PaymentMeanType::BankAccount).is_none());
        assert_eq!(
            registry.require(PaymentMeanType::BankAccount).err(),
            Some(PaymentMethodError::UnknownPaymentType("bankAccount".into()))
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ResourceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(format!("{registry:?}"), "ResourceRegistry([])");
    }
}
