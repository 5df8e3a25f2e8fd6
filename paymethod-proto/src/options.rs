//! Options for payment mean listings.

use serde::{Deserialize, Serialize};

/// Options accepted by the listing operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchOptions {
    /// Only list valid bank accounts. Ignored for other types.
    pub only_valid: bool,
    /// Normalize backend records into unified payment methods.
    pub transform: bool,
}

impl FetchOptions {
    /// Returns options that normalize the listed records.
    #[must_use]
    pub const fn transformed() -> Self {
        Self {
            only_valid: false,
            transform: true,
        }
    }

    /// Sets the `only_valid` flag.
    #[must_use]
    pub const fn with_only_valid(mut self, only_valid: bool) -> Self {
        self.only_valid = only_valid;
        self
    }

    /// Sets the `transform` flag.
    #[must_use]
    pub const fn with_transform(mut self, transform: bool) -> Self {
        self.transform = transform;
        self
    }
}
