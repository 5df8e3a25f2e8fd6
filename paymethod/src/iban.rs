//! IBAN and BIC structural checks for bank account registration.
//!
//! Callers run these before `add_payment_method(BankAccount, ...)` to reject
//! obviously malformed input early; the backend remains the authority.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Modulus of the ISO 13616 checksum.
pub const IBAN_VALIDATION_MODULO: u32 = 97;

/// Display grouping of IBANs for countries with a fixed layout.
pub const IBAN_FORMAT: &[(&str, &[usize])] = &[
    ("FR", &[4, 4, 4, 4, 4, 4, 3]),
    ("DE", &[4, 4, 4, 4, 4, 2]),
    ("MC", &[4, 4, 4, 4, 4, 4, 3]),
];

/// BBAN pattern per country code.
const COUNTRY_BBAN_PATTERNS: &[(&str, &str)] = &[
    ("AT", r"\d{16}"),
    ("BE", r"\d{12}"),
    ("BG", r"\w{4}\d{6}[0-9A-Z]{8}"),
    ("CH", r"\d{5}[0-9A-Z]{12}"),
    ("CY", r"\d{8}[0-9A-Z]{16}"),
    ("CZ", r"\d{20}"),
    ("DE", r"\d{18}"),
    ("DK", r"\d{14}"),
    ("EE", r"\d{16}"),
    ("ES", r"\d{20}"),
    ("FI", r"\d{14}"),
    ("FR", r"\d{10}\w{11}\d{2}"),
    ("GB", r"\w{4}\d{14}"),
    ("GR", r"\d{7}[0-9A-Z]{16}"),
    ("HU", r"\d{24}"),
    ("IE", r"\w{4}\d{14}"),
    ("IS", r"\d{22}"),
    ("IT", r"\w{1}\d{10}[0-9A-Z]{12}"),
    ("LI", r"\d{5}[0-9A-Z]{12}"),
    ("LT", r"\d{16}"),
    ("LU", r"\d{3}[0-9A-Z]{13}"),
    ("LV", r"\w{4}[0-9A-Z]{13}"),
    ("MC", r"\d{10}[0-9A-Z]{11}\d{2}"),
    ("MT", r"\w{4}\d{5}[0-9A-Z]{18}"),
    ("NL", r"\w{4}\d{10}"),
    ("NO", r"\d{9}"),
    ("PL", r"\d{8}[0-9A-Z]{16}"),
    ("PT", r"\d{21}"),
    ("RO", r"\w{4}[0-9A-Z]{16}"),
    ("SE", r"\d{20}"),
    ("SI", r"\d{15}"),
    ("SK", r"\d{20}"),
    ("UK", r"\w{4}\d{14}"),
];

static IBAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2})([0-9]{2})(.*)$").expect("valid IBAN regex"));

static BIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^([A-Z]{4})([A-Z]{2})(\w{2})(\w{3})?$").expect("valid BIC regex")
});

static BBAN_REGEXES: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    COUNTRY_BBAN_PATTERNS
        .iter()
        .map(|(country, pattern)| {
            let anchored = format!("(?-u)^{pattern}$");
            (*country, Regex::new(&anchored).expect("valid BBAN regex"))
        })
        .collect()
});

/// Reasons an IBAN or BIC is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IbanError {
    /// Not a country code followed by two check digits.
    #[error("malformed IBAN")]
    Malformed,
    /// No BBAN pattern is known for the country.
    #[error("unsupported IBAN country: {0}")]
    UnsupportedCountry(String),
    /// The BBAN does not match the country pattern.
    #[error("invalid BBAN for country {0}")]
    InvalidBban(String),
    /// The mod-97 checksum does not hold.
    #[error("invalid IBAN checksum")]
    Checksum,
    /// The BIC does not match the SWIFT layout.
    #[error("malformed BIC")]
    MalformedBic,
}

/// A structurally valid IBAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iban {
    value: String,
}

impl Iban {
    /// Validates an IBAN. Spaces are ignored and letters upper-cased.
    ///
    /// # Errors
    ///
    /// Returns the first structural check that fails.
    pub fn parse(input: &str) -> Result<Self, IbanError> {
        let value = normalize(input);
        let captures = IBAN_REGEX.captures(&value).ok_or(IbanError::Malformed)?;
        let country = &captures[1];
        let bban = &captures[3];

        let pattern = BBAN_REGEXES
            .get(country)
            .ok_or_else(|| IbanError::UnsupportedCountry(country.to_owned()))?;
        if !pattern.is_match(bban) {
            return Err(IbanError::InvalidBban(country.to_owned()));
        }
        if checksum(&value) != Some(1) {
            return Err(IbanError::Checksum);
        }

        Ok(Self { value })
    }

    /// Returns the IBAN without spaces.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.value[..2]
    }

    /// Returns the IBAN grouped for display, using the country layout when
    /// one is known and groups of four otherwise.
    #[must_use]
    pub fn formatted(&self) -> String {
        let groups: Vec<usize> = IBAN_FORMAT
            .iter()
            .find(|(country, _)| *country == self.country())
            .map_or_else(Vec::new, |(_, groups)| groups.to_vec());

        let mut parts = Vec::new();
        let mut rest = self.value.as_str();
        for size in groups {
            if rest.is_empty() {
                break;
            }
            let (head, tail) = rest.split_at(size.min(rest.len()));
            parts.push(head);
            rest = tail;
        }
        while !rest.is_empty() {
            let (head, tail) = rest.split_at(4.min(rest.len()));
            parts.push(head);
            rest = tail;
        }
        parts.join(" ")
    }
}

impl std::fmt::Display for Iban {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// A structurally valid BIC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bic {
    value: String,
}

impl Bic {
    /// Validates a BIC. Spaces are ignored and letters upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`IbanError::MalformedBic`] if the layout does not match.
    pub fn parse(input: &str) -> Result<Self, IbanError> {
        let value = normalize(input);
        if BIC_REGEX.is_match(&value) {
            Ok(Self { value })
        } else {
            Err(IbanError::MalformedBic)
        }
    }

    /// Returns the BIC.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the bank code.
    #[must_use]
    pub fn bank(&self) -> &str {
        &self.value[..4]
    }

    /// Returns the country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.value[4..6]
    }

    /// Returns the branch code, if present.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.value.get(8..11)
    }
}

fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// ISO 13616 remainder: the first four characters move to the end and
/// letters count as two digits (A = 10 ... Z = 35).
fn checksum(iban: &str) -> Option<u32> {
    let (head, tail) = iban.split_at(4.min(iban.len()));
    tail.chars().chain(head.chars()).try_fold(0u32, |acc, c| {
        let digit = c.to_digit(36)?;
        let acc = if digit < 10 {
            acc * 10 + digit
        } else {
            acc * 100 + digit
        };
        Some(acc % IBAN_VALIDATION_MODULO)
    })
}
