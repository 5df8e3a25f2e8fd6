//! CLI configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! target = "CA"
//! timeout_secs = 30
//!
//! [headers]
//! X-Ovh-Application = "$OVH_APPLICATION_KEY"
//! X-Ovh-Consumer = "${OVH_CONSUMER_KEY}"
//!
//! [translations]
//! ovh_payment_type_paypal = "PayPal"
//! ovh_payment_type_credit_card = "Credit card"
//!
//! [markets]
//! CA = [
//!     { value = "paypal", registerable = true },
//!     { value = "creditCard", registerable = true },
//! ]
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `paymethod.toml`)
//! - `TARGET` - Override the market
//! - `ENDPOINT` - Override the API endpoint
//! - Credentials referenced by `$VAR` in the config file

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use paymethod::{CatalogTranslator, Market, MarketTable};
use paymethod_http::constants::default_endpoint;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "paymethod.toml";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Market the adapter is configured for (default: `EU`).
    #[serde(default)]
    pub target: Market,

    /// API endpoint; the default endpoint of `target` when unset.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Headers sent with every request (application and consumer credentials).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Translation catalog for display texts.
    #[serde(default)]
    pub translations: HashMap<String, String>,

    /// Replacement for the built-in market table.
    #[serde(default)]
    pub markets: Option<MarketTable>,
}

impl CliConfig {
    /// Loads configuration from a file path, expanding variables from the
    /// process environment. `TARGET` and `ENDPOINT` override the file values.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = if path.exists() {
            std::fs::read_to_string(path)?
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            String::new()
        };

        Self::parse(&content, |name| std::env::var(name).ok())
    }

    /// Parses configuration, resolving variables and overrides with `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid configuration or if the
    /// `TARGET` override is not a market code.
    pub fn parse<F>(content: &str, env: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_env_vars(content, &env);
        let mut config: Self = toml::from_str(&expanded)?;

        if let Some(target) = env("TARGET") {
            config.target = target.parse()?;
        }
        if let Some(endpoint) = env("ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        Ok(config)
    }

    /// Returns the endpoint to call.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| default_endpoint(self.target))
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Builds the header map sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if a header name or value is invalid.
    pub fn header_map(&self) -> Result<HeaderMap, CliError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            headers.insert(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }
        Ok(headers)
    }

    /// Builds the translator from the configured catalog.
    #[must_use]
    pub fn translator(&self) -> CatalogTranslator {
        CatalogTranslator::new(self.translations.clone())
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string using `env`.
///
/// Unresolved variables are left as-is.
fn expand_env_vars<F>(input: &str, env: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        if braced && !closed {
            result.push_str("${");
            result.push_str(&var_name);
        } else if var_name.is_empty() {
            result.push('$');
            if braced {
                result.push_str("{}");
            }
        } else if let Some(val) = env(&var_name) {
            result.push_str(&val);
        } else if braced {
            result.push_str("${");
            result.push_str(&var_name);
            result.push('}');
        } else {
            result.push('$');
            result.push_str(&var_name);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use paymethod::PaymentMeanType;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_expand_env_vars() {
        let env = env(&[("APP", "a1"), ("CK", "c2")]);
        assert_eq!(expand_env_vars("key = \"$APP\"", &env), "key = \"a1\"");
        assert_eq!(expand_env_vars("${CK}-x", &env), "c2-x");
        assert_eq!(expand_env_vars("$MISSING and ${GONE}", &env), "$MISSING and ${GONE}");
        assert_eq!(expand_env_vars("cost: 5$", &env), "cost: 5$");
    }

    #[test]
    fn test_expand_env_vars_keeps_unterminated_brace() {
        let env = env(&[("APP", "a1")]);
        assert_eq!(expand_env_vars("x = \"${APP", &env), "x = \"${APP");
        assert_eq!(expand_env_vars("${", &env), "${");
        assert_eq!(expand_env_vars("${}", &env), "${}");
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse("", env(&[])).unwrap();
        assert_eq!(config.target, Market::Eu);
        assert_eq!(config.endpoint(), "https://eu.api.ovh.com/1.0/");
        assert!(config.timeout().is_none());
        assert!(config.markets.is_none());
        assert!(config.header_map().unwrap().is_empty());
    }

    #[test]
    fn test_full_file() {
        let content = r#"
            target = "CA"
            timeout_secs = 12

            [headers]
            X-Ovh-Application = "$APP_KEY"

            [translations]
            ovh_payment_type_paypal = "PayPal"

            [markets]
            CA = [{ value = "paypal", registerable = false }]
        "#;
        let config = CliConfig::parse(content, env(&[("APP_KEY", "secret")])).unwrap();

        assert_eq!(config.target, Market::Ca);
        assert_eq!(config.endpoint(), "https://ca.api.ovh.com/1.0/");
        assert_eq!(config.timeout(), Some(Duration::from_secs(12)));
        assert_eq!(config.header_map().unwrap()["x-ovh-application"], "secret");
        assert_eq!(config.translator().len(), 1);

        let markets = config.markets.unwrap();
        let entry = markets.entry(Market::Ca, PaymentMeanType::Paypal).unwrap();
        assert!(!entry.registerable);
    }

    #[test]
    fn test_env_overrides() {
        let config = CliConfig::parse(
            "target = \"EU\"\nendpoint = \"https://eu.example/1.0/\"",
            env(&[("TARGET", "us"), ("ENDPOINT", "http://localhost:8080/1.0/")]),
        )
        .unwrap();
        assert_eq!(config.target, Market::Us);
        assert_eq!(config.endpoint(), "http://localhost:8080/1.0/");
    }

    #[test]
    fn test_invalid_target_override() {
        let err = CliConfig::parse("", env(&[("TARGET", "APAC")])).unwrap_err();
        assert!(matches!(err, CliError::Market(_)));
    }

    #[test]
    fn test_invalid_header() {
        let config = CliConfig::parse("[headers]\n\"bad header\" = \"x\"", env(&[])).unwrap();
        assert!(matches!(config.header_map(), Err(CliError::HeaderName(_))));
    }
}
