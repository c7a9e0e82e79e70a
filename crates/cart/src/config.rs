//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MARKETHUB_DATA_DIR` - Directory for file-backed cart snapshots (default: .markethub)
//! - `MARKETHUB_CART_KEY` - Snapshot slot name (default: marketplace-carts)
//! - `MARKETHUB_MESSAGING_BASE_URL` - Deep link base (default: <https://wa.me>)
//! - `MARKETHUB_CURRENCY` - ISO 4217 code; prefixes amounts with its symbol
//! - `MARKETHUB_DEFAULT_COUNTRY_CODE` - Calling code for national-format seller numbers (e.g. +91)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use markethub_core::CurrencyCode;

use crate::checkout::DEFAULT_BASE_URL;
use crate::persistence::{DEFAULT_SLOT_KEY, is_valid_slot_key};

const DEFAULT_DATA_DIR: &str = ".markethub";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding file-backed snapshots
    pub data_dir: PathBuf,
    /// Slot key the snapshot is stored under
    pub cart_key: String,
    /// Messaging deep link base URL
    pub messaging_base_url: Url,
    /// Currency used when formatting amounts, if any
    pub currency: Option<CurrencyCode>,
    /// Calling code applied to national-format seller numbers
    pub default_country_code: Option<String>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("MARKETHUB_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let cart_key = get("MARKETHUB_CART_KEY").unwrap_or_else(|| DEFAULT_SLOT_KEY.to_owned());
        if !is_valid_slot_key(&cart_key) {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETHUB_CART_KEY".to_string(),
                format!("'{cart_key}' must be letters, digits, '-', '_' or '.' and not start with '.'"),
            ));
        }

        let base_url = get("MARKETHUB_MESSAGING_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let messaging_base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MARKETHUB_MESSAGING_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(messaging_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "MARKETHUB_MESSAGING_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", messaging_base_url.scheme()),
            ));
        }

        let currency = get("MARKETHUB_CURRENCY")
            .map(|v| v.parse::<CurrencyCode>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("MARKETHUB_CURRENCY".to_string(), e))?;

        let default_country_code = get("MARKETHUB_DEFAULT_COUNTRY_CODE")
            .map(|v| validate_country_code(&v))
            .transpose()?;

        Ok(Self {
            data_dir,
            cart_key,
            messaging_base_url,
            currency,
            default_country_code,
        })
    }
}

/// Accept `+91`, `91`, or `+1` style calling codes (1-3 digits).
fn validate_country_code(value: &str) -> Result<String, ConfigError> {
    let digits = value.trim().trim_start_matches('+');
    if digits.is_empty() || digits.len() > 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "MARKETHUB_DEFAULT_COUNTRY_CODE".to_string(),
            format!("'{value}' is not a calling code"),
        ));
    }
    Ok(format!("+{digits}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".markethub"));
        assert_eq!(config.cart_key, "marketplace-carts");
        assert_eq!(config.messaging_base_url.as_str(), "https://wa.me/");
        assert!(config.currency.is_none());
        assert!(config.default_country_code.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("MARKETHUB_DATA_DIR", "/tmp/carts"),
            ("MARKETHUB_CART_KEY", "carts-v2"),
            ("MARKETHUB_MESSAGING_BASE_URL", "https://api.whatsapp.com/send"),
            ("MARKETHUB_CURRENCY", "inr"),
            ("MARKETHUB_DEFAULT_COUNTRY_CODE", "91"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.cart_key, "carts-v2");
        assert_eq!(config.messaging_base_url.path(), "/send");
        assert_eq!(config.currency, Some(CurrencyCode::INR));
        assert_eq!(config.default_country_code.as_deref(), Some("+91"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = CartConfig::from_lookup(lookup(&[("MARKETHUB_CART_KEY", "  ")])).unwrap();
        assert_eq!(config.cart_key, "marketplace-carts");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CartConfig::from_lookup(lookup(&[("MARKETHUB_MESSAGING_BASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MARKETHUB_MESSAGING_BASE_URL"));

        assert!(
            CartConfig::from_lookup(lookup(&[("MARKETHUB_MESSAGING_BASE_URL", "ftp://wa.me")]))
                .is_err()
        );
    }

    #[test]
    fn test_invalid_cart_key() {
        for key in ["../carts", "carts/v2", ".hidden", "my carts", "carts?"] {
            let err = CartConfig::from_lookup(lookup(&[("MARKETHUB_CART_KEY", key)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "MARKETHUB_CART_KEY"),
                "{key} should be rejected"
            );
        }
        assert!(CartConfig::from_lookup(lookup(&[("MARKETHUB_CART_KEY", "carts_v2.backup")])).is_ok());
    }

    #[test]
    fn test_invalid_currency() {
        assert!(CartConfig::from_lookup(lookup(&[("MARKETHUB_CURRENCY", "DOGE")])).is_err());
    }

    #[test]
    fn test_invalid_country_code() {
        assert!(
            CartConfig::from_lookup(lookup(&[("MARKETHUB_DEFAULT_COUNTRY_CODE", "+9123")])).is_err()
        );
        assert!(
            CartConfig::from_lookup(lookup(&[("MARKETHUB_DEFAULT_COUNTRY_CODE", "IN")])).is_err()
        );
    }
}
