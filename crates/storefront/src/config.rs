//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPHUB_API_URL` - REST API base URL (default: `http://localhost:5000/api`)
//! - `SHOPHUB_DATA_DIR` - Directory for durable cart/session storage (default: `.shophub`)
//! - `SHOPHUB_WHATSAPP_NUMBER` - Business WhatsApp number, digits only with
//!   country code (default: `254114087028`)
//! - `SHOPHUB_STORE_NAME` - Store name used in order messages (default: `ShopHub`)
//! - `SHOPHUB_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_DATA_DIR: &str = ".shophub";
const DEFAULT_WHATSAPP_NUMBER: &str = "254114087028";
const DEFAULT_STORE_NAME: &str = "ShopHub";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API configuration
    pub api: ApiConfig,
    /// Directory holding durable storage
    pub data_dir: PathBuf,
    /// Checkout hand-off configuration
    pub checkout: CheckoutConfig,
}

/// REST API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// How long catalog reads stay cached
    pub catalog_cache_ttl: Duration,
}

/// WhatsApp checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Business number in international format without `+`
    pub whatsapp_number: String,
    /// Store name printed in the order message
    pub store_name: String,
}

impl ApiConfig {
    /// Configuration for `base_url` with the default cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl StorefrontConfig {
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

        Ok(Self {
            api: ApiConfig::from_env()?,
            data_dir: PathBuf::from(get_env_or_default("SHOPHUB_DATA_DIR", DEFAULT_DATA_DIR)),
            checkout: CheckoutConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_env_or_default("SHOPHUB_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPHUB_API_URL".to_string(), e))?;
        let ttl = get_env_or_default(
            "SHOPHUB_CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPHUB_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            catalog_cache_ttl: Duration::from_secs(ttl),
        })
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let whatsapp_number = get_env_or_default("SHOPHUB_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        validate_whatsapp_number(&whatsapp_number)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPHUB_WHATSAPP_NUMBER".to_string(), e))?;

        Ok(Self {
            whatsapp_number,
            store_name: get_env_or_default("SHOPHUB_STORE_NAME", DEFAULT_STORE_NAME),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the API base URL. Paths are joined onto it, so it must be absolute
/// http(s).
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    Ok(url)
}

/// `wa.me` links take the number as bare digits with the country code.
fn validate_whatsapp_number(number: &str) -> Result<(), String> {
    if number.len() < 7 || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err("must be 7 or more digits, country code first, no '+'".to_string());
    }
    Ok(())
}
