use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Environment variable that overrides the CryptoCompare API key from the file.
pub const API_KEY_ENV: &str = "CRYPTOCOMPARE_API_KEY";

pub const DEFAULT_TRANSACTIONS_PATH: &str = "./transactions.csv";
pub const DEFAULT_CRYPTOCOMPARE_URL: &str = "https://min-api.cryptocompare.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-configurable settings, optionally loaded from a TOML file.
///
/// ```toml
/// transactions_path = "data/transactions.csv"
///
/// [cryptocompare]
/// api_key = "..."
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSV ledger with `timestamp,transaction_type,token,amount` columns.
    pub transactions_path: PathBuf,

    pub cryptocompare: CryptoCompareSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoCompareSettings {
    pub base_url: String,

    /// Optional; the public endpoint works without one at a lower rate limit.
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from(DEFAULT_TRANSACTIONS_PATH),
            cryptocompare: CryptoCompareSettings::default(),
        }
    }
}

impl Default for CryptoCompareSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CRYPTOCOMPARE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::FileIO(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// Replace the API key when `key` is a non-empty value.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.cryptocompare.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cryptocompare.base_url.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "cryptocompare.base_url must not be empty".into(),
            ));
        }
        if self.cryptocompare.timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "cryptocompare.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
