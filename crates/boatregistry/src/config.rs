//! Configuration management for boatregistry.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "boatregistry";

/// Prefix for namespaced environment variables.
const ENV_PREFIX: &str = "BOATREG_";

/// Highest row number a Sheets grid can hold.
pub const MAX_SHEET_ROWS: u32 = 10_000_000;

/// Deployment variables understood without the `BOATREG_` prefix, and the
/// configuration key each one sets.
const LEGACY_ENV: [(&str, &str); 7] = [
    ("GOOGLE_SERVICE_ACCOUNT_EMAIL", "sheets.service_account_email"),
    ("GOOGLE_PRIVATE_KEY", "sheets.private_key"),
    ("GOOGLE_SHEET_ID", "sheets.sheet_id"),
    ("GOOGLE_SHEET_NAME", "sheets.sheet_name"),
    ("GOOGLE_SHEET_HEADER_ROW", "sheets.header_row"),
    ("USE_MOCK_DATA", "data.use_mock_data"),
    ("NEXT_PUBLIC_APP_URL", "app.public_url"),
];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Legacy deployment variables (`GOOGLE_SHEET_ID`, `USE_MOCK_DATA`, ...)
/// 2. Environment variables prefixed with `BOATREG_`, nested with `__`
/// 3. TOML config file at `~/.config/boatregistry/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet connection configuration.
    pub sheets: SheetsConfig,
    /// Data source selection.
    pub data: DataConfig,
    /// Row cache configuration.
    pub cache: CacheConfig,
    /// Public site settings.
    pub app: AppConfig,
}

/// Spreadsheet-related configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Service account e-mail used as the JWT issuer.
    pub service_account_email: Option<String>,
    /// PEM-encoded service account private key.
    /// Literal `\n` sequences are accepted in place of newlines.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    /// Identifier of the spreadsheet document.
    pub sheet_id: Option<String>,
    /// Title of the sheet holding the registry.
    pub sheet_name: String,
    /// 1-based row number holding the column headers.
    /// Data rows start immediately below it.
    pub header_row: u32,
    /// Base URL of the Sheets REST API.
    pub api_base_url: String,
    /// OAuth token endpoint for the service-account grant.
    pub token_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Data source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Serve synthetic boats instead of reading the spreadsheet.
    pub use_mock_data: bool,
    /// Number of synthetic boats to generate.
    pub mock_count: usize,
    /// Seed for synthetic data. Unset means a fresh random set per process.
    pub mock_seed: Option<u64>,
}

/// Row cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a fetched row snapshot stays valid, in seconds.
    pub ttl_secs: u64,
}

/// Public site settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL under which boat detail pages are published.
    pub public_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            service_account_email: None,
            private_key: None,
            sheet_id: None,
            sheet_name: "Boats".to_string(),
            header_row: 1,
            api_base_url: "https://sheets.googleapis.com/v4".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("service_account_email", &self.service_account_email)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("sheet_id", &self.sheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("header_row", &self.header_row)
            .field("api_base_url", &self.api_base_url)
            .field("token_url", &self.token_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            use_mock_data: false,
            mock_count: 50,
            mock_seed: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
        }
    }
}

impl SheetsConfig {
    /// The private key with escaped newlines restored, if one is configured.
    #[must_use]
    pub fn private_key_pem(&self) -> Option<String> {
        self.private_key
            .as_deref()
            .map(|key| key.replace("\\n", "\n"))
    }

    /// Names of the credentials a live connection needs but does not have.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(self.service_account_email.as_deref()) {
            missing.push("GOOGLE_SERVICE_ACCOUNT_EMAIL");
        }
        if is_blank(self.private_key.as_deref()) {
            missing.push("GOOGLE_PRIVATE_KEY");
        }
        if is_blank(self.sheet_id.as_deref()) {
            missing.push("GOOGLE_SHEET_ID");
        }
        missing
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Map a legacy deployment variable onto its nested configuration key.
fn legacy_key(env_key: &str) -> &str {
    LEGACY_ENV
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(env_key))
        .map_or(env_key, |(_, key)| key)
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let legacy_names: Vec<&str> = LEGACY_ENV.iter().map(|(name, _)| *name).collect();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&legacy_names)
                    .map(|key| legacy_key(key.as_str()).into()),
            );

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// Missing credentials are not checked here because mock mode does not
    /// need them; the live source reports them when it is built.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.header_row == 0 {
            return Err(Error::config_validation(
                "header_row is 1-based and must be at least 1",
            ));
        }

        if self.sheets.header_row > MAX_SHEET_ROWS {
            return Err(Error::config_validation(format!(
                "header_row must not exceed {MAX_SHEET_ROWS}"
            )));
        }

        if self.sheets.sheet_name.trim().is_empty() {
            return Err(Error::config_validation("sheet_name must not be empty"));
        }

        if self.sheets.request_timeout_secs == 0 {
            return Err(Error::config_validation(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(Error::config_validation(
                "ttl_secs must be greater than 0",
            ));
        }

        if self.data.use_mock_data && self.data.mock_count == 0 {
            return Err(Error::config_validation(
                "mock_count must be greater than 0 when use_mock_data is set",
            ));
        }

        Ok(())
    }

    /// Get the cache time-to-live as a Duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}
