//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Voucher ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Cash advance policies.
    #[serde(default)]
    pub cash_advance: CashAdvanceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Which classification scheme vouchers use.
///
/// The two schemes are mutually exclusive for the whole installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationScheme {
    /// Legacy four-way sphere classification.
    #[default]
    Spheres,
    /// User-defined booking categories.
    Categories,
}

/// Voucher ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Active classification scheme.
    #[serde(default)]
    pub classification_scheme: ClassificationScheme,
    /// Vouchers dated on or before this date belong to a closed period.
    #[serde(default)]
    pub locked_until: Option<NaiveDate>,
    /// Sphere code (`IDEELL`, `ZWECK`, `VERMOEGEN`, `WGB`) used for generated
    /// counter vouchers under the sphere scheme.
    #[serde(default = "default_sphere")]
    pub default_sphere: String,
    /// Category used for generated counter vouchers under the category scheme.
    #[serde(default)]
    pub counter_voucher_category: Option<i64>,
    /// Maximum number of cached usage summaries.
    #[serde(default = "default_usage_cache_capacity")]
    pub usage_cache_capacity: u64,
    /// Time-to-live of a cached usage summary in seconds.
    #[serde(default = "default_usage_cache_ttl_secs")]
    pub usage_cache_ttl_secs: u64,
}

fn default_sphere() -> String {
    "IDEELL".to_string()
}

fn default_usage_cache_capacity() -> u64 {
    1_000
}

fn default_usage_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            classification_scheme: ClassificationScheme::default(),
            locked_until: None,
            default_sphere: default_sphere(),
            counter_voucher_category: None,
            usage_cache_capacity: default_usage_cache_capacity(),
            usage_cache_ttl_secs: default_usage_cache_ttl_secs(),
        }
    }
}

/// What happens when a partial would exceed the advance's planned remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdraftPolicy {
    /// Accept the partial and report a warning.
    #[default]
    Warn,
    /// Reject the partial.
    Reject,
}

/// Whether settled partials may be deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettledPartialDeletion {
    /// Settled partials can be deleted like any other.
    #[default]
    Allow,
    /// Only unsettled partials can be deleted.
    Reject,
}

/// Cash advance policies.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CashAdvanceConfig {
    /// Handling of partials beyond the planned remainder.
    #[serde(default)]
    pub overdraft_policy: OverdraftPolicy,
    /// Handling of deletes on settled partials.
    #[serde(default)]
    pub settled_partial_deletion: SettledPartialDeletion,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KASSENWART").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
