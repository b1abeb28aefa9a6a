//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Document numbering configuration.
    #[serde(default)]
    pub numbering: NumberingConfig,
    /// Persistence store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document numbering configuration.
///
/// Prefixes are part of the persisted number format
/// (`<PREFIX><YYYY><MM><NNNNN>`) and must not change once documents
/// have been issued.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    /// Prefix for quotation numbers.
    #[serde(default = "default_quotation_prefix")]
    pub quotation_prefix: String,
    /// Prefix for invoice numbers.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Prefix for payment numbers.
    #[serde(default = "default_payment_prefix")]
    pub payment_prefix: String,
    /// Prefix for AMC contract numbers.
    #[serde(default = "default_contract_prefix")]
    pub contract_prefix: String,
}

fn default_quotation_prefix() -> String {
    "QTN".to_string()
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

fn default_payment_prefix() -> String {
    "PAY".to_string()
}

fn default_contract_prefix() -> String {
    "AMC".to_string()
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            quotation_prefix: default_quotation_prefix(),
            invoice_prefix: default_invoice_prefix(),
            payment_prefix: default_payment_prefix(),
            contract_prefix: default_contract_prefix(),
        }
    }
}

/// Persistence store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Timeout for a single store call, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
    /// Bounded retries for version-conflict errors before surfacing them.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_max_conflict_retries() -> u32 {
    3
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_store_timeout_ms(),
            max_conflict_retries: default_max_conflict_retries(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `SARAL__`-prefixed environment
    /// variables (`SARAL__STORE__TIMEOUT_MS=2000`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SARAL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            numbering: NumberingConfig::default(),
            store: StoreConfig::default(),
        }
    }
}
