//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use mercado_commerce::CommerceConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["mercado.toml", ".mercado.toml", "mercado.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the marketplace state lives.
    #[serde(default)]
    pub store: StoreConfig,

    /// Checkout and pricing settings.
    #[serde(default)]
    pub market: CommerceConfig,

    /// Logging.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// State file, relative to the config file's directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    ".mercado/state.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Generate a default mercado.toml config file.
pub fn generate_default_config() -> String {
    r#"# Mercado marketplace configuration

[store]
path = ".mercado/state.json"

[market]
currency = "ARS"
shipping_cost_cents = 0
default_country = "Argentina"
order_number_length = 10
order_number_attempts = 8

[log]
level = "warn"
"#
    .to_string()
}
