//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Community configuration.
    #[serde(default)]
    pub community: CommunityConfig,
}

/// Residential-community configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityConfig {
    /// Number of pre-provisioned lots.
    #[serde(default = "default_lot_count")]
    pub lot_count: u32,
    /// Default monthly maintenance fee, applied to records synthesized
    /// before an explicit amount is set.
    #[serde(default = "default_fee_amount")]
    pub default_fee_amount: Decimal,
    /// Display label for the currency (presentation hint only).
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

fn default_lot_count() -> u32 {
    48
}

fn default_fee_amount() -> Decimal {
    Decimal::new(1000, 2) // 10.00
}

fn default_currency_label() -> String {
    "RM".to_string()
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            lot_count: default_lot_count(),
            default_fee_amount: default_fee_amount(),
            currency_label: default_currency_label(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
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
            .add_source(config::Environment::with_prefix("KUTIP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
