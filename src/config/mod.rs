use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::tax::TaxRate;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Pool size, `MAX_CONNECTIONS`
    pub max_connections: Option<u32>,
    /// Default GST/HST rate as a fraction, `TAX_RATE`
    pub tax_rate: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()
            .context("reading configuration (is DATABASE_URL set?)")?;
        // fail early on a malformed rate rather than at first report
        config.tax_rate()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn tax_rate(&self) -> Result<TaxRate> {
        match &self.tax_rate {
            Some(raw) => raw
                .parse::<TaxRate>()
                .with_context(|| format!("invalid TAX_RATE '{}'", raw)),
            None => Ok(TaxRate::default()),
        }
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
