//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use funding_ledger::{DEFAULT_PRECISION, MAX_PRECISION};

use crate::errors::{Result, ServiceError};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database (e.g. sqlite:./campaigns.db)
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Fractional digits of reported percentages
    pub percent_precision: u32,
    /// Insert the demo startups when the campaign table is empty
    pub seed_demo_campaigns: bool,
    /// Settle pending contributions automatically after `settle_delay`
    pub simulate_settlement: bool,
    /// How long a contribution stays pending before simulated settlement
    pub settle_delay: Duration,
    /// How often the settlement task looks for pending contributions
    pub settle_interval: Duration,
    /// Probability in `[0, 1]` that a simulated settlement fails
    pub settle_failure_rate: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let percent_precision: u32 = parse_var("PERCENT_PRECISION", DEFAULT_PRECISION)?;
        if percent_precision > MAX_PRECISION {
            return Err(ServiceError::Config(format!(
                "PERCENT_PRECISION must be at most {MAX_PRECISION}"
            )));
        }

        let settle_failure_rate: f64 = parse_var("SETTLE_FAILURE_RATE", 0.12)?;
        if !(0.0..=1.0).contains(&settle_failure_rate) {
            return Err(ServiceError::Config(
                "SETTLE_FAILURE_RATE must be between 0 and 1".into(),
            ));
        }

        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./campaigns.db".to_string()),
            api_port: parse_var("API_PORT", 3001)?,
            percent_precision,
            seed_demo_campaigns: parse_bool("SEED_DEMO_CAMPAIGNS", true)?,
            simulate_settlement: parse_bool("SIMULATE_SETTLEMENT", false)?,
            settle_delay: Duration::from_millis(parse_var("SETTLE_DELAY_MS", 1200)?),
            settle_interval: Duration::from_millis(parse_var("SETTLE_INTERVAL_MS", 500)?),
            settle_failure_rate,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ServiceError::Config(format!("Missing env var: {key}")))
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ServiceError::Config(format!("Invalid {key}"))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match env_var(key) {
        Ok(raw) => parse_flag(&raw).ok_or_else(|| ServiceError::Config(format!("Invalid {key}"))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
