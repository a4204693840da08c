//! Environment-driven configuration shared by every subcommand.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use thiserror::Error;

use crate::domain::{TradingPair, DEFAULT_TRADING_PAIRS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid trading pair '{0}' in TRADING_PAIRS")]
    InvalidPair(String),
    #[error("invalid sample time {hour:02}:{minute:02}")]
    InvalidSampleTime { hour: u32, minute: u32 },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub data_dir: PathBuf,
    pub pairs: Vec<TradingPair>,
    pub collector: CollectorConfig,
    pub api_host: String,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub binance_base_url: String,
    /// UTC time of day whose hourly candle stands for the whole day.
    pub sample_time: NaiveTime,
    pub lookback_years: u32,
    pub symbol_delay_ms: u64,
    pub requests_per_minute: u32,
    pub max_concurrent: usize,
    pub retry_backoff_secs: u64,
}

impl AppConfig {
    /// Reads the process environment; `.env` is loaded by the binary beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        let pairs = match std::env::var("TRADING_PAIRS") {
            Ok(raw) if !raw.trim().is_empty() => parse_pairs(&raw)?,
            _ => DEFAULT_TRADING_PAIRS
                .iter()
                .map(|(symbol, label)| TradingPair::new(*symbol, *label))
                .collect(),
        };

        let hour = env_var_parse("SAMPLE_HOUR", 17u32);
        let minute = env_var_parse("SAMPLE_MINUTE", 0u32);
        let sample_time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(ConfigError::InvalidSampleTime { hour, minute })?;

        Ok(Self {
            database_url: database_url_from_env(),
            db_max_connections: env_var_parse("DB_MAX_CONNECTIONS", 10),
            data_dir: PathBuf::from(env_var_or("DATA_DIR", "data")),
            pairs,
            collector: CollectorConfig {
                binance_base_url: env_var_or("BINANCE_BASE_URL", "https://api.binance.com"),
                sample_time,
                lookback_years: env_var_parse("LOOKBACK_YEARS", 8),
                symbol_delay_ms: env_var_parse("SYMBOL_DELAY_MS", 1000),
                requests_per_minute: env_var_parse("BINANCE_REQUESTS_PER_MINUTE", 600),
                max_concurrent: env_var_parse("BINANCE_MAX_CONCURRENT", 1),
                retry_backoff_secs: env_var_parse("RETRY_BACKOFF_SECS", 5),
            },
            api_host: env_var_or("API_HOST", "0.0.0.0"),
        })
    }

    /// Pairs restricted to a comma separated selection, keeping catalog labels when known.
    pub fn select_pairs(&self, selection: Option<&str>) -> Result<Vec<TradingPair>, ConfigError> {
        match selection {
            None => Ok(self.pairs.clone()),
            Some(raw) => {
                let wanted = parse_pairs(raw)?;
                Ok(wanted
                    .into_iter()
                    .map(|pair| {
                        self.pairs
                            .iter()
                            .find(|known| known.symbol == pair.symbol)
                            .cloned()
                            .unwrap_or(pair)
                    })
                    .collect())
            }
        }
    }
}

impl CollectorConfig {
    pub fn symbol_delay(&self) -> Duration {
        Duration::from_millis(self.symbol_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

/// `DATABASE_URL` when set, otherwise assembled from the `DB_*` variables.
fn database_url_from_env() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }

    let host = env_var_or("DB_HOST", "localhost");
    let port: u16 = env_var_parse("DB_PORT", 5432);
    let name = env_var_or("DB_NAME", "crypto_prices");
    let user = env_var_or("DB_USER", "crypto_user");
    let password = env_var_or("DB_PASSWORD", "");

    build_database_url(&user, &password, &host, port, &name)
}

pub fn build_database_url(user: &str, password: &str, host: &str, port: u16, name: &str) -> String {
    format!("postgresql://{}:{}@{}:{}/{}", user, password, host, port, name)
}

/// Parses `BTCUSDT,ETHUSDT` style lists. Symbols are upper-cased.
pub fn parse_pairs(raw: &str) -> Result<Vec<TradingPair>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let symbol = s.to_uppercase();
            if symbol.len() > 20 || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidPair(s.to_string()));
            }
            Ok(TradingPair::new(&symbol, &symbol))
        })
        .collect()
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses an environment variable, falling back to `default` when unset or malformed.
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
