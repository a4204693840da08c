use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::TradingPair;

/// How the query API treats bad input and renders dates.
///
/// `Strict` rejects out-of-range parameters with 422 and reports errors under
/// `detail`; `Lenient` clamps them and reports errors under `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    Strict,
    Lenient,
}

impl ApiMode {
    pub fn default_port(self) -> u16 {
        match self {
            ApiMode::Strict => 8000,
            ApiMode::Lenient => 5000,
        }
    }

    pub fn error_key(self) -> &'static str {
        match self {
            ApiMode::Strict => "detail",
            ApiMode::Lenient => "error",
        }
    }

    pub fn format_date(self, value: &DateTime<Utc>) -> String {
        match self {
            ApiMode::Strict => value.to_rfc3339(),
            ApiMode::Lenient => value.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
        }
    }
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ApiMode::Strict),
            "lenient" => Ok(ApiMode::Lenient),
            other => Err(format!("unknown API mode '{}', expected 'strict' or 'lenient'", other)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub mode: ApiMode,
}

#[derive(Clone)]
pub struct DashboardState {
    pub data_dir: PathBuf,
    pub pairs: Vec<TradingPair>,
}
