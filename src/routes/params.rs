use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::price_observation::csv_timestamp;
use crate::state::ApiMode;

/// An integer query parameter with a default and an inclusive upper bound.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    pub name: &'static str,
    pub default: i64,
    pub max: i64,
}

pub const PRICES_LIMIT: Bounded = Bounded { name: "limit", default: 100, max: 1000 };
pub const MONTHS: Bounded = Bounded { name: "months", default: 12, max: 60 };
pub const CHANGE_DAYS: Bounded = Bounded { name: "days", default: 7, max: 365 };

impl Bounded {
    /// Strict mode rejects values outside `1..=max`; lenient mode clamps them.
    pub fn resolve(&self, mode: ApiMode, raw: Option<&str>) -> Result<i64, AppError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(self.default);
        };

        let value: i64 = raw.parse().map_err(|_| {
            AppError::InvalidParam(format!("{} must be an integer, got '{}'", self.name, raw))
        })?;

        match mode {
            ApiMode::Strict if !(1..=self.max).contains(&value) => Err(AppError::InvalidParam(
                format!("{} must be between 1 and {}", self.name, self.max),
            )),
            ApiMode::Strict => Ok(value),
            ApiMode::Lenient => Ok(value.clamp(1, self.max)),
        }
    }
}

/// Optional date bound: RFC 3339, `YYYY-MM-DD HH:MM:SS[+HH:MM]` or `YYYY-MM-DD`.
pub fn resolve_date(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => csv_timestamp::parse(raw)
            .map(Some)
            .ok_or_else(|| AppError::InvalidParam(format!("{} is not a valid date: '{}'", name, raw))),
    }
}
