use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::price_observation::csv_timestamp;

/// Monthly aggregate for one symbol. `month` is `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub symbol: String,
    pub month: String,
    pub average_price: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub price_range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStatistic {
    pub symbol: String,
    pub count: usize,
    pub average_price: f64,
    /// Sample standard deviation; absent with fewer than two observations.
    pub volatility: Option<f64>,
    pub lowest_price: f64,
    pub highest_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChange {
    pub symbol: String,
    #[serde(with = "csv_timestamp")]
    pub date: DateTime<Utc>,
    pub current_price: f64,
    pub price_7_days_ago: f64,
    pub price_change_pct: Option<f64>,
}
