use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Rows read back from crypto_prices. NUMERIC columns are cast to float8 in SQL.

#[derive(Debug, Clone, FromRow)]
pub struct StoredPrice {
    pub date: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct SymbolStatisticsRow {
    pub total_days: i64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub avg_price: Option<f64>,
    pub earliest_date: Option<DateTime<Utc>>,
    pub latest_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthlyPriceRow {
    pub month: DateTime<Utc>,
    pub avg_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub price_range: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PriceChangeRow {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub previous_price: f64,
    pub change_percent: Option<f64>,
}

// JSON bodies of the query API. Dates are pre-formatted by the active API mode.

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CryptocurrenciesResponse {
    pub cryptocurrencies: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceEntry {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricesResponse {
    pub symbol: String,
    pub prices: Vec<PriceEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SymbolStatistics {
    pub total_days: i64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub earliest_date: String,
    pub latest_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub symbol: String,
    pub statistics: SymbolStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyEntry {
    pub month: String,
    pub avg_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub price_range: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyAnalysisResponse {
    pub symbol: String,
    pub monthly_analysis: Vec<MonthlyEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceChangeEntry {
    pub date: String,
    pub current_price: f64,
    pub previous_price: f64,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceChangesResponse {
    pub symbol: String,
    pub price_changes: Vec<PriceChangeEntry>,
}
