use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::Candle;

#[derive(Debug, Error)]
pub enum CandleSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("unknown symbol: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Hourly candles with open time in `[start, end]`, oldest first.
    async fn fetch_hourly_candles(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>, CandleSourceError>;
}
