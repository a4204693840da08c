use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::CollectorConfig;
use crate::external::candle_source::{CandleSource, CandleSourceError};
use crate::models::Candle;
use crate::services::rate_limiter::RateLimiter;

const KLINES_PATH: &str = "/api/v3/klines";
const HOURLY_INTERVAL: &str = "1h";
const HOUR_MS: i64 = 60 * 60 * 1000;
/// Largest page the klines endpoint returns.
pub const MAX_PAGE_LIMIT: u32 = 1000;
const MAX_RETRIES: u32 = 3;

/// Public (unauthenticated) Binance spot REST client for historical klines.
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    page_limit: u32,
    retry_backoff: Duration,
}

impl BinanceClient {
    pub fn new(base_url: &str, limiter: RateLimiter, retry_backoff: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
            page_limit: MAX_PAGE_LIMIT,
            retry_backoff,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(
            &config.binance_base_url,
            RateLimiter::new(config.max_concurrent.max(1), config.requests_per_minute.max(1)),
            config.retry_backoff(),
        )
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let _guard = self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, KLINES_PATH);
        debug!("GET {} symbol={} startTime={} endTime={}", url, symbol, start_ms, end_ms);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("interval", HOURLY_INTERVAL.to_string()),
                ("startTime", start_ms.to_string()),
                ("endTime", end_ms.to_string()),
                ("limit", self.page_limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CandleSourceError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CandleSourceError::Network(e.to_string()))?;

        // 418 means the IP is already banned for ignoring 429s
        if status.as_u16() == 429 || status.as_u16() == 418 {
            return Err(CandleSourceError::RateLimited);
        }

        if !status.is_success() {
            return Err(match serde_json::from_str::<BinanceError>(&body) {
                Ok(err) => map_error_code(err.code, &err.msg),
                Err(_) => CandleSourceError::BadResponse(format!("HTTP {}: {}", status.as_u16(), body)),
            });
        }

        let raw: Vec<RawKline> =
            serde_json::from_str(&body).map_err(|e| CandleSourceError::Parse(e.to_string()))?;

        raw.into_iter().map(RawKline::into_candle).collect()
    }

    async fn fetch_page_with_retry(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let mut retry_count = 0;

        loop {
            match self.fetch_page(symbol, start_ms, end_ms).await {
                Err(CandleSourceError::RateLimited) if retry_count < MAX_RETRIES => {
                    retry_count += 1;
                    let delay = self.retry_backoff * retry_count;
                    warn!(
                        "Rate limited fetching {} klines, retrying in {:?} (attempt {}/{})",
                        symbol, delay, retry_count, MAX_RETRIES
                    );
                    sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_hourly_candles(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>, CandleSourceError> {
        let end_ms = end.timestamp_millis();
        let mut cursor = start.timestamp_millis();
        let mut candles = Vec::new();
        let mut pages = 0usize;

        while cursor <= end_ms {
            let page = self.fetch_page_with_retry(symbol, cursor, end_ms).await?;
            pages += 1;

            let Some(last) = page.last() else {
                break;
            };
            let next = last.open_time.timestamp_millis() + HOUR_MS;
            let full_page = page.len() as u32 >= self.page_limit;
            candles.extend(page);

            if !full_page || next <= cursor {
                break;
            }
            cursor = next;
        }

        debug!("Fetched {} hourly candles for {} in {} pages", candles.len(), symbol, pages);
        Ok(candles)
    }
}

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i32,
    msg: String,
}

fn map_error_code(code: i32, msg: &str) -> CandleSourceError {
    match code {
        -1003 => CandleSourceError::RateLimited,
        -1121 => CandleSourceError::NotFound(msg.to_string()),
        _ => CandleSourceError::BadResponse(format!("code {}: {}", code, msg)),
    }
}

/// One kline row. Only the open time and close price are kept.
#[derive(Debug, Deserialize)]
struct RawKline(
    i64,        // open time (ms)
    IgnoredAny, // open
    IgnoredAny, // high
    IgnoredAny, // low
    String,     // close
    IgnoredAny, // volume
    IgnoredAny, // close time
    IgnoredAny, // quote asset volume
    IgnoredAny, // number of trades
    IgnoredAny, // taker buy base asset volume
    IgnoredAny, // taker buy quote asset volume
    IgnoredAny, // ignore
);

impl RawKline {
    fn into_candle(self) -> Result<Candle, CandleSourceError> {
        Ok(Candle {
            open_time: parse_millis(self.0)?,
            close: parse_decimal(&self.4)?,
        })
    }
}

fn parse_decimal(raw: &str) -> Result<BigDecimal, CandleSourceError> {
    BigDecimal::from_str(raw).map_err(|e| CandleSourceError::Parse(format!("{}: {}", raw, e)))
}

fn parse_millis(ms: i64) -> Result<DateTime<Utc>, CandleSourceError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| CandleSourceError::Parse(format!("timestamp out of range: {}", ms)))
}
