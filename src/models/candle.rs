use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

// An hourly bucket as reported by the exchange; only what daily sampling reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close: BigDecimal,
}
