use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Pairs collected when `TRADING_PAIRS` is not set.
pub const DEFAULT_TRADING_PAIRS: &[(&str, &str)] = &[
    ("BTCUSDT", "Bitcoin (BTC)"),
    ("ETHUSDT", "Ethereum (ETH)"),
    ("SOLUSDT", "Solana (SOL)"),
    ("ADAUSDT", "Cardano (ADA)"),
    ("DOGEUSDT", "Dogecoin (DOGE)"),
    ("SHIBUSDT", "Shiba Inu (SHIB)"),
    ("USDCUSDT", "USDC"),
];

// An exchange symbol together with the label shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    pub symbol: String,
    pub label: String,
}

impl TradingPair {
    pub fn new(symbol: &str, label: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
        }
    }
}

/// File name of the per-symbol CSV backup, e.g. `BTCUSDT_daily_1700_prices.csv`.
pub fn backup_file_name(symbol: &str, sample_time: NaiveTime) -> String {
    format!(
        "{}_daily_{:02}{:02}_prices.csv",
        symbol,
        sample_time.hour(),
        sample_time.minute()
    )
}

pub const MONTHLY_ANALYSIS_FILE: &str = "monthly_analysis.csv";
pub const OVERALL_STATISTICS_FILE: &str = "overall_statistics.csv";
pub const WEEKLY_CHANGES_FILE: &str = "weekly_changes.csv";
pub const PRICE_TRENDS_FILE: &str = "crypto_trends.html";

/// Row lag used for the weekly change view (one observation per day).
pub const WEEKLY_LAG: usize = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_file_name_encodes_sample_time() {
        let t = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(backup_file_name("BTCUSDT", t), "BTCUSDT_daily_1700_prices.csv");

        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(backup_file_name("ETHUSDT", t), "ETHUSDT_daily_0930_prices.csv");
    }
}
