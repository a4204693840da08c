use chrono::{NaiveTime, Timelike};

use crate::models::{Candle, PriceObservation};

/// Keeps one candle per day: the one opening exactly at `sample_time` (UTC).
/// The observation price is that candle's close.
pub fn sample_daily(candles: &[Candle], symbol: &str, sample_time: NaiveTime) -> Vec<PriceObservation> {
    candles
        .iter()
        .filter(|c| {
            let t = c.open_time.time();
            t.hour() == sample_time.hour() && t.minute() == sample_time.minute()
        })
        .map(|c| PriceObservation::new(symbol, c.open_time, c.close.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, TimeZone, Utc};

    fn hourly(from: chrono::DateTime<Utc>, hours: i64) -> Vec<Candle> {
        (0..hours)
            .map(|i| {
                let open_time = from + Duration::hours(i);
                Candle {
                    open_time,
                    close: BigDecimal::from(100 + i),
                }
            })
            .collect()
    }

    #[test]
    fn test_one_observation_per_day_at_sample_time() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = hourly(start, 72);
        let sample = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

        let observations = sample_daily(&candles, "BTCUSDT", sample);

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].date, Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap());
        assert_eq!(observations[0].price, BigDecimal::from(117));
        assert_eq!(observations[2].date, Utc.with_ymd_and_hms(2024, 1, 3, 17, 0, 0).unwrap());
        assert!(observations.iter().all(|o| o.symbol == "BTCUSDT"));
    }

    #[test]
    fn test_no_candle_at_sample_time() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = hourly(start, 10);
        let sample = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

        assert!(sample_daily(&candles, "ETHUSDT", sample).is_empty());
    }

    #[test]
    fn test_half_hour_sample_never_matches_hourly_buckets() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = hourly(start, 48);
        let sample = NaiveTime::from_hms_opt(17, 30, 0).unwrap();

        assert!(sample_daily(&candles, "ETHUSDT", sample).is_empty());
    }
}
