use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// One sampled daily price for a symbol. Column order matches the CSV backups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    #[serde(with = "csv_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_str")]
    pub price: BigDecimal,
    pub symbol: String,
}

impl PriceObservation {
    pub fn new(symbol: &str, date: DateTime<Utc>, price: BigDecimal) -> Self {
        Self {
            date,
            price,
            symbol: symbol.to_string(),
        }
    }
}

/// Timestamps in CSV files are written as `2024-01-01 17:00:00+00:00`.
pub mod csv_timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

    pub fn format(value: &DateTime<Utc>) -> String {
        value.format(WRITE_FORMAT).to_string()
    }

    /// Accepts the written format, RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` (read as UTC)
    /// and a bare date (midnight UTC).
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Decimals travel as plain strings so no precision is lost through f64.
pub mod decimal_str {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BigDecimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_csv_timestamp_accepts_all_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 17, 0, 0).unwrap();
        assert_eq!(csv_timestamp::parse("2024-03-01 17:00:00+00:00"), Some(expected));
        assert_eq!(csv_timestamp::parse("2024-03-01T17:00:00Z"), Some(expected));
        assert_eq!(csv_timestamp::parse("2024-03-01 17:00:00"), Some(expected));
        assert_eq!(
            csv_timestamp::parse("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(csv_timestamp::parse("yesterday"), None);
    }

    #[test]
    fn test_csv_timestamp_converts_offsets_to_utc() {
        let parsed = csv_timestamp::parse("2024-03-01 19:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 17, 0, 0).unwrap());
        assert_eq!(csv_timestamp::format(&parsed), "2024-03-01 17:00:00+00:00");
    }
}
