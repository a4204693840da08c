use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::models::{
    MonthlyPriceRow, PriceChangeRow, PriceObservation, StoredPrice, SymbolStatisticsRow,
};

/// Rows per INSERT statement.
pub const INSERT_CHUNK_SIZE: usize = 1000;

/// Appends observations for one symbol, skipping any (symbol, date) already stored.
/// Existing rows are never updated. Returns the number of rows inserted.
pub async fn insert_missing(
    pool: &PgPool,
    symbol: &str,
    observations: &[PriceObservation],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin transaction for {}: {}", symbol, e);
        e
    })?;

    let mut inserted = 0;
    for chunk in dedupe_by_date(observations).chunks(INSERT_CHUNK_SIZE) {
        let dates: Vec<DateTime<Utc>> = chunk.iter().map(|o| o.date).collect();
        let prices: Vec<_> = chunk.iter().map(|o| o.price.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO crypto_prices (symbol, date, price)
            SELECT $1::varchar, t.date, t.price
            FROM UNNEST($2::timestamptz[], $3::numeric[]) AS t(date, price)
            WHERE NOT EXISTS (
                SELECT 1 FROM crypto_prices p
                WHERE p.symbol = $1::varchar AND p.date = t.date
            )
            "#,
        )
        .bind(symbol)
        .bind(dates)
        .bind(prices)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert {} rows for {}: {}", chunk.len(), symbol, e);
            e
        })?;

        inserted += result.rows_affected();
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit transaction for {}: {}", symbol, e);
        e
    })?;
    Ok(inserted)
}

/// First observation wins when the same timestamp shows up twice.
fn dedupe_by_date(observations: &[PriceObservation]) -> Vec<&PriceObservation> {
    let mut seen = std::collections::HashSet::new();
    observations.iter().filter(|o| seen.insert(o.date)).collect()
}

pub async fn fetch_symbols(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT symbol FROM crypto_prices ORDER BY symbol")
        .fetch_all(pool)
        .await
}

pub fn build_prices_query<'a>(
    symbol: &'a str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    limit: i64,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT date, price::float8 AS price FROM crypto_prices WHERE symbol = ",
    );
    qb.push_bind(symbol);

    if let Some(start) = start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND date <= ").push_bind(end);
    }

    qb.push(" ORDER BY date DESC LIMIT ").push_bind(limit);
    qb
}

/// Newest first.
pub async fn fetch_prices(
    pool: &PgPool,
    symbol: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<StoredPrice>, sqlx::Error> {
    build_prices_query(symbol, start, end, limit)
        .build_query_as::<StoredPrice>()
        .fetch_all(pool)
        .await
}

pub async fn fetch_statistics(pool: &PgPool, symbol: &str) -> Result<SymbolStatisticsRow, sqlx::Error> {
    sqlx::query_as::<_, SymbolStatisticsRow>(
        r#"
        SELECT
            COUNT(*) AS total_days,
            MIN(price)::float8 AS min_price,
            MAX(price)::float8 AS max_price,
            AVG(price)::float8 AS avg_price,
            MIN(date) AS earliest_date,
            MAX(date) AS latest_date
        FROM crypto_prices
        WHERE symbol = $1
        "#,
    )
    .bind(symbol)
    .fetch_one(pool)
    .await
}

/// Newest month first.
pub async fn fetch_monthly(
    pool: &PgPool,
    symbol: &str,
    months: i64,
) -> Result<Vec<MonthlyPriceRow>, sqlx::Error> {
    sqlx::query_as::<_, MonthlyPriceRow>(
        r#"
        SELECT
            DATE_TRUNC('month', date) AS month,
            AVG(price)::float8 AS avg_price,
            MAX(price)::float8 AS max_price,
            MIN(price)::float8 AS min_price,
            (MAX(price) - MIN(price))::float8 AS price_range
        FROM crypto_prices
        WHERE symbol = $1
        GROUP BY DATE_TRUNC('month', date)
        ORDER BY month DESC
        LIMIT $2
        "#,
    )
    .bind(symbol)
    .bind(months)
    .fetch_all(pool)
    .await
}

/// Price against the price `days` rows earlier; latest 30 rows, newest first.
pub async fn fetch_price_changes(
    pool: &PgPool,
    symbol: &str,
    days: i32,
) -> Result<Vec<PriceChangeRow>, sqlx::Error> {
    sqlx::query_as::<_, PriceChangeRow>(
        r#"
        WITH price_changes AS (
            SELECT
                date,
                price,
                LAG(price, $2) OVER (ORDER BY date) AS previous_price
            FROM crypto_prices
            WHERE symbol = $1
        )
        SELECT
            date,
            price::float8 AS price,
            previous_price::float8 AS previous_price,
            ((price - previous_price) / NULLIF(previous_price, 0) * 100)::float8 AS change_percent
        FROM price_changes
        WHERE previous_price IS NOT NULL
        ORDER BY date DESC
        LIMIT 30
        "#,
    )
    .bind(symbol)
    .bind(days)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;

    #[test]
    fn test_prices_query_only_filters_what_is_given() {
        let qb = build_prices_query("BTCUSDT", None, None, 100);
        assert_eq!(
            qb.sql(),
            "SELECT date, price::float8 AS price FROM crypto_prices WHERE symbol = $1 ORDER BY date DESC LIMIT $2"
        );

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let qb = build_prices_query("BTCUSDT", Some(start), Some(end), 10);
        assert_eq!(
            qb.sql(),
            "SELECT date, price::float8 AS price FROM crypto_prices WHERE symbol = $1 AND date >= $2 AND date <= $3 ORDER BY date DESC LIMIT $4"
        );

        let qb = build_prices_query("BTCUSDT", None, Some(end), 10);
        assert!(qb.sql().contains("AND date <= $2 ORDER BY"));
    }

    #[test]
    fn test_dedupe_keeps_first_per_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap();
        let rows = vec![
            PriceObservation::new("BTCUSDT", t, BigDecimal::from(1)),
            PriceObservation::new("BTCUSDT", t, BigDecimal::from(2)),
            PriceObservation::new("BTCUSDT", t + chrono::Duration::days(1), BigDecimal::from(3)),
        ];

        let unique = dedupe_by_date(&rows);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].price, BigDecimal::from(1));
    }
}
