use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    CryptocurrenciesResponse, MonthlyAnalysisResponse, MonthlyEntry, PriceChangeEntry,
    PriceChangesResponse, PriceEntry, PricesResponse, StatisticsResponse, SymbolStatistics,
};
use crate::state::ApiMode;

/// Already validated filters for the price history endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: i64,
}

pub async fn list_symbols(pool: &PgPool) -> Result<CryptocurrenciesResponse, AppError> {
    let cryptocurrencies = db::price_queries::fetch_symbols(pool).await.map_err(|e| {
        error!("Failed to list symbols: {}", e);
        AppError::Db(e)
    })?;
    Ok(CryptocurrenciesResponse { cryptocurrencies })
}

pub async fn get_prices(
    pool: &PgPool,
    mode: ApiMode,
    symbol: &str,
    filter: PriceFilter,
) -> Result<PricesResponse, AppError> {
    let rows = db::price_queries::fetch_prices(pool, symbol, filter.start, filter.end, filter.limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch prices for {}: {}", symbol, e);
            AppError::Db(e)
        })?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!("No data found for {}", symbol)));
    }

    Ok(PricesResponse {
        symbol: symbol.to_string(),
        prices: rows
            .into_iter()
            .map(|r| PriceEntry {
                date: mode.format_date(&r.date),
                price: r.price,
            })
            .collect(),
    })
}

pub async fn get_statistics(
    pool: &PgPool,
    mode: ApiMode,
    symbol: &str,
) -> Result<StatisticsResponse, AppError> {
    let row = db::price_queries::fetch_statistics(pool, symbol).await.map_err(|e| {
        error!("Failed to compute statistics for {}: {}", symbol, e);
        AppError::Db(e)
    })?;

    let not_found = || AppError::NotFound(format!("No data found for {}", symbol));
    if row.total_days == 0 {
        return Err(not_found());
    }

    Ok(StatisticsResponse {
        symbol: symbol.to_string(),
        statistics: SymbolStatistics {
            total_days: row.total_days,
            min_price: row.min_price.ok_or_else(not_found)?,
            max_price: row.max_price.ok_or_else(not_found)?,
            avg_price: row.avg_price.ok_or_else(not_found)?,
            earliest_date: row
                .earliest_date
                .map(|d| mode.format_date(&d))
                .ok_or_else(not_found)?,
            latest_date: row
                .latest_date
                .map(|d| mode.format_date(&d))
                .ok_or_else(not_found)?,
        },
    })
}

pub async fn get_monthly_analysis(
    pool: &PgPool,
    mode: ApiMode,
    symbol: &str,
    months: i64,
) -> Result<MonthlyAnalysisResponse, AppError> {
    let rows = db::price_queries::fetch_monthly(pool, symbol, months)
        .await
        .map_err(|e| {
            error!("Failed to fetch monthly analysis for {}: {}", symbol, e);
            AppError::Db(e)
        })?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!("No monthly data found for {}", symbol)));
    }

    Ok(MonthlyAnalysisResponse {
        symbol: symbol.to_string(),
        monthly_analysis: rows
            .into_iter()
            .map(|r| MonthlyEntry {
                month: mode.format_date(&r.month),
                avg_price: r.avg_price,
                max_price: r.max_price,
                min_price: r.min_price,
                price_range: r.price_range,
            })
            .collect(),
    })
}

pub async fn get_price_changes(
    pool: &PgPool,
    mode: ApiMode,
    symbol: &str,
    days: i32,
) -> Result<PriceChangesResponse, AppError> {
    let rows = db::price_queries::fetch_price_changes(pool, symbol, days)
        .await
        .map_err(|e| {
            error!("Failed to fetch price changes for {}: {}", symbol, e);
            AppError::Db(e)
        })?;

    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "No price change data found for {}",
            symbol
        )));
    }

    Ok(PriceChangesResponse {
        symbol: symbol.to_string(),
        price_changes: rows
            .into_iter()
            .map(|r| PriceChangeEntry {
                date: mode.format_date(&r.date),
                current_price: r.price,
                previous_price: r.previous_price,
                change_percent: r.change_percent,
            })
            .collect(),
    })
}
