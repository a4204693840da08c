//! Derived views over the CSV backups.
//!
//! Every run recomputes the monthly, overall and weekly views from scratch and
//! overwrites the derived CSV files. Nothing is read back from the database.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use bigdecimal::BigDecimal;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    MONTHLY_ANALYSIS_FILE, OVERALL_STATISTICS_FILE, PRICE_TRENDS_FILE, WEEKLY_CHANGES_FILE,
    WEEKLY_LAG,
};
use crate::models::{MonthlyAggregate, OverallStatistic, PriceObservation, WeeklyChange};
use crate::services::{backup_service, chart_service};

const TAIL_ROWS: usize = 5;

/// Rounds to cents, ties to even (`1.125` becomes `1.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// Goes through the decimal string so the f64 is the closest one to the exact value.
fn price_f64(price: &BigDecimal) -> f64 {
    price.to_string().parse().unwrap_or(f64::NAN)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); `None` below two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    })
}

/// Average, highest and lowest price per symbol and calendar month (UTC).
/// The range is taken between the rounded highest and lowest prices.
pub fn monthly_analysis(observations: &[PriceObservation]) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for o in observations {
        groups
            .entry((o.symbol.clone(), o.date.format("%Y-%m").to_string()))
            .or_default()
            .push(price_f64(&o.price));
    }

    groups
        .into_iter()
        .map(|((symbol, month), prices)| {
            let (lo, hi) = min_max(&prices);
            let highest_price = round2(hi);
            let lowest_price = round2(lo);
            MonthlyAggregate {
                symbol,
                month,
                average_price: round2(mean(&prices)),
                highest_price,
                lowest_price,
                price_range: round2(highest_price - lowest_price),
            }
        })
        .collect()
}

pub fn price_statistics(observations: &[PriceObservation]) -> Vec<OverallStatistic> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for o in observations {
        groups.entry(o.symbol.clone()).or_default().push(price_f64(&o.price));
    }

    groups
        .into_iter()
        .map(|(symbol, prices)| {
            let (lo, hi) = min_max(&prices);
            OverallStatistic {
                symbol,
                count: prices.len(),
                average_price: round2(mean(&prices)),
                volatility: sample_std(&prices).map(round2),
                lowest_price: round2(lo),
                highest_price: round2(hi),
            }
        })
        .collect()
}

/// Change against the observation `WEEKLY_LAG` rows earlier within the same symbol.
/// Rows without a lagged value are dropped.
pub fn weekly_price_changes(observations: &[PriceObservation]) -> Vec<WeeklyChange> {
    let mut by_symbol: BTreeMap<&str, Vec<&PriceObservation>> = BTreeMap::new();
    for o in observations {
        by_symbol.entry(o.symbol.as_str()).or_default().push(o);
    }

    let mut changes = Vec::new();
    for (symbol, mut series) in by_symbol {
        series.sort_by_key(|o| o.date);

        for window in series.windows(WEEKLY_LAG + 1) {
            let previous = price_f64(&window[0].price);
            let current_obs = window[WEEKLY_LAG];
            let current = price_f64(&current_obs.price);

            let price_change_pct =
                (previous != 0.0).then(|| round2((current - previous) / previous * 100.0));

            changes.push(WeeklyChange {
                symbol: symbol.to_string(),
                date: current_obs.date,
                current_price: current,
                price_7_days_ago: previous,
                price_change_pct,
            });
        }
    }
    changes
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub observations: usize,
    pub monthly: Vec<MonthlyAggregate>,
    pub overall: Vec<OverallStatistic>,
    pub weekly: Vec<WeeklyChange>,
    pub written: Vec<PathBuf>,
}

fn tail<T>(rows: &[T], n: usize) -> &[T] {
    &rows[rows.len().saturating_sub(n)..]
}

/// Loads the backups, computes every view and writes the derived CSVs and the trend chart.
pub fn run_analysis(config: &AppConfig) -> Result<AnalysisReport> {
    info!("Loading cryptocurrency data from {:?}", config.data_dir);
    let observations =
        backup_service::load_backups(&config.data_dir, &config.pairs, config.collector.sample_time)?;

    info!("Calculating monthly statistics...");
    let monthly = monthly_analysis(&observations);
    for row in tail(&monthly, TAIL_ROWS) {
        info!(?row, "monthly");
    }

    info!("Calculating overall price statistics...");
    let overall = price_statistics(&observations);
    for row in &overall {
        info!(?row, "overall");
    }

    info!("Calculating weekly price changes...");
    let weekly = weekly_price_changes(&observations);
    for row in tail(&weekly, TAIL_ROWS) {
        info!(?row, "weekly");
    }

    let dir = &config.data_dir;
    let monthly_path = dir.join(MONTHLY_ANALYSIS_FILE);
    let overall_path = dir.join(OVERALL_STATISTICS_FILE);
    let weekly_path = dir.join(WEEKLY_CHANGES_FILE);
    let chart_path = dir.join(PRICE_TRENDS_FILE);

    backup_service::write_csv(&monthly_path, &monthly)?;
    backup_service::write_csv(&overall_path, &overall)?;
    backup_service::write_csv(&weekly_path, &weekly)?;
    chart_service::write_price_trends(&chart_path, &observations)?;

    info!("✅ Analysis complete, results in {:?}", dir);

    Ok(AnalysisReport {
        observations: observations.len(),
        monthly,
        overall,
        weekly,
        written: vec![monthly_path, overall_path, weekly_path, chart_path],
    })
}
