use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::domain::{MONTHLY_ANALYSIS_FILE, OVERALL_STATISTICS_FILE, WEEKLY_CHANGES_FILE};
use crate::models::price_observation::csv_timestamp;
use crate::models::{MonthlyAggregate, OverallStatistic, WeeklyChange};
use crate::services::backup_service::read_csv;

/// Rows shown in the weekly change and price range panels.
const RECENT_ROWS: usize = 12;

pub const OVERALL_COLUMNS: [&str; 6] = [
    "symbol",
    "count",
    "average_price",
    "volatility",
    "lowest_price",
    "highest_price",
];

/// The analyzer output the dashboard draws from.
#[derive(Debug, Clone, Default)]
pub struct DerivedViews {
    pub monthly: Vec<MonthlyAggregate>,
    pub overall: Vec<OverallStatistic>,
    pub weekly: Vec<WeeklyChange>,
}

pub fn load_derived_views(data_dir: &Path) -> Result<DerivedViews> {
    Ok(DerivedViews {
        monthly: read_csv(&data_dir.join(MONTHLY_ANALYSIS_FILE))?,
        overall: read_csv(&data_dir.join(OVERALL_STATISTICS_FILE))?,
        weekly: read_csv(&data_dir.join(WEEKLY_CHANGES_FILE))?,
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyTrendsFigure {
    pub months: Vec<String>,
    pub average_price: Vec<f64>,
    pub highest_price: Vec<f64>,
    pub lowest_price: Vec<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StatisticsTableFigure {
    pub columns: Vec<&'static str>,
    pub rows: Vec<OverallStatistic>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeeklyChangesFigure {
    pub dates: Vec<String>,
    pub price_change_pct: Vec<Option<f64>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PriceRangeFigure {
    pub months: Vec<String>,
    pub price_range: Vec<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardFigures {
    pub symbol: String,
    pub monthly_trends: MonthlyTrendsFigure,
    pub overall_statistics: StatisticsTableFigure,
    pub weekly_changes: WeeklyChangesFigure,
    pub price_ranges: PriceRangeFigure,
}

fn last_n<T>(rows: Vec<T>, n: usize) -> Vec<T> {
    let skip = rows.len().saturating_sub(n);
    rows.into_iter().skip(skip).collect()
}

/// Data for the four dashboard panels of `symbol`. The statistics table always
/// covers every symbol; an unknown symbol leaves the other panels empty.
pub fn build_figures(views: &DerivedViews, symbol: &str) -> DashboardFigures {
    let monthly: Vec<&MonthlyAggregate> = views.monthly.iter().filter(|m| m.symbol == symbol).collect();
    let weekly: Vec<&WeeklyChange> = views.weekly.iter().filter(|w| w.symbol == symbol).collect();
    let recent_monthly = last_n(monthly.clone(), RECENT_ROWS);
    let recent_weekly = last_n(weekly, RECENT_ROWS);

    DashboardFigures {
        symbol: symbol.to_string(),
        monthly_trends: MonthlyTrendsFigure {
            months: monthly.iter().map(|m| m.month.clone()).collect(),
            average_price: monthly.iter().map(|m| m.average_price).collect(),
            highest_price: monthly.iter().map(|m| m.highest_price).collect(),
            lowest_price: monthly.iter().map(|m| m.lowest_price).collect(),
        },
        overall_statistics: StatisticsTableFigure {
            columns: OVERALL_COLUMNS.to_vec(),
            rows: views.overall.clone(),
        },
        weekly_changes: WeeklyChangesFigure {
            dates: recent_weekly.iter().map(|w| csv_timestamp::format(&w.date)).collect(),
            price_change_pct: recent_weekly.iter().map(|w| w.price_change_pct).collect(),
        },
        price_ranges: PriceRangeFigure {
            months: recent_monthly.iter().map(|m| m.month.clone()).collect(),
            price_range: recent_monthly.iter().map(|m| m.price_range).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn views() -> DerivedViews {
        let monthly = (1..=14)
            .map(|m| MonthlyAggregate {
                symbol: "BTCUSDT".to_string(),
                month: format!("{}-{:02}", 2023 + (m - 1) / 12, (m - 1) % 12 + 1),
                average_price: m as f64,
                highest_price: m as f64 + 1.0,
                lowest_price: m as f64 - 1.0,
                price_range: 2.0,
            })
            .collect();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap();
        let weekly = (0..20)
            .map(|d| WeeklyChange {
                symbol: "BTCUSDT".to_string(),
                date: t + Duration::days(d),
                current_price: 1.0,
                price_7_days_ago: 1.0,
                price_change_pct: Some(d as f64),
            })
            .collect();
        let overall = vec![OverallStatistic {
            symbol: "BTCUSDT".to_string(),
            count: 20,
            average_price: 1.0,
            volatility: None,
            lowest_price: 1.0,
            highest_price: 1.0,
        }];
        DerivedViews { monthly, overall, weekly }
    }

    #[test]
    fn test_figures_keep_recent_rows() {
        let figures = build_figures(&views(), "BTCUSDT");

        assert_eq!(figures.monthly_trends.months.len(), 14);
        assert_eq!(figures.price_ranges.months.len(), 12);
        assert_eq!(figures.price_ranges.months[0], "2023-03");
        assert_eq!(figures.weekly_changes.dates.len(), 12);
        assert_eq!(figures.weekly_changes.price_change_pct.last(), Some(&Some(19.0)));
        assert_eq!(figures.overall_statistics.rows.len(), 1);
    }

    #[test]
    fn test_unknown_symbol_leaves_panels_empty() {
        let figures = build_figures(&views(), "XRPUSDT");

        assert!(figures.monthly_trends.months.is_empty());
        assert!(figures.weekly_changes.dates.is_empty());
        assert!(figures.price_ranges.price_range.is_empty());
        assert_eq!(figures.overall_statistics.rows.len(), 1);
    }
}
