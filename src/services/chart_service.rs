use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use askama::Template;
use serde::Serialize;

use crate::models::price_observation::csv_timestamp;
use crate::models::PriceObservation;

#[derive(Template)]
#[template(path = "price_trends.html")]
struct PriceTrendsTemplate {
    title: String,
    traces_json: String,
}

/// One plotly.js line trace.
#[derive(Debug, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
}

/// One trace per symbol, points ordered by date.
pub fn price_traces(observations: &[PriceObservation]) -> Vec<LineTrace> {
    let mut by_symbol: BTreeMap<&str, Vec<&PriceObservation>> = BTreeMap::new();
    for o in observations {
        by_symbol.entry(o.symbol.as_str()).or_default().push(o);
    }

    by_symbol
        .into_iter()
        .map(|(symbol, mut series)| {
            series.sort_by_key(|o| o.date);
            LineTrace {
                name: symbol.to_string(),
                x: series.iter().map(|o| csv_timestamp::format(&o.date)).collect(),
                y: series
                    .iter()
                    .map(|o| o.price.to_string().parse().unwrap_or(f64::NAN))
                    .collect(),
                kind: "scatter",
                mode: "lines",
            }
        })
        .collect()
}

pub fn render_price_trends(observations: &[PriceObservation]) -> Result<String> {
    let traces_json = serde_json::to_string(&price_traces(observations))
        .context("Failed to serialize chart traces")?;

    PriceTrendsTemplate {
        title: "Cryptocurrency Price Trends".to_string(),
        traces_json,
    }
    .render()
    .context("Failed to render price trend chart")
}

pub fn write_price_trends(path: &Path, observations: &[PriceObservation]) -> Result<()> {
    let html = render_price_trends(observations)?;
    std::fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))
}
