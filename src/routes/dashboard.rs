use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::TradingPair;
use crate::errors::AppError;
use crate::services::dashboard_service;
use crate::state::DashboardState;

const DEFAULT_SYMBOL: &str = "BTCUSDT";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    pairs: &'a [TradingPair],
    selected: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct FigureParams {
    symbol: Option<String>,
}

pub fn router() -> Router<DashboardState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/figures", get(figures))
}

async fn dashboard_page(State(state): State<DashboardState>) -> Response {
    info!("GET / - dashboard");
    let selected = state
        .pairs
        .iter()
        .map(|p| p.symbol.as_str())
        .find(|s| *s == DEFAULT_SYMBOL)
        .or_else(|| state.pairs.first().map(|p| p.symbol.as_str()))
        .unwrap_or(DEFAULT_SYMBOL);

    let page = DashboardTemplate {
        pairs: &state.pairs,
        selected,
    };
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("Failed to render dashboard: {}", e);
            AppError::Unavailable("Dashboard could not be rendered".to_string()).into_response()
        }
    }
}

async fn figures(
    Query(params): Query<FigureParams>,
    State(state): State<DashboardState>,
) -> Response {
    let symbol = params
        .symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
    info!("GET /api/figures - {}", symbol);

    // Re-read on every request so a fresh `analyze` run shows up without a restart.
    let data_dir = state.data_dir.clone();
    let loaded =
        tokio::task::spawn_blocking(move || dashboard_service::load_derived_views(&data_dir)).await;

    match loaded {
        Ok(Ok(views)) => Json(dashboard_service::build_figures(&views, &symbol)).into_response(),
        Ok(Err(e)) => {
            warn!("Analysis output unavailable: {:#}", e);
            AppError::Unavailable(
                "Analysis results not found. Run the `analyze` command first.".to_string(),
            )
            .into_response()
        }
        Err(e) => {
            warn!("Loading analysis output panicked: {}", e);
            AppError::Unavailable("Analysis results could not be loaded".to_string()).into_response()
        }
    }
}
