use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::routes::params::{self, CHANGE_DAYS, MONTHS, PRICES_LIMIT};
use crate::services::price_service::{self, PriceFilter};
use crate::state::{ApiMode, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prices/:symbol", get(get_prices))
        .route("/statistics/:symbol", get(get_statistics))
        .route("/monthly-analysis/:symbol", get(get_monthly_analysis))
        .route("/price-changes/:symbol", get(get_price_changes))
}

// Parameters arrive as raw strings so each API mode can report bad input its own way.

#[derive(Debug, Default, Deserialize)]
pub struct PricesParams {
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyParams {
    months: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeParams {
    days: Option<String>,
}

pub(crate) fn respond<T: Serialize>(mode: ApiMode, result: Result<T, AppError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response_for(mode),
    }
}

async fn get_prices(
    Path(symbol): Path<String>,
    Query(params): Query<PricesParams>,
    State(state): State<AppState>,
) -> Response {
    info!("GET /prices/{} - price history", symbol);
    let result = async {
        let filter = PriceFilter {
            start: params::resolve_date("start_date", params.start_date.as_deref())?,
            end: params::resolve_date("end_date", params.end_date.as_deref())?,
            limit: PRICES_LIMIT.resolve(state.mode, params.limit.as_deref())?,
        };
        price_service::get_prices(&state.pool, state.mode, &symbol, filter).await
    }
    .await;
    respond(state.mode, result)
}

async fn get_statistics(Path(symbol): Path<String>, State(state): State<AppState>) -> Response {
    info!("GET /statistics/{} - summary statistics", symbol);
    let result = price_service::get_statistics(&state.pool, state.mode, &symbol).await;
    respond(state.mode, result)
}

async fn get_monthly_analysis(
    Path(symbol): Path<String>,
    Query(params): Query<MonthlyParams>,
    State(state): State<AppState>,
) -> Response {
    info!("GET /monthly-analysis/{} - monthly aggregates", symbol);
    let result = async {
        let months = MONTHS.resolve(state.mode, params.months.as_deref())?;
        price_service::get_monthly_analysis(&state.pool, state.mode, &symbol, months).await
    }
    .await;
    respond(state.mode, result)
}

async fn get_price_changes(
    Path(symbol): Path<String>,
    Query(params): Query<ChangeParams>,
    State(state): State<AppState>,
) -> Response {
    info!("GET /price-changes/{} - lagged price changes", symbol);
    let result = async {
        let days = CHANGE_DAYS.resolve(state.mode, params.days.as_deref())?;
        // bounded by CHANGE_DAYS.max, fits in i32
        price_service::get_price_changes(&state.pool, state.mode, &symbol, days as i32).await
    }
    .await;
    respond(state.mode, result)
}
