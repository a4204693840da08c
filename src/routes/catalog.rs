use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::models::WelcomeResponse;
use crate::routes::prices::respond;
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/cryptocurrencies", get(list_cryptocurrencies))
}

async fn welcome() -> Json<WelcomeResponse> {
    info!("GET / - welcome");
    Json(WelcomeResponse {
        message: "Welcome to the Cryptocurrency Price API".to_string(),
    })
}

async fn list_cryptocurrencies(State(state): State<AppState>) -> Response {
    info!("GET /cryptocurrencies - distinct symbols");
    respond(state.mode, price_service::list_symbols(&state.pool).await)
}
