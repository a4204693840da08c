use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{catalog, dashboard, health, prices};
use crate::state::{AppState, DashboardState};

/// Query API. Any origin may call it.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .merge(catalog::router())
        .merge(prices::router())
        .nest("/health", health::router())
        .layer(cors)
        .with_state(state)
}

pub fn create_dashboard(state: DashboardState) -> Router {
    Router::<DashboardState>::new()
        .merge(dashboard::router())
        .nest("/health", health::router())
        .with_state(state)
}
