use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::state::ApiMode;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("{0}")]
    InvalidParam(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
}

impl AppError {
    pub fn status(&self, mode: ApiMode) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidParam(_) => match mode {
                ApiMode::Strict => StatusCode::UNPROCESSABLE_ENTITY,
                ApiMode::Lenient => StatusCode::BAD_REQUEST,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// JSON error body keyed the way `mode` reports errors.
    pub fn into_response_for(self, mode: ApiMode) -> Response {
        let message = match &self {
            AppError::Db(e) => {
                error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = Map::new();
        body.insert(mode.error_key().to_string(), Value::String(message));
        (self.status(mode), Json(Value::Object(body))).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_for(ApiMode::Strict)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}
