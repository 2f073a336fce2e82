//! JSON API over the cashbook service.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::application::AppError;

pub use server::{ServerState, router, run, run_with_listener};

mod entries;
mod server;
mod summary;

pub enum ApiError {
    App(AppError),
    Rejected { status: StatusCode, detail: String },
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ApiError::App(AppError::InvalidField(message)) => (StatusCode::BAD_REQUEST, message),
            ApiError::App(AppError::Storage(err)) => {
                tracing::error!("storage error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::Rejected { status, detail } => (status, detail),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            detail: value.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            detail: value.body_text(),
        }
    }
}
