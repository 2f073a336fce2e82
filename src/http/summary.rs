//! Summary API endpoint

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::domain::Summary;

use super::{ApiError, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<String>,
}

pub async fn get(
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<Summary>, ApiError> {
    let Query(query) = query?;
    let summary = state.service.summary(query.month.as_deref()).await?;
    Ok(Json(summary))
}
