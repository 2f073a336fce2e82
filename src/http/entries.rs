//! Entries API endpoints

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use crate::application::{EntryQuery, NewEntryRequest};
use crate::domain::Entry;

use super::{ApiError, server::ServerState};

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<NewEntryRequest>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    let Json(request) = payload?;
    let entry = state.service.create_entry(request).await?;
    Ok(Json(entry))
}

/// A malformed filter yields an empty list; a storage failure is still an error.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<EntryQuery>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let filter = match query {
        Ok(Query(query)) => query.into_filter().map_err(|err| err.to_string()),
        Err(rejection) => Err(rejection.body_text()),
    };

    let filter = match filter {
        Ok(filter) => filter,
        Err(reason) => {
            tracing::warn!(%reason, "ignoring malformed entry filter");
            return Ok(Json(Vec::new()));
        }
    };

    let entries = state.service.list_entries(&filter).await?;
    Ok(Json(entries))
}
