// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use cashbook::application::{CashbookService, NewEntryRequest};
use cashbook::config::StorageConfig;
use cashbook::domain::Entry;
use cashbook::http::{ServerState, router};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(CashbookService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = StorageConfig::new(temp_dir.path().join("test.db"));
    let service = CashbookService::init(&config).await?;
    Ok((service, temp_dir))
}

/// Helper to build an entry-creation payload
pub fn request(entry_type: &str, amount: f64, date: &str) -> NewEntryRequest {
    NewEntryRequest {
        entry_type: entry_type.to_string(),
        amount,
        category: None,
        date: date.to_string(),
        note: None,
    }
}

/// Record an entry, failing the test on any error
pub async fn record(
    service: &CashbookService,
    entry_type: &str,
    amount: f64,
    date: &str,
) -> Result<Entry> {
    Ok(service.create_entry(request(entry_type, amount, date)).await?)
}

/// Router over a fresh temporary database
pub async fn test_app() -> Result<(Router, CashbookService, TempDir)> {
    let (service, temp) = test_service().await?;
    let app = router(ServerState::new(service.clone()), None);
    Ok((app, service, temp))
}

pub async fn get(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    read_json(response).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    read_json(response).await
}

async fn read_json(response: Response<Body>) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}
