mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{get, post_json, test_app};
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

#[tokio::test]
async fn test_create_and_summary() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, body) = post_json(
        &app,
        "/entries",
        json!({
            "type": "income",
            "amount": 100.0,
            "category": "delivery",
            "date": "2025-10-01",
            "note": "test",
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "income");
    assert_eq!(body["id"], 1);
    assert_eq!(body["date"], "2025-10-01");
    assert!(body["created_at"].is_string());

    let (status, _) = post_json(
        &app,
        "/entries",
        json!({
            "type": "expense",
            "amount": 30.0,
            "category": "supplies",
            "date": "2025-10-02",
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, data) = get(&app, "/summary?month=2025-10").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["total_income"], 100.0);
    assert_eq!(data["total_expense"], 30.0);
    assert_eq!(data["balance"], 70.0);

    Ok(())
}

#[tokio::test]
async fn test_routes_are_also_under_api_prefix() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, _) = post_json(
        &app,
        "/api/entries",
        json!({"type": "expense", "amount": 5.0, "date": "2025-10-02"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, entries) = get(&app, "/api/entries").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().map(Vec::len), Some(1));

    let (status, health) = get(&app, "/api/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn test_invalid_type_returns_400_and_persists_nothing() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, body) = post_json(
        &app,
        "/entries",
        json!({"type": "transfer", "amount": 10.0, "date": "2025-10-01"}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "type must be 'income' or 'expense'");

    let (status, entries) = get(&app, "/entries").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_invalid_date_returns_400() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, body) = post_json(
        &app,
        "/entries",
        json!({"type": "income", "amount": 10.0, "date": "2025-13-40"}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "date must be YYYY-MM-DD");

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, body) = post_json(&app, "/entries", json!({"type": "income", "date": "2025-10-01"})).await?;
    assert!(status.is_client_error(), "unexpected status {status}");
    assert!(body["detail"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_order() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    for (kind, amount, date) in [
        ("income", 1.0, "2025-10-01"),
        ("expense", 2.0, "2025-10-03"),
        ("income", 3.0, "2025-10-02"),
        ("expense", 4.0, "2025-11-01"),
    ] {
        let (status, _) = post_json(
            &app,
            "/entries",
            json!({"type": kind, "amount": amount, "date": date}),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, all) = get(&app, "/entries").await?;
    let dates: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-11-01", "2025-10-03", "2025-10-02", "2025-10-01"]);

    let (_, income) = get(&app, "/entries?type=income&start=2025-10-01&end=2025-10-02").await?;
    let amounts: Vec<f64> = income
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![3.0, 1.0]);

    let (_, limited) = get(&app, "/entries?limit=2").await?;
    assert_eq!(limited.as_array().map(Vec::len), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_malformed_list_query_returns_empty() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, _) = post_json(
        &app,
        "/entries",
        json!({"type": "income", "amount": 10.0, "date": "2025-10-01"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    for uri in [
        "/entries?type=transfer",
        "/entries?limit=abc",
        "/entries?limit=-1",
        "/entries?start=yesterday",
        "/entries?start=2025-10",
        "/entries?end=2025-10-%201",
    ] {
        let (status, body) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }

    Ok(())
}

#[tokio::test]
async fn test_summary_missing_type_is_zero() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, _) = post_json(
        &app,
        "/entries",
        json!({"type": "expense", "amount": 12.5, "date": "2025-10-01"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, data) = get(&app, "/summary").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["total_income"], 0.0);
    assert_eq!(data["total_expense"], 12.5);
    assert_eq!(data["balance"], -12.5);

    Ok(())
}

#[tokio::test]
async fn test_summary_malformed_month_returns_400() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    let (status, body) = get(&app, "/summary?month=october").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "month must be a YYYY-MM date prefix");

    let (status, _) = get(&app, "/summary?month=2025/10").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_summary_month_matches_by_prefix() -> Result<()> {
    let (app, _service, _temp) = test_app().await?;

    for (entry_type, amount, date) in [
        ("income", 100.0, "2025-10-01"),
        ("expense", 40.0, "2025-02-10"),
        ("income", 500.0, "2024-10-01"),
    ] {
        let (status, _) = post_json(
            &app,
            "/entries",
            json!({"type": entry_type, "amount": amount, "date": date}),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, year) = get(&app, "/summary?month=2025").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(year["total_income"], 100.0);
    assert_eq!(year["total_expense"], 40.0);
    assert_eq!(year["balance"], 60.0);

    let (_, day) = get(&app, "/summary?month=2024-10-01").await?;
    assert_eq!(day["total_income"], 500.0);
    assert_eq!(day["total_expense"], 0.0);

    Ok(())
}

#[tokio::test]
async fn test_failed_write_returns_500_and_persists_nothing() -> Result<()> {
    let (app, _service, temp) = test_app().await?;

    // a second handle on the same file installs a trigger that aborts every insert
    let options = SqliteConnectOptions::new().filename(temp.path().join("test.db"));
    let pool = SqlitePool::connect_with(options).await?;
    sqlx::query(
        "CREATE TRIGGER reject_entries BEFORE INSERT ON entries \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&pool)
    .await?;
    pool.close().await;

    let (status, body) = post_json(
        &app,
        "/entries",
        json!({"type": "income", "amount": 10.0, "date": "2025-10-01"}),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "internal server error"}));

    let (status, entries) = get(&app, "/entries").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_storage_failure_is_reported_not_masked() -> Result<()> {
    let (app, service, _temp) = test_app().await?;

    service.close().await;

    let (status, body) = get(&app, "/entries").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "internal server error");

    Ok(())
}
