//! Tests for the data-fair fetcher, driven against a local stub server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use dpesync::config::{FetchConfig, SourceConfig};
use dpesync::datafetch::{DataFairFetcher, DataFetchError, RecordFetcher};
use serde_json::{json, Value};

type CapturedQuery = Arc<Mutex<Option<HashMap<String, String>>>>;

async fn spawn_stub(router: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://{}", addr))
}

/// Stub `lines` endpoint that records the query string it was called with.
fn lines_stub(results: Value) -> (Router, CapturedQuery) {
    let captured: CapturedQuery = Arc::new(Mutex::new(None));
    let state = captured.clone();
    let router = Router::new().route(
        "/lines",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let state = state.clone();
            let results = results.clone();
            async move {
                *state.lock().unwrap() = Some(params);
                Json(json!({ "results": results }))
            }
        }),
    );
    (router, captured)
}

fn fetch_config(page_size: usize) -> FetchConfig {
    FetchConfig {
        page_size,
        timeout_secs: 5,
        region_prefix: "73".to_string(),
        region_field: "code_postal_ban".to_string(),
    }
}

fn source(base: &str) -> SourceConfig {
    SourceConfig {
        label: "existants".to_string(),
        url: format!("{}/lines", base),
        tag: "Ancien".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_contract_with_watermark() -> Result<()> {
    let (router, captured) = lines_stub(json!([{"numero_dpe": "DPE-1"}]));
    let base = spawn_stub(router).await?;

    let fetcher = DataFairFetcher::new(&fetch_config(1200), "date_reception_dpe");
    let since = NaiveDate::from_ymd_opt(2024, 1, 10);
    let page = fetcher.fetch_newer(&source(&base), since).await?;

    assert_eq!(page.len(), 1);
    assert!(!page.at_cap);

    let params = captured.lock().unwrap().clone().expect("stub was called");
    assert_eq!(params["q"], "73*");
    assert_eq!(params["q_fields"], "code_postal_ban");
    assert_eq!(params["size"], "1200");
    assert_eq!(params["sort"], "date_reception_dpe");
    assert_eq!(params["qs"], "date_reception_dpe:{2024-01-10 TO *]");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_without_watermark_omits_range_filter() -> Result<()> {
    let (router, captured) = lines_stub(json!([]));
    let base = spawn_stub(router).await?;

    let fetcher = DataFairFetcher::new(&fetch_config(1200), "date_reception_dpe");
    let page = fetcher.fetch_newer(&source(&base), None).await?;

    assert!(page.is_empty());

    let params = captured.lock().unwrap().clone().expect("stub was called");
    assert!(!params.contains_key("qs"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_page_sets_at_cap() -> Result<()> {
    let (router, _captured) = lines_stub(json!([
        {"numero_dpe": "DPE-1"},
        {"numero_dpe": "DPE-2"},
    ]));
    let base = spawn_stub(router).await?;

    let fetcher = DataFairFetcher::new(&fetch_config(2), "date_reception_dpe");
    let page = fetcher.fetch_newer(&source(&base), None).await?;

    assert_eq!(page.len(), 2);
    assert!(page.at_cap);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_maps_to_status() -> Result<()> {
    let router = Router::new().route(
        "/lines",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_stub(router).await?;

    let fetcher = DataFairFetcher::new(&fetch_config(1200), "date_reception_dpe");
    let err = fetcher
        .fetch_newer(&source(&base), None)
        .await
        .expect_err("5xx must fail the fetch");

    assert!(matches!(
        err,
        DataFetchError::Status { status: 500, ref source } if source == "existants"
    ));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_body_maps_to_decode() -> Result<()> {
    let router = Router::new().route("/lines", get(|| async { "this is not json" }));
    let base = spawn_stub(router).await?;

    let fetcher = DataFairFetcher::new(&fetch_config(1200), "date_reception_dpe");
    let err = fetcher
        .fetch_newer(&source(&base), None)
        .await
        .expect_err("malformed body must fail the fetch");

    assert!(matches!(err, DataFetchError::Decode { ref source, .. } if source == "existants"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_source_maps_to_request_error() -> Result<()> {
    // Nothing listens on this port
    let fetcher = DataFairFetcher::new(&fetch_config(1200), "date_reception_dpe");
    let err = fetcher
        .fetch_newer(&source("http://127.0.0.1:1"), None)
        .await
        .expect_err("unreachable source must fail the fetch");

    assert!(matches!(err, DataFetchError::Request { ref source, .. } if source == "existants"));

    Ok(())
}
