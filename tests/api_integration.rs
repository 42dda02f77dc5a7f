//! API Integration Tests for litebench
//!
//! Runs the real server on an ephemeral port over a SQLite file.

use axum::http::StatusCode;
use litebench::server::{AppState, FLY_REPLAY, create_router};
use litebench::{DatabaseDriver, StorageBuilder, StorageHandles};
use reqwest::redirect::Policy;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

// =============================================================================
// Test Helpers
// =============================================================================

/// Start test server and return base URL.
async fn start_test_server(region_env: &str) -> (String, StorageHandles, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    let db_path = dir.path().join("api.db");

    let handles = StorageBuilder::new(DatabaseDriver::Sqlite, db_path.to_str().unwrap())
        .build()
        .await
        .expect("Failed to build storage");

    let state = AppState::new(handles.persons.clone()).with_region_env(region_env);
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), handles, dir)
}

/// Client that reports redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

async fn list_text(client: &reqwest::Client, base_url: &str) -> String {
    let resp = client
        .get(format!("{}/", base_url))
        .header("accept", "text/plain")
        .send()
        .await
        .expect("Failed to fetch index");
    assert_eq!(resp.status(), StatusCode::OK.as_u16());
    resp.text().await.expect("Failed to read index body")
}

// =============================================================================
// Health Probe Tests
// =============================================================================

#[tokio::test]
async fn test_healthz() {
    let (base_url, handles, _dir) = start_test_server("LITEBENCH_IT_REGION_UNSET").await;

    let resp = client()
        .get(format!("{}/healthz", base_url))
        .send()
        .await
        .expect("Failed to send healthz request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("Failed to parse healthz response");
    assert_eq!(body["status"], "ok");

    handles.shutdown().await;
}

// =============================================================================
// Generate + List Tests
// =============================================================================

#[tokio::test]
async fn test_generated_person_is_listed_first() {
    let (base_url, handles, _dir) = start_test_server("LITEBENCH_IT_REGION_UNSET").await;
    let client = client();

    assert_eq!(list_text(&client, &base_url).await, "REGION: \n\n");

    let referer = format!("{}/", base_url);
    let resp = client
        .post(format!("{}/generate", base_url))
        .header("referer", &referer)
        .send()
        .await
        .expect("Failed to generate");
    assert_eq!(resp.status(), StatusCode::FOUND.as_u16());
    assert_eq!(resp.headers()["location"], referer.as_str());

    let body = list_text(&client, &base_url).await;
    let lines: Vec<&str> = body.lines().skip(2).collect();
    assert_eq!(lines.len(), 1);

    let latest = handles.persons.latest(10).await.unwrap();
    let expected = format!(
        "- {} @ {} ({})",
        latest[0].name, latest[0].company, latest[0].phone
    );
    assert_eq!(lines[0], expected);

    handles.shutdown().await;
}

#[tokio::test]
async fn test_list_caps_at_ten_newest() {
    let (base_url, handles, _dir) = start_test_server("LITEBENCH_IT_REGION_UNSET").await;
    let client = client();

    for _ in 0..12 {
        let resp = client
            .post(format!("{}/generate", base_url))
            .send()
            .await
            .expect("Failed to generate");
        assert_eq!(resp.status(), StatusCode::FOUND.as_u16());
    }

    let body = list_text(&client, &base_url).await;
    assert_eq!(body.lines().filter(|l| l.starts_with("- ")).count(), 10);

    let html = client
        .get(format!("{}/", base_url))
        .send()
        .await
        .expect("Failed to fetch html");
    assert_eq!(html.status(), 200);
    assert!(
        html.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    handles.shutdown().await;
}

#[tokio::test]
async fn test_generate_method_not_allowed() {
    let (base_url, handles, _dir) = start_test_server("LITEBENCH_IT_REGION_UNSET").await;
    let client = client();

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let resp = client
            .request(method, format!("{}/generate", base_url))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED.as_u16());
    }

    assert!(handles.persons.latest(10).await.unwrap().is_empty());

    handles.shutdown().await;
}

// =============================================================================
// Region Redirect Tests
// =============================================================================

#[tokio::test]
async fn test_region_redirect() {
    // SAFETY: Variable name is unique to this test.
    unsafe {
        std::env::set_var("LITEBENCH_IT_REGION", "iad");
    }
    let (base_url, handles, _dir) = start_test_server("LITEBENCH_IT_REGION").await;
    let client = client();

    let resp = client
        .get(format!("{}/?region=fra", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT.as_u16());
    assert_eq!(resp.headers()[FLY_REPLAY.as_str()], "region=fra");

    let resp = client
        .get(format!("{}/?region=iad", base_url))
        .header("accept", "text/plain")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().starts_with("REGION: iad"));

    handles.shutdown().await;
}
