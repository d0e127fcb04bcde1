mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "clinical-service");
}

#[tokio::test]
async fn metrics_endpoint_exposes_icu_ticks() {
    let app = TestApp::spawn().await;

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    let response = app.get("/metrics").await;

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("clinical_icu_ticks_total"));
}
