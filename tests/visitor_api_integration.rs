//! Visitor API integration tests
//!
//! These tests drive the full router in-process and verify header
//! resolution, recording order and the read-only marker endpoint.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use visitor_map::api;
use visitor_map::config::FrontendConfig;
use visitor_map::storage::{MemoryVisitLog, VisitStore};
use visitor_map::visitor::GeoIpService;

/// Helper to create a router over a fresh, unbounded log
fn create_test_app() -> (Router, Arc<dyn VisitStore>) {
    let visit_log: Arc<dyn VisitStore> = Arc::new(MemoryVisitLog::new());
    let app = api::create_api_router(Arc::clone(&visit_log), None, FrontendConfig::default());
    (app, visit_log)
}

/// Helper to issue a GET and parse the JSON body
async fn get_json(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_cloudflare_headers_are_recorded() {
    let (app, _) = create_test_app();

    let (status, json) = get_json(
        &app,
        "/api/visitor-ip",
        &[("cf-connecting-ip", "203.0.113.7"), ("cf-ipcountry", "DE")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["ip"], "203.0.113.7");
    assert_eq!(records[0]["country"], "DE");

    let time = records[0]["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
}

#[tokio::test]
async fn test_forwarded_for_without_country() {
    let (app, _) = create_test_app();

    let (_, json) = get_json(
        &app,
        "/api/visitor-ip",
        &[("x-forwarded-for", "198.51.100.2, 10.0.0.1")],
    )
    .await;

    assert_eq!(json[0]["ip"], "198.51.100.2");
    assert_eq!(json[0]["country"], "Unknown");
}

#[tokio::test]
async fn test_loopback_is_local() {
    let (app, _) = create_test_app();

    let (_, json) = get_json(
        &app,
        "/api/visitor-ip",
        &[("cf-connecting-ip", "127.0.0.1"), ("cf-ipcountry", "US")],
    )
    .await;

    assert_eq!(json[0]["ip"], "127.0.0.1");
    assert_eq!(json[0]["country"], "Local");
}

#[tokio::test]
async fn test_header_names_are_case_insensitive() {
    let (app, _) = create_test_app();

    let (_, json) = get_json(
        &app,
        "/api/visitor-ip",
        &[("X-Real-IP", "192.0.2.9"), ("X-Vercel-IP-Country", "FR")],
    )
    .await;

    assert_eq!(json[0]["ip"], "192.0.2.9");
    assert_eq!(json[0]["country"], "FR");
}

#[tokio::test]
async fn test_no_headers_yields_sentinels() {
    let (app, _) = create_test_app();

    let (status, json) = get_json(&app, "/api/visitor-ip", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["ip"], "unknown");
    assert_eq!(json[0]["country"], "Unknown");
}

#[tokio::test]
async fn test_visits_are_returned_newest_first() {
    let (app, visit_log) = create_test_app();

    for ip in ["192.0.2.1", "192.0.2.2", "192.0.2.3"] {
        get_json(&app, "/api/visitor-ip", &[("x-real-ip", ip)]).await;
    }

    let (_, json) = get_json(&app, "/api/visitor-ip", &[("x-real-ip", "192.0.2.4")]).await;
    let ips: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ip"].as_str().unwrap())
        .collect();

    assert_eq!(ips, vec!["192.0.2.4", "192.0.2.3", "192.0.2.2", "192.0.2.1"]);
    assert_eq!(visit_log.len(), 4);
}

#[tokio::test]
async fn test_markers_do_not_record_and_skip_local() {
    let (app, visit_log) = create_test_app();

    get_json(
        &app,
        "/api/visitor-ip",
        &[("cf-connecting-ip", "203.0.113.7"), ("cf-ipcountry", "de")],
    )
    .await;
    get_json(&app, "/api/visitor-ip", &[("cf-connecting-ip", "::1")]).await;
    get_json(&app, "/api/visitor-ip", &[("x-real-ip", "198.51.100.2")]).await;

    let (status, json) = get_json(&app, "/api/visitor-markers", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(visit_log.len(), 3);

    let markers = json.as_array().unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["ip"], "198.51.100.2");
    assert_eq!(markers[0]["lat"], 20.0);
    assert_eq!(markers[0]["lng"], 0.0);
    assert_eq!(markers[1]["ip"], "203.0.113.7");
    assert_eq!(markers[1]["lat"], 51.1657);
}

#[tokio::test]
async fn test_geoip_fallback_through_router() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/GeoIP2-Country-Test.mmdb"
    );
    let geoip = Arc::new(GeoIpService::new(Some(path)).unwrap());
    let visit_log: Arc<dyn VisitStore> = Arc::new(MemoryVisitLog::new());
    let app = api::create_api_router(visit_log, Some(geoip), FrontendConfig::default());

    get_json(&app, "/api/visitor-ip", &[("x-forwarded-for", "89.160.20.112, 10.0.0.1")]).await;
    get_json(
        &app,
        "/api/visitor-ip",
        &[("x-real-ip", "81.2.69.160"), ("cf-ipcountry", "NL")],
    )
    .await;
    get_json(&app, "/api/visitor-ip", &[("x-real-ip", "203.0.113.7")]).await;
    let (_, json) = get_json(&app, "/api/visitor-ip", &[("cf-connecting-ip", "127.0.0.1")]).await;

    let countries: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["country"].as_str().unwrap())
        .collect();
    assert_eq!(countries, vec!["Local", "Unknown", "NL", "SE"]);
}

#[tokio::test]
async fn test_health_reports_visit_count() {
    let (app, visit_log) = create_test_app();
    visit_log.record("192.0.2.1".to_string(), "US".to_string());

    let (status, json) = get_json(&app, "/health", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["visits"], 1);
}

#[tokio::test]
async fn test_capped_log_returns_newest_visits() {
    let visit_log: Arc<dyn VisitStore> = Arc::new(MemoryVisitLog::with_capacity(
        std::num::NonZeroUsize::new(2),
    ));
    let app = api::create_api_router(Arc::clone(&visit_log), None, FrontendConfig::default());

    for ip in ["192.0.2.1", "192.0.2.2", "192.0.2.3"] {
        get_json(&app, "/api/visitor-ip", &[("x-real-ip", ip)]).await;
    }

    let records = visit_log.list_newest_first();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].ip, "192.0.2.3");
    assert_eq!(records[1].ip, "192.0.2.2");
}

#[tokio::test]
async fn test_embedded_frontend_is_served() {
    let (app, visit_log) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(visit_log.is_empty(), "serving the page must not record a visit");
}

#[tokio::test]
async fn test_static_dir_overrides_embedded_frontend() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<p>custom</p>").unwrap();

    let visit_log: Arc<dyn VisitStore> = Arc::new(MemoryVisitLog::new());
    let frontend = FrontendConfig {
        static_dir: Some(dir.path().to_string_lossy().into_owned()),
    };
    let app = api::create_api_router(visit_log, None, frontend);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<p>custom</p>");

    // Files missing on disk fall back to the embedded bundle
    let response = app
        .oneshot(
            Request::builder()
                .uri("/missing.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
