// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use scraprs::config::settings::{
    BrowserSettings, MetricsSettings, PickerSettings, ScrollSettings, SecuritySettings,
    ServerSettings, Settings,
};
use scraprs::infrastructure::session::store::SessionStore;
use scraprs::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_PAGE: &str = r#"
    <html>
        <head><title>Shop</title></head>
        <body>
            <h1>Catalog</h1>
            <div class="item"><a href="/one" title="One" data-id="1">First item</a></div>
            <div class="item"><a href="/two">Second item</a></div>
        </body>
    </html>
"#;

/// 测试配置
///
/// 允许访问回环地址以便针对wiremock执行真实抓取
fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        browser: BrowserSettings {
            headless: true,
            remote_debugging_url: None,
            navigation_timeout: 5,
            request_timeout: 5,
        },
        scroll: ScrollSettings {
            max_scrolls: 2,
            min_delay_ms: 1,
            max_delay_ms: 2,
            settle_min_delay_ms: 1,
            settle_max_delay_ms: 2,
        },
        picker: PickerSettings { session_timeout: 5 },
        metrics: MetricsSettings {
            enabled: false,
            addr: "0.0.0.0:9000".to_string(),
        },
        security: SecuritySettings {
            allow_private_networks: true,
        },
    }
}

fn test_server() -> TestServer {
    let settings = Arc::new(test_settings());
    let store = Arc::new(SessionStore::new());
    TestServer::new(routes::routes(settings, store)).unwrap()
}

async fn mock_page(html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_health_and_version() {
    let server = test_server();

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(health.text(), "OK");

    let version = server.get("/v1/version").await;
    assert_eq!(version.status_code(), 200);
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_scrape_requires_url() {
    let server = test_server();

    let response = server.post("/v1/scrape").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "URL is required");

    let response = server.post("/v1/scrape").json(&json!({ "url": "  " })).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_selector_requires_url_and_selector() {
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({ "selector": ".item" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "A valid URL is required");

    let response = server
        .post("/v1/selector")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "CSS selector is required");

    let response = server
        .post("/v1/selector")
        .json(&json!({ "url": "not a url", "selector": ".item" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("A valid URL is required"));
}

#[tokio::test]
async fn test_selector_static_extracts_records() {
    let page = mock_page(PRODUCT_PAGE).await;
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({
            "url": format!("{}/page", page.uri()),
            "selector": ".item a",
            "dynamic": false
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "OK");
    assert_eq!(body["count"], 2);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows[0]["tag_name"], "a");
    assert_eq!(rows[0]["text_content"], "First item");
    assert_eq!(rows[0]["href"], "/one");
    assert_eq!(rows[0]["title"], "One");
    assert_eq!(rows[0]["src"], "");
    assert_eq!(rows[0]["data_id"], "1");
    assert_eq!(rows[1]["href"], "/two");
}

#[tokio::test]
async fn test_selector_static_csv_download() {
    let page = mock_page(PRODUCT_PAGE).await;
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({
            "url": format!("{}/page", page.uri()),
            "selector": ".item a",
            "dynamic": false,
            "format": "csv"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains("selector_mode_"));

    let csv = response.text();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "tag_name,text_content,href,src,title,alt,data_id"
    );
    assert_eq!(lines.next().unwrap(), "a,First item,/one,,One,,1");
    assert_eq!(lines.next().unwrap(), "a,Second item,/two,,,,");
}

#[tokio::test]
async fn test_selector_reports_no_matches() {
    let page = mock_page(PRODUCT_PAGE).await;
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({
            "url": format!("{}/page", page.uri()),
            "selector": ".missing",
            "dynamic": false
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "No matches found");
    assert_eq!(body["count"], 0);
    assert!(body["rows"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_selector_maps_fetch_failure_to_bad_request() {
    let page = mock_page(PRODUCT_PAGE).await;
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({
            "url": format!("{}/missing", page.uri()),
            "selector": ".item",
            "dynamic": false
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Fetch failed with status 404"));
}

#[tokio::test]
async fn test_selector_rejects_invalid_selector() {
    let page = mock_page(PRODUCT_PAGE).await;
    let server = test_server();

    let response = server
        .post("/v1/selector")
        .json(&json!({
            "url": format!("{}/page", page.uri()),
            "selector": "div[",
            "dynamic": false
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("invalid selector"));
}

#[tokio::test]
async fn test_scrape_login_validates_input() {
    let server = test_server();

    let response = server.post("/v1/scrape-login").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Target URL is required");

    let response = server
        .post("/v1/scrape-login")
        .json(&json!({ "targetUrl": "https://example.com", "cookies": "nope" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Cookies must be an array");
}

#[tokio::test]
async fn test_mouse_mode_requires_url() {
    let server = test_server();

    let response = server.post("/v1/mouse-mode").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "URL is required");
}

#[tokio::test]
async fn test_mouse_mode_progress_for_unknown_session() {
    let server = test_server();

    let response = server.get("/v1/mouse-mode?sessionId=1700000000000").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["selectedElements"].as_array().unwrap().is_empty());

    // no sessionId falls back to the default session, which is also empty
    let response = server.get("/v1/mouse-mode").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["selectedElements"].as_array().unwrap().is_empty());
}
