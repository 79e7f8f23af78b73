// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use metrics::counter;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::{
    application::dto::session_scrape_request::{
        SessionScrapeRequestDto, SessionScrapeResponseDto,
    },
    config::settings::Settings,
    domain::services::extraction_service::ExtractionService,
    engines::browser_engine::BrowserEngine,
    engines::traits::{HtmlEngine, HtmlRequest},
};

/// 带登录态爬取
///
/// 将请求携带的Cookie注入浏览器后再导航，
/// 可选滚动加载，返回页面可见文本
pub async fn scrape_with_session(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(browser): Extension<Arc<BrowserEngine>>,
    Json(payload): Json<SessionScrapeRequestDto>,
) -> impl IntoResponse {
    let target_url = match payload.target_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Target URL is required"
                })),
            )
                .into_response();
        }
    };

    let cookies = match payload.cookies {
        Some(Value::Array(items)) => items,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Cookies must be an array"
                })),
            )
                .into_response();
        }
    };

    counter!("session_scrape_requests_total").increment(1);

    let scroll = payload.scroll_until_no_new_content.unwrap_or(false);
    let request = HtmlRequest::new(
        target_url,
        Duration::from_secs(settings.browser.navigation_timeout),
    )
    .with_scroll(scroll)
    .with_cookies(cookies);

    match browser.fetch_html(&request).await {
        Ok(page) => {
            let text = ExtractionService::extract_visible_text(&page.content);
            (
                StatusCode::OK,
                Json(SessionScrapeResponseDto { text }),
            )
                .into_response()
        }
        Err(e) => {
            counter!("session_scrape_failures_total").increment(1);
            error!("Session scrape failed for {}: {}", request.url, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Scraping failed",
                    "detail": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
