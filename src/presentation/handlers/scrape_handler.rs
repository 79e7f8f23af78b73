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
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::{
    application::dto::{scrape_request::ScrapeRequestDto, scrape_response::ScrapeResponseDto},
    config::settings::Settings,
    domain::services::{export_service::ExportService, extraction_service::ExtractionService},
    engines::browser_engine::BrowserEngine,
    engines::traits::{HtmlEngine, HtmlRequest},
};

/// 整页爬取
///
/// 浏览器加载并自动滚动页面，按标签提取内容，
/// 同时返回JSON与CSV两种形态
pub async fn scrape(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(browser): Extension<Arc<BrowserEngine>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse {
    let url = match payload.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "URL is required"
                })),
            )
                .into_response();
        }
    };

    counter!("scrape_requests_total").increment(1);

    let request = HtmlRequest::new(
        url,
        Duration::from_secs(settings.browser.navigation_timeout),
    )
    .with_scroll(true);

    let page = match browser.fetch_html(&request).await {
        Ok(page) => page,
        Err(e) => {
            counter!("scrape_failures_total").increment(1);
            error!("Scraping failed for {}: {}", request.url, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Scraping failed",
                    "detail": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let data = ExtractionService::extract_by_tag(&page.content);

    let csv = match ExportService::tag_table_csv(&data) {
        Ok(csv) => csv,
        Err(e) => {
            counter!("scrape_failures_total").increment(1);
            error!("CSV export failed for {}: {}", request.url, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Scraping failed",
                    "detail": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let response = ScrapeResponseDto {
        json_by_tag: ExportService::json_by_tag(&data),
        json_for_ui: ExportService::flatten_for_ui(&data),
        csv,
    };

    (StatusCode::OK, Json(response)).into_response()
}
