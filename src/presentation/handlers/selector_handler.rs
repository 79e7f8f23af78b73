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
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use validator::Validate;

use crate::{
    application::dto::selector_request::{OutputFormat, SelectorRequestDto, SelectorResponseDto},
    config::settings::Settings,
    domain::services::{export_service::ExportService, extraction_service::ExtractionService},
    engines::browser_engine::BrowserEngine,
    engines::fetch_engine::FetchEngine,
    engines::traits::{HtmlEngine, HtmlRequest},
};

/// 按CSS选择器提取
///
/// dynamic为true时走浏览器渲染并自动滚动，否则走静态抓取；
/// 结果按请求的格式返回JSON或CSV附件。
/// 该端点的所有失败统一映射为400
pub async fn extract(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(browser): Extension<Arc<BrowserEngine>>,
    Extension(fetch): Extension<Arc<FetchEngine>>,
    Json(payload): Json<SelectorRequestDto>,
) -> Response {
    counter!("selector_requests_total").increment(1);

    let url = match payload.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return bad_request("A valid URL is required"),
    };
    let selector = match payload.selector.as_deref().map(str::trim) {
        Some(selector) if !selector.is_empty() => selector.to_string(),
        _ => return bad_request("CSS selector is required"),
    };
    if let Err(e) = payload.validate() {
        return bad_request(&e.to_string().replace('\n', "; "));
    }

    let dynamic = payload.dynamic.unwrap_or(true);
    let attributes = payload
        .attributes
        .clone()
        .unwrap_or_else(SelectorRequestDto::default_attributes);
    let format = payload.format.unwrap_or(OutputFormat::Json);

    let request = HtmlRequest::new(
        url,
        Duration::from_secs(settings.browser.navigation_timeout),
    )
    .with_scroll(dynamic);

    let engine: &dyn HtmlEngine = if dynamic {
        browser.as_ref()
    } else {
        fetch.as_ref()
    };

    let page = match engine.fetch_html(&request).await {
        Ok(page) => page,
        Err(e) => {
            counter!("selector_failures_total").increment(1);
            error!(
                "Selector fetch failed for {} via {}: {}",
                request.url,
                engine.name(),
                e
            );
            return bad_request(&e.to_string());
        }
    };

    let rows = match ExtractionService::extract_by_selector(&page.content, &selector, &attributes)
    {
        Ok(rows) => rows,
        Err(e) => {
            counter!("selector_failures_total").increment(1);
            return bad_request(&e.to_string());
        }
    };

    if rows.is_empty() {
        return (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "No matches found",
                "count": 0,
                "rows": []
            })),
        )
            .into_response();
    }

    match format {
        OutputFormat::Csv => {
            let csv = match ExportService::records_csv(&rows) {
                Ok(csv) => csv,
                Err(e) => {
                    counter!("selector_failures_total").increment(1);
                    return bad_request(&e.to_string());
                }
            };
            let disposition = format!(
                "attachment; filename=\"selector_mode_{}.csv\"",
                chrono::Utc::now().timestamp_millis()
            );
            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        "text/csv; charset=utf-8".to_string(),
                    ),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        OutputFormat::Json => {
            let count = rows.len();
            (
                StatusCode::OK,
                Json(SelectorResponseDto {
                    message: "OK".to_string(),
                    count,
                    rows,
                }),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
