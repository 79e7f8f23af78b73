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
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::IntoResponse,
};
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    application::dto::mouse_mode_request::{
        MouseModeProgressDto, MouseModeQuery, MouseModeRequestDto, MouseModeResponseDto,
    },
    config::settings::Settings,
    engines::picker,
    engines::traits::EngineError,
    infrastructure::session::store::SessionStore,
};

/// 启动鼠标模式会话
///
/// 打开有头浏览器让用户在页面内点选元素，
/// Enter/Escape或超时结束后返回全部选中内容
pub async fn start_session(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(store): Extension<Arc<SessionStore>>,
    Json(payload): Json<MouseModeRequestDto>,
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

    counter!("picker_sessions_total").increment(1);

    let session_id = SessionStore::new_session_id();
    store.create(&session_id);
    info!("Starting mouse mode session {} for {}", session_id, url);

    match picker::run(&settings, &url, &store, &session_id).await {
        Ok(selected_elements) => {
            info!(
                "Mouse mode session {} finished with {} element(s)",
                session_id,
                selected_elements.len()
            );
            (
                StatusCode::OK,
                Json(MouseModeResponseDto {
                    selected_elements,
                    session_id,
                }),
            )
                .into_response()
        }
        Err(EngineError::Navigation(detail)) => {
            counter!("picker_failures_total").increment(1);
            error!("Navigation failed for session {}: {}", session_id, detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to load URL",
                    "detail": detail
                })),
            )
                .into_response()
        }
        Err(e) => {
            counter!("picker_failures_total").increment(1);
            error!("Mouse mode session {} failed: {}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Mouse Mode failed",
                    "detail": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// 查询鼠标模式会话进度
///
/// 返回会话目前已选中的元素，未知会话返回空列表
pub async fn poll_session(
    Extension(store): Extension<Arc<SessionStore>>,
    Query(query): Query<MouseModeQuery>,
) -> impl IntoResponse {
    let session_id = query.session_id.unwrap_or_else(|| "default".to_string());
    let selected_elements = store.snapshot(&session_id).unwrap_or_default();
    (
        StatusCode::OK,
        Json(MouseModeProgressDto { selected_elements }),
    )
        .into_response()
}
