// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::engines::browser_engine::BrowserEngine;
use crate::engines::fetch_engine::FetchEngine;
use crate::infrastructure::session::store::SessionStore;
use crate::presentation::handlers::{
    mouse_mode_handler, scrape_handler, selector_handler, session_scrape_handler,
};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(settings: Arc<Settings>, store: Arc<SessionStore>) -> Router {
    let fetch_engine = Arc::new(FetchEngine::new(settings.clone()));
    let browser_engine = Arc::new(BrowserEngine::new(settings.clone()));

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/scrape", post(scrape_handler::scrape))
        .route("/v1/selector", post(selector_handler::extract))
        .route(
            "/v1/scrape-login",
            post(session_scrape_handler::scrape_with_session),
        )
        .route(
            "/v1/mouse-mode",
            post(mouse_mode_handler::start_session).get(mouse_mode_handler::poll_session),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(Extension(settings))
        .layer(Extension(store))
        .layer(Extension(fetch_engine))
        .layer(Extension(browser_engine))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
