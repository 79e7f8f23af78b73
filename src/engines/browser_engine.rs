// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BrowserSettings, Settings};
use crate::engines::auto_scroll;
use crate::engines::fetch_engine::DESKTOP_USER_AGENT;
use crate::engines::traits::{EngineError, FetchedPage, HtmlEngine, HtmlRequest};
use crate::engines::validators;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, SetCookiesParams};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// 浏览器会话
///
/// 每个请求独占一个浏览器实例，用完即关，
/// 互不共享页面状态
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// 启动新的浏览器实例，或连接配置的远程Chrome
    pub async fn launch(settings: &BrowserSettings, headless: bool) -> Result<Self, EngineError> {
        let remote_debugging_url = settings
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(settings.request_timeout));

            if !headless {
                builder = builder.with_head();
            }

            // Production environment setup
            builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

            Browser::launch(builder.build().map_err(EngineError::Browser)?)
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// 打开一个空白页面
    pub async fn new_page(&self) -> Result<Page, EngineError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }

    /// 关闭浏览器并结束事件处理任务
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        self.handler_task.abort();
    }
}

/// 浏览器抓取引擎
///
/// 基于chromiumoxide实现的浏览器自动化抓取引擎
pub struct BrowserEngine {
    settings: Arc<Settings>,
}

impl BrowserEngine {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    async fn drive(
        &self,
        session: &BrowserSession,
        request: &HtmlRequest,
    ) -> Result<FetchedPage, EngineError> {
        let start = Instant::now();

        let page = session.new_page().await?;
        page.set_user_agent(DESKTOP_USER_AGENT)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // Inject cookies before navigation so they are sent with the first request
        if !request.cookies.is_empty() {
            inject_cookies(&page, &request.cookies).await?;
        }

        // Navigate and wait for load; goto waits for the load event by default
        match tokio::time::timeout(request.timeout, page.goto(&request.url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(EngineError::Navigation(e.to_string())),
            Err(_) => return Err(EngineError::Timeout),
        }

        if request.scroll {
            let scrolls = auto_scroll::auto_scroll(&page, &self.settings.scroll).await?;
            tracing::debug!("Auto-scroll finished after {} passes", scrolls);
        }

        let content = page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // The CDP load event does not surface the HTTP status; a rendered
        // document is reported as 200 here.
        Ok(FetchedPage {
            status_code: 200,
            content,
            content_type: "text/html".to_string(),
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl HtmlEngine for BrowserEngine {
    /// 执行浏览器自动化抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 渲染后的页面
    /// * `Err(EngineError)` - 抓取过程中出现的错误
    async fn fetch_html(&self, request: &HtmlRequest) -> Result<FetchedPage, EngineError> {
        // SSRF protection
        validators::validate_url(&request.url, self.settings.security.allow_private_networks)
            .await
            .map_err(|e| EngineError::Other(format!("SSRF protection: {}", e)))?;

        let session =
            BrowserSession::launch(&self.settings.browser, self.settings.browser.headless).await?;

        // The session must be closed on every path before the result is returned
        let result = self.drive(&session, request).await;
        session.close().await;
        result
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "browser"
    }
}

/// 将原始Cookie对象注入页面，无法反序列化的条目跳过
async fn inject_cookies(page: &Page, raw_cookies: &[serde_json::Value]) -> Result<(), EngineError> {
    let cookie_params: Vec<CookieParam> = raw_cookies
        .iter()
        .filter_map(|v| serde_json::from_value::<CookieParam>(v.clone()).ok())
        .collect();

    if cookie_params.is_empty() {
        tracing::warn!("Cookie list contained no valid entries, skipping injection");
        return Ok(());
    }

    let count = cookie_params.len();
    page.execute(SetCookiesParams::new(cookie_params))
        .await
        .map_err(|e| EngineError::Browser(format!("Failed to inject cookies: {}", e)))?;
    tracing::debug!("Injected {} cookies into page", count);

    Ok(())
}
