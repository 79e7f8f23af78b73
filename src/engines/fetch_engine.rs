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

use crate::config::settings::Settings;
use crate::engines::traits::{EngineError, FetchedPage, HtmlEngine, HtmlRequest};
use crate::engines::validators;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

pub(crate) const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari";

/// 静态抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎，不执行JavaScript
pub struct FetchEngine {
    settings: Arc<Settings>,
}

impl FetchEngine {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl HtmlEngine for FetchEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求，scroll与cookies字段被忽略
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 获取到的页面
    /// * `Err(EngineError)` - 抓取过程中出现的错误
    async fn fetch_html(&self, request: &HtmlRequest) -> Result<FetchedPage, EngineError> {
        // SSRF protection
        validators::validate_url(&request.url, self.settings.security.allow_private_networks)
            .await
            .map_err(|e| EngineError::Other(format!("SSRF protection: {}", e)))?;

        // Each request gets a fresh client for cookie isolation
        let client = reqwest::Client::builder()
            .user_agent(DESKTOP_USER_AGENT)
            .timeout(request.timeout)
            .cookie_store(true)
            .build()?;

        let start = Instant::now();
        let response = client
            .get(&request.url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Other(format!(
                "Fetch failed with status {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let content = response.text().await?;

        Ok(FetchedPage {
            status_code: status.as_u16(),
            content,
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "fetch"
    }
}
