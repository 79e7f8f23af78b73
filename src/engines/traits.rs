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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// HTML获取请求
pub struct HtmlRequest {
    /// 目标URL
    pub url: String,
    /// 导航超时时间
    pub timeout: Duration,
    /// 是否自动滚动加载全部内容
    pub scroll: bool,
    /// 导航前注入的CDP Cookie对象，无效条目被跳过
    pub cookies: Vec<serde_json::Value>,
}

impl HtmlRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            scroll: false,
            cookies: Vec::new(),
        }
    }

    pub fn with_scroll(mut self, scroll: bool) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<serde_json::Value>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// 获取到的页面
pub struct FetchedPage {
    /// HTTP状态码
    pub status_code: u16,
    /// 页面内容
    pub content: String,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// HTML获取引擎特质
#[async_trait]
pub trait HtmlEngine: Send + Sync {
    /// 获取页面HTML
    async fn fetch_html(&self, request: &HtmlRequest) -> Result<FetchedPage, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
