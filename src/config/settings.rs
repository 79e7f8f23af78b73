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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、浏览器、滚动、选择器会话和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 自动滚动配置
    pub scroll: ScrollSettings,
    /// 鼠标模式会话配置
    pub picker: PickerSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 安全配置
    pub security: SecuritySettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 远程调试地址（设置后连接已有Chrome实例而不是启动新实例）
    pub remote_debugging_url: Option<String>,
    /// 页面导航超时时间（秒）
    pub navigation_timeout: u64,
    /// CDP请求超时时间（秒）
    pub request_timeout: u64,
}

/// 自动滚动配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrollSettings {
    /// 最大滚动次数
    pub max_scrolls: u32,
    /// 每次滚动后的最小等待时间（毫秒）
    pub min_delay_ms: u64,
    /// 每次滚动后的最大等待时间（毫秒）
    pub max_delay_ms: u64,
    /// 高度未变化时复查前的最小等待时间（毫秒）
    pub settle_min_delay_ms: u64,
    /// 高度未变化时复查前的最大等待时间（毫秒）
    pub settle_max_delay_ms: u64,
}

/// 鼠标模式会话配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PickerSettings {
    /// 等待终止按键的最长时间（秒）
    pub session_timeout: u64,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub addr: String,
}

/// 安全配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// 是否允许抓取私有网段地址（仅用于本地开发与测试）
    pub allow_private_networks: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default browser settings
            .set_default("browser.headless", true)?
            .set_default("browser.navigation_timeout", 60)?
            .set_default("browser.request_timeout", 30)?
            // Default auto-scroll settings
            .set_default("scroll.max_scrolls", 100)?
            .set_default("scroll.min_delay_ms", 500)?
            .set_default("scroll.max_delay_ms", 2000)?
            .set_default("scroll.settle_min_delay_ms", 2000)?
            .set_default("scroll.settle_max_delay_ms", 4000)?
            // Default picker settings
            .set_default("picker.session_timeout", 300)?
            // Default metrics settings
            .set_default("metrics.enabled", true)?
            .set_default("metrics.addr", "0.0.0.0:9000")?
            // Default security settings
            .set_default("security.allow_private_networks", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCRAPRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
