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

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 带登录态爬取请求数据传输对象
///
/// cookies为原始CDP Cookie对象数组，注入浏览器后再导航
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScrapeRequestDto {
    /// 目标URL
    pub target_url: Option<String>,
    /// Cookie列表（原样传给浏览器）
    pub cookies: Option<Value>,
    /// 是否滚动到没有新内容为止
    pub scroll_until_no_new_content: Option<bool>,
}

/// 带登录态爬取响应数据传输对象
#[derive(Debug, Serialize)]
pub struct SessionScrapeResponseDto {
    /// 页面可见文本，按文档顺序
    pub text: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_field_names() {
        let dto: SessionScrapeRequestDto = serde_json::from_str(
            r#"{"targetUrl":"https://example.com","cookies":[],"scrollUntilNoNewContent":true}"#,
        )
        .unwrap();
        assert_eq!(dto.target_url.as_deref(), Some("https://example.com"));
        assert_eq!(dto.scroll_until_no_new_content, Some(true));
        assert!(dto.cookies.unwrap().as_array().unwrap().is_empty());
    }
}
