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

use crate::domain::models::extraction::Record;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 选择器提取请求数据传输对象
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SelectorRequestDto {
    /// 目标URL
    #[validate(url(message = "A valid URL is required"))]
    pub url: Option<String>,
    /// CSS选择器
    #[validate(length(min = 1, message = "CSS selector is required"))]
    pub selector: Option<String>,
    /// 是否使用浏览器渲染（默认true）
    pub dynamic: Option<bool>,
    /// 要收集的属性列表（默认href、src、title、alt）
    pub attributes: Option<Vec<String>>,
    /// 输出格式（默认json）
    pub format: Option<OutputFormat>,
}

impl SelectorRequestDto {
    /// 默认收集的属性
    pub fn default_attributes() -> Vec<String> {
        ["href", "src", "title", "alt"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

/// 选择器提取响应数据传输对象
#[derive(Debug, Serialize)]
pub struct SelectorResponseDto {
    pub message: String,
    pub count: usize,
    pub rows: Vec<Record>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let dto: SelectorRequestDto =
            serde_json::from_str(r#"{"url":"https://example.com","selector":"div"}"#).unwrap();
        assert!(dto.dynamic.is_none());
        assert!(dto.attributes.is_none());
        assert!(dto.format.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_format_parses_lowercase() {
        let dto: SelectorRequestDto = serde_json::from_str(
            r#"{"url":"https://example.com","selector":"div","format":"csv"}"#,
        )
        .unwrap();
        assert_eq!(dto.format, Some(OutputFormat::Csv));
    }

    #[test]
    fn test_validation_rejects_bad_url_and_empty_selector() {
        let dto: SelectorRequestDto =
            serde_json::from_str(r#"{"url":"not a url","selector":""}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
        assert!(errors.field_errors().contains_key("selector"));
    }
}
