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

use serde::Serialize;
use serde_json::Value;

/// 整页爬取响应数据传输对象
///
/// 同一份提取结果的三种形态：按标签分组的JSON、
/// 平铺的文本列表、以及对齐的CSV
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponseDto {
    /// 标签到值数组的映射
    pub json_by_tag: Value,
    /// 平铺后的全部值
    pub json_for_ui: Vec<String>,
    /// CSV文本
    pub csv: String,
}
