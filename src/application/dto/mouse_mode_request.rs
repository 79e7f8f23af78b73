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

use crate::domain::models::extraction::SelectedElement;
use serde::{Deserialize, Serialize};

/// 鼠标模式请求数据传输对象
#[derive(Debug, Deserialize, Serialize)]
pub struct MouseModeRequestDto {
    /// 目标URL，缺少协议时自动补全https
    pub url: Option<String>,
}

/// 鼠标模式响应数据传输对象
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseModeResponseDto {
    /// 本次会话选中的元素
    pub selected_elements: Vec<SelectedElement>,
    /// 会话ID
    pub session_id: String,
}

/// 鼠标模式进度查询参数
#[derive(Debug, Deserialize)]
pub struct MouseModeQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// 鼠标模式进度查询响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseModeProgressDto {
    pub selected_elements: Vec<SelectedElement>,
}
