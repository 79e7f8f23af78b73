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

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// 单个标签的提取列
///
/// 保存一个标签名及其按文档顺序收集到的所有值
#[derive(Debug, Clone, PartialEq)]
pub struct TagColumn {
    pub tag: String,
    pub values: Vec<String>,
}

/// 整页提取结果
///
/// 列按标签首次出现的文档顺序排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageData {
    pub columns: Vec<TagColumn>,
}

impl PageData {
    /// 向指定标签的列追加一个值，必要时新建列
    pub fn push_value(&mut self, tag: &str, value: String) {
        match self.columns.iter_mut().find(|c| c.tag == tag) {
            Some(column) => column.values.push(value),
            None => self.columns.push(TagColumn {
                tag: tag.to_string(),
                values: vec![value],
            }),
        }
    }

    /// 最长列的长度，即导出CSV的数据行数
    pub fn max_rows(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 选择器提取记录
///
/// 有序的键值对集合，序列化为保持插入顺序的JSON对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// 插入一个字段，键已存在时覆盖其值
    pub fn insert(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// 鼠标模式下选中的页面元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedElement {
    pub text: String,
    pub tag: String,
}
