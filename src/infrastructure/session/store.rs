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
use chrono::Utc;
use dashmap::DashMap;

/// 鼠标模式会话存储
///
/// 进程内缓冲每个会话已选中的元素，会话结束时整体取出。
/// 单进程内存实现，进程重启后会话不保留
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Vec<SelectedElement>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// 生成新的会话ID（毫秒时间戳）
    pub fn new_session_id() -> String {
        Utc::now().timestamp_millis().to_string()
    }

    /// 创建一个空会话缓冲
    pub fn create(&self, session_id: &str) {
        self.sessions.insert(session_id.to_string(), Vec::new());
    }

    /// 向会话追加选中的元素，会话不存在时自动创建
    pub fn append(&self, session_id: &str, elements: Vec<SelectedElement>) {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .extend(elements);
    }

    /// 会话当前内容的快照，用于进度查询
    pub fn snapshot(&self, session_id: &str) -> Option<Vec<SelectedElement>> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// 取出并移除会话缓冲
    pub fn take(&self, session_id: &str) -> Option<Vec<SelectedElement>> {
        self.sessions.remove(session_id).map(|(_, elements)| elements)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, text: &str) -> SelectedElement {
        SelectedElement {
            tag: tag.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_create_append_snapshot() {
        let store = SessionStore::new();
        store.create("1700000000000");
        assert_eq!(store.snapshot("1700000000000"), Some(vec![]));

        store.append("1700000000000", vec![element("a", "/home")]);
        store.append("1700000000000", vec![element("h1", "Title")]);

        let snapshot = store.snapshot("1700000000000").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].tag, "a");
        // snapshot does not drain the buffer
        assert_eq!(store.snapshot("1700000000000").unwrap().len(), 2);
    }

    #[test]
    fn test_take_removes_the_session() {
        let store = SessionStore::new();
        store.append("s", vec![element("p", "hello")]);

        let taken = store.take("s").unwrap();
        assert_eq!(taken.len(), 1);
        assert!(store.snapshot("s").is_none());
        assert!(store.take("s").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_creates_missing_session() {
        let store = SessionStore::new();
        store.append("fresh", vec![element("img", "/x.png")]);
        assert_eq!(store.snapshot("fresh").unwrap().len(), 1);
    }

    #[test]
    fn test_session_ids_are_timestamps() {
        let id = SessionStore::new_session_id();
        assert!(id.parse::<i64>().is_ok());
        assert!(id.len() >= 13);
    }
}
