use crate::domain::models::extraction::{PageData, Record};
use crate::utils::text::{collapse_whitespace, sanitize_key};
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

/// 整页遍历时忽略的标签
pub const IGNORED_TAGS: [&str; 7] = ["script", "style", "meta", "noscript", "head", "svg", "canvas"];

/// 取src属性而不是文本的标签
const SRC_TAGS: [&str; 5] = ["iframe", "img", "video", "audio", "source"];

static BODY_ALL: Lazy<Selector> = Lazy::new(|| Selector::parse("body *").expect("valid selector"));

/// 提取服务
///
/// 负责从 HTML 内容中提取结构化数据
pub struct ExtractionService;

impl ExtractionService {
    /// 按标签名整页提取
    ///
    /// 遍历body下的所有元素，link取href，媒体标签取src，
    /// 其余标签取其直接文本子节点（不含后代文本）
    pub fn extract_by_tag(html_content: &str) -> PageData {
        let document = Html::parse_document(html_content);
        let mut data = PageData::default();

        for element in document.select(&BODY_ALL) {
            let tag = element.value().name().to_lowercase();
            if IGNORED_TAGS.contains(&tag.as_str()) {
                continue;
            }

            let value = if tag == "link" {
                element.value().attr("href").unwrap_or("").to_string()
            } else if SRC_TAGS.contains(&tag.as_str()) {
                element.value().attr("src").unwrap_or("").to_string()
            } else {
                direct_text(&element)
            };

            if value.is_empty() {
                continue;
            }
            data.push_value(&tag, value);
        }

        data
    }

    /// 提取页面可见文本
    ///
    /// 与整页提取相同的遍历，但只收集直接文本，按文档顺序返回
    pub fn extract_visible_text(html_content: &str) -> Vec<String> {
        let document = Html::parse_document(html_content);
        let mut lines = Vec::new();

        for element in document.select(&BODY_ALL) {
            let tag = element.value().name().to_lowercase();
            if IGNORED_TAGS.contains(&tag.as_str()) {
                continue;
            }

            let text = direct_text(&element);
            if !text.is_empty() {
                lines.push(text);
            }
        }

        lines
    }

    /// 按CSS选择器提取记录
    ///
    /// 每条记录包含tag_name、text_content、请求的属性列表
    /// 以及元素上尚未收集的所有data-*属性，键名统一规范化
    pub fn extract_by_selector(
        html_content: &str,
        selector: &str,
        attributes: &[String],
    ) -> Result<Vec<Record>> {
        let parsed =
            Selector::parse(selector).map_err(|e| anyhow!("invalid selector '{selector}': {e}"))?;
        let document = Html::parse_document(html_content);
        let mut records = Vec::new();

        for element in document.select(&parsed) {
            let mut raw: Vec<(String, String)> = Vec::new();
            raw.push(("tag_name".to_string(), element.value().name().to_lowercase()));
            raw.push((
                "text_content".to_string(),
                element.text().collect::<String>().trim().to_string(),
            ));

            for attr in attributes {
                raw.push((
                    attr.clone(),
                    element.value().attr(attr).unwrap_or("").to_string(),
                ));
            }

            for (name, value) in element.value().attrs() {
                if name.starts_with("data-") && !raw.iter().any(|(k, _)| k == name) {
                    raw.push((name.to_string(), value.to_string()));
                }
            }

            // Sanitize keys last so colliding keys overwrite in order, as the
            // record is built field by field.
            let mut record = Record::default();
            for (key, value) in raw {
                record.insert(sanitize_key(&key), value.trim().to_string());
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// 元素的直接文本子节点，去除首尾空白并折叠内部空白
fn direct_text(element: &ElementRef) -> String {
    let text: String = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(t) => Some(&**t),
            _ => None,
        })
        .collect();
    collapse_whitespace(text.trim())
}
