// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 将任意键名规范化为列名
///
/// 去除首尾空白、转为小写、非单词字符折叠为下划线并去掉首尾下划线
pub fn sanitize_key(key: &str) -> String {
    let lowered = key.trim().to_lowercase();
    let collapsed = NON_WORD.replace_all(&lowered, "_");
    collapsed.trim_matches('_').to_string()
}

/// 将字符串内部的连续空白折叠为单个空格
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key_basic() {
        assert_eq!(sanitize_key("tag_name"), "tag_name");
        assert_eq!(sanitize_key("Text Content"), "text_content");
        assert_eq!(sanitize_key("data-product-id"), "data_product_id");
    }

    #[test]
    fn test_sanitize_key_trims_underscores() {
        assert_eq!(sanitize_key("  --weird key--  "), "weird_key");
        assert_eq!(sanitize_key("___"), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a  b\n\tc"), "a b c");
        assert_eq!(collapse_whitespace("plain"), "plain");
    }
}
