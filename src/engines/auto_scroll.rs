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

use crate::config::settings::ScrollSettings;
use crate::engines::traits::EngineError;
use chromiumoxide::Page;
use rand::Rng;
use std::time::Duration;

/// 页面内查找并点击"加载更多"控件的脚本
///
/// CSS没有:has-text伪类，按钮文本匹配只能在页面内完成
const CLICK_LOAD_MORE_JS: &str = r#"
(() => {
  const texts = ["load more", "show more"];
  const isVisible = (el) => {
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.width > 0 && rect.height > 0
      && style.visibility !== "hidden" && style.display !== "none";
  };
  const candidates = document.querySelectorAll('button, a, [class*="load-more"]');
  for (const el of candidates) {
    const label = (el.innerText || "").trim().toLowerCase();
    const byText = texts.some((t) => label.includes(t));
    const byClass = Array.from(el.classList).some((c) => c.includes("load-more"));
    if ((byText || byClass) && isVisible(el)) {
      el.click();
      return true;
    }
  }
  return false;
})()
"#;

/// 自动滚动页面直到没有新内容
///
/// 每轮先尝试点击一个可见的"加载更多"控件，再滚动到底部并随机等待；
/// 高度连续两次未变化且没有点击到按钮时停止，滚动次数有上限
///
/// # 返回值
///
/// 实际执行的滚动轮数
pub async fn auto_scroll(page: &Page, settings: &ScrollSettings) -> Result<u32, EngineError> {
    let mut last_height = body_height(page).await;
    let mut scrolls = 0u32;

    while scrolls < settings.max_scrolls {
        let clicked = click_load_more(page).await;
        if clicked {
            tokio::time::sleep(jitter(settings.min_delay_ms, settings.max_delay_ms)).await;
        }

        if let Err(e) = page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
        {
            tracing::warn!("Scroll to bottom failed: {}", e);
        }
        tokio::time::sleep(jitter(settings.min_delay_ms, settings.max_delay_ms)).await;

        let new_height = body_height(page).await;
        if new_height == last_height && !clicked {
            // Height unchanged and nothing was clicked: give slow content one
            // more chance before giving up.
            tokio::time::sleep(jitter(
                settings.settle_min_delay_ms,
                settings.settle_max_delay_ms,
            ))
            .await;
            let final_height = body_height(page).await;
            if final_height == last_height {
                break;
            }
        }

        last_height = new_height;
        scrolls += 1;
    }

    Ok(scrolls)
}

/// 当前页面高度，读取失败按0处理
async fn body_height(page: &Page) -> i64 {
    page.evaluate("document.body.scrollHeight")
        .await
        .ok()
        .and_then(|v| v.into_value::<i64>().ok())
        .unwrap_or(0)
}

/// 点击一个可见的"加载更多"控件，返回是否点击成功
async fn click_load_more(page: &Page) -> bool {
    page.evaluate(CLICK_LOAD_MORE_JS)
        .await
        .ok()
        .and_then(|v| v.into_value::<bool>().ok())
        .unwrap_or(false)
}

/// 区间内的随机延迟
fn jitter(min_ms: u64, max_ms: u64) -> Duration {
    let upper = max_ms.max(min_ms);
    let ms = rand::rng().random_range(min_ms..=upper);
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_in_bounds() {
        for _ in 0..100 {
            let d = jitter(500, 2000);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_jitter_handles_inverted_bounds() {
        assert_eq!(jitter(100, 100), Duration::from_millis(100));
        let d = jitter(200, 100);
        assert_eq!(d, Duration::from_millis(200));
    }

    #[test]
    fn test_load_more_script_mentions_known_controls() {
        assert!(CLICK_LOAD_MORE_JS.contains("load more"));
        assert!(CLICK_LOAD_MORE_JS.contains("show more"));
        assert!(CLICK_LOAD_MORE_JS.contains("load-more"));
    }
}
