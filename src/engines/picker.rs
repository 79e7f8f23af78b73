// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::extraction::SelectedElement;
use crate::engines::browser_engine::BrowserSession;
use crate::engines::traits::EngineError;
use crate::engines::validators;
use crate::infrastructure::session::store::SessionStore;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::cdp::js_protocol::runtime::{AddBindingParams, EventBindingCalled};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;

/// 页面回调绑定名，与注入脚本中的名称保持一致
const BINDING_NAME: &str = "__scraprs_emit";

/// 注入到目标页面的选择器脚本
///
/// 悬停高亮、点击采集、Enter/Escape结束会话；
/// DOM变更后通过MutationObserver重新挂载监听器。
/// 脚本可重复执行，重复挂载前先卸载旧监听器
const PICKER_JS: &str = r##"
(() => {
  const EMIT = "__scraprs_emit";
  const MARK = "scraprs-selected-element";
  const HIGHLIGHT_STYLE = "3px dashed #ff0000";
  const SELECTED_STYLE = "3px solid #0066ff";

  const state = window.__scraprsPicker || (window.__scraprsPicker = {
    last: null,
    originalBorder: null,
    originalCursor: null,
    handlers: null,
    observer: null,
  });

  const emit = (payload) => {
    if (typeof window[EMIT] === "function") {
      window[EMIT](JSON.stringify(payload));
    }
  };

  const restoreHighlight = () => {
    if (state.last) {
      if (state.originalBorder) state.last.style.border = state.originalBorder;
      else state.last.style.removeProperty("border");
      if (state.originalCursor) state.last.style.cursor = state.originalCursor;
      else state.last.style.removeProperty("cursor");
    }
    state.last = null;
    state.originalBorder = null;
    state.originalCursor = null;
  };

  const detach = () => {
    if (state.handlers) {
      document.removeEventListener("mouseover", state.handlers.onMouseOver);
      document.removeEventListener("mouseout", state.handlers.onMouseOut);
      document.removeEventListener("click", state.handlers.onClick);
      document.removeEventListener("keydown", state.handlers.onKeyDown);
      state.handlers = null;
    }
  };

  const cleanup = (preserveSelected) => {
    detach();
    if (!preserveSelected) {
      document.querySelectorAll("." + MARK).forEach((el) => {
        el.style.removeProperty("border");
        el.classList.remove(MARK);
      });
    }
    restoreHighlight();
  };

  const onMouseOver = (e) => {
    const target = e.target;
    if (!target || target === document.body || target.classList.contains(MARK)) return;
    if (state.last && state.last !== target) restoreHighlight();
    state.last = target;
    state.originalBorder = target.style.border;
    state.originalCursor = target.style.cursor;
    target.style.border = HIGHLIGHT_STYLE;
    target.style.cursor = "crosshair";
  };

  const onMouseOut = (e) => {
    const target = e.target;
    if (target === state.last && !target.classList.contains(MARK)) {
      restoreHighlight();
    }
  };

  const onClick = (e) => {
    e.preventDefault();
    e.stopPropagation();

    const target = e.target;
    if (!target || target === document.body || target.classList.contains(MARK)) return;

    const tag = target.tagName.toLowerCase();
    let text = (target.innerText || "").trim();
    if (tag === "img") {
      text = target.getAttribute("src") || "";
    } else if (tag === "a") {
      text = target.getAttribute("href") || text;
    }

    target.style.border = SELECTED_STYLE;
    target.classList.add(MARK);
    if (state.last === target) {
      state.last = null;
      state.originalBorder = null;
      state.originalCursor = null;
    }

    emit({ kind: "selected", elements: [{ text: text, tag: tag }] });
  };

  const onKeyDown = (e) => {
    if (e.key === "Enter" || e.key === "Escape") {
      if (state.observer) {
        state.observer.disconnect();
        state.observer = null;
      }
      cleanup(false);
      emit({ kind: "done" });
    }
  };

  const attach = () => {
    detach();
    state.handlers = {
      onMouseOver: onMouseOver,
      onMouseOut: onMouseOut,
      onClick: onClick,
      onKeyDown: onKeyDown,
    };
    document.addEventListener("mouseover", onMouseOver);
    document.addEventListener("mouseout", onMouseOut);
    document.addEventListener("click", onClick);
    document.addEventListener("keydown", onKeyDown);
  };

  attach();

  const armObserver = () => {
    if (!state.observer && document.body) {
      state.observer = new MutationObserver(() => {
        cleanup(true);
        attach();
      });
      state.observer.observe(document.body, { childList: true, subtree: true });
    }
  };

  if (document.readyState === "loading") {
    document.addEventListener("DOMContentLoaded", armObserver);
  } else {
    armObserver();
  }
})();
"##;

/// 页面回调事件
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum PickerEvent {
    /// 用户点击选中了元素
    Selected { elements: Vec<SelectedElement> },
    /// 用户按下Enter或Escape结束会话
    Done,
}

/// 运行一次鼠标模式会话
///
/// 启动有头浏览器、注入选择器脚本并消费页面回调，
/// 直到用户按键结束或会话超时。采集到的元素实时写入
/// 会话存储，结束时整体取出返回
pub async fn run(
    settings: &Settings,
    url: &str,
    store: &SessionStore,
    session_id: &str,
) -> Result<Vec<SelectedElement>, EngineError> {
    let target = validators::normalize_url(url);
    validators::validate_url(&target, settings.security.allow_private_networks)
        .await
        .map_err(|e| EngineError::Navigation(e.to_string()))?;

    // Mouse mode is the one surface the user drives directly, so the browser
    // always runs with a visible window.
    let session = BrowserSession::launch(&settings.browser, false).await?;
    let result = drive(settings, &session, &target, store, session_id).await;
    session.close().await;

    // The buffer is removed on every path so an abandoned session cannot
    // linger in the store.
    let collected = store.take(session_id).unwrap_or_default();
    result.map(|_| collected)
}

async fn drive(
    settings: &Settings,
    session: &BrowserSession,
    url: &str,
    store: &SessionStore,
    session_id: &str,
) -> Result<(), EngineError> {
    let page = session.new_page().await?;

    // Register the callback binding and subscribe to its events before
    // navigating, so no click can be emitted into the void.
    page.execute(AddBindingParams::new(BINDING_NAME))
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;
    let mut events = page
        .event_listener::<EventBindingCalled>()
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    // Re-arm the picker on every navigated document
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(PICKER_JS))
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    let nav_timeout = Duration::from_secs(settings.browser.navigation_timeout);
    match tokio::time::timeout(nav_timeout, page.goto(url)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(EngineError::Navigation(e.to_string())),
        Err(_) => return Err(EngineError::Navigation("navigation timed out".to_string())),
    }

    // Arm the document that just loaded; the new-document script only covers
    // navigations after this point.
    page.evaluate(PICKER_JS)
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    tracing::info!("Picker session {} armed on {}", session_id, url);

    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(settings.picker.session_timeout);
    loop {
        match tokio::time::timeout_at(deadline, events.next()).await {
            Err(_) => {
                tracing::warn!("Picker session {} timed out", session_id);
                break;
            }
            Ok(None) => {
                tracing::warn!("Event stream closed for picker session {}", session_id);
                break;
            }
            Ok(Some(event)) => {
                if event.name != BINDING_NAME {
                    continue;
                }
                match serde_json::from_str::<PickerEvent>(&event.payload) {
                    Ok(PickerEvent::Selected { elements }) => {
                        tracing::debug!(
                            "Picker session {} collected {} element(s)",
                            session_id,
                            elements.len()
                        );
                        store.append(session_id, elements);
                    }
                    Ok(PickerEvent::Done) => break,
                    Err(e) => {
                        tracing::warn!("Discarding unparseable picker payload: {}", e);
                    }
                }
            }
        }
    }

    Ok(())
}
