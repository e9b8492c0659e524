//! JS 执行器 - 基础设施层
//!
//! 持有渲染会话中的 page，只暴露"导航"和"执行 JS"的能力

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::AppResult;

/// JS 执行器
///
/// 职责：
/// - 持有 Page 资源（生命周期由 RenderSession 管理）
/// - 暴露 navigate() / eval() 能力
/// - 不认识来源和试卷
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 导航到指定页面并等待网络空闲
    ///
    /// 在 `idle_timeout` 内没有等到 networkIdle 时直接返回，
    /// 由调用方基于当前已渲染的 DOM 继续提取。
    pub async fn navigate(&self, url: &str, idle_timeout: Duration) -> AppResult<()> {
        self.page
            .execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;
        let mut lifecycle = self.page.event_listener::<EventLifecycleEvent>().await?;

        self.page.goto(url).await?;
        debug!("已导航到: {}", url);

        let network_idle = async {
            while let Some(event) = lifecycle.next().await {
                if event.name == "networkIdle" {
                    return true;
                }
            }
            false
        };

        match tokio::time::timeout(idle_timeout, network_idle).await {
            Ok(true) => debug!("页面网络已空闲: {}", url),
            _ => debug!("未等到 networkIdle，使用当前 DOM: {}", url),
        }
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
