use std::future::Future;
use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, SourceFetchError};
use crate::infrastructure::JsExecutor;

/// 无头渲染参数
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub chrome_executable: Option<String>,
    /// 启动 + 导航 + 提取的总超时
    pub render_timeout: Duration,
    /// 等待 networkIdle 的超时
    pub network_idle_timeout: Duration,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chrome_executable: config.chrome_executable.clone(),
            render_timeout: Duration::from_secs(config.render_timeout_secs),
            network_idle_timeout: Duration::from_secs(config.network_idle_timeout_secs),
        }
    }
}

/// 一次独立的无头浏览器会话
///
/// 每个动态来源独占一个会话，用完必须 `close()`。
/// 推荐通过 [`with_render_session`] 使用，它保证任何退出路径都会释放浏览器进程。
pub struct RenderSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
}

impl RenderSession {
    /// 启动无头浏览器并打开空白页
    pub async fn launch(options: &RenderOptions) -> AppResult<Self> {
        info!("🚀 启动无头浏览器...");

        let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
        ]);
        if let Some(executable) = options.chrome_executable.as_deref() {
            builder = builder.chrome_executable(Path::new(executable));
        }
        let config = builder.build().map_err(|message| {
            error!("配置无头浏览器失败: {}", message);
            SourceFetchError::BrowserConfigFailed { message }
        })?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            e
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建页面失败: {}", e);
                shutdown(&mut browser, &handler).await;
                return Err(e.into());
            }
        };

        Ok(Self {
            browser,
            handler,
            page,
        })
    }

    /// 当前会话页面的执行器
    pub fn executor(&self) -> JsExecutor {
        JsExecutor::new(self.page.clone())
    }

    /// 关闭浏览器并回收事件处理任务
    pub async fn close(mut self) {
        shutdown(&mut self.browser, &self.handler).await;
        debug!("无头浏览器已关闭");
    }
}

/// 正常关闭浏览器的时限，超时后强制结束进程
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

async fn shutdown(browser: &mut Browser, handler: &JoinHandle<()>) {
    let graceful = finishes_within(SHUTDOWN_TIMEOUT, async {
        if let Err(e) = browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        if let Err(e) = browser.wait().await {
            warn!("等待浏览器进程退出失败: {}", e);
        }
    })
    .await;

    if !graceful {
        warn!("关闭浏览器超时 ({} 秒)，强制结束进程", SHUTDOWN_TIMEOUT.as_secs());
        if let Some(Err(e)) = browser.kill().await {
            warn!("强制结束浏览器进程失败: {}", e);
        }
    }
    handler.abort();
}

/// `work` 是否在 `limit` 内完成，超时的 `work` 被丢弃
async fn finishes_within<F: Future<Output = ()>>(limit: Duration, work: F) -> bool {
    timeout(limit, work).await.is_ok()
}

/// 在独立的渲染会话中执行 `work`
///
/// 会话在调用前获取，在成功、失败、超时三种情况下都会被关闭。
/// 启动和 `work` 分别受 `render_timeout` 约束。
pub async fn with_render_session<T, F, Fut>(
    options: &RenderOptions,
    target: &str,
    work: F,
) -> AppResult<T>
where
    F: FnOnce(JsExecutor) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let secs = options.render_timeout.as_secs();

    let session = match timeout(options.render_timeout, RenderSession::launch(options)).await {
        Ok(session) => session?,
        Err(_) => return Err(crate::error::AppError::fetch_timeout(target, secs)),
    };

    let outcome = timeout(options.render_timeout, work(session.executor())).await;
    session.close().await;

    match outcome {
        Ok(result) => result,
        Err(_) => {
            warn!("渲染 {} 超时 ({} 秒)", target, secs);
            Err(crate::error::AppError::fetch_timeout(target, secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hung_close_is_cut_off() {
        let started = std::time::Instant::now();
        let finished = finishes_within(Duration::from_millis(50), std::future::pending::<()>()).await;

        assert!(!finished);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_prompt_close_counts_as_graceful() {
        assert!(finishes_within(Duration::from_secs(1), async {}).await);
    }

    #[test]
    fn test_render_options_follow_config() {
        let config = Config {
            render_timeout_secs: 7,
            network_idle_timeout_secs: 2,
            ..Config::default()
        };
        let options = RenderOptions::from_config(&config);
        assert_eq!(options.render_timeout, Duration::from_secs(7));
        assert_eq!(options.network_idle_timeout, Duration::from_secs(2));
        assert!(options.chrome_executable.is_none());
    }
}
