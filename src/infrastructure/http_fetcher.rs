//! HTTP 抓取器 - 基础设施层
//!
//! 持有 reqwest 客户端，只暴露"取文本 / 取字节"的能力

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, SourceFetchError};

/// HTTP 抓取器
///
/// 每个请求都受客户端超时约束，单个慢来源不会无限期挂起。
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|source| ConfigError::HttpClientBuildFailed { source })?;
        Ok(Self { client })
    }

    /// GET 并返回响应文本
    pub async fn get_text(&self, url: &str) -> AppResult<String> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| AppError::request_failed(url, e))
    }

    /// GET 并返回响应字节
    pub async fn get_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.send(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &str) -> AppResult<reqwest::Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceFetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }
}
