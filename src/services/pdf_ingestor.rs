//! PDF 下载与文本提取 - 业务能力层
//!
//! 下载失败或文档损坏都不会中断流程：失败只记录日志，文本结果为空串。

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppResult, PdfError};
use crate::infrastructure::HttpFetcher;
use crate::models::PaperLink;

/// 把一份试卷变成原始文本的能力
#[async_trait]
pub trait DocumentIngestor: Send + Sync {
    /// 返回试卷文本，任何失败都返回空串
    async fn ingest(&self, link: &PaperLink) -> String;
}

/// PDF 下载与文本提取服务
pub struct PdfIngestor {
    http: HttpFetcher,
    download_dir: PathBuf,
    parse_timeout: Duration,
    keep_downloads: bool,
}

impl PdfIngestor {
    pub fn new(http: HttpFetcher, config: &Config) -> Self {
        Self {
            http,
            download_dir: PathBuf::from(&config.download_dir),
            parse_timeout: Duration::from_secs(config.pdf_parse_timeout_secs),
            keep_downloads: config.keep_downloads,
        }
    }

    /// 下载 PDF 到下载目录，文件名唯一，返回本地路径
    pub async fn download(&self, link: &PaperLink) -> AppResult<PathBuf> {
        let bytes = self.http.get_bytes(&link.url).await?;

        fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|source| PdfError::WriteFailed {
                path: self.download_dir.display().to_string(),
                source,
            })?;

        let path = self.download_dir.join(unique_file_name(&link.source, link.year));
        fs::write(&path, &bytes)
            .await
            .map_err(|source| PdfError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;

        debug!("已下载 {} ({} 字节) -> {}", link.url, bytes.len(), path.display());
        Ok(path)
    }

    /// 提取本地 PDF 的文本，损坏或无法读取的文档返回空串
    pub async fn extract_text(&self, path: &Path) -> String {
        match self.try_extract_text(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ {}", e);
                String::new()
            }
        }
    }

    async fn try_extract_text(&self, path: &Path) -> AppResult<String> {
        let display = path.display().to_string();
        let bytes = fs::read(path).await.map_err(|source| PdfError::ReadFailed {
            path: display.clone(),
            source,
        })?;

        // pdf-extract 是同步且可能 panic 的，放到阻塞线程里执行
        let extraction = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        });

        let joined = tokio::time::timeout(self.parse_timeout, extraction)
            .await
            .map_err(|_| PdfError::Timeout {
                path: display.clone(),
                secs: self.parse_timeout.as_secs(),
            })?;

        let text = joined
            .map_err(|e| PdfError::ParseFailed {
                path: display.clone(),
                message: e.to_string(),
            })?
            .map_err(|message| PdfError::ParseFailed {
                path: display,
                message,
            })?;

        Ok(text)
    }

    /// 清理已解析的文件
    async fn cleanup_file(&self, path: &Path) {
        if self.keep_downloads {
            return;
        }
        if let Err(e) = fs::remove_file(path).await {
            warn!("⚠️ 无法删除文件 {}: {}", path.display(), e);
        }
    }
}

#[async_trait]
impl DocumentIngestor for PdfIngestor {
    async fn ingest(&self, link: &PaperLink) -> String {
        let path = match self.download(link).await {
            Ok(path) => path,
            Err(e) => {
                warn!("[来源 {}] ⚠️ 下载失败 {}: {}", link.source, link.url, e);
                return String::new();
            }
        };

        let text = self.extract_text(&path).await;
        self.cleanup_file(&path).await;

        info!(
            "[来源 {}] 📄 {} 年试卷文本 {} 字符",
            link.source,
            link.year,
            text.chars().count()
        );
        text
    }
}

/// 生成唯一的下载文件名：`{来源}_{年份}_{uuid}.pdf`
pub fn unique_file_name(source: &str, year: i32) -> String {
    let safe_source: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}_{}.pdf", safe_source, year, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ingestor(dir: &Path) -> PdfIngestor {
        let config = Config {
            download_dir: dir.display().to_string(),
            pdf_parse_timeout_secs: 10,
            ..Config::default()
        };
        PdfIngestor::new(HttpFetcher::new(&config).unwrap(), &config)
    }

    #[test]
    fn test_unique_file_name_never_collides() {
        let a = unique_file_name("Stanmore Physics", 2023);
        let b = unique_file_name("Stanmore Physics", 2023);
        assert_ne!(a, b);
        assert!(a.starts_with("Stanmore_Physics_2023_"));
        assert!(a.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 this is not really a pdf").unwrap();

        let text = test_ingestor(dir.path()).extract_text(&path).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let text = test_ingestor(dir.path())
            .extract_text(&dir.path().join("missing.pdf"))
            .await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let link = PaperLink {
            source: "Local".to_string(),
            url: "http://127.0.0.1:9/nothing-here.pdf".to_string(),
            title: "P1 2023".to_string(),
            year: 2023,
            paper_type: crate::models::PaperType::Physics,
        };

        let text = test_ingestor(dir.path()).ingest(&link).await;
        assert!(text.is_empty());
    }
}
