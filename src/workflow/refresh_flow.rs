//! 刷新流程 - 流程层
//!
//! 核心职责：定义"一轮刷新"的完整流程
//!
//! 流程顺序：
//! 1. 抓取所有来源的 PDF 链接（来源之间并发、互不影响）
//! 2. 下载并提取每份试卷的文本
//! 3. 切分题目
//! 4. 分类生成 QuestionRecord

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::browser::RenderOptions;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::HttpFetcher;
use crate::models::{PaperLink, QuestionRecord};
use crate::services::{
    classify, DocumentIngestor, LinkFetcher, PdfIngestor, QuestionExtractor, Scraper,
    SourceRegistry, WebLinkFetcher,
};
use crate::utils::logging;

/// 产出一代新题目的能力
///
/// 实现不得返回错误：所有失败在内部记录并降级为更少（或零条）记录。
#[async_trait]
pub trait QuestionHarvester: Send + Sync {
    async fn harvest(&self) -> Vec<QuestionRecord>;
}

/// 一轮刷新的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshStats {
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    pub papers: usize,
    pub papers_with_text: usize,
    pub questions: usize,
}

/// 刷新流程
///
/// - 编排 抓取 → 下载解析 → 切分 → 分类
/// - 不持有缓存，只产出记录
pub struct RefreshFlow {
    registry: SourceRegistry,
    scraper: Scraper,
    ingestor: Arc<dyn DocumentIngestor>,
    extractor: QuestionExtractor,
    max_papers: usize,
    max_concurrent_downloads: usize,
}

impl RefreshFlow {
    pub fn new(
        registry: SourceRegistry,
        fetcher: Arc<dyn LinkFetcher>,
        ingestor: Arc<dyn DocumentIngestor>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            scraper: Scraper::new(fetcher, config.max_concurrent_sources),
            ingestor,
            extractor: QuestionExtractor::new(config.answer_window_chars),
            max_papers: config.max_papers_per_refresh,
            max_concurrent_downloads: config.max_concurrent_downloads.max(1),
        }
    }

    /// 使用真实网络组件构建
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let http = HttpFetcher::new(config)?;
        let registry = SourceRegistry::load_or_builtin(config.sources_file.as_deref()).await;
        let fetcher = Arc::new(WebLinkFetcher::new(
            http.clone(),
            RenderOptions::from_config(config),
        ));
        let ingestor = Arc::new(PdfIngestor::new(http, config));
        Ok(Self::new(registry, fetcher, ingestor, config))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// 执行一轮刷新并返回记录和统计
    pub async fn run(&self) -> (Vec<QuestionRecord>, RefreshStats) {
        logging::log_refresh_start(self.registry.len());

        let outcome = self.scraper.scrape_all(self.registry.sources()).await;
        let mut stats = RefreshStats {
            sources_succeeded: outcome.succeeded,
            sources_failed: outcome.failed,
            ..Default::default()
        };

        // 不同来源可能指向同一份 PDF
        let mut seen = HashSet::new();
        let mut papers: Vec<PaperLink> = outcome
            .links
            .into_iter()
            .filter(|paper| seen.insert(paper.url.clone()))
            .collect();

        if papers.len() > self.max_papers {
            info!(
                "📋 共 {} 份试卷，本轮只处理前 {} 份",
                papers.len(),
                self.max_papers
            );
            papers.truncate(self.max_papers);
        }
        stats.papers = papers.len();

        let per_paper: Vec<Vec<QuestionRecord>> = stream::iter(papers)
            .map(|paper| self.process_paper(paper))
            .buffered(self.max_concurrent_downloads)
            .collect()
            .await;

        stats.papers_with_text = per_paper.iter().filter(|records| !records.is_empty()).count();
        let records: Vec<QuestionRecord> = per_paper.into_iter().flatten().collect();
        stats.questions = records.len();

        logging::log_refresh_complete(
            stats.sources_succeeded,
            stats.sources_failed,
            stats.papers,
            stats.questions,
        );
        (records, stats)
    }

    /// 处理单份试卷：下载解析 → 切分 → 分类
    async fn process_paper(&self, paper: PaperLink) -> Vec<QuestionRecord> {
        let text = self.ingestor.ingest(&paper).await;
        if text.trim().is_empty() {
            debug!("{} 没有可用文本，跳过", paper);
            return Vec::new();
        }

        let records: Vec<QuestionRecord> = self
            .extractor
            .extract(&text)
            .iter()
            .map(|candidate| classify(candidate, &paper))
            .collect();

        for record in records.iter().take(3) {
            debug!(
                "[来源 {}] {} | {} | {}",
                paper.source,
                record.topic,
                record.paper_type,
                logging::truncate_text(&record.question_text, 60)
            );
        }
        records
    }
}

#[async_trait]
impl QuestionHarvester for RefreshFlow {
    async fn harvest(&self) -> Vec<QuestionRecord> {
        self.run().await.0
    }
}
