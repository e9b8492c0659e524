//! 试卷链接抓取服务 - 业务能力层
//!
//! 对每个来源独立抓取页面，收集指向 PDF 的链接，并从链接文字推断年份和试卷类型。
//! 单个来源失败只记录日志，不影响其他来源。

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::Datelike;
use regex::Regex;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::browser::{with_render_session, RenderOptions};
use crate::error::AppResult;
use crate::infrastructure::HttpFetcher;
use crate::models::{PaperLink, PaperType, RawLink, RenderMode, SourceDescriptor};

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})").expect("year pattern is valid"));

/// 在渲染完成的页面中收集所有链接
const COLLECT_ANCHORS_JS: &str = r#"
    Array.from(document.querySelectorAll('a[href]')).map(a => ({
        href: a.href,
        text: (a.textContent || '').trim()
    }))
"#;

/// 单个来源的链接获取能力
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    /// 返回来源页面上所有指向文档的链接（已解析为绝对地址）
    async fn fetch_links(&self, source: &SourceDescriptor) -> AppResult<Vec<RawLink>>;
}

/// 真实的网页链接获取器
///
/// - `static`：reqwest 拉取 HTML，scraper 解析 DOM
/// - `dynamic`：独立的无头浏览器会话渲染后提取
pub struct WebLinkFetcher {
    http: HttpFetcher,
    render: RenderOptions,
}

impl WebLinkFetcher {
    pub fn new(http: HttpFetcher, render: RenderOptions) -> Self {
        Self { http, render }
    }

    async fn fetch_static(&self, source: &SourceDescriptor) -> AppResult<Vec<RawLink>> {
        let html = self.http.get_text(&source.base_url).await?;
        Ok(parse_document_links(&html, &source.base_url))
    }

    async fn fetch_dynamic(&self, source: &SourceDescriptor) -> AppResult<Vec<RawLink>> {
        let url = source.base_url.clone();
        let idle_timeout = self.render.network_idle_timeout;

        let anchors: Vec<RawLink> =
            with_render_session(&self.render, &source.base_url, move |executor| async move {
                executor.navigate(&url, idle_timeout).await?;
                executor.eval_as::<Vec<RawLink>>(COLLECT_ANCHORS_JS).await
            })
            .await?;

        Ok(keep_document_links(&source.base_url, anchors))
    }
}

#[async_trait]
impl LinkFetcher for WebLinkFetcher {
    async fn fetch_links(&self, source: &SourceDescriptor) -> AppResult<Vec<RawLink>> {
        match source.render_mode {
            RenderMode::Static => self.fetch_static(source).await,
            RenderMode::Dynamic => self.fetch_dynamic(source).await,
        }
    }
}

/// 从静态 HTML 中提取指向 PDF 的链接
pub fn parse_document_links(html: &str, base_url: &str) -> Vec<RawLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let anchors = document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim().to_string();
            let text = element.text().collect::<Vec<_>>().join(" ");
            Some(RawLink { href, text })
        })
        .collect();

    keep_document_links(base_url, anchors)
}

/// 解析相对地址、过滤非 PDF 链接并规整链接文字
fn keep_document_links(base_url: &str, anchors: Vec<RawLink>) -> Vec<RawLink> {
    let base = Url::parse(base_url).ok();

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let resolved = match &base {
                Some(base) => base.join(&anchor.href).ok()?,
                None => Url::parse(&anchor.href).ok()?,
            };
            if !is_document_link(&resolved) {
                return None;
            }
            Some(RawLink {
                href: resolved.to_string(),
                text: anchor.text.split_whitespace().collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}

/// 地址路径是否以 `.pdf` 结尾
pub fn is_document_link(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.path().to_lowercase().ends_with(".pdf")
}

/// 从链接推断试卷信息，链接文字中没有合理年份的丢弃
pub fn to_paper_link(source_name: &str, link: RawLink, current_year: i32) -> Option<PaperLink> {
    let year: i32 = YEAR_RE.captures(&link.text)?.get(1)?.as_str().parse().ok()?;
    if !(2000..=current_year + 1).contains(&year) {
        debug!("[来源 {}] 年份 {} 超出范围，丢弃: {}", source_name, year, link.href);
        return None;
    }

    Some(PaperLink {
        source: source_name.to_string(),
        paper_type: PaperType::from_link_text(&link.text),
        url: link.href,
        title: link.text,
        year,
    })
}

/// 一轮抓取的结果
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub links: Vec<PaperLink>,
    pub succeeded: usize,
    pub failed: usize,
}

/// 抓取服务
///
/// 职责：
/// - 每个来源一个并发任务，Semaphore 控制并发
/// - 单个来源失败不影响其他来源
/// - 结果是所有成功来源的并集（按来源顺序）
pub struct Scraper {
    fetcher: Arc<dyn LinkFetcher>,
    max_concurrent: usize,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn LinkFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn scrape_all(&self, sources: &[SourceDescriptor]) -> ScrapeOutcome {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::new();

        for source in sources {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            let task_source = source.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                fetcher.fetch_links(&task_source).await
            });
            handles.push((source, handle));
        }

        let current_year = chrono::Utc::now().year();
        let mut outcome = ScrapeOutcome::default();

        for (source, handle) in handles {
            match handle.await {
                Ok(Ok(raw_links)) => {
                    let found = raw_links.len();
                    let mut seen = HashSet::new();
                    let papers: Vec<PaperLink> = raw_links
                        .into_iter()
                        .filter(|link| seen.insert(link.href.clone()))
                        .filter_map(|link| to_paper_link(&source.name, link, current_year))
                        .collect();

                    info!(
                        "[来源 {}] ✓ 找到 {} 个 PDF 链接，其中 {} 个可识别年份",
                        source.name,
                        found,
                        papers.len()
                    );
                    outcome.links.extend(papers);
                    outcome.succeeded += 1;
                }
                Ok(Err(e)) => {
                    error!("[来源 {}] ❌ 抓取失败: {}", source.name, e);
                    outcome.failed += 1;
                }
                Err(e) => {
                    error!("[来源 {}] 任务执行失败: {}", source.name, e);
                    outcome.failed += 1;
                }
            }
        }

        if outcome.succeeded == 0 && !sources.is_empty() {
            warn!("⚠️ 所有来源均抓取失败");
        }
        outcome
    }
}
