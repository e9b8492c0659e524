//! # Past Paper Search
//!
//! 南非 12 年级物理科学（Physical Sciences）历年真题检索
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有网络资源，只暴露能力
//! - `HttpFetcher` - 带超时的 HTTP 客户端
//! - `JsExecutor` - 页面导航与脚本执行
//! - `browser/` - 无头浏览器会话，用完即关
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Scraper` - 多来源并发抓取 PDF 链接
//! - `PdfIngestor` - 下载并提取 PDF 文本
//! - `QuestionExtractor` - 切分题目
//! - `classifier` - 主题 / 试卷类型 / 答案判断
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一轮刷新"的完整流程
//! - `RefreshFlow` - 抓取 → 下载解析 → 切分 → 分类
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 组合缓存、备用题库和刷新流程
//! - `PastPaperSearch` - search / refresh
//!
//! ## 模块结构

pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cache::{CacheEntry, QuestionCache};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{BackupDataset, PaperType, QuestionRecord, SourceDescriptor, Topic};
pub use orchestrator::PastPaperSearch;
pub use workflow::{QuestionHarvester, RefreshFlow};
