//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是对外的唯一入口，组合缓存、备用题库和刷新流程。
//!
//! ## 模块划分
//!
//! ### `search` - 历年真题检索
//! - 持有缓存句柄、刷新流程和备用题库
//! - `search`：读缓存（过期也照常返回）→ 过滤 → 截断
//! - `refresh`：同步跑一轮刷新并写入缓存
//! - 过期或未命中时启动后台刷新，不等待结果
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::PastPaperSearch (search / refresh)
//!     ↓
//! workflow::RefreshFlow (一轮刷新)
//!     ↓
//! services (能力层：scraper / pdf_ingestor / question_extractor / classifier)
//!     ↓
//! infrastructure + browser (HttpFetcher / JsExecutor / RenderSession)
//! ```
//!
//! ## 设计原则
//!
//! 1. **从不失败**：search / refresh 不向调用方返回错误
//! 2. **资源隔离**：浏览器会话只在单次抓取内存在
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod search;

pub use search::PastPaperSearch;
