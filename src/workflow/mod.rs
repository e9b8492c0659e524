//! 流程层（Workflow Layer）
//!
//! 定义"一轮刷新"的完整处理流程：抓取 → 下载解析 → 切分 → 分类。
//! 本层不持有缓存，也不关心结果被谁使用。

pub mod refresh_flow;

pub use refresh_flow::{QuestionHarvester, RefreshFlow, RefreshStats};
