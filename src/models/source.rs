use serde::{Deserialize, Serialize};

use super::question::PaperType;

/// 来源页面的抓取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// 初始 HTML 即包含内容，直接解析 DOM
    Static,
    /// 需要执行脚本才能渲染内容，走无头浏览器
    Dynamic,
}

/// 试卷来源描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub base_url: String,
    #[serde(alias = "type")]
    pub render_mode: RenderMode,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, render_mode: RenderMode) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            render_mode,
        }
    }
}

/// 页面上抓到的原始链接
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLink {
    pub href: String,
    pub text: String,
}

/// 从链接推断出年份与试卷类型后的试卷信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperLink {
    pub source: String,
    pub url: String,
    pub title: String,
    pub year: i32,
    pub paper_type: PaperType,
}

impl std::fmt::Display for PaperLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} {} {}] {} ({})",
            self.source, self.year, self.paper_type, self.title, self.url
        )
    }
}
