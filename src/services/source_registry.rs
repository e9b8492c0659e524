//! 来源注册表 - 业务能力层
//!
//! 唯一的来源清单。新增来源只需在这里（或 `SOURCES_FILE`）加一条，
//! `render_mode` 决定走 DOM 解析还是无头渲染。

use std::path::Path;

use tracing::warn;

use crate::models::{load_sources, RenderMode, SourceDescriptor};

/// 来源注册表
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self { sources }
    }

    /// 内置的南非 Grade 12 Physical Sciences 试卷来源
    pub fn builtin() -> Self {
        Self::new(vec![
            SourceDescriptor::new(
                "SAExamPapers",
                "https://www.saexampapers.co.za/grade-12-physicalsciences/",
                RenderMode::Static,
            ),
            SourceDescriptor::new(
                "TestPapers",
                "https://www.testpapers.co.za/gr12-physics",
                RenderMode::Dynamic,
            ),
            SourceDescriptor::new(
                "StanmorePhysics",
                "https://stanmorephysics.com/physical-science-grade-12/",
                RenderMode::Static,
            ),
            SourceDescriptor::new(
                "DBE",
                "https://www.education.gov.za/Curriculum/NationalSeniorCertificate(NSC)Examinations/NSCPastExaminationpapers.aspx",
                RenderMode::Static,
            ),
        ])
    }

    /// 从来源文件加载，未配置或加载失败时使用内置来源
    pub async fn load_or_builtin(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match load_sources(Path::new(path)).await {
            Ok(sources) => Self::new(sources),
            Err(e) => {
                warn!("⚠️ 加载来源文件失败，使用内置来源: {}", e);
                Self::builtin()
            }
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
