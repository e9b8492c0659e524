use serde::{Deserialize, Serialize};

/// 无法提取答案时使用的占位文本
pub const UNRESOLVED_ANSWER: &str = "Answer needs to be extracted from the provided PDF";

/// 备用题库的来源标记
pub const BACKUP_SOURCE_TAG: &str = "backup";

/// 试卷类型（P1 物理 / P2 化学）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperType {
    #[serde(rename = "Physical Sciences P1 (Physics)", alias = "Physics", alias = "physics")]
    Physics,
    #[serde(rename = "Physical Sciences P2 (Chemistry)", alias = "Chemistry", alias = "chemistry")]
    Chemistry,
}

impl PaperType {
    /// 对外展示的试卷名称
    pub fn label(self) -> &'static str {
        match self {
            PaperType::Physics => "Physical Sciences P1 (Physics)",
            PaperType::Chemistry => "Physical Sciences P2 (Chemistry)",
        }
    }

    /// 根据链接文字判断试卷类型
    ///
    /// 链接文字包含 `p1` 或 `physics` 即为物理卷，否则视为化学卷。
    pub fn from_link_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("p1") || lower.contains("physics") {
            PaperType::Physics
        } else {
            PaperType::Chemistry
        }
    }
}

impl std::fmt::Display for PaperType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 知识点主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "mechanics", alias = "Mechanics")]
    Mechanics,
    #[serde(rename = "waves", alias = "Waves")]
    Waves,
    #[serde(rename = "electricity & magnetism", alias = "Electricity & Magnetism")]
    ElectricityMagnetism,
    #[serde(rename = "optical phenomena", alias = "Optical Phenomena")]
    OpticalPhenomena,
    #[serde(rename = "chemical change", alias = "Chemical Change")]
    ChemicalChange,
    #[serde(rename = "chemical systems", alias = "Chemical Systems")]
    ChemicalSystems,
    #[serde(rename = "matter & materials", alias = "Matter & Materials")]
    MatterMaterials,
    #[serde(rename = "organic chemistry", alias = "Organic Chemistry")]
    OrganicChemistry,
    #[serde(rename = "other", alias = "Other")]
    Other,
}

impl Topic {
    /// 序列化及过滤使用的小写名称
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Mechanics => "mechanics",
            Topic::Waves => "waves",
            Topic::ElectricityMagnetism => "electricity & magnetism",
            Topic::OpticalPhenomena => "optical phenomena",
            Topic::ChemicalChange => "chemical change",
            Topic::ChemicalSystems => "chemical systems",
            Topic::MatterMaterials => "matter & materials",
            Topic::OrganicChemistry => "organic chemistry",
            Topic::Other => "other",
        }
    }

    /// 标准展示名称
    pub fn label(self) -> &'static str {
        match self {
            Topic::Mechanics => "Mechanics",
            Topic::Waves => "Waves",
            Topic::ElectricityMagnetism => "Electricity & Magnetism",
            Topic::OpticalPhenomena => "Optical Phenomena",
            Topic::ChemicalChange => "Chemical Change",
            Topic::ChemicalSystems => "Chemical Systems",
            Topic::MatterMaterials => "Matter & Materials",
            Topic::OrganicChemistry => "Organic Chemistry",
            Topic::Other => "Other",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 一道结构化的历年真题
///
/// 由分类器生成或从备用题库原样加载，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub year: i32,
    #[serde(rename = "paper")]
    pub paper_type: PaperType,
    #[serde(rename = "question")]
    pub question_text: String,
    pub topic: Topic,
    pub subtopic: String,
    #[serde(rename = "answer")]
    pub answer_text: String,
    /// 题目所在文档的地址，备用题库为空
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub provenance_url: Option<String>,
    #[serde(rename = "source", default)]
    pub source_tag: String,
}

impl QuestionRecord {
    /// 主题过滤：主题名或试卷名包含过滤词（过滤词需已转为小写）
    pub fn matches_topic(&self, topic_filter_lower: &str) -> bool {
        self.topic.as_str().contains(topic_filter_lower)
            || self.paper_type.label().to_lowercase().contains(topic_filter_lower)
    }

    /// 关键词过滤：任一检索词出现在题干或子主题中
    pub fn matches_any_term(&self, terms: &[String]) -> bool {
        let question = self.question_text.to_lowercase();
        let subtopic = self.subtopic.to_lowercase();
        terms
            .iter()
            .any(|term| question.contains(term.as_str()) || subtopic.contains(term.as_str()))
    }
}
