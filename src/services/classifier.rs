//! 题目分类服务 - 业务能力层
//!
//! 三个独立的判断，全部基于关键词：
//! - 主题 / 子主题：按顺序检查关键词组，第一个命中的组胜出
//! - 试卷类型：物理词与化学词计数，物理分数 >= 化学分数即为物理卷
//! - 答案：显式标记 → 等式 → 占位文本

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{PaperLink, PaperType, QuestionRecord, Topic, UNRESOLVED_ANSWER};
use crate::services::question_extractor::QuestionCandidate;

/// 一个主题关键词组
#[derive(Debug)]
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    /// (关键词, 子主题)，按顺序匹配
    pub subtopics: &'static [(&'static str, &'static str)],
    pub default_subtopic: &'static str,
}

/// 主题规则表，顺序即优先级
///
/// 同时提到 "force" 和 "acid" 的题目归为 Mechanics，因为力学组排在前面。
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::Mechanics,
        keywords: &["force", "newton", "acceleration", "velocity", "momentum"],
        subtopics: &[("newton", "newton's laws")],
        default_subtopic: "kinematics",
    },
    TopicRule {
        topic: Topic::ElectricityMagnetism,
        keywords: &["circuit", "current", "voltage", "resistance", "ohm"],
        subtopics: &[],
        default_subtopic: "electric circuits",
    },
    TopicRule {
        topic: Topic::ChemicalChange,
        keywords: &["acid", "base", "ph", "equilibrium"],
        subtopics: &[],
        default_subtopic: "acids and bases",
    },
    TopicRule {
        topic: Topic::OrganicChemistry,
        keywords: &["alcohol", "alkane", "functional group", "organic"],
        subtopics: &[],
        default_subtopic: "functional groups",
    },
];

/// 没有任何关键词命中时的子主题
pub const GENERAL_SUBTOPIC: &str = "general";

pub const PHYSICS_KEYWORDS: &[&str] = &[
    "force", "motion", "velocity", "current", "voltage", "circuit", "wave", "doppler",
    "momentum", "newton",
];

pub const CHEMISTRY_KEYWORDS: &[&str] = &[
    "reaction", "acid", "base", "equilibrium", "organic", "molecule", "compound", "bond",
    "oxidation", "reduction",
];

/// `Answer:` / `Solution:`（不区分大小写）或 `A.` 之后到行尾的内容
static ANSWER_MARKER_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)Answer:\s*([^\n]+)").expect("answer marker pattern is valid"),
        Regex::new(r"(?i)Solution:\s*([^\n]+)").expect("solution marker pattern is valid"),
        Regex::new(r"A\.\s*([^\n]+)").expect("option marker pattern is valid"),
    ]
});

/// 字母 = 数字 [单位]
static EQUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]\s*=\s*[\d.]+[ \t]*[A-Za-z/·²³⁻¹]*").expect("equation pattern is valid")
});

/// 主题分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMatch {
    pub topic: Topic,
    pub subtopic: String,
}

/// 按规则表顺序判断主题，第一个命中的组胜出
pub fn classify_topic(text: &str) -> TopicMatch {
    let lower = text.to_lowercase();

    for rule in TOPIC_RULES {
        if rule.keywords.iter().any(|k| lower.contains(k)) {
            let subtopic = rule
                .subtopics
                .iter()
                .find(|(keyword, _)| lower.contains(keyword))
                .map_or(rule.default_subtopic, |&(_, subtopic)| subtopic);
            return TopicMatch {
                topic: rule.topic,
                subtopic: subtopic.to_string(),
            };
        }
    }

    TopicMatch {
        topic: Topic::Other,
        subtopic: GENERAL_SUBTOPIC.to_string(),
    }
}

/// 物理 / 化学关键词计数，平局判为物理卷
pub fn classify_paper(question: &str) -> PaperType {
    let lower = question.to_lowercase();
    let score = |keywords: &[&str]| keywords.iter().filter(|k| lower.contains(*k)).count();

    if score(PHYSICS_KEYWORDS) >= score(CHEMISTRY_KEYWORDS) {
        PaperType::Physics
    } else {
        PaperType::Chemistry
    }
}

/// 从题目之后的上下文中提取答案
pub fn extract_answer(context: &str) -> String {
    for marker in ANSWER_MARKER_RES.iter() {
        if let Some(answer) = marker.captures(context).and_then(|c| c.get(1)) {
            return answer.as_str().trim().to_string();
        }
    }

    if let Some(equation) = EQUATION_RE.find(context) {
        return equation.as_str().trim().to_string();
    }

    UNRESOLVED_ANSWER.to_string()
}

/// 把候选题目和所在试卷组合成一条结构化记录
pub fn classify(candidate: &QuestionCandidate, paper: &PaperLink) -> QuestionRecord {
    let topic = classify_topic(&format!("{} {}", candidate.question, candidate.context));

    QuestionRecord {
        year: paper.year,
        paper_type: classify_paper(&candidate.question),
        question_text: candidate.question.clone(),
        topic: topic.topic,
        subtopic: topic.subtopic,
        answer_text: extract_answer(&candidate.context),
        provenance_url: Some(paper.url.clone()),
        source_tag: paper.source.clone(),
    }
}
