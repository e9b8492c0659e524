//! 题目切分服务 - 业务能力层
//!
//! 在试卷原始文本中按"题号 + 大写开头的句子 + 问号"切出题目，
//! 并取题目之后的一段文字作为答案上下文。只做尽力而为的切分。

use std::sync::LazyLock;

use regex::Regex;

/// 题号（可带子题号）+ 空格 + 大写字母开头，截止到同一行最后一个问号
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.(\d+)? [A-Z][^\n]+\?").expect("question pattern is valid")
});

/// 一道候选题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCandidate {
    pub question: String,
    /// 题目之后的答案上下文
    pub context: String,
}

/// 题目切分服务
#[derive(Debug, Clone)]
pub struct QuestionExtractor {
    window_chars: usize,
}

impl QuestionExtractor {
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars }
    }

    pub fn extract(&self, text: &str) -> Vec<QuestionCandidate> {
        QUESTION_RE
            .find_iter(text)
            .filter_map(|m| {
                let question = m.as_str().trim().to_string();
                if question.is_empty() {
                    return None;
                }
                let context: String = text[m.end()..].chars().take(self.window_chars).collect();
                Some(QuestionCandidate { question, context })
            })
            .collect()
    }
}

impl Default for QuestionExtractor {
    fn default() -> Self {
        Self::new(500)
    }
}
