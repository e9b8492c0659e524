use super::question::QuestionRecord;

/// 缓存中整代题目使用的键，也是表示"全部主题"的过滤词
pub const ALL_TOPICS_KEY: &str = "all";

/// 一次检索请求（不持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub raw_query: String,
    /// 已转为小写的主题过滤词，空串和 `all` 视为未指定
    pub topic_filter: Option<String>,
    /// 长度大于 3 的小写检索词
    pub search_terms: Vec<String>,
}

impl SearchQuery {
    pub fn new(raw_query: &str, topic_filter: &str) -> Self {
        let search_terms = raw_query
            .to_lowercase()
            .split_whitespace()
            .filter(|term| term.chars().count() > 3)
            .map(str::to_string)
            .collect();

        Self {
            raw_query: raw_query.to_string(),
            topic_filter: normalize_topic_filter(topic_filter),
            search_terms,
        }
    }

    /// 记录是否通过主题过滤和关键词过滤
    ///
    /// 只有空串查询匹配全部；查询非空（包括只有空白）但没有任何有效检索词时，没有记录能通过。
    pub fn matches(&self, record: &QuestionRecord) -> bool {
        let topic_match = self
            .topic_filter
            .as_deref()
            .map_or(true, |filter| record.matches_topic(filter));

        let query_match =
            self.raw_query.is_empty() || record.matches_any_term(&self.search_terms);

        topic_match && query_match
    }
}

/// 主题过滤词归一化：去空白、转小写，空串和 `all` 返回 None
pub fn normalize_topic_filter(topic_filter: &str) -> Option<String> {
    let lower = topic_filter.trim().to_lowercase();
    if lower.is_empty() || lower == ALL_TOPICS_KEY {
        None
    } else {
        Some(lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_skip_short_words() {
        let query = SearchQuery::new("How is the Net Force calculated", "");
        assert_eq!(query.search_terms, vec!["force", "calculated"]);
        assert_eq!(query.topic_filter, None);
    }

    #[test]
    fn test_topic_filter_normalization() {
        assert_eq!(normalize_topic_filter(" Mechanics "), Some("mechanics".to_string()));
        assert_eq!(normalize_topic_filter(""), None);
        assert_eq!(normalize_topic_filter("  "), None);
        assert_eq!(normalize_topic_filter("ALL"), None);
        assert_eq!(normalize_topic_filter(" all "), None);
    }

    #[test]
    fn test_whitespace_query_matches_nothing() {
        let record = crate::models::BackupDataset::shipped().records()[0].clone();
        assert!(SearchQuery::new("", "").matches(&record));
        assert!(!SearchQuery::new("   ", "").matches(&record));
        assert!(SearchQuery::new("acceleration", "All").matches(&record));
    }
}
