//! 检索入口 - 编排层
//!
//! 对外只有两个操作：
//! - `search`：同步返回，从不失败，最多返回 5 条
//! - `refresh`：跑完整刷新流程并写入缓存
//!
//! 缓存只保存一代完整题目（键为 `all`），主题过滤在读取时进行。
//! 缓存过期（或未命中）时，`search` 在后台启动一次刷新，但不等待它。
//! 触发刷新的那次调用看不到新数据，之后的调用才能看到。

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheEntry, QuestionCache};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{BackupDataset, QuestionRecord, SearchQuery, ALL_TOPICS_KEY};
use crate::workflow::{QuestionHarvester, RefreshFlow};

/// search 返回条数的上限，配置只能调低
pub const RESULT_CAP: usize = 5;

/// 历年真题检索
pub struct PastPaperSearch {
    cache: Arc<QuestionCache>,
    harvester: Arc<dyn QuestionHarvester>,
    backup: Arc<BackupDataset>,
    /// 是否有后台刷新正在进行
    refreshing: Arc<AtomicBool>,
    max_results: usize,
    refresh_on_miss: bool,
}

impl PastPaperSearch {
    pub fn new(
        cache: Arc<QuestionCache>,
        harvester: Arc<dyn QuestionHarvester>,
        backup: BackupDataset,
        config: &Config,
    ) -> Self {
        if config.max_results > RESULT_CAP {
            warn!(
                "⚠️ MAX_RESULTS={} 超过上限，使用 {}",
                config.max_results, RESULT_CAP
            );
        }
        Self {
            cache,
            harvester,
            backup: Arc::new(backup),
            refreshing: Arc::new(AtomicBool::new(false)),
            max_results: config.max_results.min(RESULT_CAP),
            refresh_on_miss: config.refresh_on_miss,
        }
    }

    /// 使用真实刷新流程和配置中的备用题库构建
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let flow = RefreshFlow::from_config(config).await?;
        info!("✓ 已注册 {} 个来源", flow.registry().len());

        let backup = BackupDataset::load_or_shipped(config.backup_dataset_path.as_deref()).await;
        let cache = Arc::new(QuestionCache::with_ttl_hours(config.cache_ttl_hours));

        Ok(Self::new(cache, Arc::new(flow), backup, config))
    }

    pub fn cache(&self) -> &Arc<QuestionCache> {
        &self.cache
    }

    pub fn backup(&self) -> &BackupDataset {
        &self.backup
    }

    /// 检索题目
    ///
    /// 候选池：缓存中的整代题目（无论新鲜与否），没有或为空时使用备用题库。
    /// 结果保持候选池顺序。
    pub fn search(&self, query: &str, topic_filter: &str) -> Vec<QuestionRecord> {
        let query = SearchQuery::new(query, topic_filter);
        let cached = self.cache.get(ALL_TOPICS_KEY);

        match &cached {
            Some(entry) if !self.cache.is_fresh(entry) => {
                info!("缓存已过期，后台刷新");
                self.spawn_refresh();
            }
            None if self.refresh_on_miss => {
                debug!("缓存未命中，后台刷新");
                self.spawn_refresh();
            }
            _ => {}
        }

        let pool: &[QuestionRecord] = match &cached {
            Some(entry) if !entry.records.is_empty() => &entry.records,
            _ => self.backup.records(),
        };

        pool.iter()
            .filter(|record| query.matches(record))
            .take(self.max_results)
            .cloned()
            .collect()
    }

    /// 同步刷新整代题目，返回其中通过主题过滤的记录数
    ///
    /// 所有内部失败都被记录并吞掉。
    pub async fn refresh(&self, topic_filter: &str) -> usize {
        let Some(entry) = refresh_into(&self.cache, self.harvester.as_ref()).await else {
            return 0;
        };
        let query = SearchQuery::new("", topic_filter);
        entry.records.iter().filter(|record| query.matches(record)).count()
    }

    /// 启动后台刷新（同时只有一个）
    fn spawn_refresh(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("⚠️ 当前没有 tokio 运行时，跳过后台刷新");
            return;
        };

        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("后台刷新已在进行中");
            return;
        }

        let guard = RefreshGuard(Arc::clone(&self.refreshing));
        let cache = Arc::clone(&self.cache);
        let harvester = Arc::clone(&self.harvester);

        runtime.spawn(async move {
            let _guard = guard;
            refresh_into(&cache, harvester.as_ref()).await;
        });
    }
}

/// 跑一轮刷新，整体替换缓存中的整代题目；刷新 panic 时缓存保持不变
async fn refresh_into(
    cache: &QuestionCache,
    harvester: &dyn QuestionHarvester,
) -> Option<Arc<CacheEntry>> {
    let records = match AssertUnwindSafe(harvester.harvest()).catch_unwind().await {
        Ok(records) => records,
        Err(_) => {
            error!("❌ 刷新时发生 panic，缓存保持不变");
            return None;
        }
    };

    let entry = cache.put(ALL_TOPICS_KEY, records);
    info!("✓ 缓存已刷新: {} 道题", entry.records.len());
    Some(entry)
}

/// 后台任务结束（包括被取消）时清除刷新标记
struct RefreshGuard(Arc<AtomicBool>);

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Notify;

    use crate::models::{PaperType, Topic, ALL_TOPICS_KEY, BACKUP_SOURCE_TAG};

    fn record(question: &str, topic: Topic, paper_type: PaperType) -> QuestionRecord {
        QuestionRecord {
            year: 2022,
            paper_type,
            question_text: question.to_string(),
            topic,
            subtopic: "general".to_string(),
            answer_text: "x = 1".to_string(),
            provenance_url: Some("https://papers.example/p.pdf".to_string()),
            source_tag: "Fake".to_string(),
        }
    }

    /// 返回固定记录，可选地阻塞到收到通知
    struct FakeHarvester {
        records: Vec<QuestionRecord>,
        calls: AtomicUsize,
        release: Option<Arc<Notify>>,
    }

    impl FakeHarvester {
        fn returning(records: Vec<QuestionRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
                release: None,
            }
        }

        fn blocked(records: Vec<QuestionRecord>, release: Arc<Notify>) -> Self {
            Self {
                release: Some(release),
                ..Self::returning(records)
            }
        }
    }

    #[async_trait]
    impl QuestionHarvester for FakeHarvester {
        async fn harvest(&self) -> Vec<QuestionRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            self.records.clone()
        }
    }

    struct PanickingHarvester;

    #[async_trait]
    impl QuestionHarvester for PanickingHarvester {
        async fn harvest(&self) -> Vec<QuestionRecord> {
            panic!("scraper exploded")
        }
    }

    fn quiet_config() -> Config {
        Config {
            refresh_on_miss: false,
            ..Config::default()
        }
    }

    fn search_with(harvester: Arc<dyn QuestionHarvester>, config: &Config) -> PastPaperSearch {
        PastPaperSearch::new(
            Arc::new(QuestionCache::with_ttl_hours(24)),
            harvester,
            BackupDataset::shipped(),
            config,
        )
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_empty_cache_falls_back_to_backup() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());

        let results = search.search("acceleration", "");
        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.year, 2023);
        assert_eq!(hit.paper_type.label(), "Physical Sciences P1 (Physics)");
        assert_eq!(
            hit.question_text,
            "A 2 kg object is subjected to a net force of 10 N. Calculate the acceleration of the object."
        );
        assert_eq!(hit.topic.as_str(), "mechanics");
        assert!(hit.answer_text.contains("5 m/s²"));
        assert_eq!(hit.source_tag, BACKUP_SOURCE_TAG);
    }

    #[tokio::test]
    async fn test_results_are_capped_and_keep_pool_order() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());
        let records: Vec<QuestionRecord> = (0..12)
            .map(|i| {
                record(
                    &format!("{}.1 Calculate the force on block {}?", i, i),
                    Topic::Mechanics,
                    PaperType::Physics,
                )
            })
            .collect();
        search.cache().put(ALL_TOPICS_KEY, records.clone());

        let results = search.search("force", "");
        assert_eq!(results, records[..5].to_vec());
        assert!(search.search("", "").len() <= 5);
    }

    #[tokio::test]
    async fn test_topic_filter_is_case_insensitive() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());

        let upper = search.search("", "Mechanics");
        let lower = search.search("", "mechanics");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert!(upper.iter().all(|r| r.topic == Topic::Mechanics));

        // 试卷名也参与主题过滤
        let chemistry = search.search("", "chemistry");
        assert!(chemistry.iter().all(|r| r.paper_type == PaperType::Chemistry));
        assert_eq!(chemistry.len(), 2);
    }

    #[tokio::test]
    async fn test_query_of_only_short_words_matches_nothing() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());
        assert!(search.search("a is of", "").is_empty());
    }

    #[tokio::test]
    async fn test_empty_cached_payload_uses_backup() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());
        search.cache().put(ALL_TOPICS_KEY, Vec::new());

        let results = search.search("", "");
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.source_tag == BACKUP_SOURCE_TAG));
    }

    #[tokio::test]
    async fn test_stale_entry_served_immediately_then_refreshed() {
        let release = Arc::new(Notify::new());
        let fresh = vec![record(
            "2.1 What is the momentum of the trolley?",
            Topic::Mechanics,
            PaperType::Physics,
        )];
        let harvester = Arc::new(FakeHarvester::blocked(fresh.clone(), Arc::clone(&release)));
        let search = search_with(harvester.clone(), &quiet_config());

        let stale = vec![record(
            "1.1 Define the term velocity?",
            Topic::Mechanics,
            PaperType::Physics,
        )];
        search.cache().put_at(
            ALL_TOPICS_KEY,
            stale.clone(),
            Utc::now() - chrono::Duration::hours(25),
        );

        // 刷新被阻塞，search 仍然立即返回旧数据
        assert_eq!(search.search("", ""), stale);
        wait_until(|| harvester.calls.load(Ordering::SeqCst) == 1).await;

        // 刷新进行中，再次过期读取不会重复触发
        assert_eq!(search.search("", ""), stale);
        tokio::task::yield_now().await;
        assert_eq!(harvester.calls.load(Ordering::SeqCst), 1);

        release.notify_one();
        wait_until(|| {
            search
                .cache()
                .get(ALL_TOPICS_KEY)
                .is_some_and(|entry| entry.records == fresh)
        })
        .await;

        assert_eq!(search.search("", ""), fresh);
        assert_eq!(harvester.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_does_not_trigger_refresh() {
        let harvester = Arc::new(FakeHarvester::returning(vec![]));
        let search = search_with(harvester.clone(), &Config::default());
        search.cache().put(
            ALL_TOPICS_KEY,
            vec![record("1.1 What is a force?", Topic::Mechanics, PaperType::Physics)],
        );

        assert_eq!(search.search("force", "").len(), 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harvester.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_serves_backup_and_refreshes_in_background() {
        let fresh = vec![record(
            "3.1 Calculate the current in the circuit?",
            Topic::ElectricityMagnetism,
            PaperType::Physics,
        )];
        let harvester = Arc::new(FakeHarvester::returning(fresh.clone()));
        let search = search_with(harvester.clone(), &Config::default());

        let first = search.search("circuit", "");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].source_tag, BACKUP_SOURCE_TAG);

        wait_until(|| search.cache().get(ALL_TOPICS_KEY).is_some()).await;
        assert_eq!(search.search("circuit", ""), fresh);
    }

    fn harvested() -> Vec<QuestionRecord> {
        vec![
            record("1.1 What is the net force on the crate?", Topic::Mechanics, PaperType::Physics),
            record("5.1 Name the alkane?", Topic::OrganicChemistry, PaperType::Chemistry),
        ]
    }

    #[tokio::test]
    async fn test_refresh_with_topic_keeps_whole_generation() {
        let search = search_with(Arc::new(FakeHarvester::returning(harvested())), &quiet_config());

        assert_eq!(search.refresh("Mechanics").await, 1);
        assert_eq!(search.cache().len(), 1);
        assert_eq!(search.cache().get(ALL_TOPICS_KEY).unwrap().records.len(), 2);

        // 另一主题的检索仍能用上这一代数据
        let organic = search.search("alkane", "organic");
        assert_eq!(organic.len(), 1);
        assert_eq!(organic[0].source_tag, "Fake");
    }

    #[tokio::test]
    async fn test_all_filter_means_every_topic() {
        let search = search_with(Arc::new(FakeHarvester::returning(harvested())), &quiet_config());

        assert_eq!(search.refresh("").await, 2);
        assert_eq!(search.search("force", "")[0].source_tag, "Fake");

        assert_eq!(search.refresh("ALL").await, 2);
        assert_eq!(search.cache().get(ALL_TOPICS_KEY).unwrap().records.len(), 2);
        assert_eq!(search.search("force", "")[0].source_tag, "Fake");
        assert_eq!(search.search("force", "All")[0].source_tag, "Fake");
    }

    #[tokio::test]
    async fn test_arbitrary_filters_share_one_entry_and_one_refresh() {
        let release = Arc::new(Notify::new());
        let harvester = Arc::new(FakeHarvester::blocked(harvested(), Arc::clone(&release)));
        let search = search_with(harvester.clone(), &Config::default());

        for i in 0..50 {
            assert!(search.search("force", &format!("zz{}", i)).is_empty());
        }
        wait_until(|| harvester.calls.load(Ordering::SeqCst) == 1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(harvester.calls.load(Ordering::SeqCst), 1);

        release.notify_one();
        wait_until(|| !search.cache().is_empty()).await;
        assert_eq!(search.cache().len(), 1);
        assert!(search.cache().get(ALL_TOPICS_KEY).is_some());
    }

    #[tokio::test]
    async fn test_configured_limit_cannot_exceed_cap() {
        let records: Vec<QuestionRecord> = (0..12)
            .map(|i| {
                record(
                    &format!("{}.1 Calculate the force on block {}?", i, i),
                    Topic::Mechanics,
                    PaperType::Physics,
                )
            })
            .collect();

        let generous = Config {
            max_results: 50,
            ..quiet_config()
        };
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &generous);
        search.cache().put(ALL_TOPICS_KEY, records.clone());
        assert_eq!(search.search("", "").len(), RESULT_CAP);

        let narrow = Config {
            max_results: 2,
            ..quiet_config()
        };
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &narrow);
        search.cache().put(ALL_TOPICS_KEY, records);
        assert_eq!(search.search("", "").len(), 2);
    }

    #[tokio::test]
    async fn test_whitespace_query_returns_nothing() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &quiet_config());
        assert!(search.search("   ", "").is_empty());
        assert_eq!(search.search("", "").len(), 5);
    }

    #[tokio::test]
    async fn test_panicking_refresh_is_contained() {
        let search = search_with(Arc::new(PanickingHarvester), &quiet_config());

        assert_eq!(search.refresh("").await, 0);
        assert!(search.cache().is_empty());
        assert_eq!(search.search("acceleration", "").len(), 1);
    }

    #[test]
    fn test_search_without_runtime_still_answers() {
        let search = search_with(Arc::new(FakeHarvester::returning(vec![])), &Config::default());
        assert_eq!(search.search("acceleration", "mechanics").len(), 1);
    }
}
