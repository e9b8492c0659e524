//! 题目缓存
//!
//! 按主题键保存抓取结果。写入是整条记录的原子替换，读者拿到的总是完整的
//! 旧快照或完整的新快照，不会看到写了一半的数据。缓存本身不做任何网络 I/O。

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::models::QuestionRecord;

/// 默认新鲜期（小时）
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// 一个主题键下的缓存内容
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub records: Vec<QuestionRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// 题目缓存
pub struct QuestionCache {
    entries: ArcSwap<HashMap<String, Arc<CacheEntry>>>,
    ttl: Duration,
}

impl QuestionCache {
    /// 创建空缓存，`ttl` 为新鲜期
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            ttl,
        }
    }

    /// 小时数超出 chrono 可表示的范围时使用默认的 24 小时
    pub fn with_ttl_hours(hours: i64) -> Self {
        let ttl = Duration::try_hours(hours).unwrap_or_else(|| {
            warn!("⚠️ 缓存新鲜期 {} 小时超出范围，使用 {} 小时", hours, DEFAULT_TTL_HOURS);
            Duration::hours(DEFAULT_TTL_HOURS)
        });
        Self::new(ttl)
    }

    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.entries.load().get(key).cloned()
    }

    /// 用新一代记录整体替换该键的内容
    pub fn put(&self, key: &str, records: Vec<QuestionRecord>) -> Arc<CacheEntry> {
        self.put_at(key, records, Utc::now())
    }

    /// 指定抓取时间写入
    pub fn put_at(
        &self,
        key: &str,
        records: Vec<QuestionRecord>,
        fetched_at: DateTime<Utc>,
    ) -> Arc<CacheEntry> {
        let entry = Arc::new(CacheEntry {
            key: key.to_string(),
            records,
            fetched_at,
        });

        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key.to_string(), Arc::clone(&entry));
            next
        });

        debug!("缓存已更新: {} ({} 条)", key, entry.records.len());
        entry
    }

    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.is_fresh_at(entry, Utc::now())
    }

    pub fn is_fresh_at(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}
