//! Day-keyed cache of built menu documents.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{Local, NaiveDate};
use ohill_core::MenuDocument;
use tokio::sync::Mutex;

/// Most entries kept at once; the oldest is evicted past this.
pub const MAX_ENTRIES: usize = 16;

#[derive(Debug)]
struct Entry {
    document: Arc<MenuDocument>,
    stored_at: Instant,
    /// Insertion order; eviction picks the smallest.
    seq: u64,
}

#[derive(Debug, Default)]
struct Entries {
    by_key: HashMap<String, Entry>,
    next_seq: u64,
}

/// Process-wide cache keyed by calendar day, entries expiring after `ttl`.
#[derive(Debug, Clone)]
pub struct MenuCache {
    ttl: Duration,
    entries: Arc<Mutex<Entries>>,
}

impl MenuCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(Entries::default())),
        }
    }

    /// Cached document for `key`, unless missing or older than the TTL.
    pub async fn get(&self, key: &str) -> Option<Arc<MenuDocument>> {
        let entries = self.entries.lock().await;
        entries
            .by_key
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.document))
    }

    pub async fn insert(&self, key: String, document: Arc<MenuDocument>) {
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.by_key.retain(|_, e| e.stored_at.elapsed() < ttl);

        if !entries.by_key.contains_key(&key) && entries.by_key.len() >= MAX_ENTRIES {
            let oldest = entries
                .by_key
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.by_key.remove(&oldest);
            }
        }

        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.by_key.insert(
            key,
            Entry {
                document,
                stored_at: Instant::now(),
                seq,
            },
        );
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.lock().await.by_key.len()
    }
}

/// `today-YYYY-MM-DD` for `date`.
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format("today-%Y-%m-%d").to_string()
}

/// [`day_key`] for the server's local date.
#[must_use]
pub fn today_key() -> String {
    day_key(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(date: &str) -> Arc<MenuDocument> {
        Arc::new(MenuDocument {
            venue: "O'Hill".to_string(),
            date: date.to_string(),
            generated_at: "2025-09-05T12:00:00Z".to_string(),
            meals: vec![],
        })
    }

    #[test]
    fn day_key_formats_local_date() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 5).expect("valid date");
        assert_eq!(day_key(date), "today-2025-09-05");
    }

    #[tokio::test]
    async fn get_returns_fresh_entry() {
        let cache = MenuCache::new(Duration::from_secs(60));
        cache.insert("today-2025-09-05".to_string(), doc("2025-09-05")).await;

        let hit = cache.get("today-2025-09-05").await.expect("cache hit");
        assert_eq!(hit.date, "2025-09-05");
        assert!(cache.get("today-2025-09-06").await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_never_hits() {
        let cache = MenuCache::new(Duration::ZERO);
        cache.insert("k".to_string(), doc("2025-09-05")).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn insert_evicts_oldest_past_capacity() {
        let cache = MenuCache::new(Duration::from_secs(60));
        for i in 0..=MAX_ENTRIES {
            cache.insert(format!("day-{i}"), doc("x")).await;
        }

        assert_eq!(cache.entry_count().await, MAX_ENTRIES);
        assert!(cache.get("day-0").await.is_none(), "oldest entry evicted");
        assert!(cache.get(&format!("day-{MAX_ENTRIES}")).await.is_some());
    }

    #[tokio::test]
    async fn reinsert_replaces_without_evicting() {
        let cache = MenuCache::new(Duration::from_secs(60));
        for i in 0..MAX_ENTRIES {
            cache.insert(format!("day-{i}"), doc("old")).await;
        }
        cache.insert("day-3".to_string(), doc("new")).await;

        assert_eq!(cache.entry_count().await, MAX_ENTRIES);
        assert_eq!(cache.get("day-3").await.expect("hit").date, "new");
        assert!(cache.get("day-0").await.is_some());
    }
}
