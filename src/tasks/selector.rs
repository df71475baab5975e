use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{select_daily, AnnotatedEntry, Quotas};
use crate::storage::{Database, Entry};

// ============================================================================
// Daily Cache
// ============================================================================

/// The practice set drawn for one calendar day.
///
/// `tasks` is only served while `as_of_date` matches the caller's date.
/// Invalidation clears the date and leaves the stale tasks in place until
/// the next read redraws them.
#[derive(Debug, Clone, Default)]
pub struct DailyCache {
    pub as_of_date: Option<NaiveDate>,
    pub tasks: Arc<Vec<AnnotatedEntry>>,
}

impl DailyCache {
    /// True if the cached set can be served for `today` without a redraw.
    ///
    /// An empty set never counts as current, so an empty dictionary is
    /// re-read on every request until it has content.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.as_of_date == Some(today) && !self.tasks.is_empty()
    }
}

struct CacheState {
    cache: DailyCache,
    /// Bumped on every invalidation
    generation: u64,
}

// ============================================================================
// Selector
// ============================================================================

/// Serves the daily practice set and owns its cache.
///
/// One instance per running service, shared by all request handlers. The
/// lock is never held while the dictionary is read; two concurrent misses may
/// both draw a sample, and the last one stored wins.
pub struct DailyTaskSelector {
    db: Database,
    quotas: Quotas,
    state: RwLock<CacheState>,
}

impl DailyTaskSelector {
    pub fn new(db: Database, quotas: Quotas) -> Self {
        Self {
            db,
            quotas,
            state: RwLock::new(CacheState {
                cache: DailyCache::default(),
                generation: 0,
            }),
        }
    }

    pub fn quotas(&self) -> Quotas {
        self.quotas
    }

    /// Get the practice set for `today`, drawing a new one if the cached set
    /// belongs to another day or was invalidated.
    ///
    /// # Errors
    ///
    /// Propagates dictionary read failures unchanged. The cache is left
    /// untouched when the read fails.
    pub async fn get_tasks(&self, today: NaiveDate) -> Result<Arc<Vec<AnnotatedEntry>>> {
        let generation = {
            let state = self.state.read().await;
            if state.cache.is_current(today) {
                return Ok(Arc::clone(&state.cache.tasks));
            }
            state.generation
        };

        let entries = self.db.list_all().await?;
        let tasks = Arc::new(self.draw(&entries));

        let mut state = self.state.write().await;
        if state.generation == generation {
            state.cache = DailyCache {
                as_of_date: Some(today),
                tasks: Arc::clone(&tasks),
            };
            tracing::info!(
                date = %today,
                available = entries.len(),
                selected = tasks.len(),
                "Drew new daily task set"
            );
        } else {
            // An invalidation landed while we were reading; this sample may
            // miss that change, so hand it out once but don't keep it.
            tracing::debug!(date = %today, "Dictionary changed during redraw, not caching");
        }

        Ok(tasks)
    }

    /// Mark the cached set stale. The next `get_tasks` call redraws it.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.cache.as_of_date = None;
        state.generation = state.generation.wrapping_add(1);
        tracing::debug!(generation = state.generation, "Daily task cache invalidated");
    }

    /// Snapshot of the current cache contents
    pub async fn cache(&self) -> DailyCache {
        self.state.read().await.cache.clone()
    }

    fn draw(&self, entries: &[Entry]) -> Vec<AnnotatedEntry> {
        let mut rng = rand::rng();
        select_daily(entries, self.quotas, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Category, NewEntry};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(db: &Database, words: usize, phrases: usize) {
        for i in 0..words {
            let entry = NewEntry::new(
                &format!("слово {i}"),
                &format!("kelime{i}"),
                Category::Word,
            );
            db.insert(&entry).await.unwrap();
        }
        for i in 0..phrases {
            let entry = NewEntry::new(
                &format!("фраза {i}"),
                &format!("ifade {i}"),
                Category::Phrase,
            );
            db.insert(&entry).await.unwrap();
        }
    }

    fn ids(tasks: &[AnnotatedEntry]) -> Vec<i64> {
        tasks.iter().map(|task| task.entry.id).collect()
    }

    #[tokio::test]
    async fn test_same_day_is_stable() {
        let db = test_db().await;
        seed(&db, 40, 60).await;
        let selector = DailyTaskSelector::new(db, Quotas::default());

        let first = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        let second = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn test_cached_day_skips_store() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = DailyTaskSelector::new(db.clone(), Quotas::default());

        let first = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        // Written behind the selector's back: not visible until a redraw
        db.insert(&NewEntry::new("Стол", "Masa", Category::Word))
            .await
            .unwrap();
        let second = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(second.len(), 3);
    }

    #[tokio::test]
    async fn test_new_day_redraws() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = DailyTaskSelector::new(db.clone(), Quotas::default());

        selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        db.insert(&NewEntry::new("Стол", "Masa", Category::Word))
            .await
            .unwrap();
        let next_day = selector.get_tasks(date(2024, 1, 2)).await.unwrap();
        assert_eq!(next_day.len(), 4);
        assert_eq!(selector.cache().await.as_of_date, Some(date(2024, 1, 2)));
    }

    #[tokio::test]
    async fn test_invalidate_redraws_same_day() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = DailyTaskSelector::new(db.clone(), Quotas::default());

        selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        let entry = db
            .insert(&NewEntry::new("Стол", "Masa", Category::Word))
            .await
            .unwrap();
        selector.invalidate().await;

        let tasks = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert!(ids(&tasks).contains(&entry.id));
    }

    #[tokio::test]
    async fn test_invalidate_clears_date_only() {
        let db = test_db().await;
        seed(&db, 2, 2).await;
        let selector = DailyTaskSelector::new(db, Quotas::default());

        selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        selector.invalidate().await;

        let cache = selector.cache().await;
        assert_eq!(cache.as_of_date, None);
        assert_eq!(cache.tasks.len(), 4);
    }

    #[tokio::test]
    async fn test_invalidate_resamples() {
        let db = test_db().await;
        seed(&db, 100, 0).await;
        let selector = DailyTaskSelector::new(db, Quotas::default());

        let first = ids(&selector.get_tasks(date(2024, 1, 1)).await.unwrap());
        let mut changed = false;
        for _ in 0..5 {
            selector.invalidate().await;
            let again = ids(&selector.get_tasks(date(2024, 1, 1)).await.unwrap());
            if again != first {
                changed = true;
                break;
            }
        }
        assert!(changed, "Invalidation should trigger a fresh sample");
    }

    #[tokio::test]
    async fn test_three_words_no_phrases() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = DailyTaskSelector::new(db, Quotas::default());

        let tasks = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(tasks
            .iter()
            .all(|task| task.entry.category == Category::Word && !task.hint.is_empty()));
    }

    #[tokio::test]
    async fn test_quota_caps_and_uniqueness() {
        let db = test_db().await;
        seed(&db, 25, 45).await;
        let selector = DailyTaskSelector::new(db, Quotas::default());

        let tasks = selector.get_tasks(date(2024, 3, 9)).await.unwrap();
        let words = tasks
            .iter()
            .filter(|task| task.entry.category == Category::Word)
            .count();
        assert_eq!(words, 10);
        assert_eq!(tasks.len() - words, 20);

        let unique: HashSet<i64> = ids(&tasks).into_iter().collect();
        assert_eq!(unique.len(), tasks.len());
    }

    #[tokio::test]
    async fn test_empty_store_is_not_cached() {
        let db = test_db().await;
        let selector = DailyTaskSelector::new(db.clone(), Quotas::default());

        let empty = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert!(empty.is_empty());

        // No invalidation: an empty set is never treated as current
        db.insert(&NewEntry::new("Стол", "Masa", Category::Word))
            .await
            .unwrap();
        let tasks = selector.get_tasks(date(2024, 1, 1)).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].hint, "Starts with 'M', letters: 4");
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = DailyTaskSelector::new(db.clone(), Quotas::default());

        db.close().await;
        let result = selector.get_tasks(date(2024, 1, 1)).await;
        assert!(result.is_err());
        assert_eq!(selector.cache().await.as_of_date, None);
    }

    #[tokio::test]
    async fn test_invalidation_during_redraw_is_not_cached() {
        let db = test_db().await;
        seed(&db, 3, 0).await;
        let selector = Arc::new(DailyTaskSelector::new(db.clone(), Quotas::default()));

        // Hold the in-memory pool's only connection so the redraw parks on
        // its dictionary read
        let conn = db.pool.acquire().await.unwrap();

        let redraw = tokio::spawn({
            let selector = Arc::clone(&selector);
            async move { selector.get_tasks(date(2024, 1, 1)).await }
        });
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        selector.invalidate().await;
        drop(conn);

        let tasks = redraw.await.unwrap().unwrap();
        assert_eq!(tasks.len(), 3);

        let cache = selector.cache().await;
        assert_eq!(cache.as_of_date, None);
        assert!(cache.tasks.is_empty());
    }

    #[test]
    fn test_is_current() {
        let mut cache = DailyCache::default();
        assert!(!cache.is_current(date(2024, 1, 1)));

        cache.as_of_date = Some(date(2024, 1, 1));
        assert!(!cache.is_current(date(2024, 1, 1)), "empty set is never current");

        cache.tasks = Arc::new(vec![AnnotatedEntry::new(Entry {
            id: 1,
            source_text: "Стол".to_string(),
            target_text: "Masa".to_string(),
            category: Category::Word,
        })]);
        assert!(cache.is_current(date(2024, 1, 1)));
        assert!(!cache.is_current(date(2024, 1, 2)));
    }
}
