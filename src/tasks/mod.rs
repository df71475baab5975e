//! Daily practice set selection.
//!
//! Once per calendar day the selector draws a capped random sample of words
//! and phrases from the dictionary and annotates each with a hint. The
//! sample stays fixed for the rest of the day so repeated reads show the same
//! set, and is redrawn at the next date or after any dictionary change.
//!
//! ```no_run
//! # async fn demo(db: dailywords::storage::Database) -> anyhow::Result<()> {
//! use dailywords::tasks::{DailyTaskSelector, Quotas};
//!
//! let selector = DailyTaskSelector::new(db, Quotas::default());
//! let today = chrono::Local::now().date_naive();
//! let tasks = selector.get_tasks(today).await?;
//! # Ok(())
//! # }
//! ```

mod hint;
mod sampling;
mod selector;

use serde::{Deserialize, Serialize};

use crate::storage::Entry;

pub use hint::hint_for;
pub use sampling::select_daily;
pub use selector::{DailyCache, DailyTaskSelector};

/// Default number of words in a daily set
pub const WORD_QUOTA: usize = 10;

/// Default number of phrases in a daily set
pub const PHRASE_QUOTA: usize = 20;

/// Per-category caps for one daily set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quotas {
    pub words: usize,
    pub phrases: usize,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            words: WORD_QUOTA,
            phrases: PHRASE_QUOTA,
        }
    }
}

/// A dictionary entry selected for practice, with its derived hint.
///
/// Serializes flat: `{id, ru, tr, type, hint}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub hint: String,
}

impl AnnotatedEntry {
    pub fn new(entry: Entry) -> Self {
        let hint = hint_for(&entry.target_text);
        Self { entry, hint }
    }
}
