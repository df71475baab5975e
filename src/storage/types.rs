use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds a lock on the database file
    #[error("The dictionary database is locked by another process. Stop it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all surface
/// as one of these messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Category
// ============================================================================

/// Kind of dictionary item. Each category has its own daily quota.
///
/// On the wire the category is spelled the way the front-end shows it
/// (`"слово"` / `"фраза"`); the English names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "слово", alias = "word")]
    Word,
    #[serde(rename = "фраза", alias = "phrase")]
    Phrase,
}

impl Category {
    /// Value stored in the `entries.category` column
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Word => "word",
            Category::Phrase => "phrase",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" | "слово" => Ok(Category::Word),
            "phrase" | "фраза" => Ok(Category::Phrase),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

// ============================================================================
// Helper Types
// ============================================================================

/// Row type for entry queries
pub(crate) type EntryRow = (i64, String, String, String);

/// Payload for a new dictionary entry (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEntry {
    #[serde(rename = "ru")]
    pub source_text: String,
    #[serde(rename = "tr")]
    pub target_text: String,
    #[serde(rename = "type")]
    pub category: Category,
}

impl NewEntry {
    pub fn new(source_text: &str, target_text: &str, category: Category) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            category,
        }
    }
}

/// Result of deleting an entry by id.
///
/// Deleting an id that does not exist is not an error, the caller just
/// learns that nothing was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    pub fn removed(self) -> bool {
        self == DeleteOutcome::Deleted
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A stored word or phrase pair.
///
/// `id` is assigned by the database on insert and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    #[serde(rename = "ru")]
    pub source_text: String,
    #[serde(rename = "tr")]
    pub target_text: String,
    #[serde(rename = "type")]
    pub category: Category,
}

impl Entry {
    pub(crate) fn from_row(row: EntryRow) -> Result<Self, UnknownCategory> {
        let (id, source_text, target_text, category) = row;
        Ok(Self {
            id,
            source_text,
            target_text,
            category: category.parse()?,
        })
    }
}
