use anyhow::Result;

use super::schema::Database;
use super::types::{Category, DeleteOutcome, Entry, EntryRow, NewEntry};

/// Entries inserted into an empty dictionary on first start.
const DEFAULT_ENTRIES: &[(&str, &str, Category)] = &[
    ("Книга", "Kitap", Category::Word),
    ("Яблоко", "Elma", Category::Word),
    ("Как тебя зовут?", "Adın ne?", Category::Phrase),
    ("Доброе утро", "Günaydın", Category::Phrase),
    ("Стол", "Masa", Category::Word),
    ("Машина", "Araba", Category::Word),
    ("Друг", "Arkadaş", Category::Word),
    ("Приятного аппетита", "Afiyet olsun", Category::Phrase),
    ("Где находится...?", "Nerede...?", Category::Phrase),
    ("Пожалуйста (ответ)", "Rica ederim", Category::Phrase),
];

impl Database {
    // ========================================================================
    // Entry Operations
    // ========================================================================

    /// Get every stored entry, ordered by id.
    pub async fn list_all(&self) -> Result<Vec<Entry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT id, source_text, target_text, category FROM entries ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(Entry::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Insert a new entry and return it with its assigned id.
    pub async fn insert(&self, new_entry: &NewEntry) -> Result<Entry> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO entries (source_text, target_text, category) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_entry.source_text)
        .bind(&new_entry.target_text)
        .bind(new_entry.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = row.0, category = %new_entry.category, "Inserted entry");

        Ok(Entry {
            id: row.0,
            source_text: new_entry.source_text.clone(),
            target_text: new_entry.target_text.clone(),
            category: new_entry.category,
        })
    }

    /// Delete an entry by id.
    ///
    /// A missing id yields `DeleteOutcome::NotFound`, never an error.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id, "Delete of unknown entry");
            return Ok(DeleteOutcome::NotFound);
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Number of stored entries
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Populate an empty dictionary with the built-in starter entries.
    ///
    /// Returns the number of entries inserted, 0 if the dictionary already
    /// had content.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&mut *tx)
            .await?;
        if existing.0 > 0 {
            return Ok(0);
        }

        for (source_text, target_text, category) in DEFAULT_ENTRIES {
            sqlx::query("INSERT INTO entries (source_text, target_text, category) VALUES (?, ?, ?)")
                .bind(*source_text)
                .bind(*target_text)
                .bind(category.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(count = DEFAULT_ENTRIES.len(), "Seeded dictionary with default entries");
        Ok(DEFAULT_ENTRIES.len())
    }
}
