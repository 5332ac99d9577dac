use tracing::debug;

use crate::db::repository::HistoryRepository;
use crate::db::Database;
use crate::error::Result;
use crate::models::HistoryEntry;

/// Append-mostly record of processing events.
///
/// Independent of the result cache: it records "this image was
/// processed", not "this content has a cached result". Entries are only
/// removed by explicit user action; the retention sweeper never touches
/// this table.
#[derive(Clone)]
pub struct HistoryLog {
    db: Database,
}

impl HistoryLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let conn = self.db.connect()?;
        HistoryRepository::insert(&conn, entry).await
    }

    /// Most recent first; stable across repeated calls on unchanged data.
    pub async fn list(&self, limit: u32) -> Result<Vec<HistoryEntry>> {
        let conn = self.db.connect()?;
        HistoryRepository::list(&conn, limit).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<HistoryEntry>> {
        let conn = self.db.connect()?;
        HistoryRepository::get_by_id(&conn, id).await
    }

    /// Idempotent: deleting an id that does not exist is a no-op.
    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let deleted = HistoryRepository::delete(&conn, id).await?;
        if !deleted {
            debug!(id = %id, "History delete on missing entry, nothing to do");
        }
        Ok(deleted)
    }

    pub async fn clear(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        HistoryRepository::clear(&conn).await
    }
}
