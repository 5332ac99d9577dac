use chrono::Utc;

use crate::db::repository::CacheRepository;
use crate::db::Database;
use crate::error::Result;
use crate::models::{CacheStats, DocumentResult};

/// Content-addressed cache of reconstruction results.
///
/// Keyed by the fingerprint of the raw image bytes, never the filename,
/// so byte-identical uploads always resolve to the same entry. `store`
/// followed by `lookup` on the same fingerprint returns the stored value;
/// concurrent stores for one fingerprint settle on whichever writer
/// finished last.
#[derive(Clone)]
pub struct ResultCache {
    db: Database,
}

impl ResultCache {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Pure read; no side effects.
    pub async fn lookup(&self, fingerprint: &str) -> Result<Option<DocumentResult>> {
        let conn = self.db.connect()?;
        CacheRepository::get(&conn, fingerprint).await
    }

    pub async fn store(&self, fingerprint: &str, result: &DocumentResult) -> Result<()> {
        let conn = self.db.connect()?;
        CacheRepository::upsert(&conn, fingerprint, result, Utc::now()).await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        let conn = self.db.connect()?;
        Ok(CacheStats {
            entry_count: CacheRepository::count(&conn).await?,
        })
    }

    /// Full eviction. Irreversible.
    pub async fn clear(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        CacheRepository::clear(&conn).await
    }
}
