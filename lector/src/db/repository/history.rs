use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};

use crate::error::{LectorError, Result};
use crate::models::HistoryEntry;

pub struct HistoryRepository;

impl HistoryRepository {
    pub async fn insert(conn: &Connection, entry: &HistoryEntry) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO history (
                id, filename, original_filename, text, confidence,
                word_count, char_count, created_at, artifact_path,
                content_fingerprint
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.id.clone(),
                entry.filename.clone(),
                entry.original_filename.clone(),
                entry.text.clone(),
                entry.confidence as f64,
                entry.word_count as i64,
                entry.char_count as i64,
                entry.created_at.to_rfc3339(),
                entry.artifact_path.clone(),
                entry.content_fingerprint.clone(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Most recent first. The rowid tie-break keeps the ordering stable
    /// for entries sharing a timestamp.
    pub async fn list(conn: &Connection, limit: u32) -> Result<Vec<HistoryEntry>> {
        let mut rows = conn
            .query(
                "SELECT * FROM history ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                params![limit as i64],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(Self::row_to_entry(&row)?);
        }
        Ok(entries)
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<HistoryEntry>> {
        let mut rows = conn
            .query("SELECT * FROM history WHERE id = ?1", params![id])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_entry(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])
            .await?;
        Ok(rows_affected > 0)
    }

    pub async fn clear(conn: &Connection) -> Result<u64> {
        Ok(conn.execute("DELETE FROM history", ()).await?)
    }

    fn row_to_entry(row: &Row) -> Result<HistoryEntry> {
        let created_at: String = row.get(7)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| LectorError::Internal(format!("Invalid created_at in history: {e}")))?
            .with_timezone(&Utc);

        Ok(HistoryEntry {
            id: row.get(0)?,
            filename: row.get(1)?,
            original_filename: row.get(2)?,
            text: row.get(3)?,
            confidence: row.get::<f64>(4)? as f32,
            word_count: row.get::<i64>(5)? as u32,
            char_count: row.get::<i64>(6)? as u32,
            created_at,
            artifact_path: row.get(8)?,
            content_fingerprint: row.get(9)?,
        })
    }
}
