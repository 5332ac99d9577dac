use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};

use crate::error::{LectorError, Result};
use crate::models::{DocumentDetection, DocumentResult, DocumentStats};

pub struct CacheRepository;

impl CacheRepository {
    /// Upsert a result under its fingerprint. A single statement replaces
    /// the whole row, so concurrent writers race to last-writer-wins and a
    /// reader can never observe a partially written entry.
    pub async fn upsert(
        conn: &Connection,
        fingerprint: &str,
        result: &DocumentResult,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO result_cache (
                fingerprint, text, confidence, word_count, char_count,
                line_count, detection_count, detections_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(fingerprint) DO UPDATE SET
                text = excluded.text,
                confidence = excluded.confidence,
                word_count = excluded.word_count,
                char_count = excluded.char_count,
                line_count = excluded.line_count,
                detection_count = excluded.detection_count,
                detections_json = excluded.detections_json,
                created_at = excluded.created_at
            "#,
            params![
                fingerprint,
                result.text.clone(),
                result.stats.avg_confidence as f64,
                result.stats.word_count as i64,
                result.stats.char_count as i64,
                result.stats.line_count as i64,
                result.stats.detection_count as i64,
                serde_json::to_string(&result.detections)?,
                created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get(conn: &Connection, fingerprint: &str) -> Result<Option<DocumentResult>> {
        let mut rows = conn
            .query(
                "SELECT * FROM result_cache WHERE fingerprint = ?1",
                params![fingerprint],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_result(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM result_cache", ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| LectorError::Internal("COUNT returned no row".to_string()))?;
        Ok(row.get::<i64>(0)? as u64)
    }

    pub async fn clear(conn: &Connection) -> Result<u64> {
        Ok(conn.execute("DELETE FROM result_cache", ()).await?)
    }

    fn row_to_result(row: &Row) -> Result<DocumentResult> {
        let detections_json: String = row.get(7)?;
        let detections: Vec<DocumentDetection> = serde_json::from_str(&detections_json)?;

        Ok(DocumentResult {
            text: row.get(1)?,
            detections,
            stats: DocumentStats {
                avg_confidence: row.get::<f64>(2)? as f32,
                word_count: row.get::<i64>(3)? as u32,
                char_count: row.get::<i64>(4)? as u32,
                line_count: row.get::<i64>(5)? as u32,
                detection_count: row.get::<i64>(6)? as u32,
            },
        })
    }
}
