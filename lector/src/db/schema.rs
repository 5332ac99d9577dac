use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- History: one row per processing event, independent of the cache
        CREATE TABLE IF NOT EXISTS history (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            original_filename TEXT NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            confidence REAL NOT NULL DEFAULT 0,
            word_count INTEGER NOT NULL DEFAULT 0,
            char_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            artifact_path TEXT NOT NULL DEFAULT '',
            content_fingerprint TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_created_at ON history(created_at);
        CREATE INDEX IF NOT EXISTS idx_history_fingerprint ON history(content_fingerprint);

        -- Result cache: one row per content fingerprint. detections_json
        -- keeps full polygon geometry so a hit never re-runs the engine.
        CREATE TABLE IF NOT EXISTS result_cache (
            fingerprint TEXT PRIMARY KEY,
            text TEXT NOT NULL DEFAULT '',
            confidence REAL NOT NULL DEFAULT 0,
            word_count INTEGER NOT NULL DEFAULT 0,
            char_count INTEGER NOT NULL DEFAULT 0,
            line_count INTEGER NOT NULL DEFAULT 0,
            detection_count INTEGER NOT NULL DEFAULT 0,
            detections_json TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    Ok(())
}
