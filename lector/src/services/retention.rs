use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use crate::config::RetentionConfig;
use crate::error::Result;

/// Sweeper responsible for reclaiming aged artifact files.
///
/// The filesystem is ground truth: a file is eligible once
/// `now - mtime > max_age`, regardless of any database row referencing
/// it. Cache entries and history records pointing at a reclaimed file
/// become dangling on purpose; the cached text stays servable. Foreground
/// requests mutate these directories concurrently, so files appearing or
/// vanishing mid-sweep are routine, never errors.
#[derive(Clone)]
pub struct RetentionSweeper {
    dirs: Vec<PathBuf>,
    max_age: Duration,
    interval_secs: u64,
}

impl RetentionSweeper {
    pub fn new(dirs: Vec<PathBuf>, config: &RetentionConfig) -> Self {
        Self {
            dirs,
            max_age: Duration::from_secs(config.max_age_secs),
            interval_secs: config.sweep_interval_secs,
        }
    }

    /// Run a single sweep across all artifact directories.
    ///
    /// Per-file failures are logged and skipped; they never abort the
    /// sweep. Returns the number of files removed.
    pub async fn run_once(&self) -> Result<u64> {
        info!("Starting retention sweep");

        let now = SystemTime::now();
        let mut removed = 0u64;
        let mut errors = 0u64;

        for dir in &self.dirs {
            let mut entries = match tokio::fs::read_dir(dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable artifact directory");
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                        errors += 1;
                        break;
                    }
                };

                let path = entry.path();

                let metadata = match entry.metadata().await {
                    Ok(m) => m,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "File vanished mid-sweep");
                        continue;
                    }
                };
                if !metadata.is_file() {
                    continue;
                }

                let modified = match metadata.modified() {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "No modification time, skipping");
                        errors += 1;
                        continue;
                    }
                };

                let age = match now.duration_since(modified) {
                    Ok(age) => age,
                    // mtime in the future: the file is not expired.
                    Err(_) => continue,
                };

                if age > self.max_age {
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => {
                            debug!(path = %path.display(), age_secs = age.as_secs(), "Removed expired artifact");
                            removed += 1;
                        }
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Failed to remove expired artifact");
                            errors += 1;
                        }
                    }
                }
            }
        }

        info!(
            "Retention sweep complete: {} removed, {} errors",
            removed, errors
        );

        Ok(removed)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}
