use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::engine::EngineProvider;
use crate::services::{HistoryLog, ResultCache, RetentionSweeper, ScanService};
use crate::storage::ArtifactStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub engine: EngineProvider,
    pub artifacts: ArtifactStore,
    pub cache: ResultCache,
    pub history: HistoryLog,
    pub retention: RetentionSweeper,
    pub scans: ScanService,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Database,
        engine: EngineProvider,
        artifacts: ArtifactStore,
    ) -> Self {
        let cache = ResultCache::new(db.clone());
        let history = HistoryLog::new(db.clone());
        let retention = RetentionSweeper::new(artifacts.dirs(), &config.retention);
        let scans = ScanService::new(
            engine.clone(),
            cache.clone(),
            history.clone(),
            artifacts.clone(),
            &config,
        );

        Self {
            config: Arc::new(config),
            db,
            engine,
            artifacts,
            cache,
            history,
            retention,
            scans,
        }
    }
}
