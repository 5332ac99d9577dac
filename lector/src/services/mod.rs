mod cache;
mod history;
mod retention;
mod scan;

pub use cache::ResultCache;
pub use history::HistoryLog;
pub use retention::RetentionSweeper;
pub use scan::{ScanOptions, ScanOutcome, ScanService};
