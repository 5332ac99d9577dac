mod cache;
mod history;

pub use cache::CacheRepository;
pub use history::HistoryRepository;
