//! Lyrics retrieval components.

pub mod cache;
pub mod extract;
pub mod fetcher;
pub mod genius;
pub mod resilience;

pub use cache::{CacheStats, LyricsCache};
pub use extract::extract_lyrics;
pub use fetcher::{LyricsFetcher, LyricsSource};
pub use genius::GeniusClient;
