//! Lyrics enrichment for refrain.
//!
//! Resolves lyrics for play events through the Genius search API and song
//! pages, caches lookups for the duration of a run, and scores the lyrics
//! with either a lexicon analyzer or a trained linear classifier.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod lyrics;
pub mod pipeline;
pub mod sentiment;

pub use config::Config;
pub use error::{EnrichError, EnrichResult};
pub use lyrics::{GeniusClient, LyricsCache, LyricsFetcher, LyricsSource};
pub use pipeline::EnrichmentPipeline;
pub use sentiment::{ScoreLyrics, ScorerKind, SentimentScorer};
