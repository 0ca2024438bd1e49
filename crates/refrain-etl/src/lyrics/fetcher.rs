//! The never-failing lyrics fetch boundary.

use std::fmt;

use refrain_core::model::LyricsResult;

use crate::error::{EnrichError, EnrichResult};

/// A fallible lookup of lyrics text for a song.
///
/// `Ok(None)` means the source answered but has no lyrics for the song.
pub trait LyricsSource: fmt::Debug {
    /// Name used in log messages.
    fn name(&self) -> &str;

    fn lookup(&self, title: &str, artist: &str) -> EnrichResult<Option<String>>;
}

/// Wraps a [`LyricsSource`] so that lookups always produce a
/// [`LyricsResult`].
///
/// Every error from the source is collapsed into `NotFound`; the reason is
/// only reported through the log.
#[derive(Debug, Clone)]
pub struct LyricsFetcher<S> {
    source: S,
}

impl<S: LyricsSource> LyricsFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn fetch(&self, title: &str, artist: &str) -> LyricsResult {
        match self.source.lookup(title, artist) {
            Ok(text) => {
                let result = LyricsResult::from_text(text);
                if !result.is_found() {
                    log::debug!(
                        "No lyrics on {} for {} - {}",
                        self.source.name(),
                        artist,
                        title
                    );
                }
                result
            }
            Err(e) if e.is_not_found() => {
                log::debug!("{} has no match for {} - {}", self.source.name(), artist, title);
                LyricsResult::NotFound
            }
            Err(e) => {
                log::warn!(
                    "Lyrics lookup on {} for {} - {} hit a {}: {}",
                    self.source.name(),
                    artist,
                    title,
                    failure_kind(&e),
                    e
                );
                LyricsResult::NotFound
            }
        }
    }
}

/// How a failed lookup is described in the log. Transient failures are
/// cached like any other miss for the rest of the run.
fn failure_kind(error: &EnrichError) -> &'static str {
    if error.is_transient() {
        "transient failure (not retried this run)"
    } else {
        "permanent failure"
    }
}
