//! Enrichment pipeline: cache lookup, fetch on miss, score.
//!
//! Events are processed strictly one at a time, in input order. Per-event
//! failures never abort the batch; an event whose lyrics could not be
//! resolved simply carries no score.

use refrain_core::model::{EnrichedEvent, PlayEvent};

use crate::config::Config;
use crate::error::EnrichResult;
use crate::lyrics::{CacheStats, GeniusClient, LyricsCache, LyricsFetcher, LyricsSource};
use crate::sentiment::{ScoreLyrics, SentimentScorer};

/// Owns the lyrics cache, the fetcher and the scorer for a single run.
#[derive(Debug)]
pub struct EnrichmentPipeline<S> {
    fetcher: LyricsFetcher<S>,
    cache: LyricsCache,
    scorer: SentimentScorer,
}

impl EnrichmentPipeline<GeniusClient> {
    /// Build a pipeline against Genius with the configured scorer.
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be created or the scorer's
    /// artifacts cannot be loaded.
    pub fn from_config(config: &Config) -> EnrichResult<Self> {
        let scorer = SentimentScorer::from_config(config)?;
        let client = GeniusClient::from_config(config)?;
        if !client.is_authenticated() {
            log::info!("No Genius token configured; searching unauthenticated");
        }
        log::info!("Scoring lyrics with the {} strategy", scorer.kind());
        Ok(Self::new(client, scorer))
    }
}

impl<S: LyricsSource> EnrichmentPipeline<S> {
    pub fn new(source: S, scorer: SentimentScorer) -> Self {
        Self {
            fetcher: LyricsFetcher::new(source),
            cache: LyricsCache::new(),
            scorer,
        }
    }

    /// Lazily enrich `events`, yielding one [`EnrichedEvent`] per input
    /// event in the same order.
    pub fn enrich<I>(&mut self, events: I) -> Enrich<'_, S, I::IntoIter>
    where
        I: IntoIterator<Item = PlayEvent>,
    {
        Enrich {
            pipeline: self,
            events: events.into_iter(),
            processed: 0,
        }
    }

    /// Enrich a single event.
    pub fn enrich_event(&mut self, event: PlayEvent) -> EnrichedEvent {
        let fetcher = &self.fetcher;
        let lyrics = self
            .cache
            .get_or_fetch(&event.artist_name, &event.track_name, || {
                fetcher.fetch(&event.track_name, &event.artist_name)
            });

        let score = lyrics.as_text().map(|text| self.scorer.score(text));
        if let Some(score) = &score {
            log::debug!("{} - {}: {}", event.artist_name, event.track_name, score);
        }

        EnrichedEvent::new(event, score)
    }

    pub fn cache(&self) -> &LyricsCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }
}

/// Iterator returned by [`EnrichmentPipeline::enrich`].
///
/// Single pass: each input event is fetched and scored when it is pulled.
#[derive(Debug)]
pub struct Enrich<'a, S, I> {
    pipeline: &'a mut EnrichmentPipeline<S>,
    events: I,
    processed: usize,
}

impl<S: LyricsSource, I: Iterator<Item = PlayEvent>> Iterator for Enrich<'_, S, I> {
    type Item = EnrichedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(event) = self.events.next() else {
            if self.processed > 0 {
                log::info!(
                    "Enriched {} events (cache: {})",
                    self.processed,
                    self.pipeline.stats()
                );
                self.processed = 0;
            }
            return None;
        };

        self.processed += 1;
        if self.processed % 100 == 0 {
            log::info!("Enriched {} events so far", self.processed);
        }
        Some(self.pipeline.enrich_event(event))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use refrain_core::model::SentimentScore;

    use super::*;
    use crate::error::EnrichError;
    use crate::sentiment::LexiconAnalyzer;

    /// In-memory source keyed by title; unknown titles fail like a broken
    /// upstream.
    #[derive(Debug, Default)]
    struct MemorySource {
        lyrics: HashMap<&'static str, &'static str>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl MemorySource {
        fn with(entries: &[(&'static str, &'static str)]) -> Self {
            Self {
                lyrics: entries.iter().copied().collect(),
                calls: RefCell::default(),
            }
        }
    }

    impl LyricsSource for MemorySource {
        fn name(&self) -> &str {
            "memory"
        }

        fn lookup(&self, title: &str, artist: &str) -> EnrichResult<Option<String>> {
            self.calls
                .borrow_mut()
                .push((title.to_string(), artist.to_string()));
            match self.lyrics.get(title) {
                Some(text) => Ok(Some((*text).to_string())),
                None => Err(EnrichError::Http {
                    source_name: "memory".to_string(),
                    message: "503 Service Unavailable".to_string(),
                }),
            }
        }
    }

    fn event(track: &str, artist: &str, minute: u32) -> PlayEvent {
        let end_time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(21, minute, 0)
            .unwrap();
        PlayEvent::new(track, artist, end_time, "alice")
    }

    fn pipeline(source: MemorySource) -> EnrichmentPipeline<MemorySource> {
        EnrichmentPipeline::new(source, LexiconAnalyzer::new().into())
    }

    #[test]
    fn test_enrich_preserves_order_and_length() {
        let mut pipeline = pipeline(MemorySource::with(&[
            ("Happy", "I love you, you make me so happy"),
            ("Sad", "I hate this, it hurts so bad"),
        ]));
        let events = vec![
            event("Happy", "A", 1),
            event("Missing", "B", 2),
            event("Sad", "C", 3),
            event("Happy", "A", 4),
        ];

        let enriched: Vec<_> = pipeline.enrich(events.clone()).collect();

        assert_eq!(enriched.len(), events.len());
        for (output, input) in enriched.iter().zip(&events) {
            assert_eq!(&output.event, input);
        }
        assert!(enriched[0].sentiment_score.as_ref().unwrap().compound().unwrap() > 0.0);
        assert!(enriched[1].sentiment_score.is_none());
        assert!(enriched[2].sentiment_score.as_ref().unwrap().compound().unwrap() < 0.0);
        assert_eq!(enriched[0].sentiment_score, enriched[3].sentiment_score);
    }

    #[test]
    fn test_each_key_fetched_once() {
        let mut pipeline = pipeline(MemorySource::with(&[("Hello", "hello from the other side")]));
        let events = vec![
            event("Hello", "Adele", 1),
            event("Nope", "Nobody", 2),
            event("Hello", "Adele", 3),
            event("Nope", "Nobody", 4),
            event("Hello", "Adele", 5),
        ];

        let count = pipeline.enrich(events).count();

        assert_eq!(count, 5);
        assert_eq!(pipeline.fetcher.source().calls.borrow().len(), 2);
        let stats = pipeline.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 3);
    }

    #[test]
    fn test_failing_source_yields_no_score() {
        let mut pipeline = pipeline(MemorySource::default());
        let enriched: Vec<_> = pipeline
            .enrich(vec![event("Anything", "Anyone", 1), event("Else", "Anyone", 2)])
            .collect();
        assert!(enriched.iter().all(|e| e.sentiment_score.is_none()));
    }

    #[test]
    fn test_fetch_receives_title_then_artist() {
        let mut pipeline = pipeline(MemorySource::with(&[("Yesterday", "all my troubles")]));
        pipeline.enrich_event(event("Yesterday", "The Beatles", 1));
        assert_eq!(
            pipeline.fetcher.source().calls.borrow()[0],
            ("Yesterday".to_string(), "The Beatles".to_string())
        );
        assert!(pipeline.cache().get("The Beatles", "Yesterday").is_some());
    }

    #[test]
    fn test_enrich_is_lazy() {
        let mut pipeline = pipeline(MemorySource::with(&[("A", "good"), ("B", "bad")]));
        let mut iter = pipeline.enrich(vec![event("A", "x", 1), event("B", "x", 2)]);
        assert_eq!(iter.size_hint(), (2, Some(2)));
        let first = iter.next().unwrap();
        assert!(matches!(first.sentiment_score, Some(SentimentScore::Compound(_))));
        drop(iter);
        assert_eq!(pipeline.cache().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mut pipeline = pipeline(MemorySource::default());
        assert_eq!(pipeline.enrich(Vec::new()).count(), 0);
        assert!(pipeline.cache().is_empty());
    }
}
