//! Aggregate listening reports.
//!
//! Pure reductions over loaded or enriched events. Rendering (tables,
//! charts) is left to the caller.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{EnrichedEvent, PlayEvent};

/// Play counts keyed by hour of day, then by user.
pub type HourlyListening = BTreeMap<u32, BTreeMap<String, usize>>;

/// Count plays per (hour, user).
///
/// Only hours with at least one play appear.
pub fn listening_by_hour<'a>(events: impl IntoIterator<Item = &'a PlayEvent>) -> HourlyListening {
    let mut by_hour = HourlyListening::new();
    for event in events {
        *by_hour
            .entry(event.hour)
            .or_default()
            .entry(event.user.clone())
            .or_default() += 1;
    }
    by_hour
}

/// Plays of one artist, broken down by user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistPlays {
    pub artist: String,
    pub total: usize,
    pub per_user: BTreeMap<String, usize>,
}

/// The `limit` most played artists across all users.
///
/// Ties on the total are broken by artist name so the order is stable.
pub fn top_artists<'a>(
    events: impl IntoIterator<Item = &'a PlayEvent>,
    limit: usize,
) -> Vec<ArtistPlays> {
    let mut by_artist: BTreeMap<&str, BTreeMap<String, usize>> = BTreeMap::new();
    for event in events {
        *by_artist
            .entry(event.artist_name.as_str())
            .or_default()
            .entry(event.user.clone())
            .or_default() += 1;
    }

    let mut ranked: Vec<ArtistPlays> = by_artist
        .into_iter()
        .map(|(artist, per_user)| ArtistPlays {
            artist: artist.to_string(),
            total: per_user.values().sum(),
            per_user,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.artist.cmp(&b.artist)));
    ranked.truncate(limit);
    ranked
}

/// One scored play on the sentiment timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentPoint {
    pub end_time: NaiveDateTime,
    pub user: String,
    pub score: f64,
}

/// Compound scores over time, oldest first.
///
/// Events without a compound score (unscored, or labelled by a
/// classifier) are dropped.
pub fn sentiment_timeline<'a>(
    events: impl IntoIterator<Item = &'a EnrichedEvent>,
) -> Vec<SentimentPoint> {
    let mut points: Vec<SentimentPoint> = events
        .into_iter()
        .filter_map(|enriched| {
            let score = enriched.sentiment_score.as_ref()?.compound()?;
            Some(SentimentPoint {
                end_time: enriched.event.end_time,
                user: enriched.event.user.clone(),
                score,
            })
        })
        .collect();
    points.sort_by_key(|point| point.end_time);
    points
}

/// Mean compound score per user over scored plays.
pub fn mean_sentiment_by_user<'a>(
    events: impl IntoIterator<Item = &'a EnrichedEvent>,
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for point in sentiment_timeline(events) {
        let entry = sums.entry(point.user).or_default();
        entry.0 += point.score;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(user, (sum, count))| (user, sum / count as f64))
        .collect()
}

/// Number of plays per classifier label.
pub fn label_counts<'a>(
    events: impl IntoIterator<Item = &'a EnrichedEvent>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in events
        .into_iter()
        .filter_map(|enriched| enriched.sentiment_score.as_ref()?.label())
    {
        *counts.entry(label.to_string()).or_default() += 1;
    }
    counts
}
