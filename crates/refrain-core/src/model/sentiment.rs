use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::PlayEvent;

/// Sentiment attached to a play event.
///
/// The lexicon strategy yields a `Compound` value in `[-1.0, 1.0]`; the
/// classifier strategy yields one `Label` out of its model's label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentScore {
    Compound(f64),
    Label(String),
}

impl SentimentScore {
    #[must_use]
    pub fn compound(&self) -> Option<f64> {
        match self {
            Self::Compound(value) => Some(*value),
            Self::Label(_) => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Compound(_) => None,
            Self::Label(label) => Some(label),
        }
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compound(value) => write!(f, "{value:.4}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// A play event together with its sentiment, if lyrics were available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    #[serde(flatten)]
    pub event: PlayEvent,
    pub sentiment_score: Option<SentimentScore>,
}

impl EnrichedEvent {
    #[must_use]
    pub fn new(event: PlayEvent, sentiment_score: Option<SentimentScore>) -> Self {
        Self {
            event,
            sentiment_score,
        }
    }
}
