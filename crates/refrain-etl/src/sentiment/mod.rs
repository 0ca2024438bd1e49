//! Sentiment scoring strategies.
//!
//! Two strategies are available: a lexicon analyzer producing a compound
//! score in `[-1.0, 1.0]`, and a classifier analyzer producing a label from
//! its model's label set. The strategy is chosen once, when the
//! [`SentimentScorer`] is built.

pub mod classifier;
pub mod lexicon;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use refrain_core::model::SentimentScore;

use crate::config::Config;
use crate::error::{EnrichError, EnrichResult};

pub use classifier::{ClassifierAnalyzer, LinearClassifier, TfidfVectorizer};
pub use lexicon::LexiconAnalyzer;

/// Capability shared by every strategy.
///
/// Scoring never fails: empty or whitespace-only lyrics still produce a
/// valid score.
pub trait ScoreLyrics {
    fn score(&self, lyrics: &str) -> SentimentScore;
}

/// Configuration name of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Lexicon,
    Classifier,
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicon" | "vader" => Ok(Self::Lexicon),
            "classifier" | "ml" => Ok(Self::Classifier),
            other => Err(format!(
                "unknown scorer {other:?} (expected \"lexicon\" or \"classifier\")"
            )),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexicon => "lexicon",
            Self::Classifier => "classifier",
        })
    }
}

/// The strategy selected for a run.
#[derive(Debug)]
pub enum SentimentScorer {
    Lexicon(LexiconAnalyzer),
    Classifier(ClassifierAnalyzer),
}

impl SentimentScorer {
    /// Build the configured strategy, loading its artifacts.
    ///
    /// # Errors
    /// Fails when a configured lexicon or either classifier artifact cannot
    /// be loaded, or when the classifier is selected without both artifact
    /// paths.
    pub fn from_config(config: &Config) -> EnrichResult<Self> {
        match config.scorer {
            ScorerKind::Lexicon => {
                let analyzer = match &config.lexicon_path {
                    Some(path) => LexiconAnalyzer::from_file(path)?,
                    None => LexiconAnalyzer::new(),
                };
                Ok(Self::Lexicon(analyzer))
            }
            ScorerKind::Classifier => {
                let (Some(vectorizer), Some(model)) = (&config.vectorizer_path, &config.model_path)
                else {
                    let missing = if config.vectorizer_path.is_none() {
                        "vectorizer_path"
                    } else {
                        "model_path"
                    };
                    return Err(EnrichError::artifact(
                        missing,
                        "required by the classifier scorer but not configured",
                    ));
                };
                Ok(Self::Classifier(ClassifierAnalyzer::load(vectorizer, model)?))
            }
        }
    }

    pub fn kind(&self) -> ScorerKind {
        match self {
            Self::Lexicon(_) => ScorerKind::Lexicon,
            Self::Classifier(_) => ScorerKind::Classifier,
        }
    }
}

impl ScoreLyrics for SentimentScorer {
    fn score(&self, lyrics: &str) -> SentimentScore {
        match self {
            Self::Lexicon(analyzer) => analyzer.score(lyrics),
            Self::Classifier(analyzer) => analyzer.score(lyrics),
        }
    }
}

impl From<LexiconAnalyzer> for SentimentScorer {
    fn from(analyzer: LexiconAnalyzer) -> Self {
        Self::Lexicon(analyzer)
    }
}

impl From<ClassifierAnalyzer> for SentimentScorer {
    fn from(analyzer: ClassifierAnalyzer) -> Self {
        Self::Classifier(analyzer)
    }
}
