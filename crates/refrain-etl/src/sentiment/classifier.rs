//! Classifier sentiment analyzer.
//!
//! Scores lyrics with two externally trained artifacts: a TF-IDF
//! vectorizer and a linear model, both serialized as JSON. Artifacts are
//! loaded once and never mutated.
//!
//! Vectorizer artifact:
//!
//! ```json
//! {
//!   "vocabulary": {"love": 0, "hate": 1, "love you": 2},
//!   "idf": [1.2, 1.9, 2.4],
//!   "ngram_range": [1, 2],
//!   "sublinear_tf": false,
//!   "norm": "l2"
//! }
//! ```
//!
//! Model artifact (one coefficient row per class, or a single row when
//! there are exactly two classes):
//!
//! ```json
//! {
//!   "classes": ["negative", "positive"],
//!   "coef": [[1.7, -2.1, 0.4]],
//!   "intercept": [-0.1]
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use refrain_core::model::SentimentScore;

use crate::error::{EnrichError, EnrichResult};
use crate::sentiment::ScoreLyrics;

/// Normalise text before vectorizing: lowercase, drop everything outside
/// `a-z` and whitespace, collapse whitespace runs.
pub fn clean_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Maps cleaned text to a fixed-dimension feature vector.
pub trait Vectorizer: fmt::Debug + Send + Sync {
    fn dimension(&self) -> usize;

    fn transform(&self, text: &str) -> Vec<f64>;
}

/// Maps a feature vector to one label of a fixed label set.
pub trait Classifier: fmt::Debug + Send + Sync {
    fn n_features(&self) -> usize;

    fn labels(&self) -> &[String];

    fn predict(&self, features: &[f64]) -> &str;
}

fn load_artifact<T: DeserializeOwned>(path: &Path) -> EnrichResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| EnrichError::artifact(path, e))?;
    serde_json::from_str(&content).map_err(|e| EnrichError::artifact(path, e))
}

// ---------------------------------------------------------------------------
// TF-IDF vectorizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// A fitted TF-IDF transform over whitespace tokens of two or more
/// characters.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Load and validate a vectorizer artifact.
    pub fn load(path: &Path) -> EnrichResult<Self> {
        let vectorizer: Self = load_artifact(path)?;
        vectorizer
            .validate()
            .map_err(|message| EnrichError::artifact(path, message))?;
        Ok(vectorizer)
    }

    fn validate(&self) -> Result<(), String> {
        let dimension = self.vocabulary.len();
        if dimension == 0 {
            return Err("vocabulary is empty".to_string());
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|(_, &index)| index >= dimension)
        {
            return Err(format!(
                "term {term:?} has index {index} outside a vocabulary of {dimension}"
            ));
        }
        if let Some(idf) = &self.idf {
            if idf.len() != dimension {
                return Err(format!(
                    "idf has {} weights for a vocabulary of {dimension}",
                    idf.len()
                ));
            }
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }
        let longest = self
            .vocabulary
            .keys()
            .map(|term| term.split_whitespace().count())
            .max()
            .unwrap_or(0);
        if max_n > longest {
            return Err(format!(
                "ngram_range upper bound {max_n} exceeds the longest vocabulary term \
                 ({longest} words)"
            ));
        }
        Ok(())
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, f64> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|token| token.chars().count() >= 2)
            .collect();

        let mut counts = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                if let Some(&index) = self.vocabulary.get(&window.join(" ")) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0; self.dimension()];
        for (index, count) in self.term_counts(text) {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            let idf = self.idf.as_ref().map_or(1.0, |idf| idf[index]);
            features[index] = tf * idf;
        }

        let norm = match self.norm {
            Some(Norm::L2) => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => features.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }
        features
    }
}

// ---------------------------------------------------------------------------
// Linear model
// ---------------------------------------------------------------------------

/// A linear classifier: `argmax(coef · x + intercept)` over the classes.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearClassifier {
    /// Load and validate a model artifact.
    pub fn load(path: &Path) -> EnrichResult<Self> {
        let model: Self = load_artifact(path)?;
        model
            .validate()
            .map_err(|message| EnrichError::artifact(path, message))?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), String> {
        let classes = self.classes.len();
        let rows = self.coef.len();
        if classes < 2 {
            return Err(format!("need at least two classes, found {classes}"));
        }
        if rows != classes && !(classes == 2 && rows == 1) {
            return Err(format!("{rows} coefficient rows for {classes} classes"));
        }
        if self.intercept.len() != rows {
            return Err(format!(
                "{} intercepts for {rows} coefficient rows",
                self.intercept.len()
            ));
        }
        let width = self.coef[0].len();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err("coefficient rows differ in length".to_string());
        }
        Ok(())
    }

    fn decision(&self, row: usize, features: &[f64]) -> f64 {
        self.coef[row]
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept[row]
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> &str {
        if self.coef.len() == 1 {
            let positive = self.decision(0, features) > 0.0;
            return &self.classes[usize::from(positive)];
        }

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for row in 0..self.coef.len() {
            let score = self.decision(row, features);
            if score > best_score {
                best = row;
                best_score = score;
            }
        }
        &self.classes[best]
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Classifier-based analyzer producing labels.
#[derive(Debug)]
pub struct ClassifierAnalyzer {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
}

impl ClassifierAnalyzer {
    /// Pair a vectorizer with a classifier of matching dimension.
    ///
    /// # Errors
    /// Fails when the classifier expects a different number of features
    /// than the vectorizer produces.
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
    ) -> EnrichResult<Self> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(EnrichError::artifact(
                "model",
                format!(
                    "model expects {} features but the vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.dimension()
                ),
            ));
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Load both artifacts from JSON files.
    ///
    /// # Errors
    /// Fails when either file is missing or malformed, or when their
    /// dimensions disagree.
    pub fn load(vectorizer_path: &Path, model_path: &Path) -> EnrichResult<Self> {
        let vectorizer = TfidfVectorizer::load(vectorizer_path)?;
        let classifier = LinearClassifier::load(model_path)?;
        let analyzer = Self::new(Box::new(vectorizer), Box::new(classifier))?;
        log::info!(
            "Loaded classifier with {} features and labels {:?}",
            analyzer.vectorizer.dimension(),
            analyzer.labels()
        );
        Ok(analyzer)
    }

    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    /// Predicted label for raw (uncleaned) lyrics.
    pub fn predict(&self, lyrics: &str) -> &str {
        let features = self.vectorizer.transform(&clean_text(lyrics));
        self.classifier.predict(&features)
    }
}

impl ScoreLyrics for ClassifierAnalyzer {
    fn score(&self, lyrics: &str) -> SentimentScore {
        SentimentScore::Label(self.predict(lyrics).to_string())
    }
}
