//! Enrichment error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving lyrics or preparing scorers.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An HTTP request to an external source returned a failure status.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The requested entity was not found at the external source.
    #[error("not found: {entity} at {source_name}")]
    NotFound { entity: String, source_name: String },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A scoring artifact (lexicon, vectorizer, model) could not be loaded.
    #[error("cannot load artifact {}: {message}", path.display())]
    Artifact { path: PathBuf, message: String },
}

impl EnrichError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn artifact(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Artifact {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
