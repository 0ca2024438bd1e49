use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    History {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {entity} at {}", path.display())]
    NotFound { entity: &'static str, path: PathBuf },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
