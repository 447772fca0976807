use std::path::PathBuf;
use thiserror::Error;

use crate::registry::TrialKey;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("unknown dataset key `{0}`")]
    Unknown(String),
    #[error("dataset {0} was not found in the data directory")]
    Missing(TrialKey),
    #[error("dataset {0} contains no samples")]
    Empty(TrialKey),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a platform feedback channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedbackError {
    #[error("haptics: {0}")]
    Haptics(String),
    #[error("audio: {0}")]
    Audio(String),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
