use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::path::Segment;
use crate::snapshot::JsonKind;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("path {path} not found: segment {index} ({segment}) does not exist")]
    PathResolution {
        path: String,
        index: usize,
        segment: Segment,
    },

    #[error("value at {path} is a {kind}, not an object or array")]
    NotAContainer { path: String, kind: JsonKind },

    #[error("field {key:?} does not exist on {path}")]
    UnknownField { path: String, key: String },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to back up {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
