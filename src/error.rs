use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::SentenceId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("sentence {0} not found in corpus")]
    NotFound(SentenceId),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("snapshot version {found} does not match expected version {expected}")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
