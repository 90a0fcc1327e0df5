use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("reading payload {path:?}: {source}")]
    ReadPayload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing payload {path:?}: {message}")]
    ParsePayload { path: PathBuf, message: String },

    #[error("duplicate parameter id {0}")]
    DuplicateParam(i64),

    #[error("writing snapshot {path:?}: {source}")]
    WriteSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding snapshot: {0}")]
    EncodeSnapshot(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, EditorError>;
