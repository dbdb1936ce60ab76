use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("refusing to materialize an empty structure")]
    EmptyStructure,

    #[error("invalid path '{path}': {source}")]
    InvalidPath {
        path: String,
        source: fabriq_parse::PathError,
    },

    #[error("path escapes the destination root: '{path}'")]
    SandboxEscape { path: PathBuf },

    #[error("destination already exists: '{path}'")]
    DestinationExists { path: PathBuf },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to commit staged tree to '{path}': {source}")]
    Commit { path: PathBuf, source: io::Error },

    #[error("materialization cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
