use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("refusing to build an archive from an empty structure")]
    EmptyStructure,

    #[error("source is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    #[error("no entries could be written to the archive")]
    NoEntries,

    #[error("failed to finalize archive: {source}")]
    Finish { source: zip::result::ZipError },

    #[error("archive build cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
