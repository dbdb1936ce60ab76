use thiserror::Error;

/// Why the validator rejected a candidate path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is blank")]
    Empty,

    #[error("path contains a parent-directory segment: '{0}'")]
    Traversal(String),

    #[error("path is absolute: '{0}'")]
    Absolute(String),

    #[error("path has no file extension: '{0}'")]
    MissingExtension(String),

    #[error("path contains a reserved or control character: '{0}'")]
    IllegalChar(String),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input text is blank")]
    EmptyInput,

    #[error("no files could be extracted from the model output; response starts: {excerpt:?}")]
    NoFilesExtracted { excerpt: String },

    #[error("model output declares duplicate file paths: {}", .paths.join(", "))]
    DuplicatePaths { paths: Vec<String> },
}

pub type Result<T> = std::result::Result<T, ParseError>;
