use std::fmt;

use serde::Serialize;

use crate::strategy::marker::FILE_MARKER;

/// A single extracted file: a validated relative path plus its text content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Which extraction strategy produced a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Marker,
    Indented,
    Fenced,
    Fallback,
}

impl StrategyKind {
    /// The fallback strategy guesses paths instead of reading declared ones,
    /// so its output deserves a second look before use.
    pub fn is_lossy(self) -> bool {
        matches!(self, StrategyKind::Fallback)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Marker => "marker",
            StrategyKind::Indented => "indented",
            StrategyKind::Fenced => "fenced",
            StrategyKind::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Summary facts about a parsed structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StructureMeta {
    pub file_count: usize,
    pub total_bytes: u64,
    pub strategy: StrategyKind,
}

/// A validated virtual file tree: the parse result handed to packaging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectStructure {
    pub root: String,
    pub files: Vec<ProjectFile>,
    pub meta: StructureMeta,
}

impl ProjectStructure {
    pub fn new(root: impl Into<String>, files: Vec<ProjectFile>, strategy: StrategyKind) -> Self {
        let total_bytes = files.iter().map(|f| f.content.len() as u64).sum();
        let meta = StructureMeta {
            file_count: files.len(),
            total_bytes,
            strategy,
        };
        Self {
            root: root.into(),
            files,
            meta,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Render the structure back into marker-prefixed text.
    ///
    /// Feeding the result to the parser reproduces the same file set, which
    /// makes this the canonical interchange form for saved sessions.
    pub fn to_marker_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(FILE_MARKER);
            out.push(' ');
            out.push_str(&file.path);
            out.push('\n');
            out.push_str(&file.content);
            out.push('\n');
        }
        out
    }
}
