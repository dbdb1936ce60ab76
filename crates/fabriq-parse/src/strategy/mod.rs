//! Extraction strategies.
//!
//! Each strategy is one recognizer for a layout LLMs emit when asked for a
//! multi-file project. The engine tries them in [`Strategy::ORDER`] and takes
//! the first that yields candidates, so the order runs from the most explicit
//! layout to the most permissive:
//!
//! - `Marker`: `>>> FILE: path` header lines.
//! - `Indented`: directory declarations with indented file bodies.
//! - `Fenced`: markdown code fences whose info string names a file.
//! - `Fallback`: fences without names, or the raw response as one file.

pub(crate) mod fallback;
pub(crate) mod fenced;
pub(crate) mod indented;
pub(crate) mod marker;

pub use marker::FILE_MARKER;

use crate::structure::StrategyKind;

/// An extracted-but-unchecked file: the path passed the strategy's own
/// validation, but engine-level checks (dedup, re-validation) still apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    pub content: String,
}

impl Candidate {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Marker,
    Indented,
    Fenced,
    Fallback,
}

impl Strategy {
    /// Precedence order: strict before permissive.
    pub const ORDER: [Strategy; 4] = [
        Strategy::Marker,
        Strategy::Indented,
        Strategy::Fenced,
        Strategy::Fallback,
    ];

    pub fn kind(self) -> StrategyKind {
        match self {
            Strategy::Marker => StrategyKind::Marker,
            Strategy::Indented => StrategyKind::Indented,
            Strategy::Fenced => StrategyKind::Fenced,
            Strategy::Fallback => StrategyKind::Fallback,
        }
    }

    /// Run this strategy over the raw response.
    ///
    /// An empty vec means "not my layout"; the engine moves on to the next
    /// strategy. Strategies never fail, they only decline.
    pub fn attempt(self, raw: &str) -> Vec<Candidate> {
        match self {
            Strategy::Marker => marker::extract(raw),
            Strategy::Indented => indented::extract(raw),
            Strategy::Fenced => fenced::extract(raw),
            Strategy::Fallback => fallback::extract(raw),
        }
    }
}
