//! Parsing of LLM responses into validated project structures.
//!
//! # Architecture
//!
//! - `path.rs` - Path validation and normalization
//! - `strategy/` - Per-layout extraction strategies
//! - `engine.rs` - Strategy precedence, dedup, final validation
//! - `structure.rs` - The parsed project model
//!
//! The input is untrusted text: a model's answer to "generate me a
//! project". Everything that leaves this crate has been through path
//! validation twice, once inside the matching strategy and once in the
//! engine, so downstream packaging never sees a traversal or an absolute
//! path.

pub use engine::parse_project;
pub use error::{ParseError, PathError, Result};
pub use path::{sanitize_root_label, validate_path, validate_path_strict};
pub use structure::{ProjectFile, ProjectStructure, StrategyKind, StructureMeta};

mod engine;
mod error;
mod path;
pub mod strategy;
mod structure;
