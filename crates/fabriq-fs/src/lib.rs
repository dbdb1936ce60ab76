//! Sandboxed, transactional materialization of parsed structures.
//!
//! # Architecture
//!
//! - `stage.rs` - Staging directory with commit-or-cleanup semantics
//! - `materialize.rs` - Validation, containment checks, the final swap
//! - `lock.rs` - Per-destination serialization
//!
//! The contract is all-or-nothing: a destination either receives the whole
//! staged tree in one rename or is never touched.

pub use error::{Error, Result};
pub use lock::DestLocks;
pub use materialize::{materialize, materialize_locked, MaterializeOptions, MaterializeReport};
pub use stage::Staging;

mod error;
mod lock;
mod materialize;
mod stage;
