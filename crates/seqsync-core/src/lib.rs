//! seqsync core - Fundamental types and primitives
//!
//! This crate defines the types shared by the reconciliation engine and
//! its harnesses:
//! - Record identifiers and the placeholder value
//! - Specification / state sequence helpers
//! - Patches (single placeholder edits)
//! - Trace events and sinks
//! - Reconciliation invariants and error types

pub mod id;
pub mod sequence;
pub mod patch;
pub mod event;
pub mod invariants;
pub mod parse;
pub mod table;
pub mod error;

pub use id::*;
pub use sequence::*;
pub use patch::*;
pub use event::*;
pub use invariants::{InvariantViolation, Invariant};
pub use parse::*;
pub use table::*;
pub use error::*;
