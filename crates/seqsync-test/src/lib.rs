//! seqsync Test Harness - Scenario replay and reconciliation fuzzing
//!
//! This crate provides:
//! - The scenario corpus of spec edits with known outcomes
//! - A seeded random fuzzer checking every invariant
//! - Criterion benchmarks (see `benches/`)

pub mod scenarios;
pub mod fuzzer;

pub use scenarios::*;
pub use fuzzer::*;
