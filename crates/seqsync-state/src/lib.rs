//! seqsync State Engine - Positional reconciliation of state sequences
//!
//! This crate implements the reconciliation engine:
//! - Gap analysis (not-found runs)
//! - Position resolution and anchors
//! - Stale value filtering
//! - Patch planning
//! - Placeholder mutation
//! - The phase-driven reconciler

pub mod gap;
pub mod position;
pub mod stale;
pub mod planner;
pub mod mutator;
pub mod reconcile;

pub use gap::*;
pub use position::*;
pub use stale::*;
pub use planner::*;
pub use mutator::*;
pub use reconcile::*;
