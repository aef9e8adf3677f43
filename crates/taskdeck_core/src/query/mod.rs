//! Derived read-only views of the task collection.
//!
//! # Responsibility
//! - Compute filtered/searched/sorted display snapshots.
//! - Compute summary counts.
//!
//! # Invariants
//! - Every function here is pure: no mutation, no storage, no logging.

pub mod stats;
pub mod view;
