//! Domain model for the todo collection.
//!
//! # Responsibility
//! - Define the canonical task record and its closed enumerations.
//! - Normalize raw user input before it reaches the repository.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` that is never reused.
//! - Task text is non-empty after trimming.
//! - Tags within one task are unique, insertion order preserved.

pub mod task;
