//! Task repository: the single owner of the in-memory collection.
//!
//! # Responsibility
//! - Apply all task mutations and keep the collection ordered by creation.
//! - Write the collection through to slot storage after every mutation.
//! - Notify registered observers after each mutation.
//!
//! # Invariants
//! - Tasks are created, mutated, and removed only through the repository.
//! - A persist failure never rolls back the in-memory mutation.

pub mod task_repo;
