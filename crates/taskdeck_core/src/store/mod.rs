//! Persistence adapter over key-value slot storage.
//!
//! # Responsibility
//! - Read and write the serialized task list in its named slot.
//! - Detect and report malformed stored state instead of masking it.
//!
//! # Invariants
//! - An absent slot is a normal startup state, not an error.
//! - `save` writes the full collection, including an empty one.

pub mod slot_store;
