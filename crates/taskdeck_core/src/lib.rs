//! Core domain logic for Taskdeck.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use model::task::{parse_priority, Priority, Task, TaskId, TaskValidationError};
pub use query::stats::{stats, TaskStats};
pub use query::view::{parse_sort_key, parse_status_filter, query, SortKey, StatusFilter};
pub use repo::task_repo::{ChangeKind, LoadOutcome, RepoEvent, TaskDraft, TaskRepository};
pub use store::slot_store::{SqliteSlotStore, StateStore, StoreError, StoreResult, TODOS_SLOT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
