//! Display view derivation: filter, search, and sort.
//!
//! # Responsibility
//! - Derive an ordered display snapshot from the collection.
//! - Parse the user-facing filter/sort string forms.
//!
//! # Invariants
//! - The input collection is never mutated; the result is a new sequence.
//! - Sorts are stable: ties keep creation order.

use crate::model::task::Task;

/// Completion-state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Keep every task.
    #[default]
    All,
    /// Keep tasks with `completed == false`.
    Active,
    /// Keep tasks with `completed == true`.
    Completed,
}

/// Display sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Earliest due date first; tasks without one sort before all dated
    /// tasks (an absent date compares as the empty string).
    DueDate,
    /// High before medium before low.
    Priority,
}

/// Parses a user-facing filter string.
pub fn parse_status_filter(value: &str) -> Option<StatusFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "all" => Some(StatusFilter::All),
        "active" => Some(StatusFilter::Active),
        "completed" | "done" => Some(StatusFilter::Completed),
        _ => None,
    }
}

/// Parses a user-facing sort-key string.
pub fn parse_sort_key(value: &str) -> Option<SortKey> {
    match value.trim().to_ascii_lowercase().as_str() {
        "created" | "createdat" => Some(SortKey::CreatedAt),
        "due" | "duedate" => Some(SortKey::DueDate),
        "priority" => Some(SortKey::Priority),
        _ => None,
    }
}

/// Derives the display snapshot for the given filter, search, and sort.
///
/// The status filter and the case-insensitive substring search on task
/// text are ANDed; an empty search matches everything.
pub fn query(tasks: &[Task], filter: StatusFilter, search: &str, sort: SortKey) -> Vec<Task> {
    let needle = search.to_lowercase();

    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_filter(task, filter) && matches_search(task, &needle))
        .cloned()
        .collect();

    match sort {
        SortKey::CreatedAt => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DueDate => view.sort_by(|a, b| due_key(a).cmp(due_key(b))),
        SortKey::Priority => view.sort_by_key(|task| task.priority.severity_rank()),
    }

    view
}

fn matches_filter(task: &Task, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty() || task.text.to_lowercase().contains(needle)
}

fn due_key(task: &Task) -> &str {
    task.due_date.as_deref().unwrap_or("")
}
