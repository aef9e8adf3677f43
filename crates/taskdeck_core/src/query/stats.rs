//! Summary counts over the task collection.

use crate::model::task::Task;

/// Collection totals for the summary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

/// Derives totals from the collection. `active = total - completed`.
pub fn stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        completed,
        active: total - completed,
    }
}
