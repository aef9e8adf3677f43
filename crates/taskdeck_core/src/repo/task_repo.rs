//! Task repository implementation over a slot store.
//!
//! # Responsibility
//! - Provide add/toggle/remove/edit/tag mutation entry points.
//! - Persist the full collection after every successful mutation.
//! - Deliver change and persist-failure notifications to observers.
//!
//! # Invariants
//! - Collection order is creation order; display sorting never touches it.
//! - `id` values are unique within the collection.
//! - Read operations never mutate or persist.
//! - Log events carry ids and counts only, never task text.

use crate::model::task::{
    normalize_due_date, normalize_notes, normalize_tag, normalize_tags, normalize_text, Priority,
    Task, TaskId, TaskValidationError,
};
use crate::store::slot_store::{StateStore, StoreError};
use log::{debug, error, info};

/// Input for creating one task.
///
/// Carries raw user input; the repository normalizes every field before
/// the task is constructed.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    /// Display text; must be non-empty after trimming.
    pub text: String,
    /// Priority; defaults to medium.
    pub priority: Priority,
    /// Initial tags; trimmed, blanks dropped, duplicates dropped.
    pub tags: Vec<String>,
    /// Optional due date; an empty string collapses to absent.
    pub due_date: Option<String>,
    /// Optional notes; whitespace-only collapses to absent.
    pub notes: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with the given text and defaults everywhere else.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Which mutation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added(TaskId),
    Toggled(TaskId),
    Removed(TaskId),
    TextEdited(TaskId),
    TagAdded(TaskId),
    TagRemoved(TaskId),
}

impl ChangeKind {
    /// The task the mutation targeted.
    pub fn task_id(self) -> TaskId {
        match self {
            Self::Added(id)
            | Self::Toggled(id)
            | Self::Removed(id)
            | Self::TextEdited(id)
            | Self::TagAdded(id)
            | Self::TagRemoved(id) => id,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Added(_) => "add",
            Self::Toggled(_) => "toggle",
            Self::Removed(_) => "remove",
            Self::TextEdited(_) => "edit_text",
            Self::TagAdded(_) => "tag_add",
            Self::TagRemoved(_) => "tag_remove",
        }
    }
}

/// Notification delivered to registered observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoEvent {
    /// The collection changed; pull a fresh query/stats snapshot.
    Changed(ChangeKind),
    /// Write-through failed after the mutation was applied in memory.
    ///
    /// Non-fatal: the in-memory state stays authoritative for the rest of
    /// the session. Rendered as a transient notice.
    PersistFailed { change: ChangeKind, message: String },
}

/// Outcome of loading persisted state at startup.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was stored; starting with an empty collection.
    Empty,
    /// Stored tasks were restored.
    Loaded(usize),
    /// Stored state was unreadable; recovered with an empty collection.
    ///
    /// The error must be surfaced to the user as a non-fatal notice.
    RecoveredFromError(StoreError),
}

type Observer = Box<dyn Fn(&RepoEvent)>;

/// Owner and sole mutator of the task collection.
pub struct TaskRepository<S: StateStore> {
    store: S,
    tasks: Vec<Task>,
    observers: Vec<Observer>,
}

impl<S: StateStore> TaskRepository<S> {
    /// Builds a repository from persisted state.
    ///
    /// Unreadable stored state falls back to an empty collection; the
    /// returned [`LoadOutcome`] tells the caller what happened so the
    /// failure can be reported without being fatal.
    pub fn load(store: S) -> (Self, LoadOutcome) {
        let (tasks, outcome) = match store.load() {
            Ok(tasks) if tasks.is_empty() => {
                info!("event=task_load module=repo status=ok count=0");
                (tasks, LoadOutcome::Empty)
            }
            Ok(tasks) => {
                info!("event=task_load module=repo status=ok count={}", tasks.len());
                let count = tasks.len();
                (tasks, LoadOutcome::Loaded(count))
            }
            Err(err) => {
                error!("event=task_load module=repo status=error error={err}");
                (Vec::new(), LoadOutcome::RecoveredFromError(err))
            }
        };

        (
            Self {
                store,
                tasks,
                observers: Vec::new(),
            },
            outcome,
        )
    }

    /// Registers an observer called after every mutation.
    ///
    /// Observers receive [`RepoEvent::Changed`] for each applied mutation
    /// and additionally [`RepoEvent::PersistFailed`] when write-through
    /// fails.
    pub fn subscribe(&mut self, observer: impl Fn(&RepoEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Creates a task from the draft and appends it to the collection.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyText`] when the text trims empty;
    ///   the collection is left unchanged.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, TaskValidationError> {
        let text = normalize_text(&draft.text).ok_or(TaskValidationError::EmptyText)?;

        let mut task = Task::new(text);
        task.priority = draft.priority;
        task.tags = normalize_tags(&draft.tags);
        task.due_date = normalize_due_date(draft.due_date.as_deref());
        task.notes = normalize_notes(draft.notes.as_deref());

        let id = task.id;
        self.tasks.push(task.clone());
        self.commit(ChangeKind::Added(id));
        Ok(task)
    }

    /// Flips the completion flag of the matching task.
    ///
    /// Returns `false` (no-op, not an error) when the id is unknown.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.commit(ChangeKind::Toggled(id));
        true
    }

    /// Deletes the matching task from the collection.
    ///
    /// Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.commit(ChangeKind::Removed(id));
        true
    }

    /// Replaces the text of the matching task with the trimmed input.
    ///
    /// Validates exactly as [`add`](Self::add) does. Returns `Ok(false)`
    /// when the id is unknown.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyText`] when the text trims empty.
    pub fn edit_text(
        &mut self,
        id: TaskId,
        new_text: &str,
    ) -> Result<bool, TaskValidationError> {
        let text = normalize_text(new_text).ok_or(TaskValidationError::EmptyText)?;
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.text = text;
        self.commit(ChangeKind::TextEdited(id));
        Ok(true)
    }

    /// Appends a tag to the matching task.
    ///
    /// The tag is trimmed first. A tag already present is an idempotent
    /// `Ok(false)` with no mutation and no persist. Returns `Ok(false)`
    /// when the id is unknown.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyTag`] when the tag trims empty.
    pub fn add_tag(&mut self, id: TaskId, tag: &str) -> Result<bool, TaskValidationError> {
        let tag = normalize_tag(tag).ok_or(TaskValidationError::EmptyTag)?;
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        if task.has_tag(&tag) {
            return Ok(false);
        }
        task.tags.push(tag);
        self.commit(ChangeKind::TagAdded(id));
        Ok(true)
    }

    /// Removes a tag from the matching task, by exact match.
    ///
    /// Returns `false` when the task or the tag is absent; the collection
    /// is left byte-for-byte unchanged in that case.
    pub fn remove_tag(&mut self, id: TaskId, tag: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        let Some(position) = task.tags.iter().position(|existing| existing == tag) else {
            return false;
        };
        task.tags.remove(position);
        self.commit(ChangeKind::TagRemoved(id));
        true
    }

    /// The collection in creation order. Never persists.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// One task by id. Never persists.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn commit(&mut self, change: ChangeKind) {
        debug!(
            "event=task_{} module=repo status=ok id={} count={}",
            change.label(),
            change.task_id(),
            self.tasks.len()
        );

        let persist_error = match self.store.save(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                error!(
                    "event=task_persist module=repo status=error id={} error={err}",
                    change.task_id()
                );
                Some(err.to_string())
            }
        };

        self.notify(&RepoEvent::Changed(change));
        if let Some(message) = persist_error {
            self.notify(&RepoEvent::PersistFailed { change, message });
        }
    }

    fn notify(&self, event: &RepoEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }
}
