//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted to the `todos` slot.
//! - Provide input normalization shared by create and edit paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is non-empty after trimming.
//! - `tags` contains no duplicates; insertion order is preserved.
//! - `created_at` is assigned once at creation and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Closed task priority scale.
///
/// Serialized lowercase to match the stored payload schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency. Default for new tasks.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Severity rank used by priority ordering: high sorts first.
    pub fn severity_rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Stable lowercase form, identical to the serialized representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Parses a user-facing priority string.
pub fn parse_priority(value: &str) -> Option<Priority> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}

/// Canonical task record.
///
/// Field names are serialized in camelCase to match the stored payload
/// schema of the `todos` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable unique ID, assigned at creation.
    pub id: TaskId,
    /// Display text, trimmed and non-empty.
    pub text: String,
    /// Completion flag. Missing in a stored record means `false`.
    #[serde(default)]
    pub completed: bool,
    /// Optional ISO calendar date, kept verbatim as entered.
    ///
    /// Stored as a raw string: due-date ordering is defined as lexical
    /// comparison with absent dates reading as the empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Task priority. Missing in a stored record means `medium`.
    #[serde(default)]
    pub priority: Priority,
    /// Unique tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional free-text notes; whitespace-only input never reaches here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp, immutable after creation.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task with a generated ID and the current timestamp.
    ///
    /// The caller is responsible for passing already-normalized text;
    /// repository operations normalize before construction.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text, Utc::now())
    }

    /// Creates a task with caller-provided identity fields.
    ///
    /// Used by tests and fixtures where identity and creation time must be
    /// deterministic.
    pub fn with_id(id: TaskId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            due_date: None,
            priority: Priority::default(),
            tags: Vec::new(),
            notes: None,
            created_at,
        }
    }

    /// Returns whether `tag` is present, by exact match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }
}

/// Input validation error for repository mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task text trims to the empty string.
    EmptyText,
    /// Tag trims to the empty string.
    EmptyTag,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::EmptyTag => write!(f, "tag cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims task text; `None` when nothing remains.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims one tag; `None` when nothing remains. Case is preserved.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims notes input; whitespace-only collapses to absent.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Collapses an empty due-date string to absent; otherwise kept verbatim.
pub fn normalize_due_date(due_date: Option<&str>) -> Option<String> {
    due_date.and_then(|value| {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Trims tags, drops blanks, and deduplicates by exact match, keeping the
/// first occurrence in its original position.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
    }
    unique
}
