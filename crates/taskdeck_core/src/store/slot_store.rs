//! Slot store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Serialize the full task collection into the `todos` slot and decode
//!   it back, rejecting payloads that violate model invariants.
//! - Keep SQL and JSON codec details inside the persistence boundary.
//!
//! # Invariants
//! - `load` returns an empty collection when the slot is absent.
//! - `load` rejects non-array payloads, duplicate ids, and blank text.
//! - `save` upserts the whole collection on every call, empty included.

use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the serialized task collection.
pub const TODOS_SLOT: &str = "todos";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error for slot load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Stored payload cannot be decoded into the expected schema.
    Corrupt { slot: &'static str, message: String },
    /// Collection could not be serialized for writing.
    Encode(serde_json::Error),
    /// Underlying storage failure.
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt { slot, message } => {
                write!(f, "corrupt state in slot `{slot}`: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode task collection: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Corrupt { .. } => None,
            Self::Encode(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for the task collection.
pub trait StateStore {
    /// Loads the persisted collection; empty when nothing is stored.
    fn load(&self) -> StoreResult<Vec<Task>>;
    /// Writes the full collection, replacing whatever was stored.
    fn save(&self, tasks: &[Task]) -> StoreResult<()>;
}

/// SQLite-backed slot store.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateStore for SqliteSlotStore<'_> {
    fn load(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM slots WHERE key = ?1;")?;
        let mut rows = stmt.query([TODOS_SLOT])?;

        let Some(row) = rows.next()? else {
            return Ok(Vec::new());
        };
        let raw: String = row.get(0)?;

        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt {
            slot: TODOS_SLOT,
            message: err.to_string(),
        })?;
        validate_collection(&tasks)?;
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = serde_json::to_string(tasks).map_err(StoreError::Encode)?;
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![TODOS_SLOT, encoded],
        )?;
        Ok(())
    }
}

fn validate_collection(tasks: &[Task]) -> StoreResult<()> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(StoreError::Corrupt {
                slot: TODOS_SLOT,
                message: format!("duplicate task id {}", task.id),
            });
        }
        if task.text.trim().is_empty() {
            return Err(StoreError::Corrupt {
                slot: TODOS_SLOT,
                message: format!("task {} has blank text", task.id),
            });
        }
    }
    Ok(())
}
