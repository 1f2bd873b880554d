//! Durable named text slots.
//!
//! # Responsibility
//! - Store one text value per key, last write wins.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Keys are non-empty.
//! - `write_slot` replaces any previous value for the key.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the JSON partner list.
pub const PARTNERS_SLOT: &str = "partners";
/// Slot holding the JSON self profile.
pub const SELF_PROFILE_SLOT: &str = "selfProfile";
/// Slot holding local app settings.
pub const SETTINGS_SLOT: &str = "settings";

pub type SlotResult<T> = Result<T, SlotError>;

#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    EmptyKey,
    /// The backend refused the write (read-only or full storage).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyKey => write!(f, "slot key cannot be empty"),
            Self::Unavailable(reason) => write!(f, "slot storage unavailable: {reason}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyKey | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value storage for serialized store objects.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write_slot(key, value)
    }
}

/// SQLite-backed slot repository over the `slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        ensure_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        ensure_key(key)?;
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process slot repository.
///
/// Writes can be switched off to exercise the best-effort save path.
#[derive(Debug, Default)]
pub struct MemorySlotRepository {
    slots: RefCell<BTreeMap<String, String>>,
    reject_writes: Cell<bool>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(self, key: &str, value: &str) -> Self {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Makes every subsequent write fail with `SlotError::Unavailable`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        ensure_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        ensure_key(key)?;
        if self.reject_writes.get() {
            return Err(SlotError::Unavailable("writes rejected".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn ensure_key(key: &str) -> SlotResult<()> {
    if key.is_empty() {
        return Err(SlotError::EmptyKey);
    }
    Ok(())
}
