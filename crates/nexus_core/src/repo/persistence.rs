//! Typed load/save over slot repositories.
//!
//! # Responsibility
//! - Decode slot JSON into typed values with a caller-supplied default.
//! - Encode typed values into slots on a best-effort basis.
//!
//! # Invariants
//! - `load_or_default` never returns an error.
//! - `save` never returns an error; failures are logged and reported as `false`.
//! - Log events name the slot key only, never its contents.

use crate::repo::slot_repo::{SlotError, SlotRepository};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum PersistError {
    Encode(serde_json::Error),
    Slot(SlotError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode slot value: {err}"),
            Self::Slot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Slot(err) => Some(err),
        }
    }
}

impl From<SlotError> for PersistError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Reads `key` and decodes it, or returns `default` on any failure.
pub fn load_or_default<T, R>(repo: &R, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    R: SlotRepository + ?Sized,
{
    load_valid_or_default(repo, key, default, |_| true)
}

/// Like `load_or_default`, but also falls back when `is_valid` rejects the decoded value.
pub fn load_valid_or_default<T, R>(
    repo: &R,
    key: &str,
    default: T,
    is_valid: impl FnOnce(&T) -> bool,
) -> T
where
    T: DeserializeOwned,
    R: SlotRepository + ?Sized,
{
    let raw = match repo.read_slot(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=slot_load module=repo status=ok key={key} source=default reason=missing");
            return default;
        }
        Err(err) => {
            warn!("event=slot_load module=repo status=error key={key} source=default error={err}");
            return default;
        }
    };

    let value = match serde_json::from_str::<T>(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=error key={key} source=default reason=malformed line={} column={}",
                err.line(),
                err.column()
            );
            return default;
        }
    };

    if !is_valid(&value) {
        warn!("event=slot_load module=repo status=error key={key} source=default reason=invalid");
        return default;
    }

    debug!("event=slot_load module=repo status=ok key={key} source=slot");
    value
}

/// Encodes `value` into `key`, surfacing failures.
pub fn try_save<T, R>(repo: &R, key: &str, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized,
    R: SlotRepository + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    repo.write_slot(key, &encoded)?;
    Ok(())
}

/// Best-effort write of `value` into `key`. Returns whether the write landed.
pub fn save<T, R>(repo: &R, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    R: SlotRepository + ?Sized,
{
    match try_save(repo, key, value) {
        Ok(()) => {
            debug!("event=slot_save module=repo status=ok key={key}");
            true
        }
        Err(err) => {
            warn!("event=slot_save module=repo status=error key={key} error={err}");
            false
        }
    }
}
