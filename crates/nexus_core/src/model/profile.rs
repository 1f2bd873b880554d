//! Self profile model.
//!
//! # Invariants
//! - `birthday` is empty (unset) or an ISO `YYYY-MM-DD` date.
//! - The profile is always replaced wholesale, never field-by-field in storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name used before the user edits their profile.
pub const DEFAULT_SELF_NAME: &str = "Self";

static BIRTHDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid birthday regex")
});

/// The user's own editable identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfProfile {
    pub name: String,
    /// Empty string when unset.
    #[serde(default)]
    pub birthday: String,
    /// Image reference (URL, path or `data:` URL).
    #[serde(default)]
    pub photo: Option<String>,
}

impl Default for SelfProfile {
    fn default() -> Self {
        Self::named(DEFAULT_SELF_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    InvalidBirthday(String),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBirthday(value) => {
                write!(f, "birthday `{value}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for ProfileValidationError {}

impl SelfProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birthday: String::new(),
            photo: None,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if !self.birthday.is_empty() && !BIRTHDAY_RE.is_match(&self.birthday) {
            return Err(ProfileValidationError::InvalidBirthday(
                self.birthday.clone(),
            ));
        }
        Ok(())
    }

    pub fn birthday(&self) -> Option<&str> {
        Some(self.birthday.as_str()).filter(|value| !value.is_empty())
    }
}
