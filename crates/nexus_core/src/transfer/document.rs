//! Portable data document.
//!
//! # Responsibility
//! - Encode the store as `{ "partners": [...], "self": {...} }`.
//! - Parse and shape-check externally supplied documents.
//!
//! # Invariants
//! - Parsing is all-or-nothing: any invalid part rejects the whole document.
//! - `partners` is required and must be an array; `self` is optional and
//!   `null` counts as absent.

use crate::model::partner::Partner;
use crate::model::profile::SelfProfile;
use crate::model::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Full export shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDocument {
    pub partners: Vec<Partner>,
    #[serde(rename = "self")]
    pub self_profile: SelfProfile,
}

impl DataDocument {
    pub fn from_store(store: &Store) -> Self {
        Self {
            partners: store.partners.clone(),
            self_profile: store.self_profile.clone(),
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Validated import payload. `self_profile` is `None` when the document had no profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    pub partners: Vec<Partner>,
    pub self_profile: Option<SelfProfile>,
}

#[derive(Debug)]
pub enum ImportError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    NotAnObject,
    MissingPartners,
    PartnersNotArray,
    InvalidPartner { index: usize, reason: String },
    InvalidSelfProfile(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read import file: {err}"),
            Self::Parse(err) => write!(f, "import file is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "import document must be a JSON object"),
            Self::MissingPartners => write!(f, "import document has no `partners` field"),
            Self::PartnersNotArray => write!(f, "import document `partners` must be an array"),
            Self::InvalidPartner { index, reason } => {
                write!(f, "invalid partner at index {index}: {reason}")
            }
            Self::InvalidSelfProfile(reason) => write!(f, "invalid `self` profile: {reason}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Read(value)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl ImportError {
    /// Stable short code for UI and log surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read(_) => "import_read_failed",
            Self::Parse(_) => "import_parse_failed",
            Self::NotAnObject
            | Self::MissingPartners
            | Self::PartnersNotArray
            | Self::InvalidPartner { .. }
            | Self::InvalidSelfProfile(_) => "import_shape_invalid",
        }
    }
}

/// Parses `raw` into a validated import payload.
pub fn parse_document(raw: &str) -> Result<ImportedDocument, ImportError> {
    let Value::Object(mut fields) = serde_json::from_str::<Value>(raw)? else {
        return Err(ImportError::NotAnObject);
    };

    let items = match fields.remove("partners") {
        None | Some(Value::Null) => return Err(ImportError::MissingPartners),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ImportError::PartnersNotArray),
    };

    let partners = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_partner(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let self_profile = match fields.remove("self") {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_self_profile(value)?),
    };

    Ok(ImportedDocument {
        partners,
        self_profile,
    })
}

fn parse_partner(index: usize, item: Value) -> Result<Partner, ImportError> {
    let partner = serde_json::from_value::<Partner>(item).map_err(|err| {
        ImportError::InvalidPartner {
            index,
            reason: err.to_string(),
        }
    })?;
    partner
        .validate()
        .map_err(|err| ImportError::InvalidPartner {
            index,
            reason: err.to_string(),
        })?;
    Ok(partner)
}

fn parse_self_profile(value: Value) -> Result<SelfProfile, ImportError> {
    let profile = serde_json::from_value::<SelfProfile>(value)
        .map_err(|err| ImportError::InvalidSelfProfile(err.to_string()))?;
    profile
        .validate()
        .map_err(|err| ImportError::InvalidSelfProfile(err.to_string()))?;
    Ok(profile)
}
