//! Export delivery.
//!
//! # Invariants
//! - A delivery failure degrades to `ExportOutcome::ManualCopy`; it is never an error.
//! - The delivered file name is always `EXPORT_FILE_NAME`.

use crate::transfer::document::DataDocument;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// File name offered for exported documents.
pub const EXPORT_FILE_NAME: &str = "nexus-data.json";

/// Somewhere an exported document can be handed to the user.
pub trait ExportTarget {
    /// Delivers `contents` as `file_name`, returning where it landed.
    fn deliver(&self, file_name: &str, contents: &str) -> io::Result<PathBuf>;
}

/// Writes exports into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportTarget for DirectoryTarget {
    fn deliver(&self, file_name: &str, contents: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Target for environments with no file delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFileTarget;

impl ExportTarget for NoFileTarget {
    fn deliver(&self, _file_name: &str, _contents: &str) -> io::Result<PathBuf> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "file delivery is not available",
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The document was written to this path.
    Saved(PathBuf),
    /// Delivery was unavailable; the JSON text is handed back for manual copy.
    ManualCopy(String),
}

#[derive(Debug)]
pub enum ExportError {
    Encode(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode export document: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Encodes `document` and offers it through `target`.
pub fn export_document(
    document: &DataDocument,
    target: &dyn ExportTarget,
) -> Result<ExportOutcome, ExportError> {
    let json = document.to_pretty_json()?;
    match target.deliver(EXPORT_FILE_NAME, &json) {
        Ok(path) => {
            info!(
                "event=data_export module=transfer status=ok delivery=file partners={} bytes={}",
                document.partners.len(),
                json.len()
            );
            Ok(ExportOutcome::Saved(path))
        }
        Err(err) => {
            warn!(
                "event=data_export module=transfer status=ok delivery=manual partners={} reason={}",
                document.partners.len(),
                err.kind()
            );
            Ok(ExportOutcome::ManualCopy(json))
        }
    }
}
