//! Local application preferences.
//!
//! Kept in their own slot and excluded from the export document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub dark_mode: bool,
    pub biometric_auth: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            biometric_auth: false,
        }
    }
}
