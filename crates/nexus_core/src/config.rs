//! Runtime paths and log level resolution.
//!
//! # Invariants
//! - Explicit values win over environment variables, which win over defaults.
//! - Resolved directories are absolute.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "NEXUS_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "NEXUS_LOG_LEVEL";
pub const DEFAULT_DATA_DIR: &str = ".nexus";
pub const DB_FILE_NAME: &str = "nexus.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration from explicit values and the process environment.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        Self::resolve_with(data_dir, log_level, |name| std::env::var(name).ok())
    }

    /// Same as `resolve`, with an injectable environment lookup.
    pub fn resolve_with(
        data_dir: Option<PathBuf>,
        log_level: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let data_dir = data_dir
            .or_else(|| non_empty(env(DATA_DIR_ENV)).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let log_level = non_empty(log_level)
            .or_else(|| non_empty(env(LOG_LEVEL_ENV)))
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            data_dir: absolutize(&data_dir),
            log_level,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DATA_DIR_ENV, DB_FILE_NAME, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn explicit_values_win_over_environment() {
        let config = AppConfig::resolve_with(
            Some(PathBuf::from("/tmp/explicit")),
            Some("warn".to_string()),
            |_| Some("ignored".to_string()),
        );
        assert_eq!(config.data_dir, PathBuf::from("/tmp/explicit"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/explicit").join(DB_FILE_NAME));
    }

    #[test]
    fn environment_fills_missing_values() {
        let config = AppConfig::resolve_with(None, None, |name| match name {
            DATA_DIR_ENV => Some("/srv/nexus".to_string()),
            LOG_LEVEL_ENV => Some(" trace ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/srv/nexus"));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_dir(), PathBuf::from("/srv/nexus/logs"));
    }

    #[test]
    fn defaults_resolve_to_absolute_data_dir() {
        let config = AppConfig::resolve_with(None, Some("  ".to_string()), |_| None);
        assert!(config.data_dir.is_absolute());
        assert!(config.data_dir.ends_with(".nexus"));
        assert!(!config.log_level.is_empty());
    }
}
