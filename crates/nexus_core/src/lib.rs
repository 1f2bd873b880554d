//! Core domain logic for Nexus.
//! This crate is the single source of truth for store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use media::image_data_url;
pub use model::partner::{Partner, PartnerId, PartnerValidationError};
pub use model::profile::{ProfileValidationError, SelfProfile};
pub use model::settings::AppSettings;
pub use model::store::{Store, StoreSeed, DEFAULT_SEED, EMPTY_SEED};
pub use repo::persistence::PersistError;
pub use repo::slot_repo::{
    MemorySlotRepository, SlotError, SlotRepository, SlotResult, SqliteSlotRepository,
};
pub use service::tracker_service::{ImportSummary, ServiceError, TrackerService};
pub use transfer::document::{DataDocument, ImportError, ImportedDocument};
pub use transfer::export::{
    DirectoryTarget, ExportError, ExportOutcome, ExportTarget, NoFileTarget, EXPORT_FILE_NAME,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
