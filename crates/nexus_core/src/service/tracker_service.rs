//! Tracker use-case service.
//!
//! # Responsibility
//! - Own the in-memory store and settings.
//! - Apply user actions and save each changed object right after the change.
//! - Run import/export against the current store.
//!
//! # Invariants
//! - Every successful mutation is followed by an explicit save of the changed slot.
//! - A failed save never rolls back or fails the mutation; the slot is only
//!   reported through `unsaved_slots`.
//! - A failed import leaves the store untouched; a successful one replaces
//!   partners and (if present) the profile before either is saved.

use crate::model::partner::{validate_partners, Partner, PartnerValidationError};
use crate::model::profile::{ProfileValidationError, SelfProfile};
use crate::model::settings::AppSettings;
use crate::model::store::{Store, StoreSeed};
use crate::repo::persistence::{load_or_default, load_valid_or_default, save};
use crate::repo::slot_repo::{SlotRepository, PARTNERS_SLOT, SELF_PROFILE_SLOT, SETTINGS_SLOT};
use crate::transfer::document::{parse_document, DataDocument, ImportError};
use crate::transfer::export::{export_document, ExportError, ExportOutcome, ExportTarget};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for user actions.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    InvalidPartner(PartnerValidationError),
    InvalidProfile(ProfileValidationError),
    /// Every partner id is already taken.
    PartnerIdsExhausted,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPartner(err) => write!(f, "{err}"),
            Self::InvalidProfile(err) => write!(f, "{err}"),
            Self::PartnerIdsExhausted => write!(f, "no unused partner id is left"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPartner(err) => Some(err),
            Self::InvalidProfile(err) => Some(err),
            Self::PartnerIdsExhausted => None,
        }
    }
}

impl From<PartnerValidationError> for ServiceError {
    fn from(value: PartnerValidationError) -> Self {
        Self::InvalidPartner(value)
    }
}

impl From<ProfileValidationError> for ServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::InvalidProfile(value)
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub partner_count: usize,
    pub self_profile_replaced: bool,
}

/// Controller owning the store, settings and their slot repository.
pub struct TrackerService<R: SlotRepository> {
    repo: R,
    store: Store,
    settings: AppSettings,
    clock: fn() -> i64,
    unsaved: BTreeSet<&'static str>,
}

impl<R: SlotRepository> TrackerService<R> {
    /// Loads the store from `repo`, falling back to `seed` for missing or unreadable slots.
    pub fn open(repo: R, seed: &StoreSeed) -> Self {
        let partners = load_valid_or_default(&repo, PARTNERS_SLOT, seed.partners(), |loaded| {
            validate_partners(loaded).is_ok()
        });
        let self_profile =
            load_valid_or_default(&repo, SELF_PROFILE_SLOT, seed.self_profile(), |loaded| {
                loaded.validate().is_ok()
            });
        let settings = load_or_default(&repo, SETTINGS_SLOT, AppSettings::default());

        info!(
            "event=store_open module=service status=ok partners={}",
            partners.len()
        );

        Self {
            repo,
            store: Store::new(partners, self_profile),
            settings,
            clock: now_epoch_ms,
            unsaved: BTreeSet::new(),
        }
    }

    /// Replaces the id clock (epoch milliseconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn partners(&self) -> &[Partner] {
        &self.store.partners
    }

    pub fn self_profile(&self) -> &SelfProfile {
        &self.store.self_profile
    }

    pub fn settings(&self) -> AppSettings {
        self.settings
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Slots whose most recent save did not land.
    pub fn unsaved_slots(&self) -> Vec<&'static str> {
        self.unsaved.iter().copied().collect()
    }

    /// Appends a partner named `name` with zeroed stats.
    ///
    /// # Contract
    /// - `name` is trimmed; blank names are rejected and nothing changes.
    /// - The id is the current clock value, bumped past existing ids, and never
    ///   equal to an existing id.
    pub fn add_partner(&mut self, name: &str) -> Result<Partner, ServiceError> {
        let mut partner = Partner::new(0, name.trim());
        partner.validate()?;
        partner.id = self
            .store
            .next_partner_id((self.clock)())
            .ok_or(ServiceError::PartnerIdsExhausted)?;

        self.store.partners.push(partner.clone());
        self.persist_partners();

        info!(
            "event=partner_add module=service status=ok partner_id={} partners={}",
            partner.id,
            self.store.partners.len()
        );
        Ok(partner)
    }

    /// Replaces the self profile wholesale.
    pub fn update_self_profile(&mut self, profile: SelfProfile) -> Result<(), ServiceError> {
        profile.validate()?;
        self.store.self_profile = profile;
        self.persist_self_profile();
        info!("event=profile_update module=service status=ok");
        Ok(())
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.settings.dark_mode = enabled;
        self.persist_settings();
    }

    pub fn set_biometric_auth(&mut self, enabled: bool) {
        self.settings.biometric_auth = enabled;
        self.persist_settings();
    }

    pub fn export_document(&self) -> DataDocument {
        DataDocument::from_store(&self.store)
    }

    /// Export document as pretty JSON.
    pub fn export_json(&self) -> Result<String, ExportError> {
        Ok(self.export_document().to_pretty_json()?)
    }

    /// Offers the export document through `target`, degrading to raw text.
    pub fn export_to(&self, target: &dyn ExportTarget) -> Result<ExportOutcome, ExportError> {
        export_document(&self.export_document(), target)
    }

    /// Replaces the store from an export document's text.
    pub fn import_json(&mut self, raw: &str) -> Result<ImportSummary, ImportError> {
        let imported = match parse_document(raw) {
            Ok(imported) => imported,
            Err(err) => {
                warn!(
                    "event=data_import module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                return Err(err);
            }
        };

        let summary = ImportSummary {
            partner_count: imported.partners.len(),
            self_profile_replaced: imported.self_profile.is_some(),
        };

        self.store.partners = imported.partners;
        if let Some(profile) = imported.self_profile {
            self.store.self_profile = profile;
        }

        self.persist_partners();
        if summary.self_profile_replaced {
            self.persist_self_profile();
        }

        info!(
            "event=data_import module=service status=ok partners={} self_replaced={}",
            summary.partner_count, summary.self_profile_replaced
        );
        Ok(summary)
    }

    /// Reads `path` and imports its contents.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<ImportSummary, ImportError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            warn!(
                "event=data_import module=service status=error error_code=import_read_failed error={err}"
            );
            ImportError::Read(err)
        })?;
        self.import_json(&raw)
    }

    fn persist_partners(&mut self) {
        let landed = save(&self.repo, PARTNERS_SLOT, &self.store.partners);
        self.track(PARTNERS_SLOT, landed);
    }

    fn persist_self_profile(&mut self) {
        let landed = save(&self.repo, SELF_PROFILE_SLOT, &self.store.self_profile);
        self.track(SELF_PROFILE_SLOT, landed);
    }

    fn persist_settings(&mut self) {
        let landed = save(&self.repo, SETTINGS_SLOT, &self.settings);
        self.track(SETTINGS_SLOT, landed);
    }

    fn track(&mut self, slot: &'static str, landed: bool) {
        if landed {
            self.unsaved.remove(slot);
        } else {
            self.unsaved.insert(slot);
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
