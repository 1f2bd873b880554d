//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose partner, profile, settings and import/export actions to Dart via FRB.
//! - Map core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the slot database, applies one action and saves before returning.
//! - A call whose save did not land reports `ok: false` and names the slots in
//!   `unsaved_slots`; the change does not outlive the call.

use log::warn;
use nexus_core::config::DB_FILE_NAME;
use nexus_core::db::open_db;
use nexus_core::{
    core_version as core_version_inner, image_data_url, init_logging as init_logging_inner,
    ping as ping_inner, DirectoryTarget, ExportOutcome, ImportSummary, NoFileTarget, Partner,
    SelfProfile, SqliteSlotRepository, TrackerService, DEFAULT_SEED,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Partner card data.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerItem {
    pub id: i64,
    pub name: String,
    pub smashes: u32,
    /// Raw rating; `0` means unrated.
    pub rating: f64,
    /// Display rating (`4.2`) or `–` when unrated.
    pub rating_label: String,
    /// Placeholder letter for cards without an avatar.
    pub initial: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnersResponse {
    pub ok: bool,
    pub items: Vec<PartnerItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub name: String,
    /// Empty when unset.
    pub birthday: String,
    pub photo: Option<String>,
    pub initial: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub dark_mode: bool,
    pub biometric_auth: bool,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created partner id, for `partner_add`.
    pub partner_id: Option<i64>,
    /// Slots whose save failed; the action was not kept.
    pub unsaved_slots: Vec<String>,
    pub message: String,
}

impl ActionResponse {
    fn applied(message: &str, partner_id: Option<i64>, unsaved_slots: Vec<String>) -> Self {
        if unsaved_slots.is_empty() {
            return Self {
                ok: true,
                partner_id,
                unsaved_slots,
                message: message.to_string(),
            };
        }
        Self {
            ok: false,
            partner_id,
            message: unsaved_message(&unsaved_slots),
            unsaved_slots,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            partner_id: None,
            unsaved_slots: Vec::new(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Set when the document was written to disk.
    pub saved_path: Option<String>,
    /// Set when file delivery was unavailable; show it for manual copy.
    pub manual_json: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub partner_count: u32,
    pub self_profile_replaced: bool,
    /// Stable failure code (`import_parse_failed`, ...), empty on success.
    pub error_code: String,
    /// Slots whose save failed after a valid import.
    pub unsaved_slots: Vec<String>,
    pub message: String,
}

/// Lists partners in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn partners_list() -> PartnersResponse {
    partners_list_at(&resolve_db_path())
}

/// Adds a partner with zeroed stats.
#[flutter_rust_bridge::frb(sync)]
pub fn partner_add(name: String) -> ActionResponse {
    partner_add_at(&resolve_db_path(), &name)
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileResponse {
    profile_get_at(&resolve_db_path())
}

/// Replaces the self profile. `birthday` may be empty.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_update(name: String, birthday: String, photo: Option<String>) -> ActionResponse {
    let profile = SelfProfile {
        name: name.trim().to_string(),
        birthday: birthday.trim().to_string(),
        photo,
    };
    profile_update_at(&resolve_db_path(), profile)
}

/// Embeds the image at `image_path` as the profile photo.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_set_photo_file(image_path: String) -> ActionResponse {
    profile_set_photo_file_at(&resolve_db_path(), Path::new(image_path.trim()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_get() -> SettingsResponse {
    settings_get_at(&resolve_db_path())
}

/// Updates the provided toggles; `None` leaves a toggle unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(dark_mode: Option<bool>, biometric_auth: Option<bool>) -> ActionResponse {
    settings_update_at(&resolve_db_path(), dark_mode, biometric_auth)
}

/// Exports `nexus-data.json` into `out_dir`, or returns the JSON when no directory is usable.
#[flutter_rust_bridge::frb(sync)]
pub fn data_export(out_dir: Option<String>) -> ExportResponse {
    data_export_at(&resolve_db_path(), out_dir.as_deref())
}

/// Replaces partners (and profile, if present) from document text.
#[flutter_rust_bridge::frb(sync)]
pub fn data_import_text(raw: String) -> ImportResponse {
    data_import_text_at(&resolve_db_path(), &raw)
}

/// Replaces partners (and profile, if present) from a document file.
#[flutter_rust_bridge::frb(sync)]
pub fn data_import_file(path: String) -> ImportResponse {
    data_import_file_at(&resolve_db_path(), Path::new(path.trim()))
}

fn partners_list_at(db_path: &Path) -> PartnersResponse {
    match with_service(db_path, |service| {
        service.partners().iter().map(to_partner_item).collect::<Vec<_>>()
    }) {
        Ok((items, _)) => PartnersResponse {
            ok: true,
            message: format!("{} partner(s).", items.len()),
            items,
        },
        Err(err) => PartnersResponse {
            ok: false,
            items: Vec::new(),
            message: format!("partners_list failed: {err}"),
        },
    }
}

fn partner_add_at(db_path: &Path, name: &str) -> ActionResponse {
    match with_service(db_path, |service| service.add_partner(name)) {
        Ok((Ok(partner), unsaved)) => {
            ActionResponse::applied("Partner added.", Some(partner.id), unsaved)
        }
        Ok((Err(err), _)) => ActionResponse::failure(format!("partner_add failed: {err}")),
        Err(err) => ActionResponse::failure(format!("partner_add failed: {err}")),
    }
}

fn profile_get_at(db_path: &Path) -> ProfileResponse {
    match with_service(db_path, |service| service.self_profile().clone()) {
        Ok((profile, _)) => ProfileResponse {
            ok: true,
            initial: nexus_core::model::partner::initial_of(&profile.name),
            name: profile.name,
            birthday: profile.birthday,
            photo: profile.photo,
            message: String::new(),
        },
        Err(err) => ProfileResponse {
            ok: false,
            name: String::new(),
            birthday: String::new(),
            photo: None,
            initial: String::new(),
            message: format!("profile_get failed: {err}"),
        },
    }
}

fn profile_update_at(db_path: &Path, profile: SelfProfile) -> ActionResponse {
    match with_service(db_path, |service| service.update_self_profile(profile)) {
        Ok((Ok(()), unsaved)) => ActionResponse::applied("Profile saved.", None, unsaved),
        Ok((Err(err), _)) => ActionResponse::failure(format!("profile_update failed: {err}")),
        Err(err) => ActionResponse::failure(format!("profile_update failed: {err}")),
    }
}

fn profile_set_photo_file_at(db_path: &Path, image_path: &Path) -> ActionResponse {
    let photo = match image_data_url(image_path) {
        Ok(photo) => photo,
        Err(err) => {
            return ActionResponse::failure(format!("profile_set_photo_file failed: {err}"))
        }
    };
    match with_service(db_path, |service| {
        let mut profile = service.self_profile().clone();
        profile.photo = Some(photo);
        service.update_self_profile(profile)
    }) {
        Ok((Ok(()), unsaved)) => ActionResponse::applied("Photo saved.", None, unsaved),
        Ok((Err(err), _)) => {
            ActionResponse::failure(format!("profile_set_photo_file failed: {err}"))
        }
        Err(err) => ActionResponse::failure(format!("profile_set_photo_file failed: {err}")),
    }
}

fn settings_get_at(db_path: &Path) -> SettingsResponse {
    match with_service(db_path, |service| service.settings()) {
        Ok((settings, _)) => SettingsResponse {
            ok: true,
            dark_mode: settings.dark_mode,
            biometric_auth: settings.biometric_auth,
            message: String::new(),
        },
        Err(err) => SettingsResponse {
            ok: false,
            dark_mode: false,
            biometric_auth: false,
            message: format!("settings_get failed: {err}"),
        },
    }
}

fn settings_update_at(
    db_path: &Path,
    dark_mode: Option<bool>,
    biometric_auth: Option<bool>,
) -> ActionResponse {
    let result = with_service(db_path, |service| {
        if let Some(enabled) = dark_mode {
            service.set_dark_mode(enabled);
        }
        if let Some(enabled) = biometric_auth {
            service.set_biometric_auth(enabled);
        }
    });
    match result {
        Ok(((), unsaved)) => ActionResponse::applied("Settings saved.", None, unsaved),
        Err(err) => ActionResponse::failure(format!("settings_update failed: {err}")),
    }
}

fn data_export_at(db_path: &Path, out_dir: Option<&str>) -> ExportResponse {
    let out_dir = out_dir.map(str::trim).filter(|dir| !dir.is_empty());
    let result = with_service(db_path, |service| match out_dir {
        Some(dir) => service.export_to(&DirectoryTarget::new(dir)),
        None => service.export_to(&NoFileTarget),
    });

    match result {
        Ok((Ok(ExportOutcome::Saved(path)), _)) => ExportResponse {
            ok: true,
            message: format!("Exported to {}.", path.display()),
            saved_path: Some(path.display().to_string()),
            manual_json: None,
        },
        Ok((Ok(ExportOutcome::ManualCopy(json)), _)) => ExportResponse {
            ok: true,
            saved_path: None,
            manual_json: Some(json),
            message: "Copy the following JSON and save it manually.".to_string(),
        },
        Ok((Err(err), _)) => export_failure(err.to_string()),
        Err(err) => export_failure(err),
    }
}

fn data_import_text_at(db_path: &Path, raw: &str) -> ImportResponse {
    match with_service(db_path, |service| service.import_json(raw)) {
        Ok((Ok(summary), unsaved)) => import_success(summary, unsaved),
        Ok((Err(err), _)) => import_failure(err.code(), err.to_string()),
        Err(err) => import_failure("import_db_unavailable", err),
    }
}

fn data_import_file_at(db_path: &Path, path: &Path) -> ImportResponse {
    match with_service(db_path, |service| service.import_file(path)) {
        Ok((Ok(summary), unsaved)) => import_success(summary, unsaved),
        Ok((Err(err), _)) => import_failure(err.code(), err.to_string()),
        Err(err) => import_failure("import_db_unavailable", err),
    }
}

fn export_failure(message: String) -> ExportResponse {
    ExportResponse {
        ok: false,
        saved_path: None,
        manual_json: None,
        message: format!("data_export failed: {message}"),
    }
}

fn import_success(summary: ImportSummary, unsaved_slots: Vec<String>) -> ImportResponse {
    let saved = unsaved_slots.is_empty();
    ImportResponse {
        ok: saved,
        partner_count: u32::try_from(summary.partner_count).unwrap_or(u32::MAX),
        self_profile_replaced: summary.self_profile_replaced,
        error_code: if saved {
            String::new()
        } else {
            "import_save_failed".to_string()
        },
        message: if saved {
            "Data imported successfully.".to_string()
        } else {
            unsaved_message(&unsaved_slots)
        },
        unsaved_slots,
    }
}

fn import_failure(code: &str, message: String) -> ImportResponse {
    ImportResponse {
        ok: false,
        partner_count: 0,
        self_profile_replaced: false,
        error_code: code.to_string(),
        unsaved_slots: Vec::new(),
        message: format!("Failed to import data: {message}"),
    }
}

fn unsaved_message(unsaved_slots: &[String]) -> String {
    format!("Could not save changes: {}", unsaved_slots.join(", "))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("NEXUS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            default_db_path()
        })
        .clone()
}

/// Store file used when `NEXUS_DB_PATH` is unset; same name as the CLI store.
fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DB_FILE_NAME)
}

/// Runs `f` against a freshly opened service.
///
/// Returns the action result plus the slots whose save did not land.
fn with_service<T>(
    db_path: &Path,
    f: impl FnOnce(&mut TrackerService<SqliteSlotRepository<'_>>) -> T,
) -> Result<(T, Vec<String>), String> {
    let conn = open_db(db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("database open failed: {err}")
    })?;
    let mut service = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);
    let value = f(&mut service);

    let unsaved = service
        .unsaved_slots()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !unsaved.is_empty() {
        warn!(
            "event=ffi_save module=ffi status=error unsaved_slots={}",
            unsaved.join(",")
        );
    }
    Ok((value, unsaved))
}

fn to_partner_item(partner: &Partner) -> PartnerItem {
    PartnerItem {
        id: partner.id,
        name: partner.name.clone(),
        smashes: partner.smashes,
        rating: partner.rating,
        rating_label: partner.rating_label(),
        initial: partner.initial(),
        avatar: partner.avatar.clone(),
    }
}
