//! Command execution.
//!
//! Every command opens the slot database, runs one service action and prints a
//! plain-text result. Output goes to the provided writer so it can be captured.

use crate::args::{Commands, PartnerCommand, ProfileCommand, SettingsCommand};
use anyhow::{Context, Result};
use log::info;
use nexus_core::db::open_db;
use nexus_core::{
    core_version, image_data_url, ping, AppConfig, DirectoryTarget, ExportOutcome, NoFileTarget,
    Partner, SqliteSlotRepository, TrackerService, DEFAULT_SEED,
};
use std::io::Write;
use std::path::Path;

type Service<'conn> = TrackerService<SqliteSlotRepository<'conn>>;

pub fn run(command: &Commands, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    if let Commands::Ping = command {
        writeln!(out, "nexus_core ping={}", ping())?;
        writeln!(out, "nexus_core version={}", core_version())?;
        return Ok(());
    }

    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open data store at {}", db_path.display()))?;
    let mut service = TrackerService::open(SqliteSlotRepository::new(&conn), &DEFAULT_SEED);

    match command {
        Commands::Ping => Ok(()),
        Commands::Partners { action } => run_partners(action, &mut service, out),
        Commands::Profile { action } => run_profile(action, &mut service, out),
        Commands::Settings { action } => run_settings(action, &mut service, out),
        Commands::Export { out_dir, stdout } => run_export(out_dir, *stdout, &service, out),
        Commands::Import { file } => run_import(file, &mut service, out),
    }?;

    let unsaved = service.unsaved_slots();
    if !unsaved.is_empty() {
        writeln!(
            out,
            "warning: changes kept in memory only, could not save: {}",
            unsaved.join(", ")
        )?;
    }
    Ok(())
}

fn run_partners(
    action: &PartnerCommand,
    service: &mut Service<'_>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        PartnerCommand::List => {
            if service.partners().is_empty() {
                writeln!(out, "No partners yet. Add one with `nexus partners add <name>`.")?;
            }
            for partner in service.partners() {
                writeln!(out, "{}", partner_card(partner))?;
            }
        }
        PartnerCommand::Add { name } => {
            let partner = service.add_partner(name)?;
            writeln!(out, "Added {} (id {}).", partner.name, partner.id)?;
        }
    }
    Ok(())
}

fn run_profile(
    action: &ProfileCommand,
    service: &mut Service<'_>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ProfileCommand::Show => {}
        ProfileCommand::Set {
            name,
            birthday,
            photo,
            photo_url,
            clear_photo,
        } => {
            let mut profile = service.self_profile().clone();
            if let Some(name) = name {
                profile.name = name.trim().to_string();
            }
            if let Some(birthday) = birthday {
                profile.birthday = birthday.trim().to_string();
            }
            if let Some(path) = photo {
                profile.photo = Some(
                    image_data_url(path)
                        .with_context(|| format!("failed to load photo {}", path.display()))?,
                );
            } else if let Some(url) = photo_url {
                profile.photo = Some(url.trim().to_string());
            } else if *clear_photo {
                profile.photo = None;
            }
            service.update_self_profile(profile)?;
            writeln!(out, "Profile saved.")?;
        }
    }

    let profile = service.self_profile();
    writeln!(out, "Name:     {}", profile.name)?;
    writeln!(out, "Birthday: {}", profile.birthday().unwrap_or("-"))?;
    writeln!(
        out,
        "Photo:    {}",
        if profile.photo.is_some() { "set" } else { "none" }
    )?;
    Ok(())
}

fn run_settings(
    action: &SettingsCommand,
    service: &mut Service<'_>,
    out: &mut impl Write,
) -> Result<()> {
    if let SettingsCommand::Set {
        dark_mode,
        biometric,
    } = action
    {
        if let Some(enabled) = dark_mode {
            service.set_dark_mode(*enabled);
        }
        if let Some(enabled) = biometric {
            service.set_biometric_auth(*enabled);
        }
    }

    let settings = service.settings();
    writeln!(out, "Dark mode:                {}", on_off(settings.dark_mode))?;
    writeln!(out, "Biometric authentication: {}", on_off(settings.biometric_auth))?;
    Ok(())
}

fn run_export(
    out_dir: &Path,
    to_stdout: bool,
    service: &Service<'_>,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = if to_stdout {
        service.export_to(&NoFileTarget)?
    } else {
        service.export_to(&DirectoryTarget::new(out_dir))?
    };

    match outcome {
        ExportOutcome::Saved(path) => {
            writeln!(
                out,
                "Exported {} partner(s) to {}.",
                service.partners().len(),
                path.display()
            )?;
        }
        ExportOutcome::ManualCopy(json) => {
            if !to_stdout {
                writeln!(
                    out,
                    "Could not write the export file. Copy the following JSON and save it manually:"
                )?;
            }
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

fn run_import(file: &Path, service: &mut Service<'_>, out: &mut impl Write) -> Result<()> {
    let summary = service.import_file(file).map_err(|err| {
        let message = match err.code() {
            "import_read_failed" => format!("failed to read import file {}", file.display()),
            _ => "failed to import data: invalid file format".to_string(),
        };
        anyhow::Error::new(err).context(message)
    })?;
    info!(
        "event=cli_import module=cli status=ok partners={}",
        summary.partner_count
    );
    writeln!(
        out,
        "Data imported successfully: {} partner(s){}.",
        summary.partner_count,
        if summary.self_profile_replaced {
            ", profile replaced"
        } else {
            ""
        }
    )?;
    Ok(())
}

fn partner_card(partner: &Partner) -> String {
    let badge = if partner.avatar.is_some() {
        "[img]".to_string()
    } else {
        format!("[{}]", partner.initial())
    };
    format!(
        "{badge:<6}{name:<20}{smashes} Smashes • {rating} ★  (id {id})",
        name = partner.name,
        smashes = partner.smashes,
        rating = partner.rating_label(),
        id = partner.id
    )
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
