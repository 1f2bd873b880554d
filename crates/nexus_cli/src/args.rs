use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nexus")]
#[command(about = "Track partners and your own profile in a local data store")]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $NEXUS_DATA_DIR, then ./.nexus)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check core linkage and print the core version
    Ping,

    /// List or add partners
    Partners {
        #[command(subcommand)]
        action: PartnerCommand,
    },

    /// Show or edit your own profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show or change local settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Export partners and profile to nexus-data.json
    Export {
        /// Directory to write nexus-data.json into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Print the JSON instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Replace partners (and profile, if present) from an exported file
    Import {
        /// Previously exported JSON document
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum PartnerCommand {
    /// Print every partner card
    List,

    /// Add a partner with zeroed stats
    Add {
        /// Partner name
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Print the current profile
    Show,

    /// Change profile fields; omitted fields stay as they are
    Set {
        #[arg(long)]
        name: Option<String>,

        /// Birthday as YYYY-MM-DD, or an empty string to clear it
        #[arg(long)]
        birthday: Option<String>,

        /// Image file to embed as the profile photo
        #[arg(long, conflicts_with_all = ["photo_url", "clear_photo"])]
        photo: Option<PathBuf>,

        /// Image URL to use as the profile photo
        #[arg(long, conflicts_with = "clear_photo")]
        photo_url: Option<String>,

        /// Remove the profile photo
        #[arg(long)]
        clear_photo: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print current settings
    Show,

    /// Change settings; omitted toggles stay as they are
    Set {
        #[arg(long)]
        dark_mode: Option<bool>,

        #[arg(long)]
        biometric: Option<bool>,
    },
}
