//! Command-line argument definitions for the raid attendance tool
//!
//! Defines the CLI using the clap derive API.

use crate::error::{AttendanceError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the raid attendance tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "raid-attendance",
    version,
    about = "Track guild raid attendance and world buff requirements",
    long_about = "Records raid attendance into a spreadsheet-style store, judges whether each \
                  player brought the required world buffs, and audits stored attendance."
)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Directory of the attendance store (overrides config and environment)
    #[arg(long = "store-dir", value_name = "PATH", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Record one player's attendance and append it to the attendance sheet
    Record(RecordArgs),
    /// Check whether a list of world buffs meets the requirement
    Evaluate(EvaluateArgs),
    /// Summarise stored attendance and flag outdated verdicts
    Audit(AuditArgs),
}

/// Arguments for the record command
#[derive(Debug, Clone, Parser)]
#[command(group(
    ArgGroup::new("buff_source")
        .required(true)
        .args(["buffs", "spell_ids", "buffs_unknown"])
))]
pub struct RecordArgs {
    /// Character name
    #[arg(long)]
    pub name: String,

    /// Character class (e.g. warrior, PRIEST)
    #[arg(long)]
    pub class: String,

    /// Raid instance number within the report
    #[arg(long = "raid-id", value_name = "ID")]
    pub raid_id: i32,

    /// Combat log report identifier
    #[arg(long)]
    pub report: String,

    /// Raid date: YYYY-MM-DD, optionally followed by HH:MM[:SS]
    #[arg(long)]
    pub date: String,

    /// Raid zone
    #[arg(long)]
    pub zone: String,

    /// World buffs as short tokens or names, comma-separated (e.g. RC,DMT)
    #[arg(long, value_name = "LIST")]
    pub buffs: Option<String>,

    /// Aura spell ids seen on the player, comma-separated
    #[arg(long = "spell-ids", value_name = "IDS", value_delimiter = ',')]
    pub spell_ids: Option<Vec<u32>>,

    /// Buffs could not be determined for this player
    #[arg(long = "buffs-unknown")]
    pub buffs_unknown: bool,
}

/// Arguments for the evaluate command
#[derive(Debug, Clone, Parser)]
pub struct EvaluateArgs {
    /// World buffs as short tokens or names, comma-separated
    #[arg(value_name = "LIST")]
    pub buffs: String,
}

/// Arguments for the audit command
#[derive(Debug, Clone, Parser)]
pub struct AuditArgs {
    /// Range to audit, e.g. "A2:I" or "Attendance!A2:I" (defaults to the configured range)
    #[arg(long, value_name = "A1")]
    pub range: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// List every player, not only the totals
    #[arg(long)]
    pub players: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Log level requested on the command line, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Parse a raid start time given as a date with an optional time of day
pub fn parse_raid_date(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            AttendanceError::format("date", text, "expected YYYY-MM-DD with optional HH:MM[:SS]")
        })
}
