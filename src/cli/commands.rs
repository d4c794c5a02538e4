//! Command implementations for the raid attendance CLI
//!
//! This module contains the command execution logic, logging setup and
//! report printing for the CLI interface.

use crate::buffs::{WorldBuffSet, world_buffs_from_spell_ids};
use crate::cli::args::{Args, AuditArgs, Commands, EvaluateArgs, OutputFormat, RecordArgs, parse_raid_date};
use crate::codec::{RowCodec, encode_world_buffs};
use crate::config::Config;
use crate::eligibility::world_buffs_acceptable;
use crate::error::{AttendanceError, Result};
use crate::ingest::{append_entries, load_entries};
use crate::models::{AttendanceEntry, Player, WowClass};
use crate::report::AuditReport;
use crate::store::{FileStore, RangeSpec, RowStore};
use colored::*;
use tracing::{debug, info};

/// Main command runner
///
/// 1. Load layered configuration
/// 2. Set up logging
/// 3. Build the codec (validates the buff lookup table)
/// 4. Dispatch to the subcommand
pub fn run(args: Args) -> Result<()> {
    let config = Config::load_layered(args.config_file.as_deref(), args.store_dir.clone())?;

    let level = args
        .log_level_override()
        .unwrap_or(config.logging.level.as_str());
    setup_logging(level)?;
    debug!("Command line arguments: {:?}", args);

    let codec = RowCodec::with_known_buffs()?;

    match args.command {
        Some(Commands::Record(record_args)) => {
            let mut store = FileStore::open(&config.store.directory)?;
            let entry = run_record(&record_args, &config, &codec, &mut store)?;
            print_recorded(&entry);
        }
        Some(Commands::Evaluate(evaluate_args)) => {
            let (buffs, acceptable) = run_evaluate(&evaluate_args, &codec)?;
            print_verdict(&buffs, acceptable);
        }
        Some(Commands::Audit(audit_args)) => {
            let store = FileStore::open(&config.store.directory)?;
            let report = run_audit(&audit_args, &config, &codec, &store)?;
            print_report(&report, audit_args.format, audit_args.players)?;
        }
        None => {
            return Err(AttendanceError::configuration("No command given"));
        }
    }

    Ok(())
}

/// Set up structured logging to stderr
pub fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("raid_attendance={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| AttendanceError::configuration(format!("Failed to set up logging: {}", e)))?;

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Build a fresh entry from the arguments and append it to the attendance sheet
pub fn run_record(
    args: &RecordArgs,
    config: &Config,
    codec: &RowCodec,
    store: &mut dyn RowStore,
) -> Result<AttendanceEntry> {
    let class: WowClass = args.class.trim().to_uppercase().parse()?;
    let date = parse_raid_date(&args.date)?;

    let world_buffs = if args.buffs_unknown {
        None
    } else if let Some(spell_ids) = &args.spell_ids {
        Some(world_buffs_from_spell_ids(spell_ids.iter().copied()))
    } else {
        Some(codec.buff_table().resolve_list(args.buffs.as_deref().unwrap_or_default())?)
    };

    let entry = AttendanceEntry::new(
        Player::new(args.name.trim(), class),
        args.raid_id,
        args.report.trim(),
        date,
        args.zone.trim(),
        world_buffs,
    );

    let sheet = &config.store.attendance_sheet;
    append_entries(store, codec, std::slice::from_ref(&entry), sheet)?;
    info!(
        "Recorded {} for raid {} ({}) in {}",
        entry.player().name,
        entry.raid_instance_id(),
        entry.date(),
        sheet
    );

    Ok(entry)
}

/// Resolve a buff list and apply the eligibility rule
pub fn run_evaluate(args: &EvaluateArgs, codec: &RowCodec) -> Result<(WorldBuffSet, bool)> {
    let buffs = codec.buff_table().resolve_list(&args.buffs)?;
    let acceptable = world_buffs_acceptable(Some(&buffs));
    Ok((buffs, acceptable))
}

/// Fetch, decode and summarise stored attendance
pub fn run_audit(
    args: &AuditArgs,
    config: &Config,
    codec: &RowCodec,
    store: &dyn RowStore,
) -> Result<AuditReport> {
    let range = match &args.range {
        Some(range) if range.contains('!') => RangeSpec::parse(range)?,
        Some(range) => RangeSpec::parse_in(&config.store.attendance_sheet, range)?,
        None => config.data_range()?,
    };
    info!("Auditing {}", range);

    let decoded = load_entries(store, codec, &range)?;
    Ok(AuditReport::build(&decoded.entries, decoded.stats))
}

fn verdict_label(acceptable: bool) -> ColoredString {
    if acceptable {
        "acceptable".green().bold()
    } else {
        "not acceptable".red().bold()
    }
}

fn print_recorded(entry: &AttendanceEntry) {
    println!(
        "{} {} ({}) at {} on {} {}",
        "Recorded".bright_green().bold(),
        entry.player().name.bright_cyan(),
        entry.player().class,
        entry.zone(),
        entry.day_of_week(),
        entry.date()
    );
    println!(
        "  World buffs: {} - {}",
        encode_world_buffs(entry.world_buffs()),
        verdict_label(entry.acceptable_wbuffs())
    );
}

fn print_verdict(buffs: &WorldBuffSet, acceptable: bool) {
    let names: Vec<&str> = buffs.iter().map(|buff| buff.name()).collect();
    let listed = if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    };
    println!("{}: {}", listed, verdict_label(acceptable));
}

fn print_report(report: &AuditReport, format: OutputFormat, show_players: bool) -> Result<()> {
    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| AttendanceError::store(format!("Failed to serialise report: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", "Attendance audit".bright_green().bold());
    println!("  Entries:        {}", report.total_entries);
    println!("  Acceptable:     {}", report.acceptable.to_string().green());
    println!("  Not acceptable: {}", report.not_acceptable.to_string().red());
    println!("  Unknown buffs:  {}", report.unknown_buffs.to_string().yellow());

    if !report.decode.is_clean() {
        println!(
            "  {} {} rows could not be read ({:.1}% decoded)",
            "Warning:".yellow().bold(),
            report.decode.rows_skipped,
            report.decode.success_rate()
        );
        for error in &report.decode.errors {
            println!("    {}", error.bright_black());
        }
    }

    if !report.stale_verdicts.is_empty() {
        println!();
        println!(
            "{}",
            "Stored verdicts that differ from the current rule:".yellow()
        );
        for stale in &report.stale_verdicts {
            println!(
                "  {} raid {} ({}) {} stored {}",
                stale.player.bright_cyan(),
                stale.raid_instance_id,
                stale.date,
                stale.world_buffs,
                stale.stored_verdict
            );
        }
    }

    if show_players && !report.players.is_empty() {
        println!();
        println!("{}", "Players".bright_green().bold());
        for player in &report.players {
            println!(
                "  {:<16} {:<8} {:>3} raids  {:>5.1}% acceptable  {} unknown",
                player.name,
                player.class.label(),
                player.attendances,
                player.acceptable_rate(),
                player.unknown_buffs
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::WorldBuff;
    use crate::models::DayOfWeek;
    use crate::store::MemoryStore;

    fn record_args(buffs: Option<&str>) -> RecordArgs {
        RecordArgs {
            name: "Sam".to_string(),
            class: "warrior".to_string(),
            raid_id: 3,
            report: "rep1".to_string(),
            date: "2020-01-01 19:30".to_string(),
            zone: "Naxxramas".to_string(),
            buffs: buffs.map(str::to_string),
            spell_ids: None,
            buffs_unknown: buffs.is_none(),
        }
    }

    #[test]
    fn test_record_appends_row() {
        let config = Config::default();
        let codec = RowCodec::with_known_buffs().unwrap();
        let mut store = MemoryStore::new();

        let entry = run_record(&record_args(Some("RC,dmt")), &config, &codec, &mut store).unwrap();
        assert!(entry.acceptable_wbuffs());
        assert_eq!(entry.day_of_week(), DayOfWeek::Wednesday);

        let rows = store
            .fetch_rows(&RangeSpec::parse("Attendance!A1:I").unwrap())
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![
                "Sam",
                "WARRIOR",
                "3",
                "rep1",
                "01-01-2020",
                "WEDNESDAY",
                "Naxxramas",
                "[RC,DMT]",
                "true"
            ]]
        );
    }

    #[test]
    fn test_record_unknown_and_spell_ids() {
        let config = Config::default();
        let codec = RowCodec::with_known_buffs().unwrap();
        let mut store = MemoryStore::new();

        let unknown = run_record(&record_args(None), &config, &codec, &mut store).unwrap();
        assert!(unknown.world_buffs().is_none());
        assert!(!unknown.acceptable_wbuffs());

        let mut args = record_args(None);
        args.buffs_unknown = false;
        args.spell_ids = Some(vec![22888, 22818, 15366]);
        let from_ids = run_record(&args, &config, &codec, &mut store).unwrap();
        assert_eq!(from_ids.world_buffs().map(|b| b.len()), Some(3));

        let audit = run_audit(
            &AuditArgs {
                range: Some("A1:I".to_string()),
                format: OutputFormat::Text,
                players: false,
            },
            &config,
            &codec,
            &store,
        )
        .unwrap();
        assert_eq!(audit.total_entries, 2);
        assert_eq!(audit.unknown_buffs, 1);
        assert!(audit.stale_verdicts.is_empty());
    }

    #[test]
    fn test_record_rejects_bad_class() {
        let mut args = record_args(Some("RC"));
        args.class = "bard".to_string();
        let result = run_record(
            &args,
            &Config::default(),
            &RowCodec::with_known_buffs().unwrap(),
            &mut MemoryStore::new(),
        );
        assert!(matches!(result, Err(AttendanceError::Format { field: "player_class", .. })));
    }

    #[test]
    fn test_evaluate_command() {
        let codec = RowCodec::with_known_buffs().unwrap();
        let (buffs, acceptable) = run_evaluate(
            &EvaluateArgs {
                buffs: "Rallying Cry of the Dragonslayer, DMT".to_string(),
            },
            &codec,
        )
        .unwrap();
        assert!(acceptable);
        assert!(buffs.contains(&WorldBuff::RallyingCryOfTheDragonslayer));

        let (_, acceptable) =
            run_evaluate(&EvaluateArgs { buffs: "ZG,SF".to_string() }, &codec).unwrap();
        assert!(!acceptable);

        assert!(run_evaluate(&EvaluateArgs { buffs: "ZZ".to_string() }, &codec).is_err());
    }

    #[test]
    fn test_audit_missing_sheet() {
        let result = run_audit(
            &AuditArgs {
                range: None,
                format: OutputFormat::Json,
                players: true,
            },
            &Config::default(),
            &RowCodec::with_known_buffs().unwrap(),
            &MemoryStore::new(),
        );
        assert!(matches!(result, Err(AttendanceError::SheetNotFound { .. })));
    }
}
