use clap::Parser;
use raid_attendance::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Raid Attendance - world buff tracking for guild raids");
    println!("=====================================================");
    println!();
    println!("USAGE:");
    println!("    raid-attendance [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    record      Record one player's attendance in the attendance sheet");
    println!("    evaluate    Check a list of world buffs against the requirement");
    println!("    audit       Summarise stored attendance and flag outdated verdicts");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (TOML)");
    println!("        --store-dir <PATH>  Directory of the attendance store");
    println!("    -v, --verbose           Increase logging verbosity");
    println!("    -q, --quiet             Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    raid-attendance record --name Sam --class warrior --raid-id 3 --report rep1 \\");
    println!("                           --date 2020-01-01 --zone Naxxramas --buffs RC,DMT");
    println!("    raid-attendance evaluate RC,ZG,SF");
    println!("    raid-attendance audit --players --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    raid-attendance <COMMAND> --help");
}
