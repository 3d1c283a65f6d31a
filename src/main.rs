use clap::Parser;
use std::process;
use tower_importer::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", anyhow::Error::from(error));
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Tower Importer - Battle Report Converter");
    println!("========================================");
    println!();
    println!("Parse battle report exports pasted from the game, normalize");
    println!("locale-dependent numbers and dates, and re-export them in a");
    println!("canonical locale-independent format.");
    println!();
    println!("USAGE:");
    println!("    tower-importer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Parse a report and show what was imported");
    println!("    convert     Parse a report and re-export it");
    println!("    check       Validate battle dates and suggest fixes");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a tab-separated report and show the summary:");
    println!("    tower-importer import --input report.tsv");
    println!();
    println!("    # Convert a European-locale report to canonical form:");
    println!("    tower-importer convert --input report.csv \\");
    println!("                           --decimal-separator , --thousands-separator . \\");
    println!("                           --date-format german --output canonical.tsv");
    println!();
    println!("    # Check battle dates and get suggested fixes as JSON:");
    println!("    tower-importer check --input report.tsv --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    tower-importer <COMMAND> --help");
}
