//! Command implementations for the tower importer CLI
//!
//! Each subcommand reads its input through the filesystem adapter, runs the
//! core pipeline, and renders a human or JSON report. The pipeline itself
//! never prints; all presentation lives here.

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::app::adapters::filesystem;
use crate::app::models::{DateValidationWarning, FieldMappingReport};
use crate::app::services::export::export_records;
use crate::app::services::import::{parse_battle_report, ImportResult, ImportStats};
use crate::cli::args::{Args, CheckArgs, Commands, ConvertArgs, ImportArgs, ReportFormat};
use crate::Result;

/// Main command dispatcher
pub fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Some(Commands::Import(import_args)) => run_import(import_args),
        Some(Commands::Convert(convert_args)) => run_convert(convert_args),
        Some(Commands::Check(check_args)) => run_check(check_args),
        None => Ok(()),
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tower_importer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Everything an import surfaces besides the records themselves
#[derive(Debug, Serialize)]
struct ImportReport<'a> {
    stats: &'a ImportStats,
    field_mappings: &'a FieldMappingReport,
    date_warnings: &'a [DateValidationWarning],
    missing_battle_date_column: bool,
}

impl<'a> ImportReport<'a> {
    fn from_result(result: &'a ImportResult) -> Self {
        Self {
            stats: &result.stats,
            field_mappings: &result.field_mappings,
            date_warnings: &result.date_warnings,
            missing_battle_date_column: result.missing_battle_date_column,
        }
    }
}

fn run_import(args: ImportArgs) -> Result<()> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let text = filesystem::read_input(args.input.as_deref())?;
    let options = args.import_options()?;
    let result = parse_battle_report(&text, &options);

    match args.report_format {
        ReportFormat::Json => {
            let report = ImportReport::from_result(&result);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Human => {
            if !args.quiet {
                print_import_summary(&result);
            }
        }
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let text = filesystem::read_input(args.input.as_deref())?;
    let import_options = args.import_options()?;
    let result = parse_battle_report(&text, &import_options);

    let export_options = args.export_options()?;
    let exported = export_records(&result.records, &export_options);

    filesystem::write_output(args.output.as_deref(), &exported.csv_content)?;

    if !args.quiet {
        for conflict in &exported.conflicts {
            eprintln!(
                "{} {} value(s) in '{}' contain the output delimiter, e.g. {}",
                "warning:".yellow().bold(),
                conflict.affected_rows,
                conflict.header,
                conflict
                    .examples
                    .iter()
                    .map(|e| format!("\"{}\"", e))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        eprintln!(
            "{} {} record(s), {} column(s)",
            "exported".green().bold(),
            exported.row_count,
            exported.field_count
        );
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let text = filesystem::read_input(args.input.as_deref())?;
    let options = args.import_options()?;
    let result = parse_battle_report(&text, &options);

    match args.report_format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result.date_warnings)?);
        }
        ReportFormat::Human => {
            if !args.quiet {
                print_check_report(&result);
            }
        }
    }
    Ok(())
}

fn print_import_summary(result: &ImportResult) {
    println!("{}", "Import Summary".bold());
    println!(
        "  Parsed {} of {} row(s) ({:.0}%)",
        result.stats.records_parsed,
        result.stats.total_rows,
        result.stats.success_rate()
    );

    for error in &result.stats.errors {
        println!("  {} {}", "rejected:".red().bold(), error);
    }

    if result.missing_battle_date_column {
        println!(
            "  {} input has no battle-date column; record dates fall back to \
             internal fields or the fallback date",
            "note:".yellow().bold()
        );
    }

    let new_fields: Vec<_> = result.field_mappings.new_fields().collect();
    if !new_fields.is_empty() {
        println!("  New fields:");
        for mapping in new_fields {
            println!("    {} -> {}", mapping.header, mapping.field_key);
        }
    }

    let similar: Vec<_> = result.field_mappings.similar_fields().collect();
    for mapping in similar {
        if let Some(suggestion) = &mapping.suggestion {
            println!(
                "  {} '{}' looks like existing field '{}'",
                "similar:".yellow().bold(),
                mapping.header,
                suggestion
            );
        }
    }

    if !result.date_warnings.is_empty() {
        println!(
            "  {} {} record(s) have battle-date problems (run `check` for details)",
            "warning:".yellow().bold(),
            result.date_warnings.len()
        );
    }
}

fn print_check_report(result: &ImportResult) {
    if result.date_warnings.is_empty() {
        println!("{} all battle dates are valid", "ok:".green().bold());
        return;
    }

    println!(
        "{} {} record(s) with battle-date problems",
        "found".bold(),
        result.date_warnings.len()
    );
    for warning in &result.date_warnings {
        println!(
            "  row {} (tier {}, wave {}): {} \"{}\"",
            warning.row_number,
            warning.tier,
            warning.wave,
            warning.error.to_string().red(),
            warning.raw_value
        );
        println!("    {}", warning.error.suggestion());
        match warning.derived_date {
            Some(date) => println!(
                "    {} replacement available: {}",
                "fixable:".green().bold(),
                date.format("%Y-%m-%d %H:%M")
            ),
            None => println!("    {} no replacement date derivable", "unfixable:".red()),
        }
    }
}
