//! Biathlon Log Analyzer CLI Application
//!
//! Thin application layer around the biathlon-engine library:
//! - Parses command-line arguments
//! - Loads the race configuration and the ordered event stream
//! - Runs the race controller over the stream
//! - Writes the annotated event log and the final standings report

use anyhow::{Context, Result};
use biathlon_engine::{RaceConfig, RaceController};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

/// Biathlon Log Analyzer - replay race events and produce standings
#[derive(Parser, Debug)]
#[command(name = "biathlon-cli")]
#[command(about = "Replay a biathlon event log and generate the final standings", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the race configuration (config.json)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Path to the ordered event stream
    #[arg(short, long, value_name = "FILE")]
    events: PathBuf,

    /// Output prefix; writes <PREFIX>_log.txt and <PREFIX>_report.txt
    #[arg(short, long, value_name = "PREFIX")]
    output: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Biathlon Log Analyzer v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using engine library v{}", biathlon_engine::VERSION);

    let config = RaceConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load configuration: {:?}", args.config))?;

    let events = biathlon_engine::event::load_from_file(&args.events)
        .with_context(|| format!("Failed to load events: {:?}", args.events))?;

    let mut controller = RaceController::new(config);
    controller.process_events(&events);

    write_outputs(&controller, &args.output)?;

    log::info!("Processing completed successfully");
    Ok(())
}

/// Write the annotated log and the final report next to the output prefix
fn write_outputs(controller: &RaceController, prefix: &Path) -> Result<()> {
    if let Some(dir) = prefix.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
        }
    }

    let log_path = with_suffix(prefix, "_log.txt");
    fs::write(&log_path, controller.log_text())
        .with_context(|| format!("Failed to write output log: {:?}", log_path))?;
    log::info!("Wrote event log to {:?}", log_path);

    let report_path = with_suffix(prefix, "_report.txt");
    fs::write(&report_path, controller.final_report())
        .with_context(|| format!("Failed to write final report: {:?}", report_path))?;
    log::info!("Wrote final report to {:?}", report_path);

    Ok(())
}

/// Append a suffix to the output prefix without touching its extension
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
