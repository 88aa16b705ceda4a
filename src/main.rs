//! ThreadTally - vote counting for comment threads
//!
//! A CLI tool that reads a saved discussion thread, extracts the numeric
//! votes people posted as comments, prints the ranked totals and writes a
//! JSON manifest of every ballot for auditing.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad thread reference, config, manifest write, etc.)

mod cli;
mod config;
mod error;
mod models;
mod report;
mod source;
mod tally;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use source::ThreadInput;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    info!("ThreadTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    if let Err(e) = run_tally(&args, &config) {
        error!("Tally failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .threadtally.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the ranked report.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        // An explicit config file must load
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("Warning: ignoring {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Run the complete tally: load comments, count, report, write manifest.
fn run_tally(args: &Args, config: &Config) -> Result<()> {
    let input = ThreadInput::parse(args.thread_ref())?;
    let source_options = config.source_options();
    let tally_options = config.tally_options();

    info!("Reading thread: {}", args.thread_ref());
    let thread = source::load_thread(&input, config.source.format, &source_options)?;

    if let Some(ref title) = thread.title {
        info!(
            "Thread {}: {}",
            thread.id.as_deref().unwrap_or("?"),
            title
        );
    }
    if thread.unresolved > 0 {
        warn!(
            "Tally may be incomplete: {} collapsed comments were not in the dump",
            thread.unresolved
        );
    }

    info!(
        "Counting votes (top-level only: {}, weighted: {}, candidates below {})",
        tally_options.only_top_level, tally_options.weigh_comments, tally_options.max_candidate
    );

    let result = tally::tally_votes(&thread.records, tally_options)
        .context("Failed to build candidate extractor")?;
    let standings = tally::rank(&result.tally);

    info!(
        "{}",
        report::generate_summary_text(&result.summary, standings.len())
    );

    let output = config.output_path();
    report::publish(
        &standings,
        &result.manifest,
        &output,
        &mut std::io::stdout().lock(),
    )?;
    info!(
        "Wrote {} ballots to {}",
        result.manifest.len(),
        output.display()
    );

    Ok(())
}
