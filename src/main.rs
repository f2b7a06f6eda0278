//! cr - consultation report tooling
//!
//! Validates, lints and analyzes YAML consultation reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (I/O, config, unreadable reports, etc.)
//!   2 - Validation errors or lint problems found

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Utc};
use cr_analysis::cli::{Args, Command};
use cr_analysis::config::{Config, CONFIG_FILE_NAME};
use cr_analysis::lint::lint_file;
use cr_analysis::loader::{load_reports, LoadOutcome};
use cr_analysis::report::{self, AnalysisReport, ReportMetadata};
use cr_analysis::scanner::{FileScanner, ScanConfig};
use cr_analysis::validation::{validate_files, FindingLevel, ValidationRules};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("cr-analysis v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .cr-analysis.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the reports path, analysis defaults and lint rules.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the subcommand. Returns the exit code (0 or 2).
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let files = scan_reports(&config)?;

    match args.command {
        Command::Validate(_) => run_validate(&config, &files),
        Command::Lint(_) => run_lint(&config, &files),
        Command::Analysis(_) => run_analysis(&config, &files),
        Command::Report(_) => run_report(&config, &files),
        Command::InitConfig => Ok(0),
    }
}

/// Resolve the configured reports path to report files.
fn scan_reports(config: &Config) -> Result<Vec<PathBuf>> {
    let scanner = FileScanner::new(
        config.general.reports.clone(),
        ScanConfig::from(&config.general),
    );
    let files = scanner.scan()?;

    if files.is_empty() {
        warn!(
            "No report files found in {}",
            config.general.reports.display()
        );
    } else {
        info!("Found {} report files", files.len());
    }

    Ok(files)
}

fn run_validate(config: &Config, files: &[PathBuf]) -> Result<i32> {
    let rules = ValidationRules::from(&config.validation);
    let results = validate_files(files, &rules);

    let mut errors = 0;
    let mut warnings = 0;

    for result in &results {
        if result.findings.is_empty() {
            continue;
        }
        println!("\n📄 {}", result.path.display());
        for finding in &result.findings {
            println!("   {}", finding);
        }
        errors += result.count(FindingLevel::Error);
        warnings += result.count(FindingLevel::Warning);
    }

    println!(
        "\n📊 Validated {} files: {} errors, {} warnings",
        results.len(),
        errors,
        warnings
    );

    if errors > 0 || (config.validation.strict && warnings > 0) {
        eprintln!("\n⛔ Validation failed (exit code 2).");
        return Ok(2);
    }

    println!("✅ All reports are valid.");
    Ok(0)
}

fn run_lint(config: &Config, files: &[PathBuf]) -> Result<i32> {
    let mut problems = 0;

    for path in files {
        let result = lint_file(path, &config.lint)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if result.problems.is_empty() {
            continue;
        }
        println!("\n📄 {}", result.path.display());
        for problem in &result.problems {
            println!("   {}", problem);
        }
        problems += result.problems.len();
    }

    println!("\n📊 Linted {} files: {} problems", files.len(), problems);

    if problems > 0 {
        eprintln!("\n⛔ Lint problems found (exit code 2).");
        return Ok(2);
    }

    println!("✅ All reports are well formatted.");
    Ok(0)
}

/// Load reports, failing when any of them cannot be read.
fn load_all(files: &[PathBuf]) -> Result<LoadOutcome> {
    let outcome = load_reports(files);

    if !outcome.is_clean() {
        anyhow::bail!(
            "{} of {} report files could not be loaded (first: {}). Run `cr validate` for details.",
            outcome.failures.len(),
            files.len(),
            outcome.failures[0]
        );
    }

    Ok(outcome)
}

fn run_analysis(config: &Config, files: &[PathBuf]) -> Result<i32> {
    let outcome = load_all(files)?;
    let options = config
        .analysis
        .summary_options(Local::now().year())
        .context("Invalid analysis settings")?;

    let summary = cr_analysis::analysis::summarize(&outcome.reports, &options)?;
    report::print_summary(&summary);

    Ok(0)
}

fn run_report(config: &Config, files: &[PathBuf]) -> Result<i32> {
    let outcome = load_all(files)?;
    let options = config
        .analysis
        .summary_options(Local::now().year())
        .context("Invalid analysis settings")?;

    let metadata = ReportMetadata {
        reports_path: config.general.reports.clone(),
        generated_at: Utc::now(),
        files_loaded: outcome.reports.len(),
    };

    println!("\n📝 Generating report...");
    let analysis = AnalysisReport::build(
        &outcome.reports,
        &options,
        metadata,
        config.report.include_members,
    )?;

    report::write_report(&analysis, config.report.format, &config.report.output)?;

    println!(
        "   Tickets: {} ({})",
        analysis.summary.tickets, options.selection
    );
    println!(
        "\n✅ Report saved to: {}",
        config.report.output.display()
    );

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
