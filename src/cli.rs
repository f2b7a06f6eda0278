//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{CountMode, DateField};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// cr - validate, lint and analyze consultation reports
///
/// Reads one YAML file per consultation ticket and computes counts,
/// distributions and monthly series over them.
///
/// Examples:
///   cr validate --reports reports/
///   cr lint --reports reports/ticket-1001.yml
///   cr analysis --year 2023 --center KIT --mode absolute
///   cr report --all-years --format json --output summary.json
///   cr init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .cr-analysis.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check reports against the data rules
    Validate(SourceArgs),

    /// Check the YAML formatting of report files
    Lint(SourceArgs),

    /// Print analysis tables to the console
    Analysis(AnalysisArgs),

    /// Write the analysis as a Markdown or JSON file
    Report(ReportArgs),

    /// Generate a default .cr-analysis.toml configuration file
    InitConfig,
}

/// Where to read reports from.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Report file or directory of report files
    #[arg(short, long, value_name = "PATH", env = "CR_REPORTS")]
    pub reports: Option<PathBuf>,

    /// Descend into sub-directories of the reports directory
    #[arg(long)]
    pub recursive: bool,
}

/// Selection and counting options shared by `analysis` and `report`.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct AnalysisArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Year to analyze (defaults to the current year)
    #[arg(short, long, value_name = "YEAR", conflicts_with = "all_years")]
    pub year: Option<i32>,

    /// Analyze reports of every year
    #[arg(long)]
    pub all_years: bool,

    /// Center of the first consultant, or "all"
    #[arg(long, value_name = "CENTER")]
    pub center: Option<String>,

    /// Date field the year filter applies to (start_date, end_date)
    #[arg(long, value_name = "FIELD")]
    pub date_field: Option<DateField>,

    /// Date field tickets are bucketed on per month (start_date, end_date)
    #[arg(long, value_name = "FIELD")]
    pub month_field: Option<DateField>,

    /// Count mode (relative, absolute)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<CountMode>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Report source options of the active subcommand, if it reads reports.
    pub fn source(&self) -> Option<&SourceArgs> {
        match &self.command {
            Command::Validate(source) | Command::Lint(source) => Some(source),
            Command::Analysis(analysis) => Some(&analysis.source),
            Command::Report(report) => Some(&report.analysis.source),
            Command::InitConfig => None,
        }
    }

    /// Analysis options of the active subcommand.
    pub fn analysis(&self) -> Option<&AnalysisArgs> {
        match &self.command {
            Command::Analysis(analysis) => Some(analysis),
            Command::Report(report) => Some(&report.analysis),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ReportArgs> {
        match &self.command {
            Command::Report(report) => Some(report),
            _ => None,
        }
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(analysis) = self.analysis() {
            if let Some(year) = analysis.year {
                if !(1..=9999).contains(&year) {
                    return Err(format!("Year must be between 1 and 9999, got {}", year));
                }
            }

            if let Some(ref center) = analysis.center {
                if center.trim().is_empty() {
                    return Err("Center must not be empty".to_string());
                }
            }
        }

        if let Some(ref config) = self.config {
            if !config.exists() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
