//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cr-analysis.toml` files.

use crate::analysis::{Selection, SummaryOptions};
use crate::cli::{Args, OutputFormat};
use crate::error::AnalysisError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".cr-analysis.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis defaults.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Validation rules.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Lint rules.
    #[serde(default)]
    pub lint: LintConfig,

    /// Report export settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report file or directory.
    #[serde(default = "default_reports")]
    pub reports: PathBuf,

    /// Report file extensions.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into sub-directories of the reports directory.
    #[serde(default)]
    pub recursive: bool,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            reports: default_reports(),
            extensions: default_extensions(),
            recursive: false,
            verbose: false,
        }
    }
}

fn default_reports() -> PathBuf {
    PathBuf::from("reports")
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

/// Defaults for the `analysis` and `report` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Year to analyze; the current year when unset.
    #[serde(default)]
    pub year: Option<i32>,

    /// Analyze every year instead of a single one.
    #[serde(default)]
    pub all_years: bool,

    /// Date field the year filter applies to.
    #[serde(default = "default_date_field")]
    pub date_field: String,

    /// Date field tickets are bucketed on per month.
    #[serde(default = "default_month_field")]
    pub month_field: String,

    /// Center of the first consultant, or "all".
    #[serde(default = "default_center")]
    pub center: String,

    /// Count mode: "relative" or "absolute".
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year: None,
            all_years: false,
            date_field: default_date_field(),
            month_field: default_month_field(),
            center: default_center(),
            mode: default_mode(),
        }
    }
}

fn default_date_field() -> String {
    "end_date".to_string()
}

fn default_month_field() -> String {
    "start_date".to_string()
}

fn default_center() -> String {
    crate::analysis::ALL_CENTERS.to_string()
}

fn default_mode() -> String {
    "relative".to_string()
}

impl AnalysisConfig {
    /// Builds summary options, resolving an unset year to `current_year`.
    pub fn summary_options(&self, current_year: i32) -> Result<SummaryOptions, AnalysisError> {
        let year = if self.all_years {
            None
        } else {
            Some(self.year.unwrap_or(current_year))
        };

        Ok(SummaryOptions {
            selection: Selection {
                year,
                date_field: self.date_field.parse()?,
                center: Some(self.center.clone()),
            },
            mode: self.mode.parse()?,
            month_field: self.month_field.parse()?,
        })
    }
}

/// Validation rule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Known center identifiers (compared case-insensitively).
    #[serde(default = "default_centers")]
    pub centers: Vec<String>,

    /// Treat warnings as errors.
    #[serde(default)]
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            centers: default_centers(),
            strict: false,
        }
    }
}

fn default_centers() -> Vec<String> {
    crate::validation::KNOWN_CENTERS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// YAML lint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Maximum line length in characters.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Allow long lines made of a single word (URLs, paths).
    #[serde(default = "default_true")]
    pub allow_non_breakable_words: bool,

    /// Maximum consecutive blank lines.
    #[serde(default = "default_max_empty_lines")]
    pub max_empty_lines: usize,

    /// Maximum blank lines at the end of a file.
    #[serde(default)]
    pub max_empty_lines_at_end: usize,

    /// Require a leading `---` document marker.
    #[serde(default)]
    pub require_document_start: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            allow_non_breakable_words: true,
            max_empty_lines: default_max_empty_lines(),
            max_empty_lines_at_end: 0,
            require_document_start: false,
        }
    }
}

fn default_max_line_length() -> usize {
    80
}

fn default_max_empty_lines() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Report export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the per-center member lists in Markdown reports.
    #[serde(default)]
    pub include_members: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            include_members: false,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("cr_report.md")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &Args) {
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(source) = args.source() {
            if let Some(ref reports) = source.reports {
                self.general.reports = reports.clone();
            }
            if source.recursive {
                self.general.recursive = true;
            }
        }

        if let Some(analysis) = args.analysis() {
            if let Some(year) = analysis.year {
                self.analysis.year = Some(year);
                self.analysis.all_years = false;
            }
            if analysis.all_years {
                self.analysis.all_years = true;
            }
            if let Some(ref center) = analysis.center {
                self.analysis.center = center.clone();
            }
            if let Some(field) = analysis.date_field {
                self.analysis.date_field = field.to_string();
            }
            if let Some(field) = analysis.month_field {
                self.analysis.month_field = field.to_string();
            }
            if let Some(mode) = analysis.mode {
                self.analysis.mode = mode.to_string();
            }
        }

        if let Some(report) = args.report() {
            if let Some(ref output) = report.output {
                self.report.output = output.clone();
            }
            if let Some(format) = report.format {
                self.report.format = format;
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountMode, DateField};
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.reports, PathBuf::from("reports"));
        assert_eq!(config.analysis.center, "all");
        assert_eq!(config.lint.max_line_length, 80);
        assert!(config.validation.centers.contains(&"KIT".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
reports = "tickets/"
verbose = true

[analysis]
year = 2022
center = "DESY"
mode = "absolute"

[lint]
max_line_length = 120

[report]
format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.reports, PathBuf::from("tickets/"));
        assert!(config.general.verbose);
        assert_eq!(config.analysis.year, Some(2022));
        assert_eq!(config.analysis.date_field, "end_date");
        assert_eq!(config.lint.max_line_length, 120);
        assert_eq!(config.lint.max_empty_lines, 2);
        assert_eq!(config.report.format, OutputFormat::Json);
    }

    #[test]
    fn test_summary_options_from_config() {
        let mut config = AnalysisConfig::default();
        let options = config.summary_options(2024).unwrap();
        assert_eq!(options.selection.year, Some(2024));
        assert_eq!(options.selection.date_field, DateField::EndDate);
        assert_eq!(options.month_field, DateField::StartDate);
        assert_eq!(options.mode, CountMode::Relative);

        config.all_years = true;
        assert_eq!(config.summary_options(2024).unwrap().selection.year, None);
    }

    #[test]
    fn test_invalid_mode_in_config() {
        let config = AnalysisConfig {
            mode: "percent".to_string(),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.summary_options(2024),
            Err(AnalysisError::InvalidMode("percent".to_string()))
        );
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::parse_from([
            "cr",
            "--verbose",
            "report",
            "--reports",
            "tickets",
            "--year",
            "2021",
            "--center",
            "KIT",
            "--mode",
            "absolute",
            "--format",
            "json",
        ]);

        let mut config = Config::default();
        config.analysis.all_years = true;
        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert_eq!(config.general.reports, PathBuf::from("tickets"));
        assert_eq!(config.analysis.year, Some(2021));
        assert!(!config.analysis.all_years);
        assert_eq!(config.analysis.center, "KIT");
        assert_eq!(config.analysis.mode, "absolute");
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.output, PathBuf::from("cr_report.md"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[lint]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.analysis.mode, "relative");
    }
}
