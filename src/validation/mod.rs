//! Data rules for consultation reports.
//!
//! Findings are data, not errors: a report with errors is still a report,
//! and callers decide what a finding means for their exit status.

use crate::analysis::RequestType;
use crate::config::ValidationConfig;
use crate::error::LoadError;
use crate::loader::load_report;
use crate::models::{Person, Report, WorkloadCategory};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Center identifiers accepted as affiliations out of the box.
pub const KNOWN_CENTERS: &[&str] = &[
    "AWI", "CISPA", "DESY", "DKFZ", "DLR", "DZNE", "FZJ", "GEOMAR", "GFZ", "GSI", "HEREON",
    "HMGU", "HZB", "HZDR", "HZI", "KIT", "MDC", "UFZ",
];

/// Level of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    Warning,
    Error,
}

impl fmt::Display for FindingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingLevel::Warning => write!(f, "warning"),
            FindingLevel::Error => write!(f, "error"),
        }
    }
}

/// One rule violation in one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: FindingLevel,
    /// Dotted path of the offending field, e.g. `consultants[0].affiliation`.
    pub field: String,
    pub message: String,
}

impl Finding {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: FindingLevel::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: FindingLevel::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == FindingLevel::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.level, self.field, self.message)
    }
}

/// The configurable part of the validation rules.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    centers: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new(KNOWN_CENTERS.iter().copied())
    }
}

impl From<&ValidationConfig> for ValidationRules {
    fn from(config: &ValidationConfig) -> Self {
        Self::new(config.centers.iter().map(String::as_str))
    }
}

impl ValidationRules {
    pub fn new<'a>(centers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            centers: centers.into_iter().map(str::to_ascii_uppercase).collect(),
        }
    }

    /// Whether `affiliation` names a known center, ignoring case.
    pub fn is_known_center(&self, affiliation: &str) -> bool {
        let affiliation = affiliation.to_ascii_uppercase();
        self.centers.iter().any(|c| *c == affiliation)
    }

    /// Checks one report against every rule.
    pub fn validate(&self, report: &Report) -> Vec<Finding> {
        let mut findings = Vec::new();

        if report.ticket_number <= 0 {
            findings.push(Finding::error(
                "ticket_number",
                format!("must be positive, got {}", report.ticket_number),
            ));
        }

        if report.consultants.is_empty() {
            findings.push(Finding::error("consultants", "at least one consultant is required"));
        }
        self.check_persons("consultants", &report.consultants, &mut findings);
        self.check_persons("experts", &report.experts, &mut findings);
        self.check_persons("clients", &report.clients, &mut findings);

        for (field, value) in [
            ("estimated_workload", report.estimated_workload),
            ("final_workload", report.final_workload),
        ] {
            if value < 0.0 {
                findings.push(Finding::error(field, format!("must not be negative, got {}", value)));
            }
        }

        check_distribution(report, &mut findings);

        if report.request_types.is_empty() {
            findings.push(Finding::error("request_types", "at least one request type is required"));
        }
        for (i, label) in report.request_types.iter().enumerate() {
            if RequestType::from_label(label).is_none() {
                findings.push(Finding::error(
                    format!("request_types[{}]", i),
                    format!("unknown request type '{}'", label),
                ));
            }
        }

        if report.end_date < report.start_date {
            findings.push(Finding::warning(
                "end_date",
                format!(
                    "{} is before start_date {}",
                    report.end_date, report.start_date
                ),
            ));
        }

        debug!(
            "Ticket {}: {} finding(s)",
            report.ticket_number,
            findings.len()
        );
        findings
    }

    fn check_persons(&self, role: &str, persons: &[Person], findings: &mut Vec<Finding>) {
        for (i, person) in persons.iter().enumerate() {
            if person.name.trim().is_empty() {
                findings.push(Finding::error(format!("{}[{}].name", role, i), "name is empty"));
            }
            if !self.is_known_center(&person.affiliation) {
                findings.push(Finding::error(
                    format!("{}[{}].affiliation", role, i),
                    format!("unknown center '{}'", person.affiliation),
                ));
            }
        }
    }
}

fn check_distribution(report: &Report, findings: &mut Vec<Finding>) {
    const FIELD: &str = "workload_percentage_distribution";
    let distribution = &report.workload_percentage_distribution;

    for category in distribution.missing() {
        findings.push(Finding::error(
            format!("{}.{}", FIELD, category),
            "value is missing",
        ));
    }

    for category in WorkloadCategory::ALL {
        if let Some(value) = distribution.get(category) {
            if !(0..=100).contains(&value) {
                findings.push(Finding::error(
                    format!("{}.{}", FIELD, category),
                    format!("must be between 0 and 100, got {}", value),
                ));
            }
        }
    }

    let total = distribution.total();
    if total != 100 {
        findings.push(Finding::error(
            FIELD,
            format!("percentages must sum to 100, current sum is {}", total),
        ));
    }
}

/// Validates a report with the default rules.
pub fn validate_report(report: &Report) -> Vec<Finding> {
    ValidationRules::default().validate(report)
}

/// Findings for one file, including a failure to load it.
#[derive(Debug, Serialize)]
pub struct FileValidation {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

impl FileValidation {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    pub fn count(&self, level: FindingLevel) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }
}

/// Loads and validates one file. Load failures become error findings.
pub fn validate_file(path: &Path, rules: &ValidationRules) -> FileValidation {
    let findings = match load_report(path) {
        Ok(report) => rules.validate(&report),
        Err(e) => vec![load_finding(&e)],
    };

    FileValidation {
        path: path.to_path_buf(),
        findings,
    }
}

pub fn validate_files(paths: &[PathBuf], rules: &ValidationRules) -> Vec<FileValidation> {
    paths.iter().map(|p| validate_file(p, rules)).collect()
}

fn load_finding(error: &LoadError) -> Finding {
    match error {
        LoadError::Io { source, .. } => Finding::error("file", source.to_string()),
        LoadError::Yaml { message, .. } => {
            let field = match error.location() {
                Some((line, column)) => format!("line {}:{}", line, column),
                None => "document".to_string(),
            };
            Finding::error(field, message.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{person, report};
    use crate::loader::parse_report;
    use crate::models::WorkloadDistribution;
    use std::fs;

    const VALID: &str = include_str!("../../fixtures/ticket-1001.yml");
    const INVALID: &str = include_str!("../../fixtures/ticket-1003.yml");

    fn fields(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.field.as_str()).collect()
    }

    #[test]
    fn test_valid_report_has_no_findings() {
        let report = parse_report(VALID).unwrap();
        assert!(validate_report(&report).is_empty());
    }

    #[test]
    fn test_invalid_fixture() {
        let report = parse_report(INVALID).unwrap();
        let findings = validate_report(&report);

        assert_eq!(
            fields(&findings),
            vec![
                "consultants[0].affiliation",
                "workload_percentage_distribution",
                "request_types[0]",
                "end_date",
            ]
        );
        assert!(findings[1].message.contains("current sum is 90"));
        assert_eq!(findings[3].level, FindingLevel::Warning);
    }

    #[test]
    fn test_center_match_ignores_case() {
        let rules = ValidationRules::default();
        assert!(rules.is_known_center("kit"));
        assert!(rules.is_known_center("Hereon"));
        assert!(!rules.is_known_center("CERN"));

        let extended = ValidationRules::new(["KIT", "cern"]);
        assert!(extended.is_known_center("CERN"));
        assert!(!extended.is_known_center("DESY"));
    }

    #[test]
    fn test_missing_consultants_and_names() {
        let mut r = report(1, "2023-01-01", &["Licenses"], Vec::new());
        r.experts = vec![person("  ", "DESY")];

        let findings = validate_report(&r);
        assert_eq!(fields(&findings), vec!["consultants", "experts[0].name"]);
    }

    #[test]
    fn test_distribution_rules() {
        let mut r = report(1, "2023-01-01", &["Licenses"], vec![person("Ada", "KIT")]);
        r.workload_percentage_distribution = WorkloadDistribution {
            other: None,
            ..WorkloadDistribution::new(120, 0, 0, -20, 0, 0)
        };

        let findings = validate_report(&r);
        assert_eq!(
            fields(&findings),
            vec![
                "workload_percentage_distribution.other",
                "workload_percentage_distribution.communication",
                "workload_percentage_distribution.execution",
            ]
        );
    }

    #[test]
    fn test_ticket_and_workload_sign() {
        let mut r = report(0, "2023-01-01", &["licenses"], vec![person("Ada", "KIT")]);
        r.final_workload = -1.0;

        let findings = validate_report(&r);
        assert_eq!(fields(&findings), vec!["ticket_number", "final_workload"]);
        assert!(findings.iter().all(Finding::is_error));
    }

    #[test]
    fn test_validate_files_reports_parse_location() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yml");
        let bad = dir.path().join("bad.yml");
        fs::write(&good, VALID).unwrap();
        fs::write(&bad, "---\nzammad_ticket_number: [\n").unwrap();

        let results = validate_files(&[good, bad], &ValidationRules::default());
        assert!(!results[0].has_errors());
        assert!(results[1].has_errors());
        assert_eq!(results[1].count(FindingLevel::Error), 1);
        assert!(results[1].findings[0].field.starts_with("line "));
    }
}
