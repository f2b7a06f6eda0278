//! Analysis report assembly and output.

pub mod console;
pub mod generator;

pub use console::{format_value, print_summary, render_table, summary_sections};
pub use generator::{generate_json_report, generate_markdown_report, write_report};

use crate::analysis::{
    affiliation_members, count_affiliations_for_request_type, summarize, AnalysisSummary,
    CountTable, SummaryOptions,
};
use crate::error::Result;
use crate::models::{Report, RoleField};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Where the analyzed reports came from.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub reports_path: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub files_loaded: usize,
}

/// Consultant centers of the tickets carrying one request type.
#[derive(Debug, Clone, Serialize)]
pub struct RequestTypeCenters {
    pub request_type: String,
    pub centers: CountTable<String>,
}

/// Everything written by the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub request_type_centers: Vec<RequestTypeCenters>,
    /// Distinct consultant and expert names per center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl AnalysisReport {
    /// Summarizes `records` and adds the per-center breakdowns.
    ///
    /// Center breakdowns are left out when a center filter is active.
    pub fn build(
        records: &[Report],
        options: &SummaryOptions,
        metadata: ReportMetadata,
        include_members: bool,
    ) -> Result<Self> {
        let summary = summarize(records, options)?;
        let per_center = options.selection.center().is_none();
        let selected = options.selection.apply(records);

        let mut request_type_centers = Vec::new();
        if per_center {
            if let Some(ref request_types) = summary.request_types {
                for (label, _) in request_types.counts() {
                    let centers = count_affiliations_for_request_type(
                        selected.iter().copied(),
                        label,
                        options.mode,
                    )?;
                    request_type_centers.push(RequestTypeCenters {
                        request_type: label.clone(),
                        centers,
                    });
                }
            }
        }

        let members = (per_center && include_members).then(|| {
            affiliation_members(
                selected.iter().copied(),
                RoleField::Consultants,
                Some(RoleField::Experts),
            )
        });

        Ok(Self {
            metadata,
            summary,
            request_type_centers,
            members,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::test_support::{person, report};
    use crate::analysis::Selection;
    use crate::models::{CountMode, DateField};

    pub fn metadata() -> ReportMetadata {
        ReportMetadata {
            reports_path: PathBuf::from("reports"),
            generated_at: Utc::now(),
            files_loaded: 2,
        }
    }

    pub fn sample() -> Vec<Report> {
        let mut a = report(1, "2023-02-01", &["Licenses"], vec![person("Ada", "KIT")]);
        a.experts = vec![person("Eve", "UFZ")];
        let b = report(2, "2023-03-01", &["Licenses", "Code audit"], vec![person("Bo", "DESY")]);
        vec![a, b]
    }

    pub fn options(center: Option<&str>) -> SummaryOptions {
        SummaryOptions {
            selection: Selection {
                year: Some(2023),
                date_field: DateField::EndDate,
                center: center.map(String::from),
            },
            mode: CountMode::Absolute,
            month_field: DateField::StartDate,
        }
    }

    #[test]
    fn test_build_with_center_breakdowns() {
        let reports = sample();
        let built = AnalysisReport::build(&reports, &options(None), metadata(), true).unwrap();

        assert_eq!(built.summary.tickets, 2);
        assert_eq!(built.request_type_centers[0].request_type, "Licenses");
        assert_eq!(built.request_type_centers[0].centers.total(), 2);
        assert_eq!(built.request_type_centers[1].centers.count("DESY"), Some(1));

        let members = built.members.unwrap();
        assert!(members["UFZ"].contains("Eve"));
        assert!(members["KIT"].contains("Ada"));
    }

    #[test]
    fn test_request_type_spellings_share_one_breakdown() {
        let reports = vec![
            report(1, "2023-02-01", &["Code audit"], vec![person("Ada", "KIT")]),
            report(2, "2023-03-01", &["Code Audit"], vec![person("Bo", "DESY")]),
        ];
        let built = AnalysisReport::build(&reports, &options(None), metadata(), false).unwrap();

        assert_eq!(built.request_type_centers.len(), 1);
        let breakdown = &built.request_type_centers[0];
        assert_eq!(breakdown.request_type, "Code audit");
        assert_eq!(breakdown.centers.total(), 2);
        assert_eq!(breakdown.centers.count("KIT"), Some(1));
        assert_eq!(breakdown.centers.count("DESY"), Some(1));
    }

    #[test]
    fn test_build_with_center_filter() {
        let reports = sample();
        let built = AnalysisReport::build(&reports, &options(Some("KIT")), metadata(), true).unwrap();

        assert_eq!(built.summary.tickets, 1);
        assert!(built.request_type_centers.is_empty());
        assert!(built.members.is_none());
    }
}
