//! One-call bundle of every aggregation for a selection.

use crate::analysis::aggregator::{count_affiliations, count_occurrences, count_principal_types, CountTable};
use crate::analysis::classifier::PrincipalType;
use crate::analysis::filter::Selection;
use crate::analysis::monthly::{tickets_per_month, MonthlySeries};
use crate::analysis::workload::{
    workload_days, workload_distribution, workload_distribution_by_principal_type, WorkloadDays,
    WorkloadShares,
};
use crate::error::{AnalysisError, Result};
use crate::models::{CountMode, DateField, ListField, Report, RoleField};
use serde::Serialize;
use tracing::debug;

/// Parameters of [`summarize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryOptions {
    pub selection: Selection,
    pub mode: CountMode,
    /// Date field the monthly series is bucketed on.
    pub month_field: DateField,
}

/// Every aggregation computed over one selection of reports.
///
/// Tables that cannot be computed for the selection (relative counts of
/// nothing, means over zero reports) are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub options: SummaryOptions,
    pub tickets: usize,
    /// Only present when no center filter is active.
    pub consultant_affiliations: Option<CountTable<String>>,
    pub expert_affiliations: Option<CountTable<String>>,
    pub client_affiliations: Option<CountTable<String>>,
    pub overall_affiliations: Option<CountTable<String>>,
    pub request_types: Option<CountTable<String>>,
    pub principal_types: Option<CountTable<PrincipalType>>,
    pub tags: Option<CountTable<String>>,
    pub used_technologies: Option<CountTable<String>>,
    pub communication_platforms: Option<CountTable<String>>,
    pub workload_distribution: Option<WorkloadShares>,
    pub workload_by_principal_type: Vec<(PrincipalType, Option<WorkloadShares>)>,
    pub workload_days: Option<WorkloadDays>,
    pub tickets_per_month: MonthlySeries,
}

/// Turns an empty-selection error into `None`, keeping every other error.
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalysisError::EmptyInput { operation }) => {
            debug!("Skipping {}: empty selection", operation);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Filters `records` with `options.selection` and runs every aggregation.
pub fn summarize(records: &[Report], options: &SummaryOptions) -> Result<AnalysisSummary> {
    let selected = options.selection.apply(records);
    let mode = options.mode;
    let iter = || selected.iter().copied();

    let affiliations = |role, extra| -> Result<Option<CountTable<String>>> {
        if options.selection.center().is_some() {
            return Ok(None);
        }
        optional(count_affiliations(iter(), role, extra, mode))
    };
    let occurrences = |field| optional(count_occurrences(iter(), field, mode));

    Ok(AnalysisSummary {
        options: options.clone(),
        tickets: selected.len(),
        consultant_affiliations: affiliations(RoleField::Consultants, None)?,
        expert_affiliations: affiliations(RoleField::Experts, None)?,
        client_affiliations: affiliations(RoleField::Clients, None)?,
        overall_affiliations: affiliations(RoleField::Consultants, Some(RoleField::Experts))?,
        request_types: occurrences(ListField::RequestTypes)?,
        principal_types: optional(count_principal_types(iter(), mode))?,
        tags: occurrences(ListField::Tags)?,
        used_technologies: occurrences(ListField::UsedTechnologies)?,
        communication_platforms: occurrences(ListField::CommunicationPlatforms)?,
        workload_distribution: optional(workload_distribution(iter()))?,
        workload_by_principal_type: workload_distribution_by_principal_type(iter())?,
        workload_days: optional(workload_days(iter()))?,
        tickets_per_month: tickets_per_month(iter(), options.month_field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{person, report};
    use crate::models::WorkloadCategory;

    fn sample() -> Vec<Report> {
        let mut a = report(1, "2023-02-01", &["Qualification"], vec![person("Ada", "KIT")]);
        a.experts = vec![person("Eve", "UFZ")];
        a.clients = vec![person("Cal", "GEOMAR")];
        a.tags = vec!["python".into()];
        let b = report(2, "2023-03-01", &["Licenses", "Patent"], vec![person("Ada", "KIT")]);
        let c = report(3, "2023-03-15", &["Code audit"], vec![person("Bo", "DESY")]);
        let old = report(4, "2021-03-15", &["Code audit"], vec![person("Bo", "DESY")]);
        vec![a, b, c, old]
    }

    fn options(year: Option<i32>, center: Option<&str>, mode: CountMode) -> SummaryOptions {
        SummaryOptions {
            selection: Selection {
                year,
                date_field: DateField::EndDate,
                center: center.map(String::from),
            },
            mode,
            month_field: DateField::StartDate,
        }
    }

    #[test]
    fn test_summary_for_year() {
        let reports = sample();
        let summary = summarize(&reports, &options(Some(2023), None, CountMode::Absolute)).unwrap();

        assert_eq!(summary.tickets, 3);
        let consultants = summary.consultant_affiliations.unwrap();
        assert_eq!(consultants.count("KIT"), Some(2));
        assert_eq!(consultants.count("DESY"), Some(1));

        let overall = summary.overall_affiliations.unwrap();
        assert_eq!(overall.count("UFZ"), Some(1));
        assert_eq!(overall.total(), 4);
        assert_eq!(overall.count("GEOMAR"), None);

        let clients = summary.client_affiliations.unwrap();
        assert_eq!(clients.count("GEOMAR"), Some(1));
        assert_eq!(clients.total(), 1);

        let principal = summary.principal_types.unwrap();
        assert_eq!(principal.count(&PrincipalType::Legal), Some(1));
        assert_eq!(summary.tickets_per_month.count(3), Some(2));
        assert_eq!(summary.tickets_per_month.total(), 3);
        assert!(summary.workload_days.is_some());
    }

    #[test]
    fn test_summary_with_center_skips_affiliations() {
        let reports = sample();
        let summary =
            summarize(&reports, &options(Some(2023), Some("KIT"), CountMode::Relative)).unwrap();

        assert_eq!(summary.tickets, 2);
        assert!(summary.consultant_affiliations.is_none());
        assert!(summary.client_affiliations.is_none());
        assert!(summary.overall_affiliations.is_none());
        let principal = summary.principal_types.unwrap();
        assert!((principal.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_tables_without_labels_are_skipped() {
        let reports = sample();
        let summary = summarize(&reports, &options(Some(2023), Some("DESY"), CountMode::Relative)).unwrap();

        assert_eq!(summary.tickets, 1);
        assert!(summary.tags.is_none());
        assert!(summary.request_types.is_some());
    }

    #[test]
    fn test_empty_selection() {
        let reports = sample();
        let summary = summarize(&reports, &options(Some(1999), None, CountMode::Relative)).unwrap();

        assert_eq!(summary.tickets, 0);
        assert!(summary.principal_types.is_none());
        assert!(summary.workload_distribution.is_none());
        assert!(summary.workload_days.is_none());
        assert_eq!(summary.tickets_per_month.total(), 0);
    }

    #[test]
    fn test_report_without_request_types_fails_the_summary() {
        let mut reports = sample();
        reports[1].request_types.clear();

        let result = summarize(&reports, &options(Some(2023), None, CountMode::Relative));
        assert_eq!(
            result.unwrap_err(),
            AnalysisError::InvalidRecord {
                ticket: 2,
                reason: "no request types"
            }
        );

        // Outside the selection it is never looked at.
        assert!(summarize(&reports, &options(Some(2023), Some("DESY"), CountMode::Relative)).is_ok());
    }

    #[test]
    fn test_summary_serializes() {
        let reports = sample();
        let summary = summarize(&reports, &options(None, None, CountMode::Absolute)).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["tickets"], 4);
        assert_eq!(json["options"]["mode"], "absolute");
        assert_eq!(json["tickets_per_month"]["months"][2]["month"], "March");
        assert_eq!(json["principal_types"]["entries"][0]["label"], "SE");
        assert!(summary
            .workload_distribution
            .as_ref()
            .and_then(|w| w.get(WorkloadCategory::Execution))
            .is_some());
    }
}
