//! End-to-end checks over the sample reports in `fixtures/`.

use chrono::Utc;
use cr_analysis::analysis::{
    count_affiliations, count_occurrences, count_principal_types, filter_by_year, summarize,
    tickets_per_month, workload_distribution, PrincipalType, Selection, SummaryOptions,
};
use cr_analysis::config::LintConfig;
use cr_analysis::lint::lint_file;
use cr_analysis::loader::load_reports;
use cr_analysis::models::WorkloadCategory;
use cr_analysis::report::{generate_markdown_report, AnalysisReport, ReportMetadata};
use cr_analysis::scanner::{FileScanner, ScanConfig};
use cr_analysis::validation::{validate_files, ValidationRules};
use cr_analysis::{CountMode, DateField, ListField, RoleField};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture_files() -> Vec<PathBuf> {
    FileScanner::new(fixtures(), ScanConfig::default())
        .scan()
        .unwrap()
}

#[test]
fn scan_finds_all_fixtures_in_order() {
    let names: Vec<String> = fixture_files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["ticket-1001.yml", "ticket-1002.yml", "ticket-1003.yml"]);
}

#[test]
fn validation_flags_only_the_broken_report() {
    let results = validate_files(&fixture_files(), &ValidationRules::default());

    let failing: Vec<_> = results.iter().filter(|r| r.has_errors()).collect();
    assert_eq!(failing.len(), 1);
    assert!(failing[0].path.ends_with("ticket-1003.yml"));
    assert!(failing[0]
        .findings
        .iter()
        .any(|f| f.message.contains("current sum is 90")));
}

#[test]
fn fixtures_pass_lint() {
    for path in fixture_files() {
        let result = lint_file(&path, &LintConfig::default()).unwrap();
        assert!(result.problems.is_empty(), "{:?}", result.problems);
    }
}

#[test]
fn aggregations_over_loaded_reports() {
    let outcome = load_reports(&fixture_files());
    assert!(outcome.is_clean());
    let reports = outcome.reports;
    assert_eq!(reports.len(), 3);

    let year = filter_by_year(&reports, DateField::EndDate, Some(2023));
    assert_eq!(year.len(), 3);

    let centers =
        count_affiliations(year.iter().copied(), RoleField::Consultants, None, CountMode::Absolute)
            .unwrap();
    assert_eq!(centers.count("KIT"), Some(1));
    assert_eq!(centers.count("DESY"), Some(1));

    let principal = count_principal_types(&reports, CountMode::Absolute).unwrap();
    assert_eq!(principal.count(&PrincipalType::Se), Some(1));
    assert_eq!(principal.count(&PrincipalType::Legal), Some(1));
    assert_eq!(principal.count(&PrincipalType::Prac), Some(2));

    let platforms =
        count_occurrences(&reports, ListField::CommunicationPlatforms, CountMode::Relative)
            .unwrap();
    assert!((platforms.sum() - 1.0).abs() < 1e-9);

    let months = tickets_per_month(&reports, DateField::StartDate);
    assert_eq!(months.count(3), Some(1));
    assert_eq!(months.count(5), Some(1));
    assert_eq!(months.count(6), Some(1));
    assert_eq!(months.total(), 3);

    let shares = workload_distribution(&reports[..2]).unwrap();
    let communication = shares.get(WorkloadCategory::Communication).unwrap();
    assert!((communication - 0.30).abs() < 1e-9);
}

#[test]
fn report_for_one_center() {
    let reports = load_reports(&fixture_files()[..2]).reports;
    let options = SummaryOptions {
        selection: Selection {
            year: Some(2023),
            date_field: DateField::EndDate,
            center: Some("DESY".to_string()),
        },
        mode: CountMode::Relative,
        month_field: DateField::StartDate,
    };

    let summary = summarize(&reports, &options).unwrap();
    assert_eq!(summary.tickets, 1);
    assert!(summary.consultant_affiliations.is_none());

    let metadata = ReportMetadata {
        reports_path: fixtures(),
        generated_at: Utc::now(),
        files_loaded: reports.len(),
    };
    let report = AnalysisReport::build(&reports, &options, metadata, false).unwrap();
    let markdown = generate_markdown_report(&report);

    assert!(markdown.contains("end_date in 2023, center DESY"));
    assert!(markdown.contains("| Licenses"));
    assert!(!markdown.contains("## Centers per Request Type"));
}
