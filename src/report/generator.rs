//! Markdown and JSON report generation.
//!
//! This module renders an [`AnalysisReport`] as a Markdown document with
//! one table per aggregation, or as pretty-printed JSON.

use super::console::{count_rows, render_table, summary_sections};
use super::{AnalysisReport, ReportMetadata, RequestTypeCenters};
use crate::analysis::AnalysisSummary;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Consultation Report Analysis\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, &report.summary));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_request_type_section(&report.request_type_centers));

    if let Some(ref members) = report.members {
        output.push_str(&generate_members_section(members));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, summary: &AnalysisSummary) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Reports:** `{}`\n",
        metadata.reports_path.display()
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Files Loaded:** {}\n", metadata.files_loaded));
    section.push_str(&format!("- **Selection:** {}\n", summary.options.selection));
    section.push_str(&format!("- **Count Mode:** {}\n", summary.options.mode));
    section.push_str(&format!("- **Tickets:** {}\n", summary.tickets));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &AnalysisSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    if summary.tickets == 0 {
        section.push_str("No tickets match the selection.\n\n");
    }

    for (title, table) in summary_sections(summary) {
        section.push_str(&format!("### {}\n\n{}\n\n", title, table));
    }

    section
}

fn generate_request_type_section(breakdowns: &[RequestTypeCenters]) -> String {
    if breakdowns.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Centers per Request Type\n\n");

    for breakdown in breakdowns {
        section.push_str(&format!(
            "### {}\n\n{}\n\n",
            breakdown.request_type,
            render_table(count_rows(&breakdown.centers))
        ));
    }

    section
}

fn generate_members_section(members: &BTreeMap<String, BTreeSet<String>>) -> String {
    let mut section = String::new();
    section.push_str("## Center Members\n\n");

    for (center, names) in members {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        section.push_str(&format!("- **{}:** {}\n", center, names.join(", ")));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by cr-analysis v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the report in `format` and write it to `path`.
pub fn write_report(report: &AnalysisReport, format: OutputFormat, path: &Path) -> Result<()> {
    let content = match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Markdown => generate_markdown_report(report),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
