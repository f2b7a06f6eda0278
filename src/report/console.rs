//! Console tables.
//!
//! Every aggregation of a summary is rendered as a Markdown-style table,
//! so the same text serves the terminal and the Markdown report.

use crate::analysis::{AnalysisSummary, CountTable, MonthlySeries, WorkloadDays, WorkloadShares};
use crate::models::CountMode;
use std::fmt;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Tabled)]
pub struct CountRow {
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct WorkloadRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Mean Share")]
    pub share: String,
    #[tabled(rename = "Reports")]
    pub reports: usize,
}

#[derive(Debug, Clone, Tabled)]
pub struct WorkloadDaysRow {
    #[tabled(rename = "Tickets")]
    pub tickets: usize,
    #[tabled(rename = "Mean (days)")]
    pub mean: String,
    #[tabled(rename = "Median (days)")]
    pub median: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct MonthRow {
    #[tabled(rename = "Month")]
    pub month: &'static str,
    #[tabled(rename = "Tickets")]
    pub tickets: usize,
}

/// Formats a table value: a percentage in relative mode, an integer otherwise.
pub fn format_value(value: f64, mode: CountMode) -> String {
    match mode {
        CountMode::Relative => format!("{:.1}%", value * 100.0),
        CountMode::Absolute => format!("{}", value.round() as i64),
    }
}

pub fn count_rows<K: Eq + fmt::Display>(table: &CountTable<K>) -> Vec<CountRow> {
    table
        .counts()
        .zip(table.iter())
        .map(|((label, count), (_, value))| CountRow {
            label: label.to_string(),
            count,
            value: format_value(value, table.mode()),
        })
        .collect()
}

pub fn workload_rows(shares: &WorkloadShares) -> Vec<WorkloadRow> {
    shares
        .iter()
        .map(|s| WorkloadRow {
            category: s.category.to_string(),
            share: s
                .percent()
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "n/a".to_string()),
            reports: s.reports,
        })
        .collect()
}

pub fn workload_days_rows(days: &WorkloadDays) -> Vec<WorkloadDaysRow> {
    vec![WorkloadDaysRow {
        tickets: days.tickets,
        mean: format!("{:.2}", days.mean),
        median: format!("{:.2}", days.median),
    }]
}

pub fn month_rows(series: &MonthlySeries) -> Vec<MonthRow> {
    series
        .iter()
        .map(|m| MonthRow {
            month: m.month,
            tickets: m.count,
        })
        .collect()
}

/// Renders rows as a Markdown table, or a placeholder when there are none.
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Titled tables of every aggregation present in `summary`, in display order.
pub fn summary_sections(summary: &AnalysisSummary) -> Vec<(String, String)> {
    let mut sections = Vec::new();

    let counts: [(&str, Option<&CountTable<String>>); 8] = [
        ("Consultant Centers", summary.consultant_affiliations.as_ref()),
        ("Expert Centers", summary.expert_affiliations.as_ref()),
        ("Client Centers", summary.client_affiliations.as_ref()),
        ("Overall Centers", summary.overall_affiliations.as_ref()),
        ("Request Types", summary.request_types.as_ref()),
        ("Tags", summary.tags.as_ref()),
        ("Used Technologies", summary.used_technologies.as_ref()),
        ("Communication Platforms", summary.communication_platforms.as_ref()),
    ];

    for (title, table) in counts {
        if let Some(table) = table {
            sections.push((title.to_string(), render_table(count_rows(table))));
        }
        // Principal types follow the request types they are derived from.
        if title == "Request Types" {
            if let Some(ref principal) = summary.principal_types {
                sections.push(("Principal Types".to_string(), render_table(count_rows(principal))));
            }
        }
    }

    if let Some(ref shares) = summary.workload_distribution {
        sections.push((
            "Workload Distribution".to_string(),
            render_table(workload_rows(shares)),
        ));
    }

    for (principal, shares) in &summary.workload_by_principal_type {
        if let Some(shares) = shares {
            sections.push((
                format!("Workload Distribution ({})", principal),
                render_table(workload_rows(shares)),
            ));
        }
    }

    if let Some(ref days) = summary.workload_days {
        sections.push(("Workload Days".to_string(), render_table(workload_days_rows(days))));
    }

    sections.push((
        format!("Tickets per Month ({})", summary.tickets_per_month.field),
        render_table(month_rows(&summary.tickets_per_month)),
    ));

    sections
}

/// Prints the summary to stdout.
pub fn print_summary(summary: &AnalysisSummary) {
    println!(
        "\n📊 {} tickets ({}, mode {})",
        summary.tickets, summary.options.selection, summary.options.mode
    );

    for (title, table) in summary_sections(summary) {
        println!("\n{}\n", title);
        println!("{}", table);
    }
    println!();
}
