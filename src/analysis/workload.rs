//! Workload statistics.

use crate::analysis::aggregator::with_request_types;
use crate::analysis::classifier::{classify, PrincipalType};
use crate::error::{AnalysisError, Result};
use crate::models::{Report, WorkloadCategory};
use serde::Serialize;

/// Mean share of one workload category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadShare {
    pub category: WorkloadCategory,
    /// Mean fraction in `[0, 1]`; `None` when no report recorded the category.
    pub share: Option<f64>,
    /// Number of reports that contributed to the mean.
    pub reports: usize,
}

impl WorkloadShare {
    /// Mean as a percentage, rounded to one decimal.
    pub fn percent(&self) -> Option<f64> {
        self.share.map(|s| (s * 1000.0).round() / 10.0)
    }
}

/// Mean workload distribution over a selection of reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadShares {
    /// Number of reports in the selection.
    pub reports: usize,
    pub shares: Vec<WorkloadShare>,
}

impl WorkloadShares {
    /// Mean fraction for `category`.
    pub fn get(&self, category: WorkloadCategory) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.category == category)
            .and_then(|s| s.share)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkloadShare> {
        self.shares.iter()
    }
}

/// Averages each workload sub-field over `records`.
///
/// A report missing a sub-field is left out of that sub-field's mean only.
/// Fails with [`AnalysisError::EmptyInput`] when `records` is empty.
pub fn workload_distribution<'a, I>(records: I) -> Result<WorkloadShares>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut sums = [0i64; 6];
    let mut counts = [0usize; 6];
    let mut reports = 0usize;

    for report in records {
        reports += 1;
        let dist = &report.workload_percentage_distribution;
        for (i, category) in WorkloadCategory::ALL.iter().enumerate() {
            if let Some(value) = dist.get(*category) {
                sums[i] += value;
                counts[i] += 1;
            }
        }
    }

    if reports == 0 {
        return Err(AnalysisError::EmptyInput {
            operation: "workload distribution",
        });
    }

    let shares = WorkloadCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| WorkloadShare {
            category: *category,
            share: (counts[i] > 0).then(|| sums[i] as f64 / counts[i] as f64 / 100.0),
            reports: counts[i],
        })
        .collect();

    Ok(WorkloadShares { reports, shares })
}

/// Workload distribution per principal category.
///
/// A report is attributed to the category of its first request type.
/// Categories without reports map to `None`. A report without request
/// types fails with [`AnalysisError::InvalidRecord`].
pub fn workload_distribution_by_principal_type<'a, I>(
    records: I,
) -> Result<Vec<(PrincipalType, Option<WorkloadShares>)>>
where
    I: IntoIterator<Item = &'a Report>,
{
    let records = with_request_types(records)?;

    Ok(PrincipalType::ALL
        .iter()
        .map(|principal| {
            let group = records.iter().copied().filter(|report| {
                report
                    .request_types
                    .first()
                    .map(|label| classify(label) == *principal)
                    .unwrap_or(false)
            });
            (*principal, workload_distribution(group).ok())
        })
        .collect())
}

/// Booked effort per ticket, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadDays {
    pub tickets: usize,
    pub mean: f64,
    pub median: f64,
}

/// Mean and median `final_workload` over `records`.
pub fn workload_days<'a, I>(records: I) -> Result<WorkloadDays>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut values: Vec<f64> = records.into_iter().map(|r| r.final_workload).collect();
    if values.is_empty() {
        return Err(AnalysisError::EmptyInput {
            operation: "workload days",
        });
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    };

    Ok(WorkloadDays {
        tickets: values.len(),
        mean,
        median,
    })
}
