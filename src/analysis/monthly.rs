//! Ticket volume per calendar month.

use crate::models::{DateField, Report};
use chrono::Datelike;
use serde::Serialize;

/// Month labels, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "March", "April", "May", "June", "July", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Ticket count of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: usize,
}

/// Twelve zero-filled monthly buckets, January to December.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    pub field: DateField,
    pub months: [MonthCount; 12],
}

impl MonthlySeries {
    fn empty(field: DateField) -> Self {
        Self {
            field,
            months: MONTH_NAMES.map(|month| MonthCount { month, count: 0 }),
        }
    }

    /// Count for `month` (1 = January).
    pub fn count(&self, month: u32) -> Option<usize> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).map(|m| m.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthCount> {
        self.months.iter()
    }

    /// Sum over all months.
    pub fn total(&self) -> usize {
        self.months.iter().map(|m| m.count).sum()
    }
}

/// Counts reports per calendar month of `field`.
pub fn tickets_per_month<'a, I>(records: I, field: DateField) -> MonthlySeries
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut series = MonthlySeries::empty(field);
    for report in records {
        // month0() is always in 0..12.
        let index = report.date(field).month0() as usize;
        series.months[index].count += 1;
    }
    series
}
