//! Year and center filters over a report collection.

use crate::models::{DateField, Report};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Center value that disables center filtering.
pub const ALL_CENTERS: &str = "all";

/// Keeps the reports whose `field` falls in `year`; `None` keeps everything.
pub fn filter_by_year<'a, I>(records: I, field: DateField, year: Option<i32>) -> Vec<&'a Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    match year {
        Some(year) => records
            .into_iter()
            .filter(|r| r.date(field).year() == year)
            .collect(),
        None => records.into_iter().collect(),
    }
}

/// Keeps the reports whose first consultant belongs to `center`.
///
/// `None` and `"all"` keep everything. Reports without consultants are
/// dropped while a center is set.
pub fn filter_by_center<'a, I>(records: I, center: Option<&str>) -> Vec<&'a Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    match center.filter(|c| !c.eq_ignore_ascii_case(ALL_CENTERS)) {
        Some(center) => records
            .into_iter()
            .filter(|r| r.lead_affiliation() == Some(center))
            .collect(),
        None => records.into_iter().collect(),
    }
}

/// Year/center restriction applied before aggregating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub year: Option<i32>,
    pub date_field: DateField,
    pub center: Option<String>,
}

impl Selection {
    /// The active center, if any.
    pub fn center(&self) -> Option<&str> {
        self.center
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case(ALL_CENTERS))
    }

    /// Applies the year filter, then the center filter.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Report>
    where
        I: IntoIterator<Item = &'a Report>,
    {
        let by_year = filter_by_year(records, self.date_field, self.year);
        let selected = filter_by_center(by_year, self.center());
        debug!("Selected {} reports ({})", selected.len(), self);
        selected
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} in {}", self.date_field, year)?,
            None => write!(f, "all years")?,
        }
        write!(f, ", center {}", self.center().unwrap_or(ALL_CENTERS))
    }
}
