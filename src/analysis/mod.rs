//! Aggregation engine.
//!
//! Pure functions from a collection of reports to counts, distributions
//! and monthly series. Every function accepts any iterable of `&Report`,
//! so both loaded collections and filtered selections can be passed in.

pub mod aggregator;
pub mod classifier;
pub mod filter;
pub mod monthly;
pub mod summary;
pub mod workload;

pub use aggregator::*;
pub use classifier::{classify, PrincipalType, RequestType};
pub use filter::{filter_by_center, filter_by_year, Selection, ALL_CENTERS};
pub use monthly::{tickets_per_month, MonthCount, MonthlySeries, MONTH_NAMES};
pub use summary::{summarize, AnalysisSummary, SummaryOptions};
pub use workload::{
    workload_days, workload_distribution, workload_distribution_by_principal_type, WorkloadDays,
    WorkloadShare, WorkloadShares,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Person, Report, WorkloadDistribution};
    use chrono::NaiveDate;

    pub fn person(name: &str, affiliation: &str) -> Person {
        Person::new(name, affiliation)
    }

    /// A valid report opened and closed on `date`.
    pub fn report(ticket: i64, date: &str, request_types: &[&str], consultants: Vec<Person>) -> Report {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Report {
            ticket_number: ticket,
            start_date: date,
            end_date: date,
            consultants,
            experts: Vec::new(),
            clients: Vec::new(),
            estimated_workload: 1.0,
            final_workload: 1.0,
            workload_percentage_distribution: WorkloadDistribution::new(20, 10, 10, 50, 5, 5),
            tags: Vec::new(),
            used_technologies: Vec::new(),
            communication_platforms: Vec::new(),
            request_types: request_types.iter().map(|s| s.to_string()).collect(),
        }
    }
}
