//! cr-analysis - consultation report analysis
//!
//! Loads one YAML report per consultation ticket and computes affiliation,
//! request-type and principal-type counts, workload distributions and
//! monthly ticket series. Validation and lint checks guard the report
//! files themselves.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod loader;
pub mod models;
pub mod report;
pub mod scanner;
pub mod validation;

pub use error::{AnalysisError, LoadError};
pub use models::{CountMode, DateField, ListField, Person, Report, RoleField, WorkloadDistribution};
