//! Data models for consultation reports.
//!
//! This module contains the typed report record produced by the loader
//! and the field selectors the aggregation functions are parameterized by.

use crate::error::AnalysisError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A person taking part in a consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Full name as written in the report.
    pub name: String,
    /// Research-center identifier, e.g. `KIT` or `DESY`.
    pub affiliation: String,
}

impl Person {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
        }
    }
}

/// One of the six fixed workload sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadCategory {
    Communication,
    Preparation,
    Teaching,
    Execution,
    Decision,
    Other,
}

impl WorkloadCategory {
    /// All categories in report order.
    pub const ALL: [WorkloadCategory; 6] = [
        WorkloadCategory::Communication,
        WorkloadCategory::Preparation,
        WorkloadCategory::Teaching,
        WorkloadCategory::Execution,
        WorkloadCategory::Decision,
        WorkloadCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadCategory::Communication => "communication",
            WorkloadCategory::Preparation => "preparation",
            WorkloadCategory::Teaching => "teaching",
            WorkloadCategory::Execution => "execution",
            WorkloadCategory::Decision => "decision",
            WorkloadCategory::Other => "other",
        }
    }
}

impl fmt::Display for WorkloadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of the ticket's effort spent per workload category.
///
/// Sub-fields are optional at load time; the validator requires all six
/// and a total of 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadDistribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaching: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<i64>,
}

impl WorkloadDistribution {
    /// Creates a fully populated distribution.
    pub fn new(
        communication: i64,
        preparation: i64,
        teaching: i64,
        execution: i64,
        decision: i64,
        other: i64,
    ) -> Self {
        Self {
            communication: Some(communication),
            preparation: Some(preparation),
            teaching: Some(teaching),
            execution: Some(execution),
            decision: Some(decision),
            other: Some(other),
        }
    }

    /// Returns the percentage recorded for `category`, if present.
    pub fn get(&self, category: WorkloadCategory) -> Option<i64> {
        match category {
            WorkloadCategory::Communication => self.communication,
            WorkloadCategory::Preparation => self.preparation,
            WorkloadCategory::Teaching => self.teaching,
            WorkloadCategory::Execution => self.execution,
            WorkloadCategory::Decision => self.decision,
            WorkloadCategory::Other => self.other,
        }
    }

    /// Sum of the present sub-fields.
    pub fn total(&self) -> i64 {
        WorkloadCategory::ALL
            .iter()
            .filter_map(|c| self.get(*c))
            .sum()
    }

    /// Categories without a recorded value.
    pub fn missing(&self) -> Vec<WorkloadCategory> {
        WorkloadCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_none())
            .collect()
    }
}

/// One consulting engagement, as stored in a single YAML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Help-desk ticket identifier.
    #[serde(alias = "zammad_ticket_number")]
    pub ticket_number: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub consultants: Vec<Person>,
    #[serde(default)]
    pub experts: Vec<Person>,
    #[serde(default)]
    pub clients: Vec<Person>,
    /// Estimated effort in days.
    pub estimated_workload: f64,
    /// Booked effort in days.
    pub final_workload: f64,
    pub workload_percentage_distribution: WorkloadDistribution,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub used_technologies: Vec<String>,
    #[serde(default)]
    pub communication_platforms: Vec<String>,
    #[serde(default)]
    pub request_types: Vec<String>,
}

impl Report {
    /// Returns the date stored in `field`.
    pub fn date(&self, field: DateField) -> NaiveDate {
        match field {
            DateField::StartDate => self.start_date,
            DateField::EndDate => self.end_date,
        }
    }

    /// Returns the persons listed under `role`.
    pub fn persons(&self, role: RoleField) -> &[Person] {
        match role {
            RoleField::Consultants => &self.consultants,
            RoleField::Experts => &self.experts,
            RoleField::Clients => &self.clients,
        }
    }

    /// Returns the labels stored in the list-valued `field`.
    pub fn labels(&self, field: ListField) -> &[String] {
        match field {
            ListField::Tags => &self.tags,
            ListField::UsedTechnologies => &self.used_technologies,
            ListField::CommunicationPlatforms => &self.communication_platforms,
            ListField::RequestTypes => &self.request_types,
        }
    }

    /// Affiliation of the first consultant, which owns the ticket.
    pub fn lead_affiliation(&self) -> Option<&str> {
        self.consultants.first().map(|p| p.affiliation.as_str())
    }
}

/// Date field used for year filtering and monthly bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    StartDate,
    #[default]
    EndDate,
}

impl DateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::StartDate => "start_date",
            DateField::EndDate => "end_date",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateField {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_date" | "start" => Ok(DateField::StartDate),
            "end_date" | "end" => Ok(DateField::EndDate),
            other => Err(AnalysisError::InvalidField(other.to_string())),
        }
    }
}

/// Person-list fields of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleField {
    Consultants,
    Experts,
    Clients,
}

impl RoleField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleField::Consultants => "consultants",
            RoleField::Experts => "experts",
            RoleField::Clients => "clients",
        }
    }
}

impl fmt::Display for RoleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label-list fields of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Tags,
    UsedTechnologies,
    CommunicationPlatforms,
    RequestTypes,
}

impl ListField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListField::Tags => "tags",
            ListField::UsedTechnologies => "used_technologies",
            ListField::CommunicationPlatforms => "communication_platforms",
            ListField::RequestTypes => "request_types",
        }
    }
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether counts are reported raw or normalized to fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    Absolute,
    #[default]
    Relative,
}

impl fmt::Display for CountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountMode::Absolute => write!(f, "absolute"),
            CountMode::Relative => write!(f, "relative"),
        }
    }
}

impl FromStr for CountMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(CountMode::Absolute),
            "relative" => Ok(CountMode::Relative),
            other => Err(AnalysisError::InvalidMode(other.to_string())),
        }
    }
}
