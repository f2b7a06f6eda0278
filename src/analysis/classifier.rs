//! Request-type catalogs and their principal categories.
//!
//! Every request-type label belongs to exactly one of three catalogs
//! (software engineering, legal, practical support). Labels outside all
//! catalogs are counted as practical support.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Coarse grouping of the request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrincipalType {
    #[serde(rename = "SE")]
    Se,
    #[serde(rename = "LEGAL")]
    Legal,
    #[serde(rename = "PRAC")]
    Prac,
}

impl PrincipalType {
    /// All categories in display order.
    pub const ALL: [PrincipalType; 3] = [PrincipalType::Se, PrincipalType::Legal, PrincipalType::Prac];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalType::Se => "SE",
            PrincipalType::Legal => "LEGAL",
            PrincipalType::Prac => "PRAC",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained request type of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Qualification,
    RequirementsManagement,
    SoftwareArchitecture,
    ChangeManagement,
    DesignAndImplementation,
    SoftwareTest,
    ReleaseManagement,
    AutomationAndDependencyManagement,
    Licenses,
    OpenSource,
    Patent,
    ContractSuggestions,
    LanguageMigration,
    CodeAudit,
    ToolRecommendations,
    InfrastructureSupport,
}

impl RequestType {
    pub const ALL: [RequestType; 16] = [
        RequestType::Qualification,
        RequestType::RequirementsManagement,
        RequestType::SoftwareArchitecture,
        RequestType::ChangeManagement,
        RequestType::DesignAndImplementation,
        RequestType::SoftwareTest,
        RequestType::ReleaseManagement,
        RequestType::AutomationAndDependencyManagement,
        RequestType::Licenses,
        RequestType::OpenSource,
        RequestType::Patent,
        RequestType::ContractSuggestions,
        RequestType::LanguageMigration,
        RequestType::CodeAudit,
        RequestType::ToolRecommendations,
        RequestType::InfrastructureSupport,
    ];

    /// Catalog label as written in reports.
    pub fn label(&self) -> &'static str {
        match self {
            RequestType::Qualification => "Qualification",
            RequestType::RequirementsManagement => "Requirements Management",
            RequestType::SoftwareArchitecture => "Software Architecture",
            RequestType::ChangeManagement => "Change Management",
            RequestType::DesignAndImplementation => "Design and Implementation",
            RequestType::SoftwareTest => "Software Test",
            RequestType::ReleaseManagement => "Release Management",
            RequestType::AutomationAndDependencyManagement => {
                "Automation and Dependency Management"
            }
            RequestType::Licenses => "Licenses",
            RequestType::OpenSource => "Open Source",
            RequestType::Patent => "Patent",
            RequestType::ContractSuggestions => "Contract Suggestions",
            RequestType::LanguageMigration => "Software or programming language migration",
            RequestType::CodeAudit => "Code audit",
            RequestType::ToolRecommendations => "Technology and Tool recommendations",
            RequestType::InfrastructureSupport => "Infrastructure support",
        }
    }

    /// Principal category of this request type.
    pub fn category(&self) -> PrincipalType {
        match self {
            RequestType::Qualification
            | RequestType::RequirementsManagement
            | RequestType::SoftwareArchitecture
            | RequestType::ChangeManagement
            | RequestType::DesignAndImplementation
            | RequestType::SoftwareTest
            | RequestType::ReleaseManagement
            | RequestType::AutomationAndDependencyManagement => PrincipalType::Se,
            RequestType::Licenses
            | RequestType::OpenSource
            | RequestType::Patent
            | RequestType::ContractSuggestions => PrincipalType::Legal,
            RequestType::LanguageMigration
            | RequestType::CodeAudit
            | RequestType::ToolRecommendations
            | RequestType::InfrastructureSupport => PrincipalType::Prac,
        }
    }

    /// Looks up a label in the catalogs, ignoring ASCII case.
    ///
    /// The report entry form capitalizes some labels differently from the
    /// catalogs ("Code Audit", "Contract suggestions"), so case is not
    /// significant here.
    pub fn from_label(label: &str) -> Option<Self> {
        RequestType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a request-type label to its principal category.
///
/// Labels outside every catalog fall back to [`PrincipalType::Prac`].
pub fn classify(label: &str) -> PrincipalType {
    match RequestType::from_label(label) {
        Some(request_type) => request_type.category(),
        None => {
            debug!("Unclassified request type '{}' counted as PRAC", label);
            PrincipalType::Prac
        }
    }
}
