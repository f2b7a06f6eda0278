//! YAML report loading.

use crate::error::LoadError;
use crate::models::Report;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parses one YAML document into a report.
pub fn parse_report(source: &str) -> Result<Report, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

/// Reads and parses the report stored at `path`.
pub fn load_report(path: &Path) -> Result<Report, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_report(&source).map_err(|e| {
        let location = e.location();
        LoadError::Yaml {
            path: path.to_path_buf(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: e.to_string(),
        }
    })
}

/// Reports loaded from a set of files, plus the files that failed.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub reports: Vec<Report>,
    pub failures: Vec<LoadError>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads every file in `paths`, collecting failures instead of stopping.
pub fn load_reports(paths: &[PathBuf]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for path in paths {
        match load_report(path) {
            Ok(report) => {
                debug!("Loaded ticket {} from {}", report.ticket_number, path.display());
                outcome.reports.push(report);
            }
            Err(e) => {
                warn!("{}", e);
                outcome.failures.push(e);
            }
        }
    }

    outcome
}
