//! Report file discovery.
//!
//! Resolves a reports path to the YAML files it designates: a file is
//! taken as-is, a directory yields its matching entries.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for report scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (without dot)
    pub extensions: Vec<String>,
    /// Descend into sub-directories
    pub recursive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["yml".to_string(), "yaml".to_string()],
            recursive: false,
        }
    }
}

impl From<&crate::config::GeneralConfig> for ScanConfig {
    fn from(config: &crate::config::GeneralConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            recursive: config.recursive,
        }
    }
}

/// Scanner for report files below a root path.
pub struct FileScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl FileScanner {
    /// Create a new scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for all report files, sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(anyhow::anyhow!(
                "Reports path not found: {}",
                self.root.display()
            ));
        }

        // A single file is used whatever its extension.
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} report files in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|e| e == ext)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_directory_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden.yml"), "").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("c.yml"), "").unwrap();

        let scanner = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_scan_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2023")).unwrap();
        fs::write(dir.path().join("2023").join("c.yml"), "").unwrap();

        let config = ScanConfig {
            recursive: true,
            ..ScanConfig::default()
        };
        let files = FileScanner::new(dir.path().to_path_buf(), config).scan().unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_scan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.txt");
        fs::write(&path, "").unwrap();

        let files = FileScanner::new(path.clone(), ScanConfig::default()).scan().unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_scan_missing_path() {
        let scanner = FileScanner::new(PathBuf::from("/definitely/not/here"), ScanConfig::default());
        assert!(scanner.scan().is_err());
    }
}
