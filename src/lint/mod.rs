//! YAML formatting checks for report files.
//!
//! A line-based linter covering the formatting rules report authors are
//! expected to follow. It never parses YAML beyond top-level keys, so it
//! also runs on files the loader rejects.

use crate::config::LintConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One formatting problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintProblem {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// Rule identifier, e.g. `trailing-spaces`.
    pub rule: &'static str,
    pub message: String,
}

impl LintProblem {
    fn new(line: usize, column: usize, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for LintProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}  error  {}  ({})",
            self.line, self.column, self.message, self.rule
        )
    }
}

/// Lints `text`, returning problems ordered by position.
pub fn lint_source(text: &str, config: &LintConfig) -> Vec<LintProblem> {
    let lines: Vec<&str> = text.lines().collect();
    let mut problems = Vec::new();

    if config.require_document_start {
        check_document_start(&lines, &mut problems);
    }

    let mut seen_keys: HashMap<&str, usize> = HashMap::new();

    for (i, line) in lines.iter().enumerate() {
        let number = i + 1;

        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.len() < line.len() {
            problems.push(LintProblem::new(
                number,
                trimmed.chars().count() + 1,
                "trailing-spaces",
                "trailing spaces",
            ));
        }

        let length = line.chars().count();
        if length > config.max_line_length
            && !(config.allow_non_breakable_words && is_non_breakable(line))
        {
            problems.push(LintProblem::new(
                number,
                config.max_line_length + 1,
                "line-length",
                format!(
                    "line too long ({} > {} characters)",
                    length, config.max_line_length
                ),
            ));
        }

        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        if let Some(offset) = indent.find('\t') {
            problems.push(LintProblem::new(
                number,
                offset + 1,
                "indentation",
                "found tab character in indentation",
            ));
        }

        if is_document_marker(line) {
            seen_keys.clear();
        } else if let Some(key) = top_level_key(line) {
            if let Some(first) = seen_keys.get(key) {
                problems.push(LintProblem::new(
                    number,
                    1,
                    "key-duplicates",
                    format!("duplication of key \"{}\" in mapping (first on line {})", key, first),
                ));
            } else {
                seen_keys.insert(key, number);
            }
        }
    }

    check_empty_lines(&lines, config, &mut problems);

    if !text.is_empty() && !text.ends_with('\n') {
        let last = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        problems.push(LintProblem::new(
            lines.len().max(1),
            last + 1,
            "new-line-at-end-of-file",
            "no new line character at the end of file",
        ));
    }

    problems.sort_by_key(|p| (p.line, p.column));
    problems
}

fn check_document_start(lines: &[&str], problems: &mut Vec<LintProblem>) {
    let first = lines
        .iter()
        .enumerate()
        .find(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    if let Some((i, line)) = first {
        if !is_document_marker(line) {
            problems.push(LintProblem::new(
                i + 1,
                1,
                "document-start",
                "missing document start \"---\"",
            ));
        }
    }
}

fn check_empty_lines(lines: &[&str], config: &LintConfig, problems: &mut Vec<LintProblem>) {
    let mut run = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            run += 1;
            continue;
        }
        if run > config.max_empty_lines {
            problems.push(LintProblem::new(
                i,
                1,
                "empty-lines",
                format!("too many blank lines ({} > {})", run, config.max_empty_lines),
            ));
        }
        run = 0;
    }

    if run > config.max_empty_lines_at_end {
        problems.push(LintProblem::new(
            lines.len(),
            1,
            "empty-lines",
            format!(
                "too many blank lines ({} > {})",
                run, config.max_empty_lines_at_end
            ),
        ));
    }
}

fn is_document_marker(line: &str) -> bool {
    line == "---" || line.starts_with("--- ")
}

/// A line consisting of one unbreakable word, optionally behind a list or
/// comment marker (long URLs and paths).
fn is_non_breakable(line: &str) -> bool {
    let content = line.trim_start();
    let content = content
        .strip_prefix("- ")
        .or_else(|| content.strip_prefix("# "))
        .unwrap_or(content);
    !content.trim().contains(char::is_whitespace)
}

/// Key of a top-level mapping entry (`key:` or `key: value` at column 1).
fn top_level_key(line: &str) -> Option<&str> {
    if line.starts_with([' ', '\t', '#', '-']) || line.starts_with("...") {
        return None;
    }

    let (key, rest) = line.split_once(':')?;
    if !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

/// Problems for one file.
#[derive(Debug, Serialize)]
pub struct FileLint {
    pub path: PathBuf,
    pub problems: Vec<LintProblem>,
}

/// Reads and lints the file at `path`.
pub fn lint_file(path: &Path, config: &LintConfig) -> std::io::Result<FileLint> {
    let text = std::fs::read_to_string(path)?;
    let problems = lint_source(&text, config);
    debug!("{}: {} lint problem(s)", path.display(), problems.len());

    Ok(FileLint {
        path: path.to_path_buf(),
        problems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID: &str = include_str!("../../fixtures/ticket-1001.yml");

    fn rules(problems: &[LintProblem]) -> Vec<&'static str> {
        problems.iter().map(|p| p.rule).collect()
    }

    #[test]
    fn test_fixture_is_clean() {
        let config = LintConfig {
            require_document_start: true,
            ..LintConfig::default()
        };
        assert_eq!(lint_source(VALID, &config), Vec::new());
    }

    #[test]
    fn test_trailing_spaces_and_final_newline() {
        let text = "---\nticket_number: 1 \ntags:\n  - python";
        let problems = lint_source(text, &LintConfig::default());

        assert_eq!(rules(&problems), vec!["trailing-spaces", "new-line-at-end-of-file"]);
        assert_eq!((problems[0].line, problems[0].column), (2, 17));
        assert_eq!((problems[1].line, problems[1].column), (4, 11));
    }

    #[test]
    fn test_document_start_is_optional() {
        let text = "# ticket\nticket_number: 1\n";
        assert!(lint_source(text, &LintConfig::default()).is_empty());

        let config = LintConfig {
            require_document_start: true,
            ..LintConfig::default()
        };
        let problems = lint_source(text, &config);
        assert_eq!(rules(&problems), vec!["document-start"]);
        assert_eq!(problems[0].line, 2);
    }

    #[test]
    fn test_line_length() {
        let long_value = format!("tags: [{}]\n", vec!["python"; 12].join(", "));
        let problems = lint_source(&long_value, &LintConfig::default());
        assert_eq!(rules(&problems), vec!["line-length"]);
        assert_eq!(problems[0].column, 81);

        let url = format!("  - https://example.org/{}\n", "a".repeat(90));
        assert!(lint_source(&url, &LintConfig::default()).is_empty());

        let strict = LintConfig {
            allow_non_breakable_words: false,
            ..LintConfig::default()
        };
        assert_eq!(rules(&lint_source(&url, &strict)), vec!["line-length"]);
    }

    #[test]
    fn test_empty_lines() {
        let text = "a: 1\n\n\n\nb: 2\n\n";
        let problems = lint_source(text, &LintConfig::default());

        assert_eq!(rules(&problems), vec!["empty-lines", "empty-lines"]);
        assert_eq!(problems[0].line, 4);
        assert!(problems[0].message.contains("3 > 2"));
        assert_eq!(problems[1].line, 6);
        assert!(problems[1].message.contains("1 > 0"));
    }

    #[test]
    fn test_tab_indentation() {
        let text = "tags:\n\t- python\n";
        let problems = lint_source(text, &LintConfig::default());
        assert_eq!(rules(&problems), vec!["indentation"]);
        assert_eq!(problems[0].column, 1);
    }

    #[test]
    fn test_duplicate_top_level_keys() {
        let text = "tags:\n  - a\nname: x\ntags: []\n---\ntags: []\n";
        let problems = lint_source(text, &LintConfig::default());

        assert_eq!(rules(&problems), vec!["key-duplicates"]);
        assert_eq!(problems[0].line, 4);
        assert!(problems[0].message.contains("first on line 1"));
    }

    #[test]
    fn test_lint_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.yml");
        fs::write(&path, "a: 1  \n").unwrap();

        let result = lint_file(&path, &LintConfig::default()).unwrap();
        assert_eq!(result.path, path);
        assert_eq!(rules(&result.problems), vec!["trailing-spaces"]);
        assert!(lint_file(&dir.path().join("missing.yml"), &LintConfig::default()).is_err());
    }
}
