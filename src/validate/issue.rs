//! Validation issue types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest context snippet attached to an issue, in characters.
pub const MAX_CONTEXT_CHARS: usize = 50;

/// Issue severity.
///
/// Only [`Severity::Error`] makes a document invalid. Errors flag markup a
/// conforming parser would likely mis-render; they never block output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("ERROR"),
            Severity::Warning => f.write_str("WARNING"),
            Severity::Info => f.write_str("INFO"),
        }
    }
}

/// A single validator finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,

    /// 1-based line number
    pub line: usize,

    pub message: String,

    /// The offending line, trimmed and shortened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Issue {
    /// Create an issue without context.
    pub fn new(severity: Severity, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity,
            line,
            message: message.into(),
            context: None,
        }
    }

    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, line, message)
    }

    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line, message)
    }

    pub fn info(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, line, message)
    }

    /// Attach the offending line as context.
    pub fn with_context(mut self, line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.context = Some(trimmed.chars().take(MAX_CONTEXT_CHARS).collect());
        }
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Line {}: {}", self.severity, self.line, self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        Ok(())
    }
}

/// Outcome of validating a Markdown text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `false` iff at least one issue is an error
    pub valid: bool,

    /// Issues ordered by line
    pub issues: Vec<Issue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }
}

impl ValidationResult {
    /// Build a result; validity is derived from the issues.
    pub fn from_issues(mut issues: Vec<Issue>) -> Self {
        issues.sort_by_key(|issue| (issue.line, issue.severity));
        let valid = !issues.iter().any(|i| i.severity == Severity::Error);
        Self { valid, issues }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Issues of one severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    /// Human-readable report grouped by severity.
    pub fn report(&self) -> String {
        if self.issues.is_empty() {
            return "No validation issues found.".to_string();
        }

        let mut lines = vec!["Markdown validation issues:".to_string(), String::new()];
        for (severity, title) in [
            (Severity::Error, "Errors"),
            (Severity::Warning, "Warnings"),
            (Severity::Info, "Info"),
        ] {
            let group: Vec<&Issue> = self.with_severity(severity).collect();
            if group.is_empty() {
                continue;
            }
            lines.push(format!("{} ({}):", title, group.len()));
            lines.extend(group.iter().map(|issue| format!("  {}", issue)));
            lines.push(String::new());
        }
        lines.join("\n")
    }
}
