//! Diagnostics and metrics recorded during a pass

use std::fmt;

use serde::Serialize;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be reviewed
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single violation found by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Fully qualified code, e.g. `Symfony.Commenting.ClassComment.Missing`
    pub code: String,
    pub message: String,
    pub severity: Severity,
    /// Index of the token the diagnostic is anchored at
    pub anchor: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Whether the rule offers an automatic correction
    pub fixable: bool,
}

/// A named observation about the code, e.g. "Class has doc comment: yes"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub anchor: usize,
    pub name: String,
    pub value: String,
}

/// Collects diagnostics and metrics for one file
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    metrics: Vec<Metric>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn record_metric(&mut self, anchor: usize, name: impl Into<String>, value: impl Into<String>) {
        self.metrics.push(Metric {
            anchor,
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fixable).count()
    }

    /// Sort diagnostics by line, then column
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.column.cmp(&b.column)));
    }

    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<Metric>) {
        (self.diagnostics, self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(line: usize, severity: Severity, fixable: bool) -> Diagnostic {
        Diagnostic {
            code: "Test.Rule.Code".to_string(),
            message: "message".to_string(),
            severity,
            anchor: 0,
            line,
            column: 1,
            fixable,
        }
    }

    #[test]
    fn test_reporter_counts() {
        let mut reporter = Reporter::new();
        reporter.add(diagnostic(3, Severity::Error, true));
        reporter.add(diagnostic(1, Severity::Warning, false));
        reporter.record_metric(0, "Class has doc comment", "no");

        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.fixable_count(), 1);
        assert_eq!(reporter.metrics()[0].value, "no");

        reporter.sort();
        assert_eq!(reporter.diagnostics()[0].line, 1);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
