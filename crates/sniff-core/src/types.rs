//! Diagnostic and result types.

use miette::{LabeledSpan, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::token::Token;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style issue that should be addressed.
    Warning,
    /// Style issue that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Error for a severity name that is neither `error` nor `warning`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`, expected `error` or `warning`")]
pub struct UnknownSeverity(pub String);

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Byte offset in the file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location covering `token`.
    #[must_use]
    pub fn of_token(file: PathBuf, token: &Token<'_>) -> Self {
        Self {
            file,
            line: token.line,
            column: token.column,
            offset: token.offset,
            length: token.len(),
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A human-readable hint on how to resolve a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A style issue found by a rule.
///
/// The location is flattened when serialized, so `line`, `column`,
/// `message` and `severity` are top-level fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "SN001").
    pub code: String,
    /// Rule name (e.g., "use-elseif").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary location.
    #[serde(flatten)]
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional hint for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this diagnostic.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }

    /// Attaches the file contents so the diagnostic can be rendered by
    /// `miette` with source snippets.
    #[must_use]
    pub fn to_report(&self, source: &str) -> SourceReport {
        let mut labels = vec![LabeledSpan::new_primary_with_span(
            Some(self.rule.clone()),
            SourceSpan::from((self.location.offset, self.location.length)),
        )];
        labels.extend(self.labels.iter().map(|label| {
            LabeledSpan::new_with_span(
                Some(label.message.clone()),
                SourceSpan::from((label.location.offset, label.location.length)),
            )
        }));
        SourceReport {
            message: format!("[{}] {}", self.code, self.message),
            severity: self.severity,
            help: self.suggestion.as_ref().map(|s| s.message.clone()),
            labels,
            code_source: NamedSource::new(
                self.location.file.display().to_string(),
                source.to_string(),
            ),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A [`Diagnostic`] paired with its source text, renderable by `miette`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceReport {
    message: String,
    severity: Severity,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    code_source: NamedSource<String>,
}

impl miette::Diagnostic for SourceReport {
    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Warning => miette::Severity::Warning,
            Severity::Error => miette::Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.code_source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.labels.iter().cloned()))
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_diagnostics_at(Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.has_diagnostics_at(Severity::Warning)
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Returns diagnostics filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        (errors, self.diagnostics.len() - errors)
    }

    /// Sorts diagnostics by file, line and column.
    ///
    /// Diagnostics at the same position keep their discovery order.
    pub fn sort_by_position(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(severity: Severity, line: usize) -> Diagnostic {
        Diagnostic::new(
            "SN001",
            "use-elseif",
            severity,
            Location::new(PathBuf::from("src/index.php"), line, 10),
            "Use elseif, not else if",
        )
    }

    #[test]
    fn severity_ordering_and_parsing() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("info".parse::<Severity>().is_err());
    }

    #[test]
    fn display_is_compact_one_liner() {
        let d = make_diagnostic(Severity::Error, 42);
        assert_eq!(
            d.to_string(),
            "src/index.php:42:10: error [SN001] Use elseif, not else if"
        );
    }

    #[test]
    fn format_includes_suggestion() {
        let d = make_diagnostic(Severity::Error, 1)
            .with_suggestion(Suggestion::new("Replace `else if` with `elseif`"));
        let formatted = d.format();
        assert!(formatted.starts_with("SN001 use-elseif at src/index.php:1:10"));
        assert!(formatted.contains("= help: Replace `else if` with `elseif`"));
    }

    #[test]
    fn format_omits_help_when_none() {
        let formatted = make_diagnostic(Severity::Warning, 1).format();
        assert!(formatted.contains("warning: Use elseif, not else if"));
        assert!(!formatted.contains("help:"));
    }

    #[test]
    fn report_carries_primary_and_secondary_labels() {
        use miette::Diagnostic as _;

        let d = make_diagnostic(Severity::Error, 1)
            .with_label(Label::new(
                Location::new(PathBuf::from("src/index.php"), 1, 1).with_span(0, 4),
                "`else` starts here",
            ))
            .with_suggestion(Suggestion::new("merge them"));
        let report = d.to_report("else if ($a) {}");
        assert_eq!(report.to_string(), "[SN001] Use elseif, not else if");
        assert_eq!(report.labels().map(Iterator::count), Some(2));
        assert_eq!(report.severity(), Some(miette::Severity::Error));
        assert!(report.help().is_some());
    }

    #[test]
    fn has_diagnostics_at_threshold() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Warning, 1));
        assert!(!result.has_errors());
        assert!(result.has_warnings());
        assert!(result.has_diagnostics_at(Severity::Warning));
        assert_eq!(result.count_by_severity(), (0, 1));
    }

    #[test]
    fn sort_by_position_is_stable() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Error, 9));
        result.diagnostics.push(make_diagnostic(Severity::Error, 2));
        result.diagnostics.push(make_diagnostic(Severity::Warning, 2));
        result.sort_by_position();
        let order: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| (d.location.line, d.severity))
            .collect();
        assert_eq!(
            order,
            vec![
                (2, Severity::Error),
                (2, Severity::Warning),
                (9, Severity::Error)
            ]
        );
    }

    #[test]
    fn extend_merges_counts() {
        let mut a = LintResult::new();
        a.files_checked = 2;
        let mut b = LintResult::new();
        b.files_checked = 3;
        b.diagnostics.push(make_diagnostic(Severity::Error, 1));
        a.extend(b);
        assert_eq!(a.files_checked, 5);
        assert_eq!(a.by_severity(Severity::Error).len(), 1);
    }
}
