//! Per-file diagnostic accumulation.

use std::path::{Path, PathBuf};

use crate::rule::Rule;
use crate::token::Token;
use crate::types::{Diagnostic, Location, Severity};

/// Collects the diagnostics reported while checking one file.
///
/// Diagnostics keep the order in which they were reported. One sink is used
/// per file, so files can be checked on separate threads and merged later.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    file: PathBuf,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Creates an empty sink for `file`.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            diagnostics: Vec::new(),
        }
    }

    /// The file diagnostics are reported against.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Location of `token` in this sink's file.
    #[must_use]
    pub fn location(&self, token: &Token<'_>) -> Location {
        Location::of_token(self.file.clone(), token)
    }

    /// Builds a diagnostic for `rule` at `token` with the rule's default
    /// severity, without recording it.
    ///
    /// Use this to attach suggestions or labels before calling
    /// [`push`](Self::push).
    #[must_use]
    pub fn diagnostic(
        &self,
        rule: &dyn Rule,
        token: &Token<'_>,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            self.location(token),
            message,
        )
    }

    /// Records a finished diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Reports an error for `rule` at `token`.
    pub fn add_error(&mut self, rule: &dyn Rule, token: &Token<'_>, message: impl Into<String>) {
        self.add(rule, Severity::Error, token, message);
    }

    /// Reports a warning for `rule` at `token`.
    pub fn add_warning(&mut self, rule: &dyn Rule, token: &Token<'_>, message: impl Into<String>) {
        self.add(rule, Severity::Warning, token, message);
    }

    fn add(
        &mut self,
        rule: &dyn Rule,
        severity: Severity,
        token: &Token<'_>,
        message: impl Into<String>,
    ) {
        let mut diagnostic = self.diagnostic(rule, token, message);
        diagnostic.severity = severity;
        self.push(diagnostic);
    }

    /// Diagnostics reported so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consumes the sink, returning its diagnostics in report order.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
