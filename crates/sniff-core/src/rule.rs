//! Rule trait for defining token-level checks.

use crate::sink::DiagnosticSink;
use crate::token::{TokenKind, TokenSequence};
use crate::types::Severity;

/// A token-level style rule ("sniff").
///
/// A rule declares which token kinds it wants to see and is called once per
/// occurrence, in document order. It receives the whole token sequence so it
/// can look around the current token with the navigator, and reports
/// findings to the sink.
///
/// Rules take `&self`: nothing carries over from one call to the next.
///
/// # Example
///
/// ```
/// use sniff_core::{DiagnosticSink, Rule, Search, TokenKind, TokenSequence};
///
/// pub struct NoEmptyStatement;
///
/// impl Rule for NoEmptyStatement {
///     fn name(&self) -> &'static str { "no-empty-statement" }
///     fn code(&self) -> &'static str { "EX001" }
///
///     fn interested_kinds(&self) -> &[TokenKind] {
///         &[TokenKind::Semicolon]
///     }
///
///     fn process(&self, tokens: &TokenSequence<'_>, index: usize, sink: &mut DiagnosticSink) {
///         let search = Search::none_of(&[TokenKind::Whitespace]);
///         if let Some(prev) = tokens.find_previous(index, &search) {
///             if tokens[prev].kind == TokenKind::Semicolon {
///                 sink.add_warning(self, &tokens[index], "Empty statement");
///             }
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "use-elseif").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SN001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns true if `key` names this rule: its exact name, or its code
    /// in any letter case.
    fn is_named(&self, key: &str) -> bool {
        self.name() == key || self.code().eq_ignore_ascii_case(key)
    }

    /// Token kinds this rule wants to be called for.
    fn interested_kinds(&self) -> &[TokenKind];

    /// Checks the token at `index`, whose kind is one of
    /// [`interested_kinds`](Self::interested_kinds).
    ///
    /// Must not panic for any valid `index` into `tokens`.
    fn process(&self, tokens: &TokenSequence<'_>, index: usize, sink: &mut DiagnosticSink);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
