//! Rule to require `elseif` instead of `else if`.
//!
//! # Rationale
//!
//! `else if` opens a new nested `if` inside the `else` branch, while
//! `elseif` continues the same conditional chain. Using one spelling
//! throughout keeps conditional chains uniform.
//!
//! # Detected Patterns
//!
//! - `else if (...)`, with any amount of whitespace (spaces, tabs, line
//!   breaks) between the two keywords
//! - Any letter case: `ELSE IF`, `Else If`
//!
//! # Not Detected
//!
//! - `elseif`
//! - `else /* comment */ if`: only whitespace may separate the keywords
//! - `else` followed by an identifier starting with `if` (`ifReady()`)
//! - Text inside strings, comments, heredocs or inline HTML

use sniff_core::{
    DiagnosticSink, Label, Rule, Search, Severity, Suggestion, TokenKind, TokenSequence,
};

/// Rule code for use-elseif.
pub const CODE: &str = "SN001";

/// Rule name for use-elseif.
pub const NAME: &str = "use-elseif";

/// Diagnostic message for use-elseif.
pub const MESSAGE: &str = "Use elseif, not else if";

const SKIP_WHITESPACE: &[TokenKind] = &[TokenKind::Whitespace];

/// Reports an `if` keyword that directly follows an `else` keyword.
///
/// The rule has no options; its severity is changed through
/// `[rules.use-elseif]` in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseElseIf;

impl UseElseIf {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for UseElseIf {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires `elseif` instead of `else if`"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn interested_kinds(&self) -> &[TokenKind] {
        &[TokenKind::Else]
    }

    fn process(&self, tokens: &TokenSequence<'_>, index: usize, sink: &mut DiagnosticSink) {
        let Some(next) = tokens.find_next(index, &Search::none_of(SKIP_WHITESPACE)) else {
            return;
        };
        if tokens[next].kind != TokenKind::If {
            return;
        }

        let else_location = sink.location(&tokens[index]);
        let diagnostic = sink
            .diagnostic(self, &tokens[next], MESSAGE)
            .with_suggestion(Suggestion::new(format!(
                "Replace `{} {}` with `elseif`",
                tokens[index].text, tokens[next].text
            )))
            .with_label(Label::new(else_location, "`else` branch opened here"));
        sink.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniff_core::{run_rules, tokenize, Diagnostic, RuleBox};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        let tokens = tokenize(code);
        let rules: Vec<RuleBox> = vec![Box::new(UseElseIf::new())];
        run_rules(&tokens, &rules)
    }

    #[test]
    fn test_detects_else_if() {
        let source = "<?php\nif ($a) { } else if ($b) { }\n";
        let diagnostics = check_code(source);
        assert_eq!(diagnostics.len(), 1);

        let d = &diagnostics[0];
        assert_eq!(d.code, CODE);
        assert_eq!(d.rule, NAME);
        assert_eq!(d.message, MESSAGE);
        assert_eq!(d.severity, Severity::Error);
        let second_if = source.rfind("if").unwrap();
        assert_eq!(d.location.offset, second_if);
        assert_eq!((d.location.line, d.location.column), (2, 18));
        assert_eq!(d.location.length, 2);
    }

    #[test]
    fn test_allows_elseif() {
        assert!(check_code("if ($a) { } elseif ($b) { }").is_empty());
    }

    #[test]
    fn test_detects_across_mixed_whitespace() {
        let diagnostics = check_code("if ($a) {\n} else \t\n\n   if ($b) {\n}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 4);
        assert_eq!(diagnostics[0].location.column, 4);
    }

    #[test]
    fn test_trailing_else_is_ignored() {
        assert!(check_code("if ($a) { } else").is_empty());
        assert!(check_code("else   ").is_empty());
    }

    #[test]
    fn test_identifier_starting_with_if_is_ignored() {
        assert!(check_code("else ifSomethingElse($x)").is_empty());
    }

    #[test]
    fn test_comment_between_keywords_is_ignored() {
        assert!(check_code("if ($a) { } else /* c */ if ($b) { }").is_empty());
        assert!(check_code("if ($a) { } else // c\nif ($b) { }").is_empty());
    }

    #[test]
    fn test_detects_any_case() {
        let diagnostics = check_code("IF ($a) { } ELSE IF ($b) { }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Replace `ELSE IF` with `elseif`")
        );
    }

    #[test]
    fn test_ignores_non_code() {
        let sources = [
            "<?php $s = 'else if';",
            "<?php $s = \"else if\";",
            "<?php // else if\n",
            "<?php /* else if */",
            "<?php $s = <<<EOT\nelse if\nEOT;\n",
            "<p>else if</p>\n<?php echo 1; ?>\nelse if",
        ];
        for source in sources {
            assert!(check_code(source).is_empty(), "unexpected diagnostic in {source:?}");
        }
    }

    #[test]
    fn test_member_named_if_is_ignored() {
        assert!(check_code("if ($a) { } else $b->if();").is_empty());
    }

    #[test]
    fn test_label_points_at_else() {
        let source = "if ($a) { } else if ($b) { }";
        let diagnostics = check_code(source);
        let label = &diagnostics[0].labels[0];
        assert_eq!(label.location.offset, source.find("else").unwrap());
        assert_eq!(label.location.length, 4);
    }

    #[test]
    fn test_one_diagnostic_per_occurrence() {
        let source = "if ($a) {} else if ($b) {} else if ($c) {} else {}";
        let offsets: Vec<_> = check_code(source)
            .iter()
            .map(|d| d.location.offset)
            .collect();
        assert_eq!(offsets.len(), 2);
        assert!(offsets[0] < offsets[1]);
    }

    #[test]
    fn test_reports_as_error_by_default() {
        assert_eq!(UseElseIf.default_severity(), Severity::Error);
        let diagnostics = check_code("else if");
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }
}
