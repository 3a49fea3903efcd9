//! Integration test: the engine with a locally defined rule.

use sniff_core::{
    run_rules, tokenize, Analyzer, Config, DiagnosticSink, Rule, RuleBox, Search, Severity,
    TokenKind, TokenSequence,
};
use std::path::Path;
use tempfile::TempDir;

/// Reports `else` directly followed by `if`, like the built-in rule.
struct ElseThenIf;

impl Rule for ElseThenIf {
    fn name(&self) -> &'static str {
        "else-then-if"
    }

    fn code(&self) -> &'static str {
        "T001"
    }

    fn interested_kinds(&self) -> &[TokenKind] {
        &[TokenKind::Else]
    }

    fn process(&self, tokens: &TokenSequence<'_>, index: usize, sink: &mut DiagnosticSink) {
        let search = Search::none_of(&[TokenKind::Whitespace]);
        if let Some(next) = tokens.find_next(index, &search) {
            if tokens[next].kind == TokenKind::If {
                sink.add_error(self, &tokens[next], "else then if");
            }
        }
    }
}

fn rules() -> Vec<RuleBox> {
    vec![Box::new(ElseThenIf)]
}

#[test]
fn run_rules_is_deterministic() {
    let source = "if ($a) {} else if ($b) {} else\n\tif ($c) {} elseif ($d) {}";
    let tokens = tokenize(source);
    let first = run_rules(&tokens, &rules());
    let second = run_rules(&tokens, &rules());
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn diagnostic_json_shape() {
    let tokens = tokenize("else if");
    let diagnostics = run_rules(&tokens, &rules());
    let json = serde_json::to_value(&diagnostics[0]).unwrap();

    assert_eq!(json["line"], 1);
    assert_eq!(json["column"], 6);
    assert_eq!(json["message"], "else then if");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["code"], "T001");
    assert_eq!(json["offset"], 5);
    assert_eq!(json["length"], 2);
    assert!(json.get("suggestion").is_none());
    assert!(json.get("labels").is_none());
}

#[test]
fn analyze_source_applies_severity_override() {
    let config = Config::parse("[rules.else-then-if]\nseverity = \"warning\"\n").unwrap();
    let analyzer = Analyzer::builder()
        .root("/")
        .rules(rules())
        .config(config)
        .build()
        .unwrap();

    let diagnostics = analyzer.analyze_source(Path::new("inline.php"), "else if");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].location.file, Path::new("inline.php"));
}

#[test]
fn analyze_walks_configured_extensions_only() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.php"), "else if").unwrap();
    std::fs::write(dir.path().join("b.phtml"), "else if").unwrap();
    std::fs::write(dir.path().join("c.txt"), "else if").unwrap();

    let config = Config::parse("[analyzer]\nextensions = [\"php\", \"phtml\"]\n").unwrap();
    let result = Analyzer::builder()
        .root(dir.path())
        .rules(rules())
        .config(config)
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 2);
    let files: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| d.location.file.to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["a.php", "b.phtml"]);
}

#[test]
fn empty_tree_checks_nothing() {
    let dir = TempDir::new().unwrap();
    let result = Analyzer::builder()
        .root(dir.path())
        .rules(rules())
        .build()
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(result.files_checked, 0);
    assert!(result.diagnostics.is_empty());
}
