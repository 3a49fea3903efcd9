//! Shared output formatting for lint results.

use anyhow::Result;
use miette::GraphicalReportHandler;
use sniff_core::{Diagnostic, LintResult, Severity};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the directory diagnostic paths are relative to; the fancy
/// format reads sources from there.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Fancy => return print_fancy(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for diagnostic in &result.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        if let Some(suggestion) = &diagnostic.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for diagnostic in &result.diagnostics {
        println!("{diagnostic}");
    }
}

fn print_fancy(result: &LintResult, root: &Path) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    let mut sources: HashMap<PathBuf, String> = HashMap::new();

    for diagnostic in &result.diagnostics {
        let file = &diagnostic.location.file;
        if !sources.contains_key(file) {
            let source = read_source(root, file);
            sources.insert(file.clone(), source);
        }
        let source = sources.get(file).map_or("", String::as_str);
        println!("{}", render(&handler, diagnostic, source)?);
    }

    print_summary(result);
    Ok(())
}

/// Reads a checked file again for snippets; a file that vanished since the
/// run renders without source.
fn read_source(root: &Path, file: &Path) -> String {
    match std::fs::read(root.join(file)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Cannot re-read {}: {}", file.display(), e);
            String::new()
        }
    }
}

fn render(
    handler: &GraphicalReportHandler,
    diagnostic: &Diagnostic,
    source: &str,
) -> Result<String> {
    let mut out = String::new();
    if source.len() < diagnostic.location.offset + diagnostic.location.length {
        out.push_str(&diagnostic.format());
        return Ok(out);
    }
    handler.render_report(&mut out, &diagnostic.to_report(source))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniff_core::{Label, Location, Suggestion};

    fn diagnostic(source: &str) -> Diagnostic {
        let offset = source.rfind("if").unwrap();
        Diagnostic::new(
            "SN001",
            "use-elseif",
            Severity::Error,
            Location::new("a.php".into(), 1, offset + 1).with_span(offset, 2),
            "Use elseif, not else if",
        )
        .with_suggestion(Suggestion::new("Replace `else if` with `elseif`"))
        .with_label(Label::new(
            Location::new("a.php".into(), 1, 1).with_span(source.find("else").unwrap(), 4),
            "`else` branch opened here",
        ))
    }

    #[test]
    fn fancy_render_includes_message_and_help() {
        let source = "if ($a) {} else if ($b) {}";
        let handler = GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
        let rendered = render(&handler, &diagnostic(source), source).unwrap();
        assert!(rendered.contains("[SN001] Use elseif, not else if"));
        assert!(rendered.contains("Replace `else if` with `elseif`"));
        assert!(rendered.contains("a.php"));
    }

    #[test]
    fn fancy_render_without_source_falls_back_to_text() {
        let source = "if ($a) {} else if ($b) {}";
        let handler = GraphicalReportHandler::new();
        let rendered = render(&handler, &diagnostic(source), "").unwrap();
        assert!(rendered.starts_with("SN001 use-elseif at a.php"));
    }

    #[test]
    fn json_contains_flat_location_fields() {
        let source = "if ($a) {} else if ($b) {}";
        let mut result = LintResult::new();
        result.diagnostics.push(diagnostic(source));
        let value = serde_json::to_value(&result).unwrap();
        let first = &value["diagnostics"][0];
        assert_eq!(first["line"], 1);
        assert_eq!(first["column"], 17);
        assert_eq!(first["severity"], "error");
        assert_eq!(first["message"], "Use elseif, not else if");
    }
}
