//! Check command implementation.

use anyhow::{Context, Result};
use sniff_core::{Analyzer, LintResult};
use sniff_rules::catalog;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Without a `path`, the root comes from `[analyzer] root` in the config.
/// Returns `false` when a diagnostic reaches the configured `fail_on`
/// severity.
pub fn run(
    path: Option<&Path>,
    format: OutputFormat,
    rules_filter: &[String],
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = source.load()?;
    let fail_on = config.fail_on();

    let rules = catalog::select(rules_filter).context("Invalid --rules selection")?;

    let mut builder = Analyzer::builder();
    if let Some(path) = path {
        builder = builder.root(path);
    }
    let analyzer = builder
        .config(config)
        .excludes(exclude)
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    Ok(passes(&result, fail_on))
}

fn passes(result: &LintResult, fail_on: sniff_core::Severity) -> bool {
    !result.has_diagnostics_at(fail_on)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniff_core::{Diagnostic, Location, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn result_with(severity: Severity) -> LintResult {
        let mut result = LintResult::new();
        result.diagnostics.push(Diagnostic::new(
            "SN001",
            "use-elseif",
            severity,
            Location::new("a.php".into(), 1, 1),
            "Use elseif, not else if",
        ));
        result
    }

    #[test]
    fn fail_on_threshold() {
        assert!(passes(&LintResult::new(), Severity::Warning));
        assert!(passes(&result_with(Severity::Warning), Severity::Error));
        assert!(!passes(&result_with(Severity::Warning), Severity::Warning));
        assert!(!passes(&result_with(Severity::Error), Severity::Error));
    }

    #[test]
    fn run_reports_failure_for_else_if() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.php"), "<?php\nif ($a) {} else if ($b) {}\n").unwrap();

        let passed = run(
            Some(dir.path()),
            OutputFormat::Compact,
            &[],
            Vec::new(),
            &ConfigSource::Default,
        )
        .unwrap();
        assert!(!passed);
    }

    #[test]
    fn run_passes_clean_tree() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.php"), "<?php\nif ($a) {} elseif ($b) {}\n").unwrap();

        let passed = run(
            Some(dir.path()),
            OutputFormat::Json,
            &[],
            Vec::new(),
            &ConfigSource::Default,
        )
        .unwrap();
        assert!(passed);
    }

    #[test]
    fn run_rejects_unknown_rule_filter() {
        let dir = TempDir::new().unwrap();
        let err = run(
            Some(dir.path()),
            OutputFormat::Text,
            &["no-such-rule".to_string()],
            Vec::new(),
            &ConfigSource::Default,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no-such-rule"));
    }

    #[test]
    fn run_applies_config_severity() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.php"), "<?php\nelse if\n").unwrap();
        let config = dir.path().join("sniff.toml");
        fs::write(&config, "[rules.use-elseif]\nseverity = \"warning\"\n").unwrap();

        let passed = run(
            Some(dir.path()),
            OutputFormat::Compact,
            &[],
            Vec::new(),
            &ConfigSource::Project(config),
        )
        .unwrap();
        assert!(passed);
    }

    #[test]
    fn run_without_path_uses_configured_root() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("a.php"), "<?php\nelse if\n").unwrap();
        let elsewhere = TempDir::new().unwrap();
        let config = elsewhere.path().join("sniff.toml");
        let root = project.path().display().to_string().replace('\\', "/");
        fs::write(&config, format!("[analyzer]\nroot = \"{root}\"\n")).unwrap();

        let passed = run(
            None,
            OutputFormat::Compact,
            &[],
            Vec::new(),
            &ConfigSource::Explicit(config),
        )
        .unwrap();
        assert!(!passed);
    }
}
