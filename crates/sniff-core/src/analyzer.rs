//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, ConfigError};
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleBox};
use crate::sink::DiagnosticSink;
use crate::tokenizer::tokenize;
use crate::types::{Diagnostic, LintResult};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the analysis root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_read_error: bool,
    parallelism: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether an unreadable file aborts the run (default: false).
    #[must_use]
    pub fn fail_on_read_error(mut self, fail: bool) -> Self {
        self.fail_on_read_error = fail;
        self
    }

    /// Sets the number of worker threads, overriding the configuration.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Builds the analyzer.
    ///
    /// Rules disabled in the configuration are dropped here.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration enables an unknown rule, if an
    /// exclude pattern is not a valid glob, or if the current directory
    /// cannot be determined for a relative root.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let rules = config.select_rules(self.rules)?;

        let excludes = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let parallelism = self
            .parallelism
            .or(config.analyzer.parallelism)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from))
            .max(1);

        Ok(Analyzer {
            root,
            registry: RuleRegistry::new(rules),
            excludes,
            config,
            fail_on_read_error: self.fail_on_read_error,
            parallelism,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    registry: RuleRegistry,
    excludes: Vec<glob::Pattern>,
    config: Config,
    fail_on_read_error: bool,
    parallelism: usize,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// Diagnostics are grouped by file in path order; within a file they
    /// keep discovery order. The outcome does not depend on parallelism.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a file cannot be read
    /// and the analyzer was built with `fail_on_read_error`.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!(
            "Found {} files to analyze with {} worker(s)",
            files.len(),
            self.parallelism.min(files.len()).max(1)
        );

        let mut result = LintResult::new();
        for (path, outcome) in files.iter().zip(self.check_files(&files)) {
            match outcome {
                Ok(diagnostics) => {
                    result.diagnostics.extend(diagnostics);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Read { path: _, source }) if !self.fail_on_read_error => {
                    warn!("Skipping unreadable file {}: {}", path.display(), source);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Analysis complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Runs the active rules over one in-memory source text.
    ///
    /// `path` is only used to label the diagnostics.
    #[must_use]
    pub fn analyze_source(&self, path: &Path, source: &str) -> Vec<Diagnostic> {
        let tokens = tokenize(source);
        let mut sink = DiagnosticSink::new(path);
        self.registry.run(&tokens, &mut sink);
        self.apply_severity_override(sink.into_diagnostics())
    }

    /// Checks files on up to `parallelism` scoped threads, returning
    /// outcomes in input order.
    fn check_files(&self, files: &[PathBuf]) -> Vec<Result<Vec<Diagnostic>, AnalyzerError>> {
        let workers = self.parallelism.min(files.len()).max(1);
        if workers == 1 {
            return files.iter().map(|f| self.analyze_file(f)).collect();
        }

        let chunk_size = files.len().div_ceil(workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = files
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|f| self.analyze_file(f))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Analyzes a single file and returns its diagnostics.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Diagnostic>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| AnalyzerError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        Ok(self.analyze_source(relative, &content))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        for d in &mut diagnostics {
            if let Some(severity) = self.config.rule_severity(&d.rule, &d.code) {
                d.severity = severity;
            }
        }
        diagnostics
    }

    /// Discovers all source files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.has_source_extension(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .analyzer
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    /// Checks if a path should be excluded.
    ///
    /// Patterns match the path relative to the root, so directories above
    /// the root never cause exclusion.
    fn should_exclude(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        self.excludes.iter().any(|p| p.matches_path(relative))
    }
}
