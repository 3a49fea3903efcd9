//! # sniff-core
//!
//! Core framework for token-level style checks ("sniffs") over PHP source.
//!
//! This crate provides the building blocks for writing and running rules:
//!
//! - [`tokenize`] turning source text into a [`TokenSequence`]
//! - [`Search`] and the `find_next`/`find_previous` navigator on sequences
//! - [`Rule`] trait for per-token checks
//! - [`RuleRegistry`] dispatching rules by [`TokenKind`]
//! - [`DiagnosticSink`] collecting [`Diagnostic`]s for one file
//! - [`Analyzer`] for orchestrating a run over a directory tree
//!
//! ## Example
//!
//! ```ignore
//! use sniff_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule)
//!     .config(Config::from_file("sniff.toml".as_ref())?)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod navigator;
mod registry;
mod rule;
mod sink;
mod token;
mod tokenizer;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use navigator::{Search, Target};
pub use registry::{run_rules, RuleRegistry};
pub use rule::{Rule, RuleBox};
pub use sink::DiagnosticSink;
pub use token::{Token, TokenKind, TokenSequence};
pub use tokenizer::tokenize;
pub use types::{
    Diagnostic, Label, LintResult, Location, Severity, SourceReport, Suggestion, UnknownSeverity,
};
