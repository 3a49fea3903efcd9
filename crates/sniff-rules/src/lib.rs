//! # sniff-rules
//!
//! Built-in style rules for sniff.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | SN001 | `use-elseif` | Requires `elseif` instead of `else if` |
//!
//! ## Usage
//!
//! ```ignore
//! use sniff_core::Analyzer;
//! use sniff_rules::UseElseIf;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(UseElseIf::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
mod use_elseif;

pub use catalog::{all_rules, rule_by_name};
pub use use_elseif::UseElseIf;

/// Re-export core types for convenience.
pub use sniff_core::{Diagnostic, Rule, Severity};
