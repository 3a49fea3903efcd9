//! Configuration types for sniff.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::rule::RuleBox;
use crate::Severity;

/// Top-level configuration for sniff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing run (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name or code.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Looks up the configuration for a rule by name, falling back to its
    /// code in any letter case.
    #[must_use]
    pub fn rule(&self, name: &str, code: &str) -> Option<&RuleConfig> {
        self.rules.get(name).or_else(|| {
            self.rules
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(code))
                .map(|(_, config)| config)
        })
    }

    /// Checks if a rule is enabled. Rules are enabled unless configured off.
    #[must_use]
    pub fn is_rule_enabled(&self, name: &str, code: &str) -> bool {
        self.rule(name, code)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, name: &str, code: &str) -> Option<Severity> {
        self.rule(name, code).and_then(|c| c.severity)
    }

    /// Severity at or above which a run fails.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Keeps the enabled rules out of `available`, in their original order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for the first key, in sorted
    /// order, that enables a rule not among `available`. This happens before
    /// any file is checked.
    pub fn select_rules(&self, available: Vec<RuleBox>) -> Result<Vec<RuleBox>, ConfigError> {
        for (key, rule_config) in &self.rules {
            let known = available.iter().any(|r| r.is_named(key));
            if known {
                continue;
            }
            if rule_config.enabled == Some(false) {
                tracing::warn!("Ignoring configuration for unknown rule: {}", key);
                continue;
            }
            return Err(ConfigError::UnknownRule { name: key.clone() });
        }

        Ok(available
            .into_iter()
            .filter(|r| {
                let enabled = self.is_rule_enabled(r.name(), r.code());
                if !enabled {
                    tracing::debug!("Skipping disabled rule: {}", r.name());
                }
                enabled
            })
            .collect())
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions to check (default: `php`, `inc`).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude, matched against root-relative paths
    /// (default: `**/vendor/**`).
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files checked in parallel.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/vendor/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options, reserved for rules that take any.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule that does not exist was enabled.
    #[error("Unknown rule `{name}`")]
    UnknownRule {
        /// Name or code as written in the configuration.
        name: String,
    },
}
