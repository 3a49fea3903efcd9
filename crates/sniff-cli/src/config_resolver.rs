//! Locating and loading `sniff.toml`.
//!
//! Candidates are tried in this order, first hit wins:
//!
//! 1. `--config <FILE>` (used as given, even if missing)
//! 2. `<PATH>/sniff.toml`, then `<PATH>/.sniff.toml`
//! 3. `$SNIFF_CONFIG_DIR/config.toml`, else `~/.sniff/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use sniff_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the checked sources.
    Project(PathBuf),
    /// Found in the per-user config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Path of the config file, if there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid configuration.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        tracing::info!("Using {self}");
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "config {}", p.display()),
            Self::Project(p) => write!(f, "project config {}", p.display()),
            Self::Global(p) => write!(f, "global config {}", p.display()),
            Self::Default => f.write_str("default configuration"),
        }
    }
}

const PROJECT_FILES: [&str; 2] = ["sniff.toml", ".sniff.toml"];

const GLOBAL_FILE: &str = "config.toml";

/// Environment variable overriding the per-user config directory.
pub const CONFIG_DIR_ENV: &str = "SNIFF_CONFIG_DIR";

/// Finds the configuration for checking `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(project_dir, explicit, global_config_dir().as_deref())
}

/// Same as [`resolve`] with the global directory passed in, so tests do not
/// depend on the environment.
fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_FILE)) {
        Some(found) if found.is_file() => {
            tracing::debug!("Found global config: {}", found.display());
            ConfigSource::Global(found)
        }
        _ => ConfigSource::Default,
    }
}

/// Per-user config directory: `$SNIFF_CONFIG_DIR`, else `~/.sniff`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home::home_dir().map(|home| home.join(".sniff")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniff_core::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(project.path(), "sniff.toml");

        let explicit = Path::new("/nonexistent/custom.toml");
        assert_eq!(
            resolve_with(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_files_in_order() {
        let project = TempDir::new().unwrap();
        let hidden = touch(project.path(), ".sniff.toml");
        assert_eq!(
            resolve_with(project.path(), None, None),
            ConfigSource::Project(hidden)
        );

        let plain = touch(project.path(), "sniff.toml");
        assert_eq!(
            resolve_with(project.path(), None, None),
            ConfigSource::Project(plain)
        );
    }

    #[test]
    fn project_beats_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        touch(global.path(), "config.toml");
        assert!(matches!(
            resolve_with(project.path(), None, Some(global.path())),
            ConfigSource::Global(_)
        ));

        touch(project.path(), "sniff.toml");
        assert!(matches!(
            resolve_with(project.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn falls_back_to_defaults() {
        let project = TempDir::new().unwrap();
        let empty_global = TempDir::new().unwrap();
        assert_eq!(
            resolve_with(project.path(), None, Some(empty_global.path())),
            ConfigSource::Default
        );
        assert_eq!(resolve_with(project.path(), None, None), ConfigSource::Default);
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("sniff.toml")).unwrap();
        assert_eq!(resolve_with(project.path(), None, None), ConfigSource::Default);
    }

    #[test]
    fn load_reads_the_resolved_file() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("sniff.toml"), "fail_on = \"warning\"\n").unwrap();

        let config = resolve_with(project.path(), None, None).load().unwrap();
        assert_eq!(config.fail_on(), Severity::Warning);
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/sniff.toml"));
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sniff.toml"));
    }

    #[test]
    fn default_source_loads_defaults() {
        let config = ConfigSource::Default.load().unwrap();
        assert!(config.rules.is_empty());
        assert!(ConfigSource::Default.path().is_none());
    }
}
