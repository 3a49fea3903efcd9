//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "sniff.toml";

const DEFAULT_CONFIG: &str = r#"# sniff configuration

# Fail the run when a diagnostic reaches this severity ("error" or "warning")
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# File extensions to check
extensions = ["php", "inc"]

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/cache/**",
]

# Respect .gitignore files
respect_gitignore = true

# Number of files checked in parallel (default: number of CPUs)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.use-elseif]
enabled = true
# severity = "warning"  # Override default severity
"#;

/// Runs the init command, writing `sniff.toml` into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: sniff check");

    Ok(())
}
