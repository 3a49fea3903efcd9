//! Catalog of built-in rules.

use crate::UseElseIf;
use sniff_core::{ConfigError, RuleBox};
use tracing::debug;

/// Returns all built-in rules, in dispatch order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(UseElseIf::new())]
}

/// Looks up a built-in rule by name (`use-elseif`) or code (`SN001`).
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|r| r.is_named(name))
}

/// Returns the built-in rules named in `names`, keeping catalog order.
///
/// An empty list selects every rule.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRule`] for the first name that matches no
/// built-in rule.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<RuleBox>, ConfigError> {
    if names.is_empty() {
        return Ok(all_rules());
    }

    let rules = all_rules();
    for name in names {
        let name = name.as_ref();
        let known = rules.iter().any(|r| r.is_named(name));
        if !known {
            return Err(ConfigError::UnknownRule {
                name: name.to_string(),
            });
        }
    }

    let selected: Vec<RuleBox> = rules
        .into_iter()
        .filter(|r| names.iter().any(|n| r.is_named(n.as_ref())))
        .collect();
    debug!("Selected {} of the built-in rules", selected.len());
    Ok(selected)
}
