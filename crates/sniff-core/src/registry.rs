//! Token-kind dispatch of rules.

use std::collections::HashMap;

use tracing::debug;

use crate::rule::{Rule, RuleBox};
use crate::sink::DiagnosticSink;
use crate::token::{TokenKind, TokenSequence};
use crate::types::Diagnostic;

/// Maps token kinds to the indices of interested rules, in registration order.
#[derive(Debug, Default)]
struct DispatchTable {
    by_kind: HashMap<TokenKind, Vec<usize>>,
}

impl DispatchTable {
    fn build(rules: &[RuleBox]) -> Self {
        let mut by_kind: HashMap<TokenKind, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            for &kind in rule.interested_kinds() {
                let entry = by_kind.entry(kind).or_default();
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        }
        Self { by_kind }
    }

    fn dispatch(&self, rules: &[RuleBox], tokens: &TokenSequence<'_>, sink: &mut DiagnosticSink) {
        for (index, token) in tokens.iter().enumerate() {
            let Some(interested) = self.by_kind.get(&token.kind) else {
                continue;
            };
            for &rule in interested {
                rules[rule].process(tokens, index, sink);
            }
        }
    }
}

/// An ordered set of rules with a prebuilt token-kind dispatch table.
///
/// Build it once per run; [`run`](Self::run) then makes a single pass over
/// each token sequence and calls every rule registered for a token's kind,
/// in the order the rules were registered.
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    table: DispatchTable,
}

impl RuleRegistry {
    /// Registers `rules`, keeping their order.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        let table = DispatchTable::build(&rules);
        debug!(
            "Registered {} rules over {} token kinds",
            rules.len(),
            table.by_kind.len()
        );
        Self { rules, table }
    }

    /// Registered rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that will be called for tokens of `kind`, in call order.
    pub fn rules_for(&self, kind: TokenKind) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.table
            .by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&index| self.rules[index].as_ref())
    }

    /// Runs every registered rule over `tokens`, reporting into `sink`.
    pub fn run(&self, tokens: &TokenSequence<'_>, sink: &mut DiagnosticSink) {
        self.table.dispatch(&self.rules, tokens, sink);
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Runs `rules` over one anonymous token sequence.
///
/// Diagnostics come back in discovery order: token order first, then rule
/// order for rules triggered by the same token.
#[must_use]
pub fn run_rules(tokens: &TokenSequence<'_>, rules: &[RuleBox]) -> Vec<Diagnostic> {
    let mut sink = DiagnosticSink::default();
    DispatchTable::build(rules).dispatch(rules, tokens, &mut sink);
    sink.into_diagnostics()
}
