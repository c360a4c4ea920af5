use effacer_core::{Ledger, Record};
use serde_json::Value;

use crate::rules;
use crate::scrub::Scrubber;

/// A single shape-preserving rewrite.
///
/// `apply` returns `None` when the record turns out to have an unexpected
/// shape at a key the rule needs; that ends the rule for this record only.
pub trait RedactionRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, record: &Value) -> bool;

    fn apply(&self, record: &mut Value, ledger: &mut Ledger) -> Option<()>;
}

/// A rule built from a predicate and a mutation.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Value) -> bool,
    pub apply: fn(&mut Value, &mut Ledger) -> Option<()>,
}

impl RedactionRule for Rule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, record: &Value) -> bool {
        (self.matches)(record)
    }

    fn apply(&self, record: &mut Value, ledger: &mut Ledger) -> Option<()> {
        (self.apply)(record, ledger)
    }
}

/// Ordered rule registry plus the tag scrubber.
///
/// Every rule is evaluated against every record; a match never stops the
/// rules after it.
pub struct Redactor {
    rules: Vec<Box<dyn RedactionRule>>,
    scrubber: Scrubber,
}

impl Redactor {
    pub fn new() -> Self {
        Self::with_rules(rules::builtin())
    }

    pub fn with_rules(rules: Vec<Box<dyn RedactionRule>>) -> Self {
        Self {
            rules,
            scrubber: Scrubber::new(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn RedactionRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule, then scrub tagged spans.
    pub fn redact(&self, record: &mut Record, ledger: &mut Ledger) {
        for rule in &self.rules {
            if !rule.matches(&record.value) {
                continue;
            }
            if rule.apply(&mut record.value, ledger).is_none() {
                tracing::trace!(
                    rule = rule.name(),
                    uuid = record.uuid().unwrap_or("-"),
                    "unexpected shape, rule skipped"
                );
            }
        }
        self.scrubber.scrub(record, ledger);
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}
