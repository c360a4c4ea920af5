//! Savings ledger
//!
//! Every value rewrite goes through one of the `efface_*` helpers here. They
//! enforce the shape rules in one place: a string slot stays a string and a
//! list slot stays a list. A slot that already holds its replacement (or is
//! empty) is left alone and not counted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::placeholder::Category;
use crate::record::basename;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: usize,
    pub bytes_saved: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    tallies: BTreeMap<Category, Tally>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, before: usize, after: usize) {
        let tally = self.tallies.entry(category).or_default();
        tally.count += 1;
        tally.bytes_saved += before.saturating_sub(after);
    }

    pub fn get(&self, category: Category) -> Tally {
        self.tallies.get(&category).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Tally)> + '_ {
        self.tallies.iter().map(|(c, t)| (*c, *t))
    }

    pub fn total_count(&self) -> usize {
        self.tallies.values().map(|t| t.count).sum()
    }

    pub fn total_bytes_saved(&self) -> usize {
        self.tallies.values().map(|t| t.bytes_saved).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    pub fn merge(&mut self, other: &Ledger) {
        for (category, tally) in other.iter() {
            let entry = self.tallies.entry(category).or_default();
            entry.count += tally.count;
            entry.bytes_saved += tally.bytes_saved;
        }
    }

    /// Overwrite a string leaf with the category placeholder.
    ///
    /// Returns `None` when the slot is not a string, so rules can `?` on it.
    /// A `null` slot has nothing to efface and is skipped.
    pub fn efface_str(&mut self, slot: &mut Value, category: Category) -> Option<()> {
        self.efface_str_with(slot, category, category.placeholder())
    }

    /// Like [`Ledger::efface_str`] with an explicit replacement string.
    pub fn efface_str_with(
        &mut self,
        slot: &mut Value,
        category: Category,
        replacement: &str,
    ) -> Option<()> {
        if slot.is_null() {
            return Some(());
        }
        let current = slot.as_str()?;
        if current.is_empty() || current == replacement {
            return Some(());
        }
        let before = current.len();
        *slot = Value::String(replacement.to_string());
        self.record(category, before, replacement.len());
        Some(())
    }

    /// Shorten a path-valued string leaf to its final component.
    pub fn efface_path(&mut self, slot: &mut Value, category: Category) -> Option<()> {
        if slot.is_null() {
            return Some(());
        }
        let current = slot.as_str()?;
        let name = basename(current);
        if name.len() == current.len() {
            return Some(());
        }
        let before = current.len();
        let name = name.to_string();
        let after = name.len();
        *slot = Value::String(name);
        self.record(category, before, after);
        Some(())
    }

    /// Replace the elements of a list leaf, keeping it a list.
    pub fn efface_list(
        &mut self,
        slot: &mut Value,
        category: Category,
        replacement: Vec<Value>,
    ) -> Option<()> {
        if slot.is_null() {
            return Some(());
        }
        let current = slot.as_array()?;
        if current.is_empty() || *current == replacement {
            return Some(());
        }
        let before = encoded_len(slot);
        *slot = Value::Array(replacement);
        self.record(category, before, encoded_len(slot));
        Some(())
    }
}

fn encoded_len(value: &Value) -> usize {
    serde_json::to_string(value).map(|s| s.len()).unwrap_or(0)
}
