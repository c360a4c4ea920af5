//! Structural compaction
//!
//! Whole records that carry no narrative value are dropped, and the parent
//! references of later records are rewritten so the conversation forest
//! stays connected.
//!
//! Reparenting is order based: a dropped record is replaced by the most
//! recently kept record before it in the file, not by its true tree parent.
//! That matches the true parent whenever the dropped record sat directly
//! after its parent among survivors, which is the common case. When the true
//! parent was kept further back, a child can land on an unrelated sibling.

use std::collections::{BTreeMap, HashMap};

use effacer_core::{Category, Ledger, Line, Record};
use effacer_redact::tags;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionReason {
    HookProgress,
    BareCommand,
    UnpairedCaveat,
    EffacedLocalOutput,
}

impl DeletionReason {
    pub fn of(record: &Record) -> Option<Self> {
        if record.record_type() == Some("progress") && record.data_type() == Some("hook_progress")
        {
            return Some(DeletionReason::HookProgress);
        }
        if !record.is_user() {
            return None;
        }
        let text = record.content_str()?;
        if text == Category::LocalOutput.placeholder() || text == Category::CommandEcho.placeholder()
        {
            Some(DeletionReason::EffacedLocalOutput)
        } else if tags::is_bare_command(text) {
            Some(DeletionReason::BareCommand)
        } else if tags::is_unpaired_caveat(text) {
            Some(DeletionReason::UnpairedCaveat)
        } else {
            None
        }
    }
}

/// Where references to a dropped record now point.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Kept(String),
    /// Nothing was kept yet; filled in by the next kept record.
    Pending,
}

/// State carried through the compaction pass in file order.
#[derive(Debug, Clone, Default)]
pub struct ReparentState {
    last_kept: Option<String>,
    replacements: HashMap<String, Target>,
    pending: Vec<String>,
}

impl ReparentState {
    /// Rewrite the record's parent through the replacement map.
    ///
    /// Returns `Some(true)` if it was pointed at a kept record, `Some(false)`
    /// if it was cleared to a root, `None` if untouched.
    fn resolve_parent(&self, record: &mut Record) -> Option<bool> {
        let target = self.replacements.get(record.parent_uuid()?)?;
        match target {
            Target::Kept(id) => {
                record.set_parent_uuid(Some(id.as_str()));
                Some(true)
            }
            Target::Pending => {
                record.set_parent_uuid(None);
                Some(false)
            }
        }
    }

    fn dropped(&mut self, uuid: Option<&str>) {
        let Some(uuid) = uuid else {
            return;
        };
        let target = match &self.last_kept {
            Some(id) => Target::Kept(id.clone()),
            None => {
                self.pending.push(uuid.to_string());
                Target::Pending
            }
        };
        self.replacements.insert(uuid.to_string(), target);
    }

    fn kept(&mut self, uuid: Option<&str>) {
        let Some(uuid) = uuid else {
            return;
        };
        for id in self.pending.drain(..) {
            self.replacements.insert(id, Target::Kept(uuid.to_string()));
        }
        self.last_kept = Some(uuid.to_string());
    }

    /// Replacement for a dropped identifier, if it has been resolved.
    pub fn replacement(&self, uuid: &str) -> Option<&str> {
        match self.replacements.get(uuid)? {
            Target::Kept(id) => Some(id.as_str()),
            Target::Pending => None,
        }
    }

    pub fn dropped_count(&self) -> usize {
        self.replacements.len()
    }
}

#[derive(Debug, Default)]
pub struct Compaction {
    pub lines: Vec<Line>,
    pub state: ReparentState,
    pub dropped: BTreeMap<DeletionReason, usize>,
    pub reparented: usize,
    pub rerooted: usize,
}

impl Compaction {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

pub const DEFAULT_LOCAL_OUTPUT_THRESHOLD: usize = 100;

#[derive(Debug, Clone)]
pub struct Compactor {
    local_output_threshold: usize,
}

impl Compactor {
    pub fn new(local_output_threshold: usize) -> Self {
        Self {
            local_output_threshold,
        }
    }

    /// Neutralize console output of `<bash-input>` commands.
    ///
    /// Replies to a command-input record that are plain strings longer than
    /// the threshold (in characters) become the local-output placeholder,
    /// which the compaction pass then drops.
    pub fn neutralize_local_output(&self, lines: &mut [Line], ledger: &mut Ledger) -> usize {
        let command_inputs: Vec<String> = lines
            .iter()
            .filter_map(Line::as_record)
            .filter(|r| r.is_user())
            .filter(|r| r.content_str().is_some_and(tags::has_command_input))
            .filter_map(|r| r.uuid().map(str::to_string))
            .collect();
        if command_inputs.is_empty() {
            return 0;
        }

        let mut neutralized = 0;
        for record in lines.iter_mut().filter_map(Line::as_record_mut) {
            if !record.is_user() {
                continue;
            }
            let replies_to_input = record
                .parent_uuid()
                .is_some_and(|p| command_inputs.iter().any(|id| id == p));
            if !replies_to_input {
                continue;
            }
            let Some(slot) = record.value.pointer_mut("/message/content") else {
                continue;
            };
            let long_enough = matches!(slot, Value::String(s) if s.chars().count() > self.local_output_threshold);
            if long_enough && ledger.efface_str(slot, Category::LocalOutput).is_some() {
                neutralized += 1;
            }
        }
        neutralized
    }

    /// Drop deletable records and reattach the parents of what remains.
    pub fn compact(&self, lines: Vec<Line>, state: ReparentState) -> Compaction {
        let mut compaction = Compaction {
            lines: Vec::with_capacity(lines.len()),
            state,
            ..Default::default()
        };

        for mut line in lines {
            if let Line::Record(record) = &mut line {
                match compaction.state.resolve_parent(record) {
                    Some(true) => compaction.reparented += 1,
                    Some(false) => compaction.rerooted += 1,
                    None => {}
                }

                if let Some(reason) = DeletionReason::of(record) {
                    tracing::debug!(uuid = record.uuid().unwrap_or("-"), ?reason, "record dropped");
                    compaction.state.dropped(record.uuid());
                    *compaction.dropped.entry(reason).or_default() += 1;
                    continue;
                }
                compaction.state.kept(record.uuid());
            }
            compaction.lines.push(line);
        }

        compaction
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_OUTPUT_THRESHOLD)
    }
}
