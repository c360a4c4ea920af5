//! Line pipeline
//!
//! The whole transcript is read into memory, pushed through the per-record
//! and whole-file phases in order, and written to a new file.

use std::path::Path;

use effacer_core::{Error, Ledger, Line, Result};
use effacer_redact::Redactor;

use crate::compact::{Compactor, DEFAULT_LOCAL_OUTPUT_THRESHOLD, ReparentState};
use crate::naming;
use crate::orphan::resolve_orphans;
use crate::report::{PassStats, RunReport};
use crate::unify::IdentityUnifier;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Character count a command reply string must exceed for the
    /// local-output pass to efface it.
    pub local_output_threshold: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            local_output_threshold: DEFAULT_LOCAL_OUTPUT_THRESHOLD,
        }
    }
}

/// Result of processing transcript bytes in memory.
#[derive(Debug)]
pub struct Processed {
    pub output: Vec<u8>,
    pub stats: PassStats,
    pub ledger: Ledger,
}

pub struct Effacer {
    redactor: Redactor,
    compactor: Compactor,
}

impl Effacer {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_redactor(Redactor::new(), options)
    }

    pub fn with_redactor(redactor: Redactor, options: EngineOptions) -> Self {
        Self {
            redactor,
            compactor: Compactor::new(options.local_output_threshold),
        }
    }

    /// Run every phase over newline-delimited transcript bytes.
    pub fn process(&self, input: &[u8], session_id: &str) -> Result<Processed> {
        let unifier = IdentityUnifier::new(session_id);
        let mut stats = PassStats::default();
        let mut ledger = Ledger::new();

        let trailing_newline = input.ends_with(b"\n");
        let body = input.strip_suffix(b"\n").unwrap_or(input);

        let mut lines: Vec<Line> = Vec::new();
        if !input.is_empty() {
            for raw in body.split(|b| *b == b'\n') {
                stats.lines += 1;
                let mut line = Line::parse(raw);
                match line.as_record_mut() {
                    Some(record) => {
                        stats.records += 1;
                        if unifier.apply(record) {
                            stats.sessions_unified += 1;
                        }
                        self.redactor.redact(record, &mut ledger);
                    }
                    None => {
                        stats.malformed += 1;
                        tracing::debug!(line = stats.lines, "malformed line passed through");
                    }
                }
                lines.push(line);
            }
        }

        stats.local_output_neutralized =
            self.compactor.neutralize_local_output(&mut lines, &mut ledger);

        let compaction = self.compactor.compact(lines, ReparentState::default());
        stats.reparented = compaction.reparented;
        stats.rerooted = compaction.rerooted;
        stats.dropped = compaction.dropped;
        let mut lines = compaction.lines;

        stats.orphans_promoted = resolve_orphans(&mut lines);

        let mut output = Vec::with_capacity(input.len());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                output.push(b'\n');
            }
            output.extend_from_slice(&line.render()?);
        }
        if trailing_newline && !lines.is_empty() {
            output.push(b'\n');
        }

        Ok(Processed {
            output,
            stats,
            ledger,
        })
    }

    /// Efface the transcript at `input` into a sibling file.
    ///
    /// With `dry_run` the output path is derived and reported but nothing is
    /// written.
    pub fn run(&self, input: &Path, dry_run: bool) -> Result<RunReport> {
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }
        let output = naming::output_path(input)?;
        if output == input {
            return Err(Error::InvalidPath(format!(
                "output would overwrite input: {}",
                input.display()
            )));
        }
        let session_id = naming::session_id_for(&output)?;

        let bytes = std::fs::read(input)?;
        let processed = self.process(&bytes, &session_id)?;

        if !dry_run {
            std::fs::write(&output, &processed.output)?;
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            records = processed.stats.records,
            dropped = processed.stats.dropped_total(),
            effaced = processed.ledger.total_count(),
            dry_run,
            "transcript effaced"
        );

        Ok(RunReport {
            input: input.to_path_buf(),
            output,
            session_id,
            written: !dry_run,
            input_bytes: bytes.len(),
            output_bytes: processed.output.len(),
            stats: processed.stats,
            ledger: processed.ledger,
        })
    }
}

impl Default for Effacer {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effacer_core::Category;
    use serde_json::{Value, json};

    fn jsonl(values: &[Value]) -> Vec<u8> {
        let mut out = Vec::new();
        for value in values {
            out.extend_from_slice(value.to_string().as_bytes());
            out.push(b'\n');
        }
        out
    }

    fn parse_output(output: &[u8]) -> Vec<Value> {
        output
            .split(|b| *b == b'\n')
            .filter(|l| !l.is_empty())
            .filter_map(|l| serde_json::from_slice(l).ok())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let processed = Effacer::default().process(b"", "s").unwrap();
        assert!(processed.output.is_empty());
        assert_eq!(processed.stats.lines, 0);
    }

    #[test]
    fn test_no_trailing_newline_preserved() {
        let input = br#"{"uuid":"a","sessionId":"s"}"#;
        let processed = Effacer::default().process(input, "s").unwrap();
        assert_eq!(processed.output, input.to_vec());
    }

    #[test]
    fn test_session_unified_and_redacted() {
        let input = jsonl(&[
            json!({"uuid": "a", "parentUuid": null, "sessionId": "old", "type": "assistant",
                   "message": {"content": [{"type": "thinking", "thinking": "hmm", "signature": "s"}]}}),
            json!({"uuid": "b", "parentUuid": "a", "sessionId": "old", "type": "user",
                   "message": {"content": "thanks"}}),
        ]);

        let processed = Effacer::default().process(&input, "new-00effaced001").unwrap();
        let records = parse_output(&processed.output);

        assert_eq!(processed.stats.sessions_unified, 2);
        assert!(records.iter().all(|r| r["sessionId"] == json!("new-00effaced001")));
        assert_eq!(
            records[0].pointer("/message/content/0/thinking"),
            Some(&json!(Category::Thinking.placeholder()))
        );
        assert_eq!(records[1]["parentUuid"], json!("a"));
    }

    #[test]
    fn test_command_echo_record_dropped() {
        let input = jsonl(&[
            json!({"uuid": "a", "parentUuid": null, "type": "user", "message": {"content": "hi"}}),
            json!({"uuid": "b", "parentUuid": "a", "type": "user", "message": {"content":
                "<bash-stdout>Total cost: $0.10</bash-stdout><bash-stderr></bash-stderr>"}}),
            json!({"uuid": "c", "parentUuid": "b", "type": "assistant", "message": {"content": [{"type": "text", "text": "ok"}]}}),
        ]);

        let processed = Effacer::default().process(&input, "s").unwrap();
        let records = parse_output(&processed.output);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["uuid"], json!("c"));
        assert_eq!(records[1]["parentUuid"], json!("a"));
        assert_eq!(processed.ledger.get(Category::CommandEcho).count, 1);
    }
}
