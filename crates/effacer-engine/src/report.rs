use std::collections::BTreeMap;
use std::path::PathBuf;

use effacer_core::Ledger;
use serde::Serialize;

use crate::compact::DeletionReason;

/// Counters from one pass over a transcript.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassStats {
    pub lines: usize,
    pub records: usize,
    pub malformed: usize,
    pub sessions_unified: usize,
    pub local_output_neutralized: usize,
    pub dropped: BTreeMap<DeletionReason, usize>,
    pub reparented: usize,
    pub rerooted: usize,
    pub orphans_promoted: usize,
}

impl PassStats {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// Everything the CLI needs to report on a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub session_id: String,
    pub written: bool,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub stats: PassStats,
    pub ledger: Ledger,
}

impl RunReport {
    pub fn bytes_reduced(&self) -> usize {
        self.input_bytes.saturating_sub(self.output_bytes)
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.bytes_reduced() as f64 * 100.0 / self.input_bytes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction() {
        let report = RunReport {
            input: PathBuf::from("a.jsonl"),
            output: PathBuf::from("a-00effaced001.jsonl"),
            session_id: "a-00effaced001".to_string(),
            written: true,
            input_bytes: 1000,
            output_bytes: 250,
            stats: PassStats::default(),
            ledger: Ledger::new(),
        };
        assert_eq!(report.bytes_reduced(), 750);
        assert!((report.reduction_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_input() {
        let report = RunReport {
            input: PathBuf::new(),
            output: PathBuf::new(),
            session_id: String::new(),
            written: false,
            input_bytes: 0,
            output_bytes: 0,
            stats: PassStats::default(),
            ledger: Ledger::new(),
        };
        assert_eq!(report.reduction_percent(), 0.0);
    }
}
