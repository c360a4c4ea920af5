//! Whole-transcript processing for effacer
//!
//! Per record: identity unification, then redaction and tag scrubbing.
//! Per file: local-output neutralization, structural compaction, then
//! orphan resolution.

pub mod compact;
pub mod naming;
pub mod orphan;
pub mod pipeline;
pub mod report;
pub mod unify;

pub use compact::{Compaction, Compactor, DeletionReason, ReparentState};
pub use naming::{output_path, session_id_for};
pub use orphan::resolve_orphans;
pub use pipeline::{EngineOptions, Effacer, Processed};
pub use report::{PassStats, RunReport};
pub use unify::IdentityUnifier;
