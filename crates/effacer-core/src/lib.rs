//! Core domain models for effacer
//!
//! This crate contains:
//! - The transcript line model (parsed records and malformed passthrough lines)
//! - Redaction categories and their placeholders
//! - The savings ledger every rewrite reports into
//! - The shared error type

pub mod error;
pub mod ledger;
pub mod placeholder;
pub mod record;

pub use error::{Error, Result};
pub use ledger::{Ledger, Tally};
pub use placeholder::Category;
pub use record::{Line, Record, basename};
