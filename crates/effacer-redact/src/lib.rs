//! Record-level redaction for effacer
//!
//! - `redactor`: the ordered rule registry applied to every record
//! - `rules`: the built-in rule catalog
//! - `scrub`: removal of tagged spans inside free-form text
//! - `tags`: the tag vocabulary shared with the structural compactor

pub mod redactor;
pub mod rules;
pub mod scrub;
pub mod tags;

pub use redactor::{RedactionRule, Redactor, Rule};
pub use scrub::Scrubber;
