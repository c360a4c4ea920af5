//! Output path derivation
//!
//! The last 12 characters of the transcript's base name are replaced by a
//! counter suffix `00effaced{NNN}`. Re-running on an effaced file bumps the
//! counter, so the source is never overwritten.

use std::path::{Path, PathBuf};

use effacer_core::{Error, Result};

const EXTENSION: &str = ".jsonl";
const MARKER: &str = "00effaced";
const SUFFIX_LEN: usize = 12;
const MAX_COUNTER: u32 = 999;

/// Path of the effaced copy of `input`.
pub fn output_path(input: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidPath(input.display().to_string()))?;

    // Foreign extensions stay part of the name: `x.txt` -> `x.txt-00effaced001.jsonl`.
    let new_stem = match name.strip_suffix(EXTENSION) {
        Some(stem) => derive_stem(stem)?,
        None => format!("{name}-{}", suffix(1)),
    };
    Ok(input.with_file_name(format!("{new_stem}{EXTENSION}")))
}

/// The session id carried by an effaced file: its base name without extension.
pub fn session_id_for(output: &Path) -> Result<String> {
    output
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidPath(output.display().to_string()))
}

fn derive_stem(stem: &str) -> Result<String> {
    let char_count = stem.chars().count();
    if char_count < SUFFIX_LEN {
        return Ok(format!("{stem}-{}", suffix(1)));
    }

    let split = stem
        .char_indices()
        .nth(char_count - SUFFIX_LEN)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let (head, tail) = stem.split_at(split);

    let next = match parse_counter(tail) {
        Some(n) if n >= MAX_COUNTER => {
            return Err(Error::InvalidPath(format!(
                "effaced counter exhausted for '{stem}'"
            )));
        }
        Some(n) => n + 1,
        None => 1,
    };
    Ok(format!("{head}{}", suffix(next)))
}

fn suffix(counter: u32) -> String {
    format!("{MARKER}{counter:03}")
}

fn parse_counter(tail: &str) -> Option<u32> {
    let digits = tail.strip_prefix(MARKER)?;
    if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
