//! Tagged-text parsing implementation.
//!
//! This module handles the low-level splitting of RIS and EndNote text into records.

use crate::ris::structure::RawRisData;
use crate::ris::tags::TagConvention;
use crate::{ConvertError, Result};

/// Parse the content of a RIS or EndNote tagged file, returning structured data.
///
/// Records are separated by a blank line. Fragments that are empty after
/// splitting (trailing blank lines) are discarded.
pub(crate) fn ris_parse<S: AsRef<str>>(ris_text: S) -> Result<Vec<RawRisData>> {
    let text = normalize_newlines(ris_text.as_ref().trim_start_matches('\u{feff}'));

    let convention = TagConvention::sniff(&text)
        .map_err(|first_line| ConvertError::UnrecognizedRisFormat { first_line })?;

    let citations = text
        .split("\n\n")
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| parse_entry(entry, convention))
        .collect();

    Ok(citations)
}

/// Extract the mapped fields of one record, in line order.
fn parse_entry(entry: &str, convention: TagConvention) -> RawRisData {
    let mut raw = RawRisData::new();
    for line in entry.lines() {
        if let Some((role, value)) = convention.extract(line) {
            raw.set(role, value.to_string());
        }
    }
    raw
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
