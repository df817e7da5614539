use std::io::{BufRead, Write};

use log::debug;

use crate::error::Result;
use crate::records::GenerationRecord;

pub const ALL_VERSIONS: &str = "all";

pub fn normalize_version(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Keeps the records tagged with `version`, or all of them for `all`.
///
/// The token and the stored values are both normalized before comparison.
pub fn select_version(records: Vec<GenerationRecord>, version: &str) -> Vec<GenerationRecord> {
    let version = normalize_version(version);
    if version == ALL_VERSIONS {
        return records;
    }

    let selected: Vec<_> = records
        .into_iter()
        .filter(|r| normalize_version(&r.version) == version)
        .collect();

    debug!("{} records match version '{version}'", selected.len());
    selected
}

/// Asks for a version on `output` and reads one line from `input`.
pub fn prompt_version<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<String> {
    write!(output, "Enter version to analyze (or '{ALL_VERSIONS}' for all versions): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(normalize_version(&line))
}
