use std::io::ErrorKind;
use std::path::Path;

use clap::ValueEnum;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use serde::{de, Deserialize, Deserializer};

use crate::error::{GenStatsError, Result};

pub const DEFAULT_FILE_NAME: &str = "generation-times.csv";

/// Column order of headerless files.
pub const POSITIONAL_COLUMNS: [&str; 5] = [
    "timestamp",
    "project",
    "duration_seconds",
    "success",
    "version",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// First row names the columns
    Headered,
    /// No header row, five fixed columns
    Positional,
}

/// One logged generation attempt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, alias = "project_name")]
    pub project: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration_seconds: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub success: bool,
    #[serde(default)]
    pub version: String,
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("invalid duration '{value}'")))
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(de::Error::custom(format!("invalid success flag '{raw}'"))),
    }
}

/// Reads the whole file up front, then parses it according to `layout`.
pub fn load(path: &Path, layout: Layout) -> Result<Vec<GenerationRecord>> {
    info!("Loading generation events from {}", path.display());

    let contents = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GenStatsError::FileMissing(path.to_path_buf()),
        _ => GenStatsError::Io(e),
    })?;

    let records = parse(&contents, layout)?;
    info!("Loaded {} generation events", records.len());

    Ok(records)
}

pub fn parse(contents: &[u8], layout: Layout) -> Result<Vec<GenerationRecord>> {
    debug!("Parsing {} bytes with {layout:?} layout", contents.len());

    match layout {
        Layout::Headered => parse_headered(contents),
        Layout::Positional => parse_positional(contents),
    }
}

fn parse_headered(contents: &[u8]) -> Result<Vec<GenerationRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(contents);

    reader
        .deserialize::<GenerationRecord>()
        .map(|row| row.map_err(GenStatsError::from))
        .collect()
}

fn parse_positional(contents: &[u8]) -> Result<Vec<GenerationRecord>> {
    let headers = StringRecord::from(POSITIONAL_COLUMNS.to_vec());
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents);

    reader
        .records()
        .map(|row| {
            let row = row?;
            if row.len() != POSITIONAL_COLUMNS.len() {
                return Err(GenStatsError::InvalidRecord {
                    line: row.position().map_or(0, csv::Position::line),
                    expected: POSITIONAL_COLUMNS.len(),
                    found: row.len(),
                });
            }
            Ok(row.deserialize(Some(&headers))?)
        })
        .collect()
}
