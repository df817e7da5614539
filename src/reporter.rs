use std::io::{BufRead, Write};
use std::path::PathBuf;

use log::{info, warn};

use crate::error::Result;
use crate::filter::{normalize_version, prompt_version, select_version};
use crate::records::{load, Layout};
use crate::report::StatsReport;
use crate::stats::summarize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    Unfiltered,
    Prompt,
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub layout: Layout,
    pub version_source: VersionSource,
    pub include_success_rate: bool,
}

impl ReporterConfig {
    /// Headered file, every record, with success rate.
    pub fn summary() -> Self {
        Self {
            layout: Layout::Headered,
            version_source: VersionSource::Unfiltered,
            include_success_rate: true,
        }
    }

    /// Headerless file filtered by a version token.
    pub fn by_version(version: Option<String>) -> Self {
        Self {
            layout: Layout::Positional,
            version_source: version.map_or(VersionSource::Prompt, VersionSource::Fixed),
            include_success_rate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Report {
        stats: StatsReport,
        version_filter: Option<String>,
    },
    NoData {
        version: String,
    },
}

pub struct StatsReporter {
    pub path: PathBuf,
    pub config: ReporterConfig,
}

impl StatsReporter {
    pub fn new(path: PathBuf, config: ReporterConfig) -> Self {
        Self { path, config }
    }

    /// Load, optionally filter, then summarize. The prompt (if any) is
    /// written to `prompt_out` and answered from `input`.
    pub fn run<R: BufRead, W: Write>(&self, input: R, prompt_out: W) -> Result<Outcome> {
        let records = load(&self.path, self.config.layout)?;

        let (records, version_filter) = match &self.config.version_source {
            VersionSource::Unfiltered => (records, None),
            VersionSource::Prompt => {
                let version = prompt_version(input, prompt_out)?;
                (select_version(records, &version), Some(version))
            }
            VersionSource::Fixed(raw) => {
                let version = normalize_version(raw);
                (select_version(records, &version), Some(version))
            }
        };

        if let Some(version) = &version_filter {
            if records.is_empty() {
                warn!("No records matched version '{version}'");
                return Ok(Outcome::NoData {
                    version: version.clone(),
                });
            }
        }

        let stats = summarize(&records, self.config.include_success_rate)?;
        info!("Summarized {} generation events", stats.count);

        Ok(Outcome::Report {
            stats,
            version_filter,
        })
    }
}

pub fn no_data_message(version: &str) -> String {
    format!("No data found for version {version}")
}
