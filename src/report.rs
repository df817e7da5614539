use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;
use crate::filter::ALL_VERSIONS;

const TITLE: &str = "Generation Time Statistics";
const TIME_UNIT: &str = "seconds";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

/// JSON document written by `--format json`.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub version_filter: Option<&'a str>,
    pub stats: &'a StatsReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl StatsReport {
    /// Ordered `(name, value)` lines of the text report.
    fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Number of generations", self.count.to_string()),
            ("Average (mean) time", format_float(self.mean)),
            ("Median time", format_float(self.median)),
            ("Fastest time", format_float(self.min)),
            ("Slowest time", format_float(self.max)),
        ];

        if let Some(rate) = self.success_rate {
            lines.push(("Success rate", format!("{}%", format_float(rate))));
        }

        lines
    }

    pub fn render_text(&self, version_filter: Option<&str>) -> String {
        let mut out = format!("\n{}:\n", header(version_filter));

        for (name, value) in self.lines() {
            let line = if name.to_lowercase().contains("time") {
                format!("{name}: {value} {TIME_UNIT}\n")
            } else {
                format!("{name}: {value}\n")
            };
            out.push_str(&line);
        }

        out
    }

    pub fn render_json(
        &self,
        source: &str,
        version_filter: Option<&str>,
        pretty: bool,
    ) -> Result<String> {
        let envelope = ReportEnvelope {
            source: source.to_string(),
            generated_at: Utc::now(),
            version_filter,
            stats: self,
        };

        let json = if pretty {
            serde_json::to_string_pretty(&envelope)?
        } else {
            serde_json::to_string(&envelope)?
        };

        Ok(json)
    }
}

fn header(version_filter: Option<&str>) -> String {
    match version_filter {
        None => TITLE.to_string(),
        Some(ALL_VERSIONS) => format!("{TITLE} (all versions)"),
        Some(version) => format!("{TITLE} (version: {version})"),
    }
}

/// Shortest round-trip form, always with a fractional part (`15.0`, `1.01`).
fn format_float(value: f64) -> String {
    format!("{value:?}")
}
