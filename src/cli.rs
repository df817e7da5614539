use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::records::{Layout, DEFAULT_FILE_NAME};
use crate::report::{OutputFormat, StatsReport};
use crate::reporter::{no_data_message, Outcome, ReporterConfig, StatsReporter};

#[derive(Parser)]
#[command(name = "genstats")]
#[command(author, version, about = "Generation Time Statistics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// CSV file with generation events
    #[arg(short, long, global = true, env = "GENSTATS_FILE", default_value = DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// Override how columns are read (defaults depend on the command)
    #[arg(short, long, global = true, value_enum)]
    layout: Option<Layout>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Summarize every event in a headered file, including success rate
    Summary,
    /// Summarize events of one version from a headerless file
    Versions {
        /// Version to analyze, or "all" (prompted for when omitted)
        #[arg(short = 'F', long)]
        filter: Option<String>,
    },
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        let reporter = StatsReporter::new(self.file.clone(), self.config());
        info!("Analyzing {}", reporter.path.display());

        if let Err(e) = self.report(&reporter) {
            warn!("Run failed: {e}");
            println!("{}", e.user_message());
        }

        io::stdout().flush()?;
        Ok(())
    }

    fn config(&self) -> ReporterConfig {
        let mut config = match &self.command {
            None | Some(Commands::Summary) => ReporterConfig::summary(),
            Some(Commands::Versions { filter }) => ReporterConfig::by_version(filter.clone()),
        };

        if let Some(layout) = self.layout {
            config.layout = layout;
        }

        config
    }

    fn report(&self, reporter: &StatsReporter) -> crate::error::Result<()> {
        let outcome = reporter.run(io::stdin().lock(), io::stdout())?;

        match outcome {
            Outcome::NoData { version } => println!("{}", no_data_message(&version)),
            Outcome::Report {
                stats,
                version_filter,
            } => {
                let rendered = self.render(&stats, version_filter.as_deref())?;

                if let Some(output_path) = &self.output {
                    std::fs::write(output_path, rendered)?;
                    info!("Report written to: {}", output_path.display());
                } else {
                    print!("{rendered}");
                }
            }
        }

        Ok(())
    }

    fn render(
        &self,
        stats: &StatsReport,
        version_filter: Option<&str>,
    ) -> crate::error::Result<String> {
        match self.format {
            OutputFormat::Text => Ok(stats.render_text(version_filter)),
            OutputFormat::Json => {
                let source = self.file.display().to_string();
                let json = stats.render_json(&source, version_filter, self.pretty)?;
                Ok(format!("{json}\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("genstats").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_runs_summary_on_default_file() {
        let cli = parse(&[]);

        assert_eq!(cli.command, None);
        assert_eq!(cli.file, PathBuf::from(DEFAULT_FILE_NAME));
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.config(), ReporterConfig::summary());
    }

    #[test]
    fn test_versions_without_filter_prompts() {
        let cli = parse(&["versions"]);

        assert_eq!(cli.config(), ReporterConfig::by_version(None));
    }

    #[test]
    fn test_versions_with_filter_is_fixed() {
        let cli = parse(&["versions", "--filter", "v2"]);

        assert_eq!(
            cli.config(),
            ReporterConfig::by_version(Some("v2".to_string()))
        );
    }

    #[test]
    fn test_layout_override_applies_to_command() {
        let cli = parse(&["versions", "-F", "all", "--layout", "headered"]);

        assert_eq!(cli.config().layout, Layout::Headered);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["summary", "--file", "data.csv", "--format", "json", "-p"]);

        assert_eq!(cli.command, Some(Commands::Summary));
        assert_eq!(cli.file, PathBuf::from("data.csv"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.pretty);
    }

    #[test]
    fn test_rejects_unknown_layout() {
        let result = Cli::try_parse_from(["genstats", "--layout", "columnar"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_report_writes_text_to_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("generation-times.csv");
        let output = dir.path().join("report.txt");
        std::fs::write(
            &input,
            "timestamp,project_name,duration_seconds,success,version\n\
             t1,p,10.0,true,v1\nt2,p,20.0,false,v1\nt3,p,30.0,true,v2\n",
        )
        .unwrap();
        let cli = parse(&[
            "--file",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);

        cli.execute().unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("Number of generations: 3\n"));
        assert!(written.contains("Success rate: 66.7%\n"));
    }

    #[test]
    fn test_report_writes_json_for_fixed_version() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("generation-times.csv");
        let output = dir.path().join("report.json");
        std::fs::write(&input, "t1,p,10.0,true,v1\nt2,p,20.0,false,v1\n").unwrap();
        let cli = parse(&[
            "versions",
            "--filter",
            "V1",
            "--file",
            input.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ]);

        cli.execute().unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["version_filter"], "v1");
        assert_eq!(value["stats"]["count"], 2);
        assert_eq!(value["stats"]["median"], 15.0);
    }

    #[test]
    fn test_missing_file_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("generation-times.csv");
        let output = dir.path().join("report.txt");
        let cli = parse(&[
            "--file",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);

        assert!(cli.execute().is_ok());
        assert!(!output.exists());
    }
}
