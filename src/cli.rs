//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::RiskLevel;
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use std::path::PathBuf;

/// Migraine-Map - migraine episode analytics
///
/// Reads an exported episode snapshot, finds trigger correlations and
/// temporal patterns, and estimates near-term risk. Markdown/JSON reports.
///
/// Examples:
///   migraine-map --episodes episodes.json
///   migraine-map --episodes episodes.json --format json --output -
///   migraine-map --episodes episodes.json --context today.json --fail-on high
///   migraine-map --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Episode snapshot (JSON array) exported by the tracking app
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "MIGRAINE_MAP_EPISODES",
        required_unless_present = "init_config"
    )]
    pub episodes: Option<PathBuf>,

    /// Output file path for the report ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .migraine-map.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Current context (JSON object) for the last 24-48 hours
    ///
    /// When given, only triggers present in this context count as active.
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Reference time for month comparison and risk (RFC 3339)
    ///
    /// Defaults to the current local time.
    #[arg(long, value_name = "TIME", value_parser = parse_rfc3339)]
    pub now: Option<DateTime<FixedOffset>>,

    /// Minimum correlation (percent) for a factor to be reported
    #[arg(long, value_name = "PCT")]
    pub trigger_threshold: Option<u8>,

    /// Exit with code 2 if predicted risk is at or above this level
    ///
    /// Values: low, moderate, high, critical
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<RiskThreshold>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .migraine-map.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Risk level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum RiskThreshold {
    Low,
    Moderate,
    High,
    Critical,
}

impl From<RiskThreshold> for RiskLevel {
    fn from(threshold: RiskThreshold) -> Self {
        match threshold {
            RiskThreshold::Low => RiskLevel::Low,
            RiskThreshold::Moderate => RiskLevel::Moderate,
            RiskThreshold::High => RiskLevel::High,
            RiskThreshold::Critical => RiskLevel::Critical,
        }
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-05-01T09:00:00+02:00 ({})", e))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(threshold) = self.trigger_threshold {
            if threshold > 100 {
                return Err("Trigger threshold must be between 0 and 100".to_string());
            }
        }

        match self.episodes {
            None => return Err("An episodes file is required (--episodes)".to_string()),
            Some(ref path) if !path.is_file() => {
                return Err(format!("Episodes file does not exist: {}", path.display()));
            }
            Some(_) => {}
        }

        if let Some(ref context) = self.context {
            if !context.is_file() {
                return Err(format!("Context file does not exist: {}", context.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether the report goes to stdout instead of a file.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(episodes: PathBuf) -> Args {
        Args {
            episodes: Some(episodes),
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            context: None,
            now: None,
            trigger_threshold: None,
            fail_on: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/episodes.json")
    }

    #[test]
    fn test_validation_accepts_fixture() {
        assert!(make_args(fixture()).validate().is_ok());
    }

    #[test]
    fn test_validation_missing_episodes_file() {
        let args = make_args(PathBuf::from("/nonexistent/episodes.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(fixture());
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_threshold_range() {
        let mut args = make_args(fixture());
        args.trigger_threshold = Some(101);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(fixture());
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_raises_log_level() {
        let mut args = make_args(fixture());
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "migraine-map",
            "--episodes",
            "episodes.json",
            "--now",
            "2025-01-15T12:00:00+01:00",
            "--fail-on",
            "high",
            "--format",
            "json",
            "--output",
            "-",
        ])
        .unwrap();

        assert_eq!(args.fail_on, Some(RiskThreshold::High));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.writes_to_stdout());
        assert_eq!(
            args.now.map(|t| t.to_rfc3339()),
            Some("2025-01-15T12:00:00+01:00".to_string())
        );
        assert_eq!(RiskLevel::from(RiskThreshold::High), RiskLevel::High);
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let result = Args::try_parse_from([
            "migraine-map",
            "--episodes",
            "episodes.json",
            "--now",
            "yesterday",
        ]);
        assert!(result.is_err());
    }
}
