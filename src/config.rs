//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.migraine-map.toml` files. Every heuristic constant of the analytics
//! engine lives here as a named, overridable default.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".migraine-map.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Engine tunables.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "migraine_report.md".to_string()
}

/// Tunable constants of the aggregator and the predictor.
///
/// These are policy choices, not fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum correlation score (percent) for a factor to be reported.
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: u8,

    /// Heuristic risk scoring.
    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: default_trigger_threshold(),
            prediction: PredictionConfig::default(),
        }
    }
}

fn default_trigger_threshold() -> u8 {
    60
}

/// Weights, cut points and windows for the risk predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Weight of the recency signal.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    /// Weight of the active-trigger load signal.
    #[serde(default = "default_load_weight")]
    pub load_weight: f64,

    /// Weight of the severity trend signal.
    #[serde(default = "default_trend_weight")]
    pub trend_weight: f64,

    /// Number of active triggers at which the load signal saturates.
    #[serde(default = "default_load_saturation")]
    pub load_saturation: usize,

    /// Number of most recent episodes compared against the all-time average.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Intensity rise (points) at which the trend signal saturates.
    #[serde(default = "default_trend_scale")]
    pub trend_scale: f64,

    /// Probability at which risk becomes moderate.
    #[serde(default = "default_moderate_cutoff")]
    pub moderate_cutoff: u8,

    /// Probability at which risk becomes high.
    #[serde(default = "default_high_cutoff")]
    pub high_cutoff: u8,

    /// Probability at which risk becomes critical.
    #[serde(default = "default_critical_cutoff")]
    pub critical_cutoff: u8,

    /// Episodes required before a next likely time is forecast.
    #[serde(default = "default_min_forecast_episodes")]
    pub min_episodes_for_forecast: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            recency_weight: default_recency_weight(),
            load_weight: default_load_weight(),
            trend_weight: default_trend_weight(),
            load_saturation: default_load_saturation(),
            recent_window: default_recent_window(),
            trend_scale: default_trend_scale(),
            moderate_cutoff: default_moderate_cutoff(),
            high_cutoff: default_high_cutoff(),
            critical_cutoff: default_critical_cutoff(),
            min_episodes_for_forecast: default_min_forecast_episodes(),
        }
    }
}

fn default_recency_weight() -> f64 {
    0.40
}

fn default_load_weight() -> f64 {
    0.35
}

fn default_trend_weight() -> f64 {
    0.25
}

fn default_load_saturation() -> usize {
    4
}

fn default_recent_window() -> usize {
    3
}

fn default_trend_scale() -> f64 {
    2.0
}

fn default_moderate_cutoff() -> u8 {
    25
}

fn default_high_cutoff() -> u8 {
    50
}

fn default_critical_cutoff() -> u8 {
    75
}

fn default_min_forecast_episodes() -> usize {
    3
}

/// Report generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the hour/day/month distribution tables.
    #[serde(default = "default_true")]
    pub include_patterns: bool,

    /// Include the most recent episode section.
    #[serde(default = "default_true")]
    pub include_recent_episode: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_patterns: true,
            include_recent_episode: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AnalysisConfig {
    /// Reject settings the engine cannot interpret consistently.
    pub fn validate(&self) -> Result<()> {
        let p = &self.prediction;

        ensure!(
            self.trigger_threshold <= 100,
            "trigger_threshold must be at most 100 (got {})",
            self.trigger_threshold
        );
        ensure!(
            p.moderate_cutoff < p.high_cutoff && p.high_cutoff < p.critical_cutoff,
            "risk cut points must be strictly ascending (got {}/{}/{})",
            p.moderate_cutoff,
            p.high_cutoff,
            p.critical_cutoff
        );
        ensure!(
            p.critical_cutoff <= 100,
            "critical_cutoff must be at most 100"
        );
        for (name, weight) in [
            ("recency_weight", p.recency_weight),
            ("load_weight", p.load_weight),
            ("trend_weight", p.trend_weight),
        ] {
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "{} must be a non-negative number",
                name
            );
        }
        ensure!(p.load_saturation > 0, "load_saturation must be at least 1");
        ensure!(p.recent_window > 0, "recent_window must be at least 1");
        ensure!(
            p.trend_scale.is_finite() && p.trend_scale > 0.0,
            "trend_scale must be positive"
        );

        Ok(())
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .analysis
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if it exists.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the effective configuration: the explicit file when given,
    /// else the default file when present, else built-in defaults.
    ///
    /// Also returns the path the settings came from, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        Self::resolve_from(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn resolve_from(explicit: Option<&Path>, fallback: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match Self::load_if_exists(fallback)? {
            Some(config) => Ok((config, Some(fallback.to_path_buf()))),
            None => Ok((Config::default(), None)),
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(threshold) = args.trigger_threshold {
            self.analysis.trigger_threshold = threshold;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.trigger_threshold, 60);
        assert_eq!(config.analysis.prediction.moderate_cutoff, 25);
        assert_eq!(config.analysis.prediction.high_cutoff, 50);
        assert_eq!(config.analysis.prediction.critical_cutoff, 75);
        assert!(config.analysis.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[general]
output = "march.md"

[analysis]
trigger_threshold = 50

[analysis.prediction]
recent_window = 5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "march.md");
        assert_eq!(config.analysis.trigger_threshold, 50);
        assert_eq!(config.analysis.prediction.recent_window, 5);
        assert_eq!(config.analysis.prediction.recency_weight, 0.40);
        assert!(config.report.include_patterns);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[analysis.prediction]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_validate_rejects_unordered_cutoffs() {
        let mut analysis = AnalysisConfig::default();
        analysis.prediction.high_cutoff = 20;
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut analysis = AnalysisConfig::default();
        analysis.prediction.trend_weight = -0.1;
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_load_reports_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ntrigger_threshold = 150").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("trigger_threshold"));
    }

    #[test]
    fn test_resolve_falls_back_to_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_CONFIG_FILE);

        let (config, source) = Config::resolve_from(None, &fallback).unwrap();
        assert_eq!(config, Config::default());
        assert!(source.is_none());
    }

    #[test]
    fn test_resolve_rejects_invalid_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&fallback, "[analysis]\ntrigger_threshold = 150\n").unwrap();

        let err = Config::resolve_from(None, &fallback).unwrap_err();
        assert!(format!("{:#}", err).contains("trigger_threshold"));
    }

    #[test]
    fn test_resolve_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&fallback, "[analysis]\ntrigger_threshold = 40\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[general]\nverbose = true\n").unwrap();

        let (config, source) = Config::resolve_from(Some(explicit.as_path()), &fallback).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.analysis.trigger_threshold, 60);
        assert_eq!(source, Some(explicit));
    }
}
