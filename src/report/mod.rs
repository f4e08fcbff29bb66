//! Report assembly and rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{most_recent, predict_with, summarize_with, PredictionInput};
use crate::config::AnalysisConfig;
use crate::models::{ContextFactors, Episode, Report, ReportMetadata};
use chrono::{DateTime, FixedOffset, Utc};

/// Run the aggregator, then the predictor on its triggers, and bundle the
/// results.
pub fn build_report(
    episodes: &[Episode],
    now: DateTime<FixedOffset>,
    source: &str,
    config: &AnalysisConfig,
    current_context: Option<&ContextFactors>,
) -> Report {
    let summary = summarize_with(episodes, now, config);

    let input = PredictionInput {
        triggers: Some(&summary.most_common_triggers),
        current_context,
    };
    let prediction = predict_with(episodes, now, &input, config);

    Report {
        metadata: ReportMetadata {
            source: source.to_string(),
            generated_at: Utc::now(),
            reference_time: now,
            trigger_threshold: config.trigger_threshold,
        },
        most_recent: most_recent(episodes).cloned(),
        prediction,
        summary,
    }
}
