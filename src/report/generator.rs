//! Markdown report generation.
//!
//! This module renders the analytics summary and risk assessment as a
//! Markdown document, or serializes them as JSON.

use crate::config::ReportConfig;
use crate::models::{AnalyticsSummary, Episode, Report, ReportMetadata, RiskAssessment};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Migraine-Map Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_monthly_section(&report.summary));

    if config.include_recent_episode {
        if let Some(ref episode) = report.most_recent {
            output.push_str(&generate_recent_episode_section(episode));
        }
    }

    output.push_str(&generate_triggers_section(&report.summary));

    if config.include_patterns && report.summary.total_episodes > 0 {
        output.push_str(&generate_patterns_section(&report.summary));
    }

    output.push_str(&generate_risk_section(report.prediction.as_ref()));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Reference Time:** {}\n",
        metadata.reference_time.format("%Y-%m-%d %H:%M %:z")
    ));
    section.push_str(&format!(
        "- **Trigger Threshold:** {}%\n\n",
        metadata.trigger_threshold
    ));

    section
}

/// Generate the summary statistics table.
fn generate_summary_section(summary: &AnalyticsSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    if summary.total_episodes == 0 {
        section.push_str("No episodes have been logged yet.\n\n");
        return section;
    }

    section.push_str("| Total Episodes | Avg Duration | Avg Pain |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.1}/10 |\n\n",
        summary.total_episodes,
        format_minutes(summary.average_duration),
        summary.average_pain_intensity
    ));

    section
}

/// Generate the month-over-month comparison.
fn generate_monthly_section(summary: &AnalyticsSummary) -> String {
    let mut section = String::new();

    section.push_str("## Month-over-Month\n\n");
    section.push_str("| This Month | Last Month |\n");
    section.push_str("|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} |\n\n",
        summary.episodes_this_month, summary.episodes_last_month
    ));

    let change = summary.month_over_month();
    if change < 0 {
        section.push_str(&format!(
            "✓ Great progress! Episodes are down by {} this month.\n\n",
            -change
        ));
    } else if change > 0 {
        section.push_str(&format!(
            "Episodes increased by {} this month. Review your triggers and consider preventive strategies.\n\n",
            change
        ));
    }

    section
}

/// Generate the most recent episode section.
fn generate_recent_episode_section(episode: &Episode) -> String {
    let mut section = String::new();

    section.push_str("## Most Recent Episode\n\n");
    section.push_str(&format!(
        "- **Started:** {}\n",
        episode.start_time.format("%b %-d, %Y %-I:%M %p")
    ));
    section.push_str(&format!(
        "- **Duration:** {}\n",
        episode
            .duration_minutes()
            .map(|m| format_minutes(m as f64))
            .unwrap_or_else(|| "Ongoing".to_string())
    ));
    section.push_str(&format!(
        "- **Pain Intensity:** {}/10\n",
        episode.pain_intensity
    ));

    let zones: Vec<&str> = episode
        .pain_location
        .zones()
        .iter()
        .map(|z| z.label())
        .collect();
    if !zones.is_empty() {
        section.push_str(&format!("- **Location:** {}\n", zones.join(", ")));
    }

    let symptoms: Vec<&str> = episode.symptoms.kinds().iter().map(|k| k.label()).collect();
    if !symptoms.is_empty() {
        section.push_str(&format!("- **Symptoms:** {}\n", symptoms.join(", ")));
    }

    if let Some(med) = episode.medications.first() {
        section.push_str(&format!(
            "- **Medication:** {} ({}), relief {}/10\n",
            med.name, med.dosage, med.relief_level
        ));
    }

    section.push('\n');
    section
}

/// Generate the trigger correlation table.
fn generate_triggers_section(summary: &AnalyticsSummary) -> String {
    let mut section = String::new();

    section.push_str("## Trigger Correlations\n\n");

    if summary.most_common_triggers.is_empty() {
        section.push_str("No factor is common enough across episodes to be reported.\n\n");
        return section;
    }

    section.push_str("| Factor | Category | Correlation | Episodes |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");

    for trigger in &summary.most_common_triggers {
        section.push_str(&format!(
            "| {} | {} | {}% | {} of {} |\n",
            trigger.factor,
            trigger.category,
            trigger.correlation_score,
            trigger.occurrences,
            summary.total_episodes
        ));
    }
    section.push('\n');

    section
}

/// Generate the hour, weekday and month distribution tables.
fn generate_patterns_section(summary: &AnalyticsSummary) -> String {
    let mut section = String::new();

    section.push_str("## Temporal Patterns\n\n");

    // Only hours that saw an episode; 24 mostly-empty rows are noise.
    section.push_str("### Time of Day\n\n");
    section.push_str("| Hour | Episodes |\n");
    section.push_str("|:---:|:---:|\n");
    for bucket in summary.time_patterns.iter().filter(|h| h.count > 0) {
        section.push_str(&format!("| {:02}:00 | {} |\n", bucket.hour, bucket.count));
    }
    section.push('\n');

    section.push_str("### Day of Week\n\n");
    section.push_str(&horizontal_table(
        summary
            .day_of_week_patterns
            .iter()
            .map(|d| (d.day.as_str(), d.count)),
    ));

    section.push_str("### Seasonal\n\n");
    section.push_str(&horizontal_table(
        summary
            .seasonal_patterns
            .iter()
            .map(|m| (m.month.as_str(), m.count)),
    ));

    section
}

fn horizontal_table<'a>(buckets: impl Iterator<Item = (&'a str, usize)>) -> String {
    let (labels, counts): (Vec<&str>, Vec<usize>) = buckets.unzip();

    let mut table = String::new();
    table.push_str(&format!("| {} |\n", labels.join(" | ")));
    table.push_str(&format!("|{}\n", ":---:|".repeat(labels.len())));
    table.push_str(&format!(
        "| {} |\n\n",
        counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    ));
    table
}

/// Generate the risk assessment section.
fn generate_risk_section(prediction: Option<&RiskAssessment>) -> String {
    let mut section = String::new();

    section.push_str("## Risk Assessment\n\n");

    let Some(prediction) = prediction else {
        section.push_str("Not enough data for a prediction. Log an episode to get started.\n\n");
        return section;
    };

    section.push_str(&format!(
        "{} **{}** risk ({}%)\n\n",
        prediction.risk_level.emoji(),
        prediction.risk_level.to_string().to_uppercase(),
        prediction.probability
    ));

    if let Some(next) = prediction.next_likely_time {
        section.push_str(&format!(
            "- **Next Likely Episode:** around {}\n",
            next.format("%b %-d, %Y")
        ));
    }
    section.push_str(&format!(
        "- **Signals:** recency {:.2}, trigger load {:.2}, severity trend {:.2}\n\n",
        prediction.signals.recency, prediction.signals.load, prediction.signals.trend
    ));

    if !prediction.active_triggers.is_empty() {
        section.push_str("### Active Triggers\n\n");
        for trigger in &prediction.active_triggers {
            section.push_str(&format!("- {}\n", trigger));
        }
        section.push('\n');
    }

    section.push_str("### Action Plan\n\n");
    for (i, rec) in prediction.recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Migraine-Map helps you track and understand migraines. ");
    footer.push_str("Always consult healthcare professionals for medical advice.*\n");

    footer
}

fn format_minutes(minutes: f64) -> String {
    if minutes < 60.0 {
        format!("{:.0} min", minutes)
    } else {
        format!("{:.1} h", minutes / 60.0)
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, RiskSignals};
    use crate::report::build_report;
    use chrono::{DateTime, Duration, Utc};

    fn at(s: &str) -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn create_test_report() -> Report {
        let mut first = Episode::new("1", at("2024-10-28T08:00:00+01:00"), 6);
        first.end_time = Some(first.start_time + Duration::minutes(240));
        first.context_factors.stress_level = 8;

        let mut second = Episode::new("2", at("2024-11-04T18:30:00+01:00"), 8);
        second.context_factors.stress_level = 9;
        second.pain_location.temporal = true;
        second.symptoms.nausea = true;

        build_report(
            &[first, second],
            at("2024-11-10T12:00:00+01:00"),
            "episodes.json",
            &Default::default(),
            None,
        )
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Migraine-Map Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Trigger Correlations"));
        assert!(markdown.contains("| High Stress (≥7) | Context | 100% | 2 of 2 |"));
        assert!(markdown.contains("## Temporal Patterns"));
        assert!(markdown.contains("| 08:00 | 1 |"));
        assert!(markdown.contains("## Most Recent Episode"));
        assert!(markdown.contains("- **Duration:** Ongoing"));
        assert!(markdown.contains("### Action Plan"));
    }

    #[test]
    fn test_sections_can_be_disabled() {
        let report = create_test_report();
        let config = ReportConfig {
            include_patterns: false,
            include_recent_episode: false,
        };
        let markdown = generate_markdown_report(&report, &config);

        assert!(!markdown.contains("## Temporal Patterns"));
        assert!(!markdown.contains("## Most Recent Episode"));
    }

    #[test]
    fn test_monthly_section_messages() {
        let mut summary = AnalyticsSummary {
            episodes_this_month: 1,
            episodes_last_month: 3,
            ..Default::default()
        };
        assert!(generate_monthly_section(&summary).contains("down by 2"));

        summary.episodes_this_month = 5;
        assert!(generate_monthly_section(&summary).contains("increased by 2"));
    }

    #[test]
    fn test_risk_section() {
        let prediction = RiskAssessment {
            risk_level: RiskLevel::Critical,
            probability: 80,
            active_triggers: vec!["Neck Tension".to_string()],
            recommendations: vec!["Do gentle neck and shoulder stretches".to_string()],
            next_likely_time: Some(at("2024-11-12T08:00:00+01:00")),
            signals: RiskSignals {
                recency: 1.0,
                load: 0.5,
                trend: 0.7,
            },
        };

        let section = generate_risk_section(Some(&prediction));
        assert!(section.contains("**CRITICAL** risk (80%)"));
        assert!(section.contains("Nov 12, 2024"));
        assert!(section.contains("1. Do gentle neck and shoulder stretches"));

        assert!(generate_risk_section(None).contains("Not enough data"));
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(
            &[],
            at("2024-11-10T12:00:00+01:00"),
            "empty.json",
            &Default::default(),
            None,
        );
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("No episodes have been logged yet."));
        assert!(!markdown.contains("## Temporal Patterns"));
        assert!(report.metadata.generated_at <= Utc::now());
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"totalEpisodes\": 2"));
        assert!(json.contains("\"mostCommonTriggers\""));
        assert!(json.contains("\"riskLevel\""));
        assert!(json.contains("\"mostRecent\""));
    }
}
