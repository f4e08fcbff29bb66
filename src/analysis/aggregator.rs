//! Episode aggregation and statistics.
//!
//! This module turns an episode collection into descriptive statistics,
//! trigger correlations and temporal distributions.

use super::calendar::{
    hour_bucket, local_to, month_bucket, weekday_bucket, year_month_in, YearMonth,
    MONTH_LABELS, WEEKDAY_LABELS,
};
use super::triggers::correlate;
use crate::config::AnalysisConfig;
use crate::models::{AnalyticsSummary, DayCount, Episode, HourCount, MonthCount};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Summarize episodes with the default tunables.
pub fn summarize(episodes: &[Episode], now: DateTime<FixedOffset>) -> AnalyticsSummary {
    summarize_with(episodes, now, &AnalysisConfig::default())
}

/// Summarize episodes relative to `now`.
///
/// Defined for every input, including an empty one.
pub fn summarize_with(
    episodes: &[Episode],
    now: DateTime<FixedOffset>,
    config: &AnalysisConfig,
) -> AnalyticsSummary {
    let (episodes_this_month, episodes_last_month) = monthly_comparison(episodes, now);
    let most_common_triggers = correlate(episodes, config.trigger_threshold);

    debug!(
        "Summarized {} episodes: {} triggers at or above {}%",
        episodes.len(),
        most_common_triggers.len(),
        config.trigger_threshold
    );

    AnalyticsSummary {
        total_episodes: episodes.len(),
        average_duration: average_duration(episodes),
        average_pain_intensity: average_intensity(episodes),
        episodes_this_month,
        episodes_last_month,
        most_common_triggers,
        time_patterns: hour_distribution(episodes, now),
        day_of_week_patterns: weekday_distribution(episodes, now),
        seasonal_patterns: month_distribution(episodes, now),
    }
}

/// Mean duration in minutes over episodes that have ended; 0 if none have.
pub fn average_duration(episodes: &[Episode]) -> f64 {
    let durations: Vec<i64> = episodes.iter().filter_map(Episode::duration_minutes).collect();
    mean(durations.iter().map(|d| *d as f64), durations.len())
}

/// Mean pain intensity over all episodes; 0 for an empty collection.
pub fn average_intensity(episodes: &[Episode]) -> f64 {
    mean(
        episodes.iter().map(|e| f64::from(e.pain_intensity)),
        episodes.len(),
    )
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Episodes started in the current and in the previous calendar month.
pub fn monthly_comparison(episodes: &[Episode], now: DateTime<FixedOffset>) -> (usize, usize) {
    let this_month = YearMonth::of(&now);
    let last_month = this_month.previous();

    episodes
        .iter()
        .fold((0, 0), |(this, last), episode| {
            let month = year_month_in(&episode.start_time, &now);
            if month == this_month {
                (this + 1, last)
            } else if month == last_month {
                (this, last + 1)
            } else {
                (this, last)
            }
        })
}

/// Episode starts per hour of the day in `now`'s offset, all 24 buckets.
pub fn hour_distribution(episodes: &[Episode], now: DateTime<FixedOffset>) -> Vec<HourCount> {
    let mut counts = [0usize; 24];
    for episode in episodes {
        counts[hour_bucket(&local_to(&episode.start_time, &now))] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| HourCount {
            hour: hour as u32,
            count: *count,
        })
        .collect()
}

/// Episode starts per weekday in `now`'s offset, Sunday first.
pub fn weekday_distribution(episodes: &[Episode], now: DateTime<FixedOffset>) -> Vec<DayCount> {
    let mut counts = [0usize; 7];
    for episode in episodes {
        counts[weekday_bucket(&local_to(&episode.start_time, &now))] += 1;
    }

    WEEKDAY_LABELS
        .iter()
        .zip(counts)
        .map(|(day, count)| DayCount {
            day: day.to_string(),
            count,
        })
        .collect()
}

/// Episode starts per calendar month in `now`'s offset, pooled across years.
pub fn month_distribution(episodes: &[Episode], now: DateTime<FixedOffset>) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    for episode in episodes {
        counts[month_bucket(&local_to(&episode.start_time, &now))] += 1;
    }

    MONTH_LABELS
        .iter()
        .zip(counts)
        .map(|(month, count)| MonthCount {
            month: month.to_string(),
            count,
        })
        .collect()
}

/// Episodes in chronological order of onset; ties keep insertion order.
pub fn chronological(episodes: &[Episode]) -> Vec<&Episode> {
    let mut sorted: Vec<&Episode> = episodes.iter().collect();
    sorted.sort_by_key(|e| e.start_time);
    sorted
}

/// The episode with the latest onset; the later-inserted one wins a tie.
pub fn most_recent(episodes: &[Episode]) -> Option<&Episode> {
    episodes.iter().max_by_key(|e| e.start_time)
}
