//! Heuristic risk prediction.
//!
//! Three signals, each normalised to 0.0-1.0, are combined with fixed
//! weights into a probability:
//!
//! - recency: time since the last episode relative to the mean interval
//! - load: how many high-correlation triggers are active
//! - trend: whether recent episodes are more severe than the average

use super::aggregator::chronological;
use super::recommendations::recommend;
use super::triggers::{correlate, TriggerFactor};
use crate::config::{AnalysisConfig, PredictionConfig};
use crate::models::{
    ContextFactors, Episode, MigraineTrigger, RiskAssessment, RiskLevel, RiskSignals,
    TriggerCategory,
};
use chrono::{DateTime, Duration, FixedOffset};
use tracing::debug;

/// Optional inputs that refine a prediction.
#[derive(Debug, Clone, Default)]
pub struct PredictionInput<'a> {
    /// Triggers already computed by the aggregator for the same episodes.
    pub triggers: Option<&'a [MigraineTrigger]>,
    /// Context for the last 24-48 hours, if the caller tracks it.
    pub current_context: Option<&'a ContextFactors>,
}

/// Predict risk with the default tunables.
pub fn predict(episodes: &[Episode], now: DateTime<FixedOffset>) -> Option<RiskAssessment> {
    predict_with(
        episodes,
        now,
        &PredictionInput::default(),
        &AnalysisConfig::default(),
    )
}

/// Predict near-term risk. Returns `None` only for an empty collection.
pub fn predict_with(
    episodes: &[Episode],
    now: DateTime<FixedOffset>,
    input: &PredictionInput<'_>,
    config: &AnalysisConfig,
) -> Option<RiskAssessment> {
    if episodes.is_empty() {
        return None;
    }

    let tunables = &config.prediction;
    let ordered = chronological(episodes);

    let computed;
    let triggers = match input.triggers {
        Some(triggers) => triggers,
        None => {
            computed = correlate(episodes, config.trigger_threshold);
            computed.as_slice()
        }
    };
    let active_triggers = active_triggers(triggers, input.current_context);

    let interval = mean_interval(&ordered);
    let signals = RiskSignals {
        recency: recency_signal(&ordered, interval, now),
        load: load_signal(active_triggers.len(), tunables),
        trend: trend_signal(&ordered, tunables),
    };
    let probability = combine(&signals, tunables);
    let risk_level = risk_level(probability, tunables);

    let next_likely_time = match (interval, ordered.last()) {
        (Some(interval), Some(latest)) if ordered.len() >= tunables.min_episodes_for_forecast => {
            Some(latest.start_time + interval)
        }
        _ => None,
    };

    debug!(
        "Risk {} ({}%): recency {:.2}, load {:.2}, trend {:.2}",
        risk_level, probability, signals.recency, signals.load, signals.trend
    );

    Some(RiskAssessment {
        risk_level,
        probability,
        recommendations: recommend(&active_triggers, risk_level),
        active_triggers,
        next_likely_time,
        signals,
    })
}

/// Labels of the triggers that count as active.
///
/// Without a current context every reported trigger is active. With one,
/// only context triggers that hold right now are.
pub fn active_triggers(
    triggers: &[MigraineTrigger],
    current_context: Option<&ContextFactors>,
) -> Vec<String> {
    triggers
        .iter()
        .filter(|trigger| match current_context {
            None => true,
            Some(ctx) => {
                trigger.category == TriggerCategory::Context
                    && matches!(
                        TriggerFactor::from_label(&trigger.factor),
                        Some(TriggerFactor::Context(t)) if t.holds(ctx)
                    )
            }
        })
        .map(|trigger| trigger.factor.clone())
        .collect()
}

/// Mean gap between consecutive onsets; `None` with fewer than two
/// episodes or when every onset coincides.
pub fn mean_interval(ordered: &[&Episode]) -> Option<Duration> {
    if ordered.len() < 2 {
        return None;
    }

    let total: i64 = ordered
        .windows(2)
        .map(|pair| (pair[1].start_time - pair[0].start_time).num_seconds())
        .sum();
    let mean = total / (ordered.len() as i64 - 1);

    (mean > 0).then(|| Duration::seconds(mean))
}

fn recency_signal(ordered: &[&Episode], interval: Option<Duration>, now: DateTime<FixedOffset>) -> f64 {
    let (Some(interval), Some(latest)) = (interval, ordered.last()) else {
        return 0.0;
    };

    let elapsed = (now - latest.last_known_time()).num_seconds().max(0) as f64;
    (elapsed / interval.num_seconds() as f64).clamp(0.0, 1.0)
}

fn load_signal(active: usize, tunables: &PredictionConfig) -> f64 {
    if tunables.load_saturation == 0 {
        return 0.0;
    }
    (active as f64 / tunables.load_saturation as f64).min(1.0)
}

fn trend_signal(ordered: &[&Episode], tunables: &PredictionConfig) -> f64 {
    if ordered.len() < 2 || tunables.trend_scale <= 0.0 {
        return 0.0;
    }

    let window = tunables.recent_window.clamp(1, ordered.len());
    let rise = mean_intensity(&ordered[ordered.len() - window..]) - mean_intensity(ordered);
    (rise / tunables.trend_scale).clamp(0.0, 1.0)
}

fn mean_intensity(episodes: &[&Episode]) -> f64 {
    if episodes.is_empty() {
        return 0.0;
    }
    let sum: f64 = episodes.iter().map(|e| f64::from(e.pain_intensity)).sum();
    sum / episodes.len() as f64
}

fn combine(signals: &RiskSignals, tunables: &PredictionConfig) -> u8 {
    let weighted = tunables.recency_weight * signals.recency
        + tunables.load_weight * signals.load
        + tunables.trend_weight * signals.trend;
    (weighted * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Map a probability to its risk band using the configured cut points.
pub fn risk_level(probability: u8, tunables: &PredictionConfig) -> RiskLevel {
    if probability >= tunables.critical_cutoff {
        RiskLevel::Critical
    } else if probability >= tunables.high_cutoff {
        RiskLevel::High
    } else if probability >= tunables.moderate_cutoff {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}
