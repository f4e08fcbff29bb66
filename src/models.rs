//! Data models for migraine tracking.
//!
//! This module contains the episode record supplied by the external store
//! and the value objects produced by the analytics engine. Field names are
//! serialized in camelCase so snapshots exported by the tracking app load
//! unchanged.

use crate::error::EpisodeError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anatomical zone where pain was felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PainZone {
    Frontal,
    Temporal,
    Parietal,
    Occipital,
    Neck,
    LeftSide,
    RightSide,
}

impl PainZone {
    /// Every zone in canonical order.
    pub const ALL: [PainZone; 7] = [
        PainZone::Frontal,
        PainZone::Temporal,
        PainZone::Parietal,
        PainZone::Occipital,
        PainZone::Neck,
        PainZone::LeftSide,
        PainZone::RightSide,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PainZone::Frontal => "Frontal",
            PainZone::Temporal => "Temporal",
            PainZone::Parietal => "Parietal",
            PainZone::Occipital => "Occipital",
            PainZone::Neck => "Neck",
            PainZone::LeftSide => "Left Side",
            PainZone::RightSide => "Right Side",
        }
    }
}

/// Symptom accompanying an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymptomKind {
    Aura,
    Nausea,
    Vomiting,
    LightSensitivity,
    SoundSensitivity,
    SmellSensitivity,
    VisualDisturbances,
    Dizziness,
}

impl SymptomKind {
    /// Every symptom in canonical order.
    pub const ALL: [SymptomKind; 8] = [
        SymptomKind::Aura,
        SymptomKind::Nausea,
        SymptomKind::Vomiting,
        SymptomKind::LightSensitivity,
        SymptomKind::SoundSensitivity,
        SymptomKind::SmellSensitivity,
        SymptomKind::VisualDisturbances,
        SymptomKind::Dizziness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SymptomKind::Aura => "Aura",
            SymptomKind::Nausea => "Nausea",
            SymptomKind::Vomiting => "Vomiting",
            SymptomKind::LightSensitivity => "Light Sensitivity",
            SymptomKind::SoundSensitivity => "Sound Sensitivity",
            SymptomKind::SmellSensitivity => "Smell Sensitivity",
            SymptomKind::VisualDisturbances => "Visual Disturbances",
            SymptomKind::Dizziness => "Dizziness",
        }
    }
}

/// Where the pain was located. One flag per [`PainZone`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PainLocation {
    pub frontal: bool,
    pub temporal: bool,
    pub parietal: bool,
    pub occipital: bool,
    pub neck: bool,
    pub left_side: bool,
    pub right_side: bool,
}

impl PainLocation {
    pub fn is_set(&self, zone: PainZone) -> bool {
        match zone {
            PainZone::Frontal => self.frontal,
            PainZone::Temporal => self.temporal,
            PainZone::Parietal => self.parietal,
            PainZone::Occipital => self.occipital,
            PainZone::Neck => self.neck,
            PainZone::LeftSide => self.left_side,
            PainZone::RightSide => self.right_side,
        }
    }

    /// Zones flagged for this episode, in canonical order.
    pub fn zones(&self) -> Vec<PainZone> {
        PainZone::ALL
            .into_iter()
            .filter(|zone| self.is_set(*zone))
            .collect()
    }
}

/// Symptoms experienced. One flag per [`SymptomKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Symptoms {
    pub aura: bool,
    pub nausea: bool,
    pub vomiting: bool,
    pub light_sensitivity: bool,
    pub sound_sensitivity: bool,
    pub smell_sensitivity: bool,
    pub visual_disturbances: bool,
    pub dizziness: bool,
}

impl Symptoms {
    pub fn is_set(&self, kind: SymptomKind) -> bool {
        match kind {
            SymptomKind::Aura => self.aura,
            SymptomKind::Nausea => self.nausea,
            SymptomKind::Vomiting => self.vomiting,
            SymptomKind::LightSensitivity => self.light_sensitivity,
            SymptomKind::SoundSensitivity => self.sound_sensitivity,
            SymptomKind::SmellSensitivity => self.smell_sensitivity,
            SymptomKind::VisualDisturbances => self.visual_disturbances,
            SymptomKind::Dizziness => self.dizziness,
        }
    }

    /// Symptoms flagged for this episode, in canonical order.
    pub fn kinds(&self) -> Vec<SymptomKind> {
        SymptomKind::ALL
            .into_iter()
            .filter(|kind| self.is_set(*kind))
            .collect()
    }
}

/// A medication taken during an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub time_taken: DateTime<FixedOffset>,
    /// Reported relief, 0 (none) to 10 (complete).
    pub relief_level: u8,
}

/// Barometric pressure category on the day of onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherPressure {
    Low,
    #[default]
    Normal,
    High,
}

/// Menstrual cycle phase, tracked only when the user opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HormonalPhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

/// Context for the 24 hours preceding onset.
///
/// Missing fields fall back to the same neutral values the logging form
/// starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextFactors {
    pub screen_time_hours: f64,
    pub work_hours: f64,
    pub driving_hours: f64,
    pub exercise_minutes: u32,
    pub sleep_hours: f64,
    /// 1-5
    pub sleep_quality: u8,
    /// 1-10
    pub stress_level: u8,
    /// 1-5
    pub posture_rating: u8,
    pub neck_tension: bool,
    /// 1-5
    pub environmental_noise: u8,
    /// 1-5
    pub light_exposure: u8,
    pub weather_pressure: WeatherPressure,
    pub hydration_glasses: u32,
    /// Cups.
    pub caffeine_intake: u32,
    /// Drinks.
    pub alcohol_intake: u32,
    /// 1-5
    pub meal_regularity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hormonal_phase: Option<HormonalPhase>,
}

impl Default for ContextFactors {
    fn default() -> Self {
        Self {
            screen_time_hours: 0.0,
            work_hours: 0.0,
            driving_hours: 0.0,
            exercise_minutes: 0,
            sleep_hours: 7.0,
            sleep_quality: 3,
            stress_level: 5,
            posture_rating: 3,
            neck_tension: false,
            environmental_noise: 3,
            light_exposure: 3,
            weather_pressure: WeatherPressure::Normal,
            hydration_glasses: 8,
            caffeine_intake: 0,
            alcohol_intake: 0,
            meal_regularity: 3,
            hormonal_phase: None,
        }
    }
}

impl ContextFactors {
    /// Check scale fields and quantities against their documented ranges.
    pub fn validate(&self, id: &str) -> Result<(), EpisodeError> {
        let scales: [(&'static str, u8, u8, u8); 6] = [
            ("sleepQuality", self.sleep_quality, 1, 5),
            ("stressLevel", self.stress_level, 1, 10),
            ("postureRating", self.posture_rating, 1, 5),
            ("environmentalNoise", self.environmental_noise, 1, 5),
            ("lightExposure", self.light_exposure, 1, 5),
            ("mealRegularity", self.meal_regularity, 1, 5),
        ];
        for (field, value, min, max) in scales {
            if !(min..=max).contains(&value) {
                return Err(EpisodeError::ScaleOutOfRange {
                    id: id.to_string(),
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        let quantities: [(&'static str, f64); 4] = [
            ("screenTimeHours", self.screen_time_hours),
            ("workHours", self.work_hours),
            ("drivingHours", self.driving_hours),
            ("sleepHours", self.sleep_hours),
        ];
        for (field, value) in quantities {
            if !value.is_finite() || value < 0.0 {
                return Err(EpisodeError::InvalidQuantity {
                    id: id.to_string(),
                    field,
                });
            }
        }

        Ok(())
    }
}

/// One logged migraine episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub start_time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
    /// 1-10
    pub pain_intensity: u8,
    #[serde(default)]
    pub pain_location: PainLocation,
    #[serde(default)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub context_factors: ContextFactors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Episode {
    /// Creates an ongoing episode with default context.
    pub fn new(id: impl Into<String>, start_time: DateTime<FixedOffset>, pain_intensity: u8) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: None,
            pain_intensity,
            pain_location: PainLocation::default(),
            symptoms: Symptoms::default(),
            medications: Vec::new(),
            context_factors: ContextFactors::default(),
            notes: None,
        }
    }

    /// Duration in whole minutes, or `None` while the episode is ongoing.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time.map(|end| {
            let seconds = (end - self.start_time).num_seconds();
            (seconds as f64 / 60.0).round() as i64
        })
    }

    /// An episode is resolved once it has an end time.
    pub fn resolved(&self) -> bool {
        self.end_time.is_some()
    }

    /// The latest known moment of the episode: its end if resolved, else its start.
    pub fn last_known_time(&self) -> DateTime<FixedOffset> {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Check the data-model invariants.
    pub fn validate(&self) -> Result<(), EpisodeError> {
        if !(1..=10).contains(&self.pain_intensity) {
            return Err(EpisodeError::IntensityOutOfRange {
                id: self.id.clone(),
                value: self.pain_intensity,
            });
        }

        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(EpisodeError::EndBeforeStart {
                    id: self.id.clone(),
                });
            }
        }

        if let Some(med) = self.medications.iter().find(|m| m.relief_level > 10) {
            return Err(EpisodeError::ReliefOutOfRange {
                id: self.id.clone(),
                medication: med.name.clone(),
                value: med.relief_level,
            });
        }

        self.context_factors.validate(&self.id)
    }
}

/// Which part of an episode a trigger factor is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerCategory {
    Context,
    PainLocation,
    Symptom,
}

impl fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerCategory::Context => write!(f, "Context"),
            TriggerCategory::PainLocation => write!(f, "Pain Location"),
            TriggerCategory::Symptom => write!(f, "Symptom"),
        }
    }
}

/// A candidate factor that co-occurs with enough episodes to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigraineTrigger {
    pub factor: String,
    pub category: TriggerCategory,
    /// Percentage of all episodes in which the factor was present.
    pub correlation_score: u8,
    pub occurrences: usize,
}

/// Episode count for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Episode count for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: String,
    pub count: usize,
}

/// Episode count for one calendar month, across all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// Descriptive statistics over the whole episode collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_episodes: usize,
    /// Minutes, over episodes with a known duration.
    pub average_duration: f64,
    pub average_pain_intensity: f64,
    pub episodes_this_month: usize,
    pub episodes_last_month: usize,
    pub most_common_triggers: Vec<MigraineTrigger>,
    pub time_patterns: Vec<HourCount>,
    pub day_of_week_patterns: Vec<DayCount>,
    pub seasonal_patterns: Vec<MonthCount>,
}

impl AnalyticsSummary {
    /// Signed change in episode count from last month to this month.
    pub fn month_over_month(&self) -> i64 {
        self.episodes_this_month as i64 - self.episodes_last_month as i64
    }
}

/// Near-term risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

impl RiskLevel {
    /// Returns an emoji representation of the risk level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Moderate => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }
}

/// The individual heuristic signals behind a probability, each in 0.0-1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSignals {
    pub recency: f64,
    pub load: f64,
    pub trend: f64,
}

/// Forward-looking risk estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub probability: u8,
    pub active_triggers: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_likely_time: Option<DateTime<FixedOffset>>,
    pub signals: RiskSignals,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Where the episodes were read from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The "now" month comparison and risk were computed against.
    pub reference_time: DateTime<FixedOffset>,
    /// Correlation threshold in effect.
    pub trigger_threshold: u8,
}

/// The complete analytics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: AnalyticsSummary,
    /// Absent when there are no episodes.
    pub prediction: Option<RiskAssessment>,
    /// The episode with the latest onset.
    pub most_recent: Option<Episode>,
}
