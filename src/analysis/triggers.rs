//! Candidate trigger factors and the correlation pass.
//!
//! The candidate set is closed: every context threshold, pain zone and
//! symptom the engine knows about is enumerated by [`TriggerFactor::all`].

use crate::models::{
    ContextFactors, Episode, HormonalPhase, MigraineTrigger, PainZone, SymptomKind,
    TriggerCategory, WeatherPressure,
};
use std::cmp::Reverse;

/// A thresholded condition on the 24h context preceding onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTrigger {
    HighStress,
    PoorSleep,
    LowSleepQuality,
    ExcessiveScreenTime,
    LongWorkHours,
    ExtendedDriving,
    NoExercise,
    PoorPosture,
    NeckTension,
    LoudEnvironment,
    BrightLight,
    PressureChange,
    LowHydration,
    HighCaffeine,
    Alcohol,
    IrregularMeals,
    MenstrualPhase,
}

impl ContextTrigger {
    pub const ALL: [ContextTrigger; 17] = [
        ContextTrigger::HighStress,
        ContextTrigger::PoorSleep,
        ContextTrigger::LowSleepQuality,
        ContextTrigger::ExcessiveScreenTime,
        ContextTrigger::LongWorkHours,
        ContextTrigger::ExtendedDriving,
        ContextTrigger::NoExercise,
        ContextTrigger::PoorPosture,
        ContextTrigger::NeckTension,
        ContextTrigger::LoudEnvironment,
        ContextTrigger::BrightLight,
        ContextTrigger::PressureChange,
        ContextTrigger::LowHydration,
        ContextTrigger::HighCaffeine,
        ContextTrigger::Alcohol,
        ContextTrigger::IrregularMeals,
        ContextTrigger::MenstrualPhase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContextTrigger::HighStress => "High Stress (≥7)",
            ContextTrigger::PoorSleep => "Poor Sleep (<6h)",
            ContextTrigger::LowSleepQuality => "Low Sleep Quality (≤2/5)",
            ContextTrigger::ExcessiveScreenTime => "Excessive Screen Time (>6h)",
            ContextTrigger::LongWorkHours => "Long Work Hours (>9h)",
            ContextTrigger::ExtendedDriving => "Extended Driving (>2h)",
            ContextTrigger::NoExercise => "No Exercise",
            ContextTrigger::PoorPosture => "Poor Posture (≤2/5)",
            ContextTrigger::NeckTension => "Neck Tension",
            ContextTrigger::LoudEnvironment => "Loud Environment (≥4/5)",
            ContextTrigger::BrightLight => "Bright Light Exposure (≥4/5)",
            ContextTrigger::PressureChange => "Abnormal Barometric Pressure",
            ContextTrigger::LowHydration => "Low Hydration (<6 glasses)",
            ContextTrigger::HighCaffeine => "High Caffeine (≥3 cups)",
            ContextTrigger::Alcohol => "Alcohol Consumption",
            ContextTrigger::IrregularMeals => "Irregular Meals (≤2/5)",
            ContextTrigger::MenstrualPhase => "Menstrual Phase",
        }
    }

    pub fn holds(&self, ctx: &ContextFactors) -> bool {
        match self {
            ContextTrigger::HighStress => ctx.stress_level >= 7,
            ContextTrigger::PoorSleep => ctx.sleep_hours < 6.0,
            ContextTrigger::LowSleepQuality => ctx.sleep_quality <= 2,
            ContextTrigger::ExcessiveScreenTime => ctx.screen_time_hours > 6.0,
            ContextTrigger::LongWorkHours => ctx.work_hours > 9.0,
            ContextTrigger::ExtendedDriving => ctx.driving_hours > 2.0,
            ContextTrigger::NoExercise => ctx.exercise_minutes == 0,
            ContextTrigger::PoorPosture => ctx.posture_rating <= 2,
            ContextTrigger::NeckTension => ctx.neck_tension,
            ContextTrigger::LoudEnvironment => ctx.environmental_noise >= 4,
            ContextTrigger::BrightLight => ctx.light_exposure >= 4,
            ContextTrigger::PressureChange => ctx.weather_pressure != WeatherPressure::Normal,
            ContextTrigger::LowHydration => ctx.hydration_glasses < 6,
            ContextTrigger::HighCaffeine => ctx.caffeine_intake >= 3,
            ContextTrigger::Alcohol => ctx.alcohol_intake > 0,
            ContextTrigger::IrregularMeals => ctx.meal_regularity <= 2,
            ContextTrigger::MenstrualPhase => ctx.hormonal_phase == Some(HormonalPhase::Menstrual),
        }
    }
}

/// Any candidate factor the correlation pass evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerFactor {
    Context(ContextTrigger),
    Location(PainZone),
    Symptom(SymptomKind),
}

impl TriggerFactor {
    /// The fixed candidate set in canonical order: context, then pain zones,
    /// then symptoms.
    pub fn all() -> impl Iterator<Item = TriggerFactor> {
        ContextTrigger::ALL
            .into_iter()
            .map(TriggerFactor::Context)
            .chain(PainZone::ALL.into_iter().map(TriggerFactor::Location))
            .chain(SymptomKind::ALL.into_iter().map(TriggerFactor::Symptom))
    }

    pub fn label(&self) -> String {
        match self {
            TriggerFactor::Context(trigger) => trigger.label().to_string(),
            TriggerFactor::Location(zone) => format!("{} Pain", zone.label()),
            TriggerFactor::Symptom(kind) => kind.label().to_string(),
        }
    }

    pub fn category(&self) -> TriggerCategory {
        match self {
            TriggerFactor::Context(_) => TriggerCategory::Context,
            TriggerFactor::Location(_) => TriggerCategory::PainLocation,
            TriggerFactor::Symptom(_) => TriggerCategory::Symptom,
        }
    }

    /// Whether the factor is present in an episode.
    pub fn present_in(&self, episode: &Episode) -> bool {
        match self {
            TriggerFactor::Context(trigger) => trigger.holds(&episode.context_factors),
            TriggerFactor::Location(zone) => episode.pain_location.is_set(*zone),
            TriggerFactor::Symptom(kind) => episode.symptoms.is_set(*kind),
        }
    }

    /// Reverse lookup from a reported label.
    pub fn from_label(label: &str) -> Option<TriggerFactor> {
        Self::all().find(|factor| factor.label() == label)
    }
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 * 100.0 / whole as f64).round() as u64).min(100) as u8
}

/// Score every candidate factor and keep those at or above `threshold`.
///
/// Sorted by score, then occurrences (both descending), then canonical order.
pub fn correlate(episodes: &[Episode], threshold: u8) -> Vec<MigraineTrigger> {
    let total = episodes.len();
    if total == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, MigraineTrigger)> = TriggerFactor::all()
        .enumerate()
        .filter_map(|(rank, factor)| {
            let occurrences = episodes.iter().filter(|e| factor.present_in(e)).count();
            let correlation_score = percentage(occurrences, total);
            (correlation_score >= threshold && occurrences > 0).then(|| {
                (
                    rank,
                    MigraineTrigger {
                        factor: factor.label(),
                        category: factor.category(),
                        correlation_score,
                        occurrences,
                    },
                )
            })
        })
        .collect();

    scored.sort_by_key(|(rank, t)| (Reverse(t.correlation_score), Reverse(t.occurrences), *rank));
    scored.into_iter().map(|(_, trigger)| trigger).collect()
}
