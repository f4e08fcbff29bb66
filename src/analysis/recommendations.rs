//! Fixed advice table for risk assessments.

use super::triggers::{ContextTrigger, TriggerFactor};
use crate::models::{PainZone, RiskLevel, SymptomKind};

/// Advice for an active trigger, if the table has an entry for it.
pub fn trigger_advice(factor: TriggerFactor) -> Option<&'static str> {
    let advice = match factor {
        TriggerFactor::Context(trigger) => match trigger {
            ContextTrigger::HighStress => {
                "Consider stress-reduction techniques such as breathing exercises or a short walk"
            }
            ContextTrigger::PoorSleep => "Aim for 7-9 hours of sleep tonight",
            ContextTrigger::LowSleepQuality => {
                "Keep a consistent bedtime and avoid screens for an hour before sleep"
            }
            ContextTrigger::ExcessiveScreenTime => {
                "Take regular screen breaks: every 20 minutes look 20 feet away for 20 seconds"
            }
            ContextTrigger::LongWorkHours => "Schedule breaks and cap today's working hours",
            ContextTrigger::ExtendedDriving => {
                "Split long drives with rest stops and wear sunglasses against glare"
            }
            ContextTrigger::NoExercise => {
                "Add 20-30 minutes of moderate exercise such as walking or cycling"
            }
            ContextTrigger::PoorPosture => {
                "Check your workstation ergonomics and sit with your screen at eye level"
            }
            ContextTrigger::NeckTension => "Do gentle neck and shoulder stretches",
            ContextTrigger::LoudEnvironment => {
                "Reduce noise exposure or use ear protection in loud environments"
            }
            ContextTrigger::BrightLight => {
                "Dim bright lighting and wear sunglasses outdoors"
            }
            ContextTrigger::PressureChange => {
                "Watch the weather forecast and keep acute medication at hand on pressure changes"
            }
            ContextTrigger::LowHydration => "Increase water intake to at least 8 glasses/day",
            ContextTrigger::HighCaffeine => {
                "Limit caffeine to 1-2 cups and avoid it in the afternoon"
            }
            ContextTrigger::Alcohol => "Avoid alcohol, especially red wine, for the next few days",
            ContextTrigger::IrregularMeals => "Eat regular meals and avoid skipping breakfast",
            ContextTrigger::MenstrualPhase => {
                "Discuss menstrual migraine prevention with your doctor"
            }
        },
        TriggerFactor::Location(PainZone::Neck | PainZone::Occipital) => {
            "Apply heat to the neck and shoulders to ease muscle tension"
        }
        TriggerFactor::Location(_) => return None,
        TriggerFactor::Symptom(kind) => match kind {
            SymptomKind::Aura | SymptomKind::VisualDisturbances => {
                "Take acute medication at the first sign of aura, as prescribed"
            }
            SymptomKind::Nausea | SymptomKind::Vomiting => {
                "Ask your doctor about anti-nausea options for attacks"
            }
            SymptomKind::LightSensitivity => "Keep a dark, quiet room available for attacks",
            SymptomKind::SoundSensitivity => "Keep earplugs or noise-cancelling headphones nearby",
            SymptomKind::SmellSensitivity => "Avoid strong scents such as perfume and smoke",
            SymptomKind::Dizziness => "Sit or lie down promptly when dizziness starts",
        },
    };
    Some(advice)
}

/// Generic advice for a risk level, most urgent first.
pub fn level_advice(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => &[
            "Keep up your current routine",
            "Continue logging episodes to improve pattern detection",
        ],
        RiskLevel::Moderate => &[
            "Stay hydrated and keep regular meals today",
            "Monitor for early warning signs",
        ],
        RiskLevel::High => &[
            "Keep acute medication at hand",
            "Plan a lighter schedule and rest where possible",
        ],
        RiskLevel::Critical => &[
            "Consult a healthcare professional promptly",
            "Keep acute medication at hand",
            "Avoid known triggers and rest in a dark, quiet room if symptoms begin",
        ],
    }
}

/// Trigger advice in trigger order, then level advice, without duplicates.
pub fn recommend(active_triggers: &[String], level: RiskLevel) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    let from_triggers = active_triggers
        .iter()
        .filter_map(|label| TriggerFactor::from_label(label))
        .filter_map(trigger_advice);

    for advice in from_triggers.chain(level_advice(level).iter().copied()) {
        if !recommendations.iter().any(|r| r == advice) {
            recommendations.push(advice.to_string());
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_has_advice() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            assert!(!recommend(&[], level).is_empty());
        }
    }

    #[test]
    fn test_trigger_advice_comes_first() {
        let active = vec![
            "Low Hydration (<6 glasses)".to_string(),
            "High Stress (≥7)".to_string(),
        ];
        let recs = recommend(&active, RiskLevel::Critical);

        assert_eq!(recs[0], "Increase water intake to at least 8 glasses/day");
        assert!(recs[1].starts_with("Consider stress-reduction techniques"));
        assert_eq!(recs[2], "Consult a healthcare professional promptly");
    }

    #[test]
    fn test_recommendations_are_deduplicated() {
        let active = vec!["Aura".to_string(), "Visual Disturbances".to_string()];
        let recs = recommend(&active, RiskLevel::Critical);

        let acute = recs
            .iter()
            .filter(|r| r.as_str() == "Keep acute medication at hand")
            .count();
        let aura = recs.iter().filter(|r| r.contains("first sign of aura")).count();
        assert_eq!(acute, 1);
        assert_eq!(aura, 1);
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        let recs = recommend(&["Full Moon".to_string()], RiskLevel::Low);
        assert_eq!(recs, vec![
            "Keep up your current routine".to_string(),
            "Continue logging episodes to improve pattern detection".to_string(),
        ]);
    }
}
