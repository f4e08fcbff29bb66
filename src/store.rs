//! Episode snapshot loading.
//!
//! Episodes are owned by an external store; this module only reads a JSON
//! export of it and checks each record before it reaches the engine.

use crate::models::{ContextFactors, Episode};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load and validate an episode snapshot, keeping file order.
pub fn load_episodes(path: &Path) -> Result<Vec<Episode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read episodes file: {}", path.display()))?;

    let episodes = parse_episodes(&content)
        .with_context(|| format!("Invalid episodes file: {}", path.display()))?;

    info!("Loaded {} episodes from {}", episodes.len(), path.display());
    Ok(episodes)
}

/// Parse and validate a JSON array of episodes.
pub fn parse_episodes(content: &str) -> Result<Vec<Episode>> {
    let episodes: Vec<Episode> =
        serde_json::from_str(content).context("Failed to parse episodes JSON")?;

    for (index, episode) in episodes.iter().enumerate() {
        episode
            .validate()
            .with_context(|| format!("Episode at index {} failed validation", index))?;
    }

    debug!("Validated {} episodes", episodes.len());
    Ok(episodes)
}

/// Load the caller's current context (last 24-48 hours) from a JSON object.
pub fn load_context(path: &Path) -> Result<ContextFactors> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file: {}", path.display()))?;

    let context: ContextFactors = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse context file: {}", path.display()))?;

    context
        .validate("current-context")
        .with_context(|| format!("Invalid context file: {}", path.display()))?;

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use crate::error::EpisodeError;
    use chrono::DateTime;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_load_fixture_snapshot() {
        let episodes = load_episodes(&fixture("episodes.json")).unwrap();
        assert_eq!(episodes.len(), 6);
        assert_eq!(episodes[0].id, "ep-001");

        let now = DateTime::parse_from_rfc3339("2024-11-20T12:00:00+01:00").unwrap();
        let summary = summarize(&episodes, now);
        assert_eq!(summary.total_episodes, 6);
        assert!(summary
            .most_common_triggers
            .iter()
            .any(|t| t.factor == "High Stress (≥7)" && t.occurrences == 5));
    }

    #[test]
    fn test_parse_rejects_invalid_episode_with_index() {
        let json = r#"[
            { "id": "a", "startTime": "2024-05-01T09:00:00Z", "painIntensity": 5 },
            { "id": "b", "startTime": "2024-05-02T09:00:00Z", "painIntensity": 11 }
        ]"#;

        let err = parse_episodes(json).unwrap_err();
        assert!(err.to_string().contains("index 1"));
        assert_eq!(
            err.downcast_ref::<EpisodeError>(),
            Some(&EpisodeError::IntensityOutOfRange {
                id: "b".to_string(),
                value: 11
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_episodes("{ not json").is_err());
    }

    #[test]
    fn test_load_context_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stressLevel": 9, "hydrationGlasses": 2 }}"#).unwrap();

        let context = load_context(file.path()).unwrap();
        assert_eq!(context.stress_level, 9);
        assert_eq!(context.hydration_glasses, 2);
        assert_eq!(context.sleep_hours, 7.0);
    }

    #[test]
    fn test_missing_file_has_path_context() {
        let err = load_episodes(Path::new("/nonexistent/episodes.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/episodes.json"));
    }
}
