//! Typed validation errors.
//!
//! The analytics engine itself never fails; these errors are raised at the
//! entry boundary when a snapshot is loaded, before episodes reach the engine.

use thiserror::Error;

/// An episode that breaks one of the data-model invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpisodeError {
    #[error("episode {id}: pain intensity {value} is outside 1-10")]
    IntensityOutOfRange { id: String, value: u8 },

    #[error("episode {id}: end time is before start time")]
    EndBeforeStart { id: String },

    #[error("episode {id}: relief level {value} for medication '{medication}' is outside 0-10")]
    ReliefOutOfRange {
        id: String,
        medication: String,
        value: u8,
    },

    #[error("episode {id}: {field} = {value} is outside {min}-{max}")]
    ScaleOutOfRange {
        id: String,
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("episode {id}: {field} must be a finite, non-negative number")]
    InvalidQuantity { id: String, field: &'static str },
}
