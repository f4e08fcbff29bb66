//! Analytics and prediction engine.
//!
//! Everything here is a pure function of the episode collection and a
//! reference time. Nothing is cached between calls.

pub mod aggregator;
pub mod calendar;
pub mod predictor;
pub mod recommendations;
pub mod triggers;

pub use aggregator::{most_recent, summarize, summarize_with};
pub use predictor::{predict, predict_with, PredictionInput};
pub use triggers::{correlate, ContextTrigger, TriggerFactor};
