//! Migraine-Map - migraine episode analytics.
//!
//! Given an episode collection, the engine in [`analysis`] computes trigger
//! correlations, temporal distributions and summary statistics, and produces
//! a heuristic risk assessment with recommendations. Both are pure functions
//! of their input; the surrounding modules load snapshots, read
//! configuration and render reports.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod store;
