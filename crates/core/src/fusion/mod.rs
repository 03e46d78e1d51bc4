//! Multi-source measurement fusion
//!
//! Reconciles same-day observations of one variable from several providers
//! into a single estimate with a variance, weighting each provider by an
//! a-priori observation variance from the [`FusionConfig`] table.

pub mod bounds;
pub mod config;
pub mod daily;
pub mod engine;
pub mod kalman;

pub use bounds::PlausibilityBounds;
pub use config::{FusionConfig, VarianceEntry};
pub use daily::{group_by_day, DayFusion, DayObservations};
pub use engine::{FusionEngine, FusionOutcome};
pub use kalman::Gaussian;
