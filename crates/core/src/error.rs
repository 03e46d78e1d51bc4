//! Error taxonomy for fusion and evapotranspiration
//!
//! Per-day conditions (missing data, out-of-range observations, inconsistent
//! temperatures) never abort a series. They are wrapped in a [`Warning`] and
//! returned alongside the results. Location- and configuration-level errors
//! are returned as `Err` before any per-date work starts.

use crate::core_types::{SourceId, Variable};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = EtoError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum EtoError {
    /// No valid observation for a required variable on a date.
    #[error("no valid observation of {variable} on {date}")]
    MissingData { date: NaiveDate, variable: Variable },

    /// An observation outside the region's plausibility bounds.
    #[error("{variable} = {value} from {source_id} on {date} is outside [{min}, {max}]")]
    PhysicalRange {
        date: NaiveDate,
        variable: Variable,
        source_id: SourceId,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A second reading of the same variable from the same source on one
    /// day. Only the first reading is kept.
    #[error("duplicate {variable} = {value} from {source_id} on {date} dropped")]
    DuplicateSource {
        date: NaiveDate,
        variable: Variable,
        source_id: SourceId,
        value: f64,
    },

    /// Invalid mathematical input to a formula.
    #[error("{quantity} = {value} is outside the valid domain: {reason}")]
    Domain {
        quantity: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Degenerate variances produced a zero gain denominator. Resolved
    /// internally by averaging; only ever surfaced as a warning.
    #[error("singular fusion of {variable} on {date}, fell back to simple averaging")]
    SingularFusion { date: NaiveDate, variable: Variable },

    /// Fused daily maximum below fused daily minimum.
    #[error("fused Tmax {max} below Tmin {min} on {date}")]
    InconsistentTemperature {
        date: NaiveDate,
        max: f64,
        min: f64,
    },

    #[error("invalid location: {reason}")]
    InvalidLocation { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EtoError {
    /// Shorthand for building a [`EtoError::Domain`] error.
    pub(crate) fn domain(quantity: &'static str, value: f64, reason: &'static str) -> Self {
        EtoError::Domain {
            quantity,
            value,
            reason,
        }
    }
}

/// A non-fatal condition recorded while processing one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub date: NaiveDate,
    pub cause: EtoError,
}

impl Warning {
    pub fn new(date: NaiveDate, cause: EtoError) -> Self {
        Self { date, cause }
    }

    /// True when the day itself was dropped from the output.
    pub fn skipped_day(&self) -> bool {
        matches!(
            self.cause,
            EtoError::MissingData { .. } | EtoError::InconsistentTemperature { .. }
        )
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.date, self.cause)
    }
}
