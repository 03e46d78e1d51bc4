//! Fused daily weather and per-day ETo output

use crate::smoothing::Anomaly;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fused estimate with its variance and the number of sources behind it.
///
/// `source_count == 0` marks a value derived from other fused values rather
/// than observed (the mean temperature fallback).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedValue {
    pub value: f64,
    pub variance: f64,
    pub source_count: usize,
}

impl FusedValue {
    pub fn new(value: f64, variance: f64, source_count: usize) -> Self {
        Self {
            value,
            variance,
            source_count,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.source_count == 0
    }
}

/// One day of reconciled weather, ready for Penman-Monteith.
///
/// Guaranteed by the pipeline: `max_temp >= min_temp`,
/// relative humidity in [0, 100], wind speed already at 2 m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDailyRecord {
    pub date: NaiveDate,
    pub max_temp: FusedValue,
    pub min_temp: FusedValue,
    pub mean_temp: FusedValue,
    pub relative_humidity: FusedValue,
    /// Wind speed at 2 m (m/s)
    pub wind_speed: FusedValue,
    pub solar_radiation: FusedValue,
    pub precipitation: Option<FusedValue>,
}

impl FusedDailyRecord {
    /// True when any ETo input came from fewer than two sources.
    pub fn is_degraded(&self) -> bool {
        [
            &self.max_temp,
            &self.min_temp,
            &self.mean_temp,
            &self.relative_humidity,
            &self.wind_speed,
            &self.solar_radiation,
        ]
        .iter()
        .any(|v| v.source_count < 2)
    }
}

/// Confidence label attached to each daily result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EToQuality {
    /// Every input fused from two or more sources
    High,
    /// At least one input single-source or derived
    Degraded,
    /// Raw ETo above the region's sanity ceiling
    Suspect,
}

/// Daily reference evapotranspiration (mm/day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EToResult {
    pub date: NaiveDate,
    /// Penman-Monteith output
    pub eto_raw: f64,
    /// Smoothed series value, derived only from `eto_raw`
    pub eto_final: f64,
    pub precipitation: Option<f64>,
    pub quality: EToQuality,
    pub anomaly: Option<Anomaly>,
}
