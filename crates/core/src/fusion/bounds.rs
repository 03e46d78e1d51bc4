//! Fixed per-region plausibility bounds
//!
//! Observations outside these ranges are screened out before fusion. The
//! tables are physical limits, not calibration, and are not configurable.

use crate::core_types::{RegionTag, Variable};
use std::ops::RangeInclusive;

/// Inclusive plausibility limits for one region
#[derive(Debug, Clone, PartialEq)]
pub struct PlausibilityBounds {
    pub temperature: RangeInclusive<f64>,
    pub relative_humidity: RangeInclusive<f64>,
    pub wind_speed: RangeInclusive<f64>,
    pub precipitation: RangeInclusive<f64>,
    pub solar_radiation: RangeInclusive<f64>,
    /// Sanity ceiling for a daily ETo value (mm/day)
    pub max_eto: f64,
}

impl PlausibilityBounds {
    /// Worldwide limits (record extremes with margin)
    pub const GLOBAL: PlausibilityBounds = PlausibilityBounds {
        temperature: -90.0..=60.0,
        relative_humidity: 0.0..=100.0,
        wind_speed: 0.0..=113.0,
        precipitation: 0.0..=2000.0,
        solar_radiation: 0.0..=45.0,
        max_eto: 20.0,
    };

    /// Tighter limits matching the Xavier et al. (2016) gridded dataset for Brazil
    pub const BRAZIL: PlausibilityBounds = PlausibilityBounds {
        temperature: -30.0..=50.0,
        relative_humidity: 0.0..=100.0,
        wind_speed: 0.0..=100.0,
        precipitation: 0.0..=450.0,
        solar_radiation: 0.0..=40.0,
        max_eto: 15.0,
    };

    pub fn for_region(region: RegionTag) -> &'static PlausibilityBounds {
        match region {
            RegionTag::Brazil => &Self::BRAZIL,
            RegionTag::Global | RegionTag::Usa | RegionTag::Nordic => &Self::GLOBAL,
        }
    }

    /// Range for `variable`, or `None` when the variable is not bounded
    /// here (wind height is domain-checked by the wind converter instead).
    pub fn range(&self, variable: Variable) -> Option<&RangeInclusive<f64>> {
        match variable {
            Variable::MaxTemp | Variable::MinTemp | Variable::MeanTemp => Some(&self.temperature),
            Variable::RelativeHumidity => Some(&self.relative_humidity),
            Variable::WindSpeed => Some(&self.wind_speed),
            Variable::Precipitation => Some(&self.precipitation),
            Variable::SolarRadiation => Some(&self.solar_radiation),
            Variable::WindHeight => None,
        }
    }

    /// NaN and infinities never pass.
    pub fn contains(&self, variable: Variable, value: f64) -> bool {
        value.is_finite()
            && match self.range(variable) {
                Some(range) => range.contains(&value),
                None => true,
            }
    }
}
