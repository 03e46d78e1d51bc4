//! Semantic unit types for the quantities that cross module boundaries
//!
//! Newtype wrappers keep latitude in degrees apart from radians, heights
//! in meters apart from wind speeds, and Celsius apart from Kelvin at the
//! places where the FAO-56 formulas switch between them.
//!
//! # Design Philosophy
//! - All types wrap f64; the T^4 longwave term and the daily ETo rounding
//!   both need full precision
//! - Deref to f64 so formula code reads like the paper
//! - Total ordering via `total_cmp` (NaN sorts above all values)
//! - Serde support, serialized transparently as plain numbers
//!
//! # Usage
//! ```
//! use eto_fusion_core::core_types::units::{Celsius, Degrees};
//!
//! let tmax = Celsius::new(30.0);
//! assert!((*tmax.to_kelvin() - 303.15).abs() < 1e-9);
//!
//! let lat = Degrees::new(-15.7939);
//! assert!((lat.to_radians() + 0.27565).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Implements the shared plumbing (ordering, deref, conversions, display)
/// for an f64 newtype.
macro_rules! scalar_unit {
    ($name:ident, $suffix:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            #[inline]
            fn from(value: f64) -> Self {
                $name(value)
            }
        }

        impl From<$name> for f64 {
            #[inline]
            fn from(value: $name) -> f64 {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.3}{}", self.0, $suffix)
            }
        }
    };
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

scalar_unit!(Celsius, "°C");

impl Celsius {
    /// Celsius to Kelvin conversion offset (0°C = 273.15 K)
    const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

    /// Wraps the value as given. Range checks belong to the plausibility
    /// screen, which sees every temperature before the physics does.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + Self::CELSIUS_KELVIN_OFFSET)
    }
}

/// Absolute temperature in Kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kelvin(f64);

scalar_unit!(Kelvin, " K");

impl Kelvin {
    /// Fourth power, as used by the Stefan-Boltzmann longwave term
    #[inline]
    #[must_use]
    pub fn fourth_power(self) -> f64 {
        self.0.powi(4)
    }
}

// ============================================================================
// GEOGRAPHY
// ============================================================================

/// Angle in decimal degrees (latitude / longitude)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(f64);

scalar_unit!(Degrees, "°");

impl Degrees {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Length or height in meters (elevation, anemometer height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Meters(f64);

scalar_unit!(Meters, " m");

impl Meters {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }
}

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

scalar_unit!(MetersPerSecond, " m/s");

impl MetersPerSecond {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_to_kelvin() {
        let k = Celsius::new(18.0).to_kelvin();
        assert!((*k - 291.15).abs() < 1e-12);
        assert!((k.fourth_power() - 291.15_f64.powi(4)).abs() < 1e-3);
    }

    #[test]
    fn celsius_constructor_never_panics() {
        // Out-of-range temperatures are rejected by screening, not here
        let cold = Celsius::new(-300.0);
        assert_eq!(cold, Celsius::from(-300.0));
        assert!(*cold.to_kelvin() < 0.0);
    }

    #[test]
    fn total_ordering_places_nan_last() {
        let mut heights = vec![
            Meters::new(f64::NAN),
            Meters::new(10.0),
            Meters::new(2.0),
        ];
        heights.sort();
        assert_eq!(*heights[0], 2.0);
        assert_eq!(*heights[1], 10.0);
        assert!(heights[2].is_nan());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&MetersPerSecond::new(3.5)).unwrap();
        assert_eq!(json, "3.5");
    }
}
