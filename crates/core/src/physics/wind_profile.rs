//! Logarithmic wind profile: normalizes wind speed to the 2 m reference height
//!
//! # Scientific References
//!
//! - Allen, R.G., Pereira, L.S., Raes, D., Smith, M. (1998). "Crop
//!   evapotranspiration: Guidelines for computing crop water requirements."
//!   FAO Irrigation and Drainage Paper 56, Eq. 47.

use crate::core_types::units::{Meters, MetersPerSecond};
use crate::error::{EtoError, Result};

/// Reference anemometer height for Penman-Monteith (m)
pub const REFERENCE_HEIGHT_M: f64 = 2.0;

/// Floor applied to the 2 m wind speed. Keeps the aerodynamic term of
/// Penman-Monteith away from calm-air singularities.
pub const MIN_WIND_SPEED_2M: f64 = 0.5;

/// Height at which `67.8 z - 5.42` reaches zero and the log law breaks down.
pub const MIN_MEASUREMENT_HEIGHT_M: f64 = 5.42 / 67.8;

/// Convert a wind speed measured at `measurement_height` to 2 m.
///
/// # Arguments
/// * `speed` - Measured wind speed (m/s)
/// * `measurement_height` - Anemometer height above ground (m)
///
/// # Returns
/// Wind speed at 2 m (m/s), never below [`MIN_WIND_SPEED_2M`]
///
/// # Errors
/// [`EtoError::Domain`] when the height is not finite or does not exceed
/// [`MIN_MEASUREMENT_HEIGHT_M`].
///
/// # References
/// FAO-56 Eq. 47: `u2 = uz * 4.87 / ln(67.8 z - 5.42)`
pub fn to_2m(speed: MetersPerSecond, measurement_height: Meters) -> Result<MetersPerSecond> {
    let z = *measurement_height;
    if z == REFERENCE_HEIGHT_M {
        return Ok(MetersPerSecond::new((*speed).max(MIN_WIND_SPEED_2M)));
    }
    if !z.is_finite() || z <= MIN_MEASUREMENT_HEIGHT_M {
        return Err(EtoError::domain(
            "wind measurement height",
            z,
            "must exceed 0.08 m for the logarithmic profile",
        ));
    }

    let u2 = *speed * 4.87 / (67.8 * z - 5.42).ln();
    Ok(MetersPerSecond::new(u2.max(MIN_WIND_SPEED_2M)))
}

/// Validate a height without converting anything.
///
/// # Errors
/// Same conditions as [`to_2m`].
pub fn check_measurement_height(measurement_height: Meters) -> Result<()> {
    to_2m(MetersPerSecond::new(MIN_WIND_SPEED_2M), measurement_height).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn convert(speed: f64, height: f64) -> f64 {
        *to_2m(MetersPerSecond::new(speed), Meters::new(height)).unwrap()
    }

    #[test]
    fn two_metre_reading_is_only_floored() {
        assert_eq!(convert(3.2, 2.0), 3.2);
        assert_eq!(convert(0.2, 2.0), 0.5);
        assert_eq!(convert(-1.0, 2.0), 0.5);
    }

    #[test]
    fn ten_metre_reading_matches_fao_table() {
        // FAO-56 Annex 2 Table 2.9: conversion factor 0.748 for z = 10 m
        assert_relative_eq!(convert(1.0, 10.0), 0.748, epsilon = 1e-3);
        assert_relative_eq!(convert(3.0, 10.0), 3.0 * 0.748, epsilon = 3e-3);
    }

    #[test]
    fn converted_speed_is_floored() {
        assert_eq!(convert(0.1, 10.0), MIN_WIND_SPEED_2M);
    }

    #[test]
    fn heights_below_log_law_domain_are_rejected() {
        for z in [0.0, -3.0, 0.05, MIN_MEASUREMENT_HEIGHT_M, f64::NAN] {
            let result = to_2m(MetersPerSecond::new(2.0), Meters::new(z));
            assert!(
                matches!(result, Err(EtoError::Domain { .. })),
                "height {z} should be rejected"
            );
        }
    }

    #[test]
    fn floor_holds_over_a_sweep() {
        for height in [0.5, 1.0, 2.0, 3.0, 10.0, 50.0, 200.0] {
            for speed in [-5.0, 0.0, 0.3, 1.0, 7.5, 40.0] {
                let u2 = convert(speed, height);
                assert!(u2 >= MIN_WIND_SPEED_2M, "u2={u2} for speed={speed} z={height}");
            }
        }
    }
}
