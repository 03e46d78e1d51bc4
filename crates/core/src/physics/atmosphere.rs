//! Atmospheric correction from elevation
//!
//! # Scientific References
//!
//! - Allen et al. (1998). FAO-56, Eqs. 7-8 (simplified ideal gas law with
//!   a 20°C standard atmosphere).

use crate::core_types::location::MIN_ELEVATION_M;
use crate::core_types::units::Meters;
use crate::error::{EtoError, Result};

/// Ratio of specific heat to latent heat times molecular weight ratio (kPa⁻¹ scaled)
const PSYCHROMETRIC_COEFFICIENT: f64 = 0.000665;

/// Mean atmospheric pressure at `elevation` (kPa)
///
/// # Errors
/// [`EtoError::Domain`] for a non-finite elevation or one below
/// [`MIN_ELEVATION_M`].
pub fn pressure(elevation: Meters) -> Result<f64> {
    let z = *elevation;
    if !z.is_finite() || z < MIN_ELEVATION_M {
        return Err(EtoError::domain(
            "elevation",
            z,
            "below any terrestrial surface (-1000 m)",
        ));
    }
    Ok(101.3 * ((293.0 - 0.0065 * z) / 293.0).powf(5.26))
}

/// Psychrometric constant γ (kPa °C⁻¹)
///
/// # Errors
/// Same conditions as [`pressure`].
pub fn psychrometric_constant(elevation: Meters) -> Result<f64> {
    Ok(PSYCHROMETRIC_COEFFICIENT * pressure(elevation)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sea_level_is_standard_pressure() {
        assert_relative_eq!(pressure(Meters::new(0.0)).unwrap(), 101.3);
    }

    #[test]
    fn fao_example_2() {
        // FAO-56 Example 2: z = 1800 m gives P = 81.8 kPa, γ = 0.054
        assert_relative_eq!(pressure(Meters::new(1800.0)).unwrap(), 81.8, epsilon = 0.05);
        assert_relative_eq!(
            psychrometric_constant(Meters::new(1800.0)).unwrap(),
            0.054,
            epsilon = 5e-4
        );
    }

    #[test]
    fn below_dead_sea_floor_limit_is_domain_error() {
        assert!(pressure(Meters::new(-400.0)).is_ok());
        assert!(matches!(
            pressure(Meters::new(-1000.5)),
            Err(EtoError::Domain { .. })
        ));
        assert!(psychrometric_constant(Meters::new(f64::NAN)).is_err());
    }
}
