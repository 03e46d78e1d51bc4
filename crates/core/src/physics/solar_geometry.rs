//! Solar geometry and extraterrestrial radiation
//!
//! Day-length geometry from latitude and day of year, and the top of
//! atmosphere radiation it implies.
//!
//! # Scientific References
//!
//! - Allen et al. (1998). FAO-56, Eqs. 21-25.
//! - Duffie, J.A., Beckman, W.A. (1980). "Solar Engineering of Thermal Processes."

use crate::core_types::units::Degrees;
use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// Solar constant (MJ m⁻² min⁻¹)
pub const SOLAR_CONSTANT: f64 = 0.0820;

/// Day of year (1..=366) as used by the FAO-56 geometry formulas.
pub fn day_of_year(date: NaiveDate) -> f64 {
    f64::from(date.ordinal())
}

/// Inverse relative Earth-Sun distance (FAO-56 Eq. 23)
#[inline]
pub fn inverse_relative_distance(doy: f64) -> f64 {
    1.0 + 0.033 * (2.0 * PI * doy / 365.0).cos()
}

/// Solar declination in radians (FAO-56 Eq. 24)
#[inline]
pub fn solar_declination(doy: f64) -> f64 {
    0.409 * (2.0 * PI * doy / 365.0 - 1.39).sin()
}

/// Sunset hour angle in radians (FAO-56 Eq. 25)
///
/// `-tan(φ) tan(δ)` leaves [-1, 1] at high latitudes:
/// - `<= -1`: the sun never sets (polar day), `ws = π`
/// - `>= 1`: the sun never rises (polar night), `ws = 0`
pub fn sunset_hour_angle(latitude_rad: f64, declination: f64) -> f64 {
    let cos_ws = (-latitude_rad.tan() * declination.tan()).clamp(-1.0, 1.0);
    if cos_ws <= -1.0 {
        PI
    } else if cos_ws >= 1.0 {
        0.0
    } else {
        cos_ws.acos()
    }
}

/// Extraterrestrial radiation Ra (MJ m⁻² day⁻¹)
///
/// # Arguments
/// * `latitude` - Site latitude, positive north
/// * `doy` - Day of year, 1..=366 (fractional values accepted)
///
/// # Returns
/// Daily extraterrestrial radiation, never negative
///
/// # References
/// FAO-56 Eq. 21
pub fn extraterrestrial_radiation(latitude: Degrees, doy: f64) -> f64 {
    let phi = latitude.to_radians();
    let dr = inverse_relative_distance(doy);
    let delta = solar_declination(doy);
    let ws = sunset_hour_angle(phi, delta);

    let ra = (24.0 * 60.0 / PI)
        * SOLAR_CONSTANT
        * dr
        * (ws * phi.sin() * delta.sin() + phi.cos() * delta.cos() * ws.sin());
    ra.max(0.0)
}
