//! FAO-56 Penman-Monteith reference evapotranspiration
//!
//! Daily ETo for a hypothetical 0.12 m grass surface from fused weather
//! and net radiation. Soil heat flux is taken as zero at the daily step.
//!
//! # Scientific References
//!
//! - Allen et al. (1998). FAO-56, Eq. 6 and Chapter 3.
//! - Monteith, J.L. (1965). "Evaporation and environment."

use crate::core_types::{FusedDailyRecord, LocationContext};
use crate::error::Result;
use crate::physics::{atmosphere, net_radiation, solar_geometry, vapor_pressure};
use rayon::prelude::*;

/// Floor on measured shortwave radiation before net radiation (MJ m⁻² day⁻¹)
pub const MIN_SOLAR_RADIATION: f64 = 0.1;

/// Soil heat flux density at the daily step (MJ m⁻² day⁻¹)
const SOIL_HEAT_FLUX: f64 = 0.0;

/// Round to the 0.001 mm/day resolution of reported ETo.
#[inline]
pub(crate) fn round_mm(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Core Penman-Monteith equation.
///
/// # Arguments
/// * `tmean` - Mean air temperature (°C)
/// * `u2` - Wind speed at 2 m (m/s)
/// * `vpd` - Vapor pressure deficit (kPa)
/// * `slope` - Slope of the saturation curve Δ (kPa °C⁻¹)
/// * `rn` - Net radiation (MJ m⁻² day⁻¹)
/// * `gamma` - Psychrometric constant (kPa °C⁻¹)
///
/// # Returns
/// ETo in mm/day, never negative, rounded to 3 decimals. A degenerate
/// denominator (≤ 1e-6 or NaN) yields 0.
pub fn reference_eto(tmean: f64, u2: f64, vpd: f64, slope: f64, rn: f64, gamma: f64) -> f64 {
    let denominator = slope + gamma * (1.0 + 0.34 * u2);
    if denominator.is_nan() || denominator <= 1e-6 {
        return 0.0;
    }

    let radiation_term = 0.408 * slope * (rn - SOIL_HEAT_FLUX);
    let aerodynamic_term = gamma * (900.0 / (tmean + 273.15)) * u2 * vpd;
    let eto = (radiation_term + aerodynamic_term) / denominator;

    // f64::max discards NaN, so a non-finite numerator also lands on 0
    round_mm(eto.max(0.0))
}

/// ETo for one fused day given its net radiation and γ.
pub fn daily_eto(record: &FusedDailyRecord, rn: f64, gamma: f64) -> f64 {
    let tmax = record.max_temp.value;
    let tmin = record.min_temp.value;
    let tmean = record.mean_temp.value;

    let es = vapor_pressure::mean_saturation_vapor_pressure(tmax, tmin);
    let ea = vapor_pressure::actual_vapor_pressure(record.relative_humidity.value, es);
    let vpd = vapor_pressure::vapor_pressure_deficit(es, ea);
    let slope = vapor_pressure::saturation_slope(tmean);

    reference_eto(tmean, record.wind_speed.value, vpd, slope, rn, gamma)
}

/// Net radiation for a fused day at `location`.
pub fn daily_net_radiation(record: &FusedDailyRecord, location: &LocationContext) -> f64 {
    let doy = solar_geometry::day_of_year(record.date);
    let ra = solar_geometry::extraterrestrial_radiation(location.latitude, doy);
    let rs = record.solar_radiation.value.max(MIN_SOLAR_RADIATION);

    let tmax = record.max_temp.value;
    let tmin = record.min_temp.value;
    let es = vapor_pressure::mean_saturation_vapor_pressure(tmax, tmin);
    let ea = vapor_pressure::actual_vapor_pressure(record.relative_humidity.value, es);

    net_radiation::net_radiation(rs, ra, tmax, tmin, ea, location.elevation)
}

/// Raw ETo for every record, in input order.
///
/// Days are independent, so the series is evaluated in parallel.
///
/// # Errors
/// [`crate::EtoError::Domain`] when the location's elevation is outside
/// the atmospheric correction's domain.
pub fn eto_series(records: &[FusedDailyRecord], location: &LocationContext) -> Result<Vec<f64>> {
    let gamma = atmosphere::psychrometric_constant(location.elevation)?;
    Ok(records
        .par_iter()
        .map(|record| daily_eto(record, daily_net_radiation(record, location), gamma))
        .collect())
}
