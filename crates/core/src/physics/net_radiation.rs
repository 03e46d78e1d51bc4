//! Net radiation at the reference surface
//!
//! Combines measured shortwave radiation with the clear-sky estimate to get
//! a cloudiness factor, then balances absorbed shortwave against emitted
//! longwave.
//!
//! # Scientific References
//!
//! - Allen et al. (1998). FAO-56, Eqs. 37-40.
//! - Stefan-Boltzmann law with the FAO-56 daily constant
//!   σ = 4.903e-9 MJ K⁻⁴ m⁻² day⁻¹.

use crate::core_types::units::{Celsius, Meters};

/// Stefan-Boltzmann constant for daily sums (MJ K⁻⁴ m⁻² day⁻¹)
pub const STEFAN_BOLTZMANN_DAILY: f64 = 4.903e-9;

/// Albedo of the hypothetical grass reference crop
pub const REFERENCE_ALBEDO: f64 = 0.23;

/// Clear-sky radiation Rso (MJ m⁻² day⁻¹), FAO-56 Eq. 37
#[inline]
pub fn clear_sky_radiation(ra: f64, elevation: Meters) -> f64 {
    (0.75 + 2e-5 * *elevation) * ra
}

/// Cloudiness factor `1.35 Rs/Rso - 0.35`, clipped to [0.3, 1.0]
///
/// A clear-sky radiation of zero (polar night) counts as a clear day.
pub fn cloudiness_factor(rs: f64, rso: f64) -> f64 {
    let ratio = if rso <= 1e-6 { 1.0 } else { rs / rso };
    (1.35 * ratio - 0.35).clamp(0.3, 1.0)
}

/// Net outgoing longwave radiation Rnl (MJ m⁻² day⁻¹), FAO-56 Eq. 39
///
/// # Arguments
/// * `tmax`, `tmin` - Daily temperature extremes (°C)
/// * `ea` - Actual vapor pressure (kPa)
/// * `fcd` - Cloudiness factor from [`cloudiness_factor`]
pub fn net_longwave_radiation(tmax: f64, tmin: f64, ea: f64, fcd: f64) -> f64 {
    let tmax_k4 = Celsius::from(tmax).to_kelvin().fourth_power();
    let tmin_k4 = Celsius::from(tmin).to_kelvin().fourth_power();
    let humidity_correction = 0.34 - 0.14 * ea.max(0.01).sqrt();
    STEFAN_BOLTZMANN_DAILY * ((tmax_k4 + tmin_k4) / 2.0) * humidity_correction * fcd
}

/// Net shortwave radiation Rns (MJ m⁻² day⁻¹), FAO-56 Eq. 38
#[inline]
pub fn net_shortwave_radiation(rs: f64) -> f64 {
    (1.0 - REFERENCE_ALBEDO) * rs
}

/// Net radiation Rn = Rns - Rnl (MJ m⁻² day⁻¹)
///
/// # Arguments
/// * `rs` - Measured incoming shortwave radiation
/// * `ra` - Extraterrestrial radiation for the day
/// * `tmax`, `tmin` - Daily temperature extremes (°C)
/// * `ea` - Actual vapor pressure (kPa)
/// * `elevation` - Site elevation
///
/// # References
/// FAO-56 Eq. 40
pub fn net_radiation(rs: f64, ra: f64, tmax: f64, tmin: f64, ea: f64, elevation: Meters) -> f64 {
    let rso = clear_sky_radiation(ra, elevation);
    let fcd = cloudiness_factor(rs, rso);
    net_shortwave_radiation(rs) - net_longwave_radiation(tmax, tmin, ea, fcd)
}
