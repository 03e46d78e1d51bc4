//! Saturation and actual vapor pressure (FAO-56 Eqs. 11-13, 19)

/// Floor on the vapor pressure deficit (kPa)
pub const MIN_VPD_KPA: f64 = 0.01;

/// Saturation vapor pressure at air temperature `t` (°C), in kPa
#[inline]
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    0.6108 * (17.27 * t / (t + 237.3)).exp()
}

/// Mean saturation vapor pressure from daily extremes, in kPa
#[inline]
pub fn mean_saturation_vapor_pressure(tmax: f64, tmin: f64) -> f64 {
    (saturation_vapor_pressure(tmax) + saturation_vapor_pressure(tmin)) / 2.0
}

/// Actual vapor pressure from mean relative humidity (%), in kPa
#[inline]
pub fn actual_vapor_pressure(relative_humidity: f64, es: f64) -> f64 {
    relative_humidity / 100.0 * es
}

#[inline]
pub fn vapor_pressure_deficit(es: f64, ea: f64) -> f64 {
    (es - ea).max(MIN_VPD_KPA)
}

/// Slope of the saturation vapor pressure curve at `tmean` (kPa °C⁻¹)
#[inline]
pub fn saturation_slope(tmean: f64) -> f64 {
    4098.0 * saturation_vapor_pressure(tmean) / (tmean + 237.3).powi(2)
}
