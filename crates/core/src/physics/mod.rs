//! FAO-56 physics: wind profile, solar geometry, atmospheric correction,
//! vapor pressure, net radiation and the Penman-Monteith equation

pub mod atmosphere;
pub mod net_radiation;
pub mod penman_monteith;
pub mod solar_geometry;
pub mod vapor_pressure;
pub mod wind_profile;

pub use atmosphere::{pressure, psychrometric_constant};
pub use net_radiation::net_radiation;
pub use penman_monteith::{daily_eto, daily_net_radiation, eto_series, reference_eto};
pub use solar_geometry::{day_of_year, extraterrestrial_radiation};
pub use wind_profile::{to_2m, MIN_WIND_SPEED_2M};
