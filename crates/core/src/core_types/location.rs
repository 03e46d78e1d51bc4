//! Location context for one calculation run

use crate::core_types::units::{Degrees, Meters};
use crate::error::{EtoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest elevation accepted by the atmospheric correction (m).
pub const MIN_ELEVATION_M: f64 = -1000.0;

/// Region tag used to pick fusion weights and plausibility bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionTag {
    #[default]
    Global,
    Usa,
    Nordic,
    Brazil,
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionTag::Global => "global",
            RegionTag::Usa => "usa",
            RegionTag::Nordic => "nordic",
            RegionTag::Brazil => "brazil",
        };
        f.write_str(name)
    }
}

/// Where the calculation runs. Supplied already resolved by the caller
/// (geocoding, elevation lookup) and immutable for the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub latitude: Degrees,
    pub longitude: Degrees,
    pub elevation: Meters,
    #[serde(default)]
    pub region: RegionTag,
}

impl LocationContext {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, region: RegionTag) -> Self {
        Self {
            latitude: Degrees::new(latitude),
            longitude: Degrees::new(longitude),
            elevation: Meters::new(elevation),
            region,
        }
    }

    /// Check the context before any per-date processing.
    ///
    /// # Errors
    /// [`EtoError::InvalidLocation`] for a non-finite or out-of-range
    /// coordinate, a missing (NaN) elevation or an elevation below
    /// [`MIN_ELEVATION_M`].
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&*self.latitude) {
            return Err(EtoError::InvalidLocation {
                reason: format!("latitude {} outside [-90, 90]", *self.latitude),
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&*self.longitude) {
            return Err(EtoError::InvalidLocation {
                reason: format!("longitude {} outside [-180, 180]", *self.longitude),
            });
        }
        if !self.elevation.is_finite() {
            return Err(EtoError::InvalidLocation {
                reason: "elevation is missing".to_string(),
            });
        }
        if *self.elevation < MIN_ELEVATION_M {
            return Err(EtoError::InvalidLocation {
                reason: format!(
                    "elevation {} m is below {} m",
                    *self.elevation, MIN_ELEVATION_M
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_brasilia() {
        let loc = LocationContext::new(-15.7939, -47.8828, 1172.0, RegionTag::Brazil);
        assert!(loc.validate().is_ok());
    }

    #[test]
    fn rejects_missing_elevation() {
        let loc = LocationContext::new(10.0, 10.0, f64::NAN, RegionTag::Global);
        let err = loc.validate().unwrap_err();
        assert!(matches!(err, EtoError::InvalidLocation { .. }));
        assert!(err.to_string().contains("elevation"));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(LocationContext::new(91.0, 0.0, 0.0, RegionTag::Global)
            .validate()
            .is_err());
        assert!(LocationContext::new(0.0, -181.0, 0.0, RegionTag::Global)
            .validate()
            .is_err());
        assert!(LocationContext::new(0.0, 0.0, -1500.0, RegionTag::Global)
            .validate()
            .is_err());
    }

    #[test]
    fn region_defaults_to_global_when_absent() {
        let loc: LocationContext = serde_json::from_str(
            r#"{"latitude": 45.0, "longitude": 7.5, "elevation": 300.0}"#,
        )
        .unwrap();
        assert_eq!(loc.region, RegionTag::Global);
    }
}
