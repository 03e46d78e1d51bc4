//! Source-tagged raw observations
//!
//! Every provider reading is its own record. Two providers reporting the
//! same variable on the same day produce two records that differ only in
//! [`SourceId`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily meteorological variable reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Daily maximum air temperature (°C)
    MaxTemp,
    /// Daily minimum air temperature (°C)
    MinTemp,
    /// Daily mean air temperature (°C)
    MeanTemp,
    /// Mean relative humidity (%)
    RelativeHumidity,
    /// Mean wind speed at the anemometer height (m/s)
    WindSpeed,
    /// Anemometer height of the same source's wind speed (m)
    WindHeight,
    /// Incoming shortwave radiation (MJ m⁻² day⁻¹)
    SolarRadiation,
    /// Daily precipitation total (mm)
    Precipitation,
}

impl Variable {
    /// Variables without which Penman-Monteith cannot run for a day.
    pub const REQUIRED: [Variable; 5] = [
        Variable::MaxTemp,
        Variable::MinTemp,
        Variable::RelativeHumidity,
        Variable::WindSpeed,
        Variable::SolarRadiation,
    ];
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::MaxTemp => "max-temp",
            Variable::MinTemp => "min-temp",
            Variable::MeanTemp => "mean-temp",
            Variable::RelativeHumidity => "relative-humidity",
            Variable::WindSpeed => "wind-speed",
            Variable::WindHeight => "wind-height",
            Variable::SolarRadiation => "solar-radiation",
            Variable::Precipitation => "precipitation",
        };
        f.write_str(name)
    }
}

/// Identifier of a data provider (e.g. `"nasa_power"`, `"open_meteo"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One provider's reading of one variable on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub variable: Variable,
    pub value: f64,
    pub source: SourceId,
}

impl RawObservation {
    pub fn new(date: NaiveDate, variable: Variable, value: f64, source: impl Into<SourceId>) -> Self {
        Self {
            date,
            variable,
            value,
            source: source.into(),
        }
    }
}

/// A value/source pair handed to the fusion engine once the date and
/// variable have been fixed by grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReading {
    pub value: f64,
    pub source: SourceId,
}

impl SourceReading {
    pub fn new(value: f64, source: impl Into<SourceId>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}

impl From<&RawObservation> for SourceReading {
    fn from(obs: &RawObservation) -> Self {
        Self {
            value: obs.value,
            source: obs.source.clone(),
        }
    }
}
