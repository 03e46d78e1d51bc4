//! Fusion weighting table
//!
//! The a-priori observation variance of each source is the only calibration
//! surface of the fusion engine. Entries can be scoped to a region (a
//! regional model trusted more inside its validated footprint) and to a
//! single variable.
//!
//! The default table is neutral: every source has the same variance, which
//! makes the sequential update collapse to the arithmetic mean. Real
//! weights have to be tuned against a reference dataset.

use crate::core_types::units::Meters;
use crate::core_types::{RegionTag, SourceId, Variable};
use crate::error::{EtoError, Result};
use crate::physics::wind_profile;
use serde::{Deserialize, Serialize};

/// One row of the weighting table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceEntry {
    pub source: SourceId,
    /// Restrict the entry to locations tagged with this region
    #[serde(default)]
    pub region: Option<RegionTag>,
    /// Restrict the entry to one variable
    #[serde(default)]
    pub variable: Option<Variable>,
    /// Observation variance in the variable's squared unit
    pub variance: f64,
}

impl VarianceEntry {
    pub fn new(source: impl Into<SourceId>, variance: f64) -> Self {
        Self {
            source: source.into(),
            region: None,
            variable: None,
            variance,
        }
    }

    pub fn in_region(mut self, region: RegionTag) -> Self {
        self.region = Some(region);
        self
    }

    pub fn for_variable(mut self, variable: Variable) -> Self {
        self.variable = Some(variable);
        self
    }

    /// Match score for a lookup, `None` when the entry does not apply.
    /// A region match outranks a variable match.
    fn specificity(&self, source: &SourceId, region: RegionTag, variable: Variable) -> Option<u8> {
        if &self.source != source {
            return None;
        }
        let region_score = match self.region {
            Some(r) if r == region => 2,
            Some(_) => return None,
            None => 0,
        };
        let variable_score = match self.variable {
            Some(v) if v == variable => 1,
            Some(_) => return None,
            None => 0,
        };
        Some(region_score + variable_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Variance for sources with no matching entry
    pub default_variance: f64,
    pub entries: Vec<VarianceEntry>,
    /// Anemometer height assumed when a source reports no wind height
    pub default_wind_height: Meters,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            default_variance: 1.0,
            entries: Vec::new(),
            default_wind_height: Meters::new(wind_profile::REFERENCE_HEIGHT_M),
        }
    }
}

impl FusionConfig {
    pub fn with_entry(mut self, entry: VarianceEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Observation variance for `source` reporting `variable` at a location
    /// tagged `region`. The most specific entry wins; among equally
    /// specific entries the last one listed wins.
    pub fn variance_for(&self, source: &SourceId, region: RegionTag, variable: Variable) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| e.specificity(source, region, variable).map(|s| (s, e.variance)))
            .max_by_key(|(score, _)| *score)
            .map_or(self.default_variance, |(_, variance)| variance)
    }

    /// # Errors
    /// [`EtoError::InvalidConfig`] for a negative or non-finite variance,
    /// or a default wind height outside the log-profile domain.
    pub fn validate(&self) -> Result<()> {
        let invalid = |v: f64| !v.is_finite() || v < 0.0;
        if invalid(self.default_variance) {
            return Err(EtoError::InvalidConfig {
                reason: format!("default_variance {} must be finite and >= 0", self.default_variance),
            });
        }
        if let Some(entry) = self.entries.iter().find(|e| invalid(e.variance)) {
            return Err(EtoError::InvalidConfig {
                reason: format!(
                    "variance {} for source {} must be finite and >= 0",
                    entry.variance, entry.source
                ),
            });
        }
        wind_profile::check_measurement_height(self.default_wind_height).map_err(|e| {
            EtoError::InvalidConfig {
                reason: format!("default_wind_height: {e}"),
            }
        })
    }
}
