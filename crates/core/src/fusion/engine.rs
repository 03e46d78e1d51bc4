//! Per-variable measurement fusion
//!
//! A [`FusionEngine`] is a read-only context built for one location run:
//! the weighting table, the location's region tag and that region's
//! plausibility bounds. Every `(date, variable)` fusion is independent and
//! nothing carries over between calls, so one engine can be shared across
//! threads.

use crate::core_types::{FusedValue, RegionTag, SourceId, SourceReading, Variable};
use crate::error::{EtoError, Result, Warning};
use crate::fusion::bounds::PlausibilityBounds;
use crate::fusion::config::FusionConfig;
use crate::fusion::kalman::{self, Combination};
use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

/// How a `(date, variable)` value was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FusionOutcome {
    /// Two or more sources reconciled by the sequential update
    Fused(FusedValue),
    /// Two or more sources with degenerate variances, simple mean used
    Averaged(FusedValue),
    /// Only one source survived screening
    SingleSourceFallback { value: FusedValue, source: SourceId },
    /// Nothing usable
    Missing,
}

impl FusionOutcome {
    pub fn value(&self) -> Option<FusedValue> {
        match self {
            FusionOutcome::Fused(v)
            | FusionOutcome::Averaged(v)
            | FusionOutcome::SingleSourceFallback { value: v, .. } => Some(*v),
            FusionOutcome::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FusionOutcome::Missing)
    }
}

#[derive(Debug, Clone)]
pub struct FusionEngine<'a> {
    config: &'a FusionConfig,
    region: RegionTag,
    bounds: &'static PlausibilityBounds,
}

impl<'a> FusionEngine<'a> {
    pub fn new(config: &'a FusionConfig, region: RegionTag) -> Self {
        Self {
            config,
            region,
            bounds: PlausibilityBounds::for_region(region),
        }
    }

    pub fn config(&self) -> &FusionConfig {
        self.config
    }

    pub fn region(&self) -> RegionTag {
        self.region
    }

    pub fn bounds(&self) -> &'static PlausibilityBounds {
        self.bounds
    }

    /// A-priori variance of `source` for `variable` in this engine's region.
    pub fn variance_for(&self, source: &SourceId, variable: Variable) -> f64 {
        self.config.variance_for(source, self.region, variable)
    }

    /// Fuse same-day readings of one variable.
    ///
    /// The first reading is the prior; each further reading is folded in
    /// with gain `k = P / (P + R)`. A single reading comes back unchanged
    /// with its own source variance. A source listed more than once counts
    /// once, with its first reading. Readings are not screened here; see
    /// [`FusionEngine::reconcile`].
    ///
    /// # Errors
    /// [`EtoError::MissingData`] when `readings` is empty.
    pub fn fuse(
        &self,
        date: NaiveDate,
        variable: Variable,
        readings: &[SourceReading],
    ) -> Result<FusedValue> {
        self.combine(date, variable, &first_per_source(readings))
            .map(|(value, _)| value)
            .ok_or(EtoError::MissingData { date, variable })
    }

    /// Split readings into those inside the region's plausibility bounds
    /// and a warning for each one outside.
    pub fn screen(
        &self,
        date: NaiveDate,
        variable: Variable,
        readings: &[SourceReading],
    ) -> (Vec<SourceReading>, Vec<Warning>) {
        let mut accepted = Vec::with_capacity(readings.len());
        let mut warnings = Vec::new();

        for reading in readings {
            if self.bounds.contains(variable, reading.value) {
                accepted.push(reading.clone());
                continue;
            }
            let (min, max) = self
                .bounds
                .range(variable)
                .map_or((f64::NEG_INFINITY, f64::INFINITY), |r| (*r.start(), *r.end()));
            debug!(
                "Excluding {} = {} from {} on {}: outside [{}, {}]",
                variable, reading.value, reading.source, date, min, max
            );
            warnings.push(Warning::new(
                date,
                EtoError::PhysicalRange {
                    date,
                    variable,
                    source_id: reading.source.clone(),
                    value: reading.value,
                    min,
                    max,
                },
            ));
        }

        (accepted, warnings)
    }

    /// Screen then fuse, reporting how the value was obtained.
    pub fn reconcile(
        &self,
        date: NaiveDate,
        variable: Variable,
        readings: &[SourceReading],
    ) -> (FusionOutcome, Vec<Warning>) {
        let (accepted, mut warnings) = self.screen(date, variable, readings);
        let (outcome, singular) = self.outcome(date, variable, &accepted);
        warnings.extend(singular);
        (outcome, warnings)
    }

    /// Fuse readings that have already been screened.
    pub(crate) fn outcome(
        &self,
        date: NaiveDate,
        variable: Variable,
        accepted: &[SourceReading],
    ) -> (FusionOutcome, Option<Warning>) {
        let accepted = first_per_source(accepted);
        match accepted.as_slice() {
            [] => (FusionOutcome::Missing, None),
            [only] => {
                let value = FusedValue::new(only.value, self.variance_for(&only.source, variable), 1);
                (
                    FusionOutcome::SingleSourceFallback {
                        value,
                        source: only.source.clone(),
                    },
                    None,
                )
            }
            _ => match self.combine(date, variable, &accepted) {
                Some((value, false)) => (FusionOutcome::Fused(value), None),
                Some((value, true)) => (
                    FusionOutcome::Averaged(value),
                    Some(Warning::new(date, EtoError::SingularFusion { date, variable })),
                ),
                None => (FusionOutcome::Missing, None),
            },
        }
    }

    /// Returns the fused value and whether the averaging fallback was used.
    fn combine(
        &self,
        date: NaiveDate,
        variable: Variable,
        readings: &[SourceReading],
    ) -> Option<(FusedValue, bool)> {
        let pairs: Vec<(f64, f64)> = readings
            .iter()
            .map(|r| (r.value, self.variance_for(&r.source, variable)))
            .collect();

        let combination = kalman::combine(&pairs)?;
        let averaged = matches!(combination, Combination::Averaged(_));
        if averaged {
            debug!(
                "Singular fusion of {} on {} ({} sources), using simple average",
                variable,
                date,
                readings.len()
            );
        }
        let estimate = combination.estimate();
        Some((
            FusedValue::new(estimate.mean, estimate.variance, readings.len()),
            averaged,
        ))
    }
}

/// First reading of each source, in input order.
fn first_per_source(readings: &[SourceReading]) -> Vec<SourceReading> {
    let mut seen: FxHashSet<&SourceId> = FxHashSet::default();
    readings
        .iter()
        .filter(|r| seen.insert(&r.source))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::config::VarianceEntry;
    use approx::assert_relative_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn missing_data_for_empty_input() {
        let cfg = FusionConfig::default();
        let engine = FusionEngine::new(&cfg, RegionTag::Global);
        assert_eq!(
            engine.fuse(day(), Variable::MaxTemp, &[]),
            Err(EtoError::MissingData {
                date: day(),
                variable: Variable::MaxTemp
            })
        );
    }

    #[test]
    fn regional_authority_pulls_the_estimate() {
        let cfg = FusionConfig::default()
            .with_entry(VarianceEntry::new("regional", 0.5).in_region(RegionTag::Brazil));
        let engine = FusionEngine::new(&cfg, RegionTag::Brazil);
        let fused = engine
            .fuse(
                day(),
                Variable::MaxTemp,
                &[SourceReading::new(30.0, "global"), SourceReading::new(27.0, "regional")],
            )
            .unwrap();
        // weights 1/1 and 1/0.5 → 28.0
        assert_relative_eq!(fused.value, 28.0, epsilon = 1e-12);
        assert_relative_eq!(fused.variance, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(fused.source_count, 2);
    }

    #[test]
    fn reconcile_reports_single_source_fallback() {
        let cfg = FusionConfig::default();
        let engine = FusionEngine::new(&cfg, RegionTag::Brazil);
        let (outcome, warnings) = engine.reconcile(
            day(),
            Variable::MaxTemp,
            &[SourceReading::new(-55.0, "a"), SourceReading::new(24.0, "b")],
        );
        assert_eq!(
            outcome,
            FusionOutcome::SingleSourceFallback {
                value: FusedValue::new(24.0, 1.0, 1),
                source: SourceId::new("b"),
            }
        );
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0].cause,
            EtoError::PhysicalRange { value, .. } if value == -55.0
        ));
    }

    #[test]
    fn repeated_source_is_not_independent_evidence() {
        let cfg = FusionConfig::default();
        let engine = FusionEngine::new(&cfg, RegionTag::Global);
        let twice = [
            SourceReading::new(30.0, "nasa_power"),
            SourceReading::new(30.0, "nasa_power"),
        ];
        assert_eq!(
            engine.fuse(day(), Variable::MaxTemp, &twice),
            Ok(FusedValue::new(30.0, 1.0, 1))
        );

        let (outcome, _) = engine.reconcile(day(), Variable::MaxTemp, &twice);
        assert!(matches!(outcome, FusionOutcome::SingleSourceFallback { .. }));

        // Only the first reading of a repeated source is used
        let (outcome, _) = engine.reconcile(
            day(),
            Variable::MaxTemp,
            &[
                SourceReading::new(28.0, "a"),
                SourceReading::new(40.0, "a"),
                SourceReading::new(32.0, "b"),
            ],
        );
        assert_eq!(outcome, FusionOutcome::Fused(FusedValue::new(30.0, 0.5, 2)));
    }

    #[test]
    fn reconcile_flags_singular_fusion() {
        let cfg = FusionConfig {
            default_variance: 0.0,
            ..FusionConfig::default()
        };
        let engine = FusionEngine::new(&cfg, RegionTag::Global);
        let (outcome, warnings) = engine.reconcile(
            day(),
            Variable::SolarRadiation,
            &[SourceReading::new(18.0, "a"), SourceReading::new(22.0, "b")],
        );
        assert_eq!(outcome, FusionOutcome::Averaged(FusedValue::new(20.0, 0.0, 2)));
        assert!(matches!(warnings[..], [Warning { cause: EtoError::SingularFusion { .. }, .. }]));
    }

    #[test]
    fn everything_out_of_range_is_missing() {
        let cfg = FusionConfig::default();
        let engine = FusionEngine::new(&cfg, RegionTag::Global);
        let (outcome, warnings) = engine.reconcile(
            day(),
            Variable::RelativeHumidity,
            &[SourceReading::new(140.0, "a"), SourceReading::new(f64::NAN, "b")],
        );
        assert!(outcome.is_missing());
        assert_eq!(warnings.len(), 2);
    }
}
