//! Per-location ETo pipeline
//!
//! raw observations → daily fusion → net radiation + Penman-Monteith →
//! temporal smoothing → results. Fusion and Penman-Monteith run per date in
//! parallel; the smoother is sequential. Independent locations can be run
//! together with [`EtoPipeline::run_batch`].

use crate::core_types::{EToQuality, EToResult, FusedDailyRecord, LocationContext, RawObservation};
use crate::error::{Result, Warning};
use crate::fusion::{group_by_day, DayFusion, FusionConfig, FusionEngine};
use crate::physics::penman_monteith;
use crate::smoothing::{ClimateNormals, SmootherConfig, SmoothingMode, TimeSeriesSmoother};
use chrono::NaiveDate;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Every tunable knob of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fusion: FusionConfig,
    pub smoother: SmootherConfig,
}

impl PipelineConfig {
    /// # Errors
    /// [`crate::EtoError::InvalidConfig`] from either section.
    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.smoother.validate()
    }
}

/// Totals over the final ETo series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EToSummary {
    pub total_days: usize,
    /// Sum of `eto_final` (mm)
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl EToSummary {
    /// `None` for an empty result list.
    pub fn from_results(results: &[EToResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let total: f64 = results.iter().map(|r| r.eto_final).sum();
        let max = results.iter().map(|r| r.eto_final).fold(f64::NEG_INFINITY, f64::max);
        let min = results.iter().map(|r| r.eto_final).fold(f64::INFINITY, f64::min);
        Some(Self {
            total_days: results.len(),
            total: penman_monteith::round_mm(total),
            mean: penman_monteith::round_mm(total / results.len() as f64),
            max,
            min,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// One result per usable day, ordered by date
    pub results: Vec<EToResult>,
    pub warnings: Vec<Warning>,
    pub summary: Option<EToSummary>,
    /// Whether smoothing was seeded from the climate normals
    pub smoothing_mode: SmoothingMode,
}

impl PipelineOutput {
    /// Dates that had observations but produced no result.
    pub fn skipped_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .warnings
            .iter()
            .filter(|w| w.skipped_day())
            .map(|w| w.date)
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        dates.sort_unstable();
        dates
    }
}

/// One location's inputs for [`EtoPipeline::run_batch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationJob {
    pub location: LocationContext,
    pub observations: Vec<RawObservation>,
    #[serde(default)]
    pub normals: Option<ClimateNormals>,
}

#[derive(Debug, Clone)]
pub struct EtoPipeline {
    config: PipelineConfig,
    smoother: TimeSeriesSmoother,
}

impl EtoPipeline {
    /// # Errors
    /// [`crate::EtoError::InvalidConfig`] when the configuration fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let smoother = TimeSeriesSmoother::new(config.smoother.clone());
        Ok(Self { config, smoother })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for one location.
    ///
    /// Per-day problems never abort the run: skipped days and excluded
    /// observations are reported in [`PipelineOutput::warnings`].
    ///
    /// # Errors
    /// [`crate::EtoError::InvalidLocation`] before any per-date work when
    /// the location is unusable.
    pub fn run(
        &self,
        location: &LocationContext,
        observations: &[RawObservation],
        normals: Option<&ClimateNormals>,
    ) -> Result<PipelineOutput> {
        location.validate()?;

        let engine = FusionEngine::new(&self.config.fusion, location.region);
        let days = group_by_day(observations);
        let fused: Vec<DayFusion> = days.par_iter().map(|day| engine.fuse_day(day)).collect();

        let mut warnings = Vec::new();
        let mut records: Vec<FusedDailyRecord> = Vec::with_capacity(fused.len());
        for day in fused {
            warnings.extend(day.warnings);
            records.extend(day.record);
        }

        let raw = penman_monteith::eto_series(&records, location)?;
        let series: Vec<(NaiveDate, f64)> = records.iter().map(|r| r.date).zip(raw.iter().copied()).collect();
        let smoothed = self.smoother.smooth(&series, normals);

        let max_eto = engine.bounds().max_eto;
        let results: Vec<EToResult> = records
            .iter()
            .zip(raw)
            .zip(smoothed.values)
            .map(|((record, eto_raw), eto_final)| EToResult {
                date: record.date,
                eto_raw,
                eto_final,
                precipitation: record.precipitation.map(|p| p.value),
                quality: quality(record, eto_raw, max_eto),
                anomaly: normals.and_then(|n| n.anomaly(record.date, eto_final)),
            })
            .collect();

        let output = PipelineOutput {
            summary: EToSummary::from_results(&results),
            results,
            warnings,
            smoothing_mode: smoothed.mode,
        };
        info!(
            "ETo run at ({:.4}, {:.4}) [{}]: {} days computed, {} skipped, {} warnings, {:?} smoothing",
            *location.latitude,
            *location.longitude,
            location.region,
            output.results.len(),
            output.skipped_dates().len(),
            output.warnings.len(),
            output.smoothing_mode
        );
        Ok(output)
    }

    /// Run independent locations in parallel. Results keep the job order.
    pub fn run_batch(&self, jobs: &[LocationJob]) -> Vec<Result<PipelineOutput>> {
        jobs.par_iter()
            .map(|job| self.run(&job.location, &job.observations, job.normals.as_ref()))
            .collect()
    }
}

fn quality(record: &FusedDailyRecord, eto_raw: f64, max_eto: f64) -> EToQuality {
    if eto_raw > max_eto {
        EToQuality::Suspect
    } else if record.is_degraded() {
        EToQuality::Degraded
    } else {
        EToQuality::High
    }
}
