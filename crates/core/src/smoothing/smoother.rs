//! Temporal smoothing of the raw ETo series
//!
//! Each raw value is treated as a noisy observation of a slowly varying
//! evapotranspiration process. A one-dimensional predict/update filter runs
//! forward over every run of consecutive calendar days, using the same gain
//! as measurement fusion. Innovations beyond `outlier_gate` standard
//! deviations have their observation variance inflated so that isolated
//! spikes are damped while a sustained shift is still followed.
//!
//! Two ways to start a run:
//!
//! - **Standalone**: the first raw value is the initial estimate, with the
//!   configured noise parameters
//! - **Climatological**: when the run's month has a climate normal, the
//!   filter starts from the normal's mean with variance equal to its
//!   standard deviation, and derives its noise from the historical spread
//!   (`Q = σ²/100`, `R = σ²(1 - station_confidence)`)

use crate::error::{EtoError, Result};
use crate::fusion::Gaussian;
use crate::physics::penman_monteith::round_mm;
use crate::smoothing::climatology::{ClimateNormals, MonthlyNormal};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of the historical variance used as process noise in a seeded run
const NORMAL_PROCESS_FRACTION: f64 = 0.01;

/// Floors on the noise derived from a climate normal
const MIN_SEEDED_PROCESS_NOISE: f64 = 1e-5;
const MIN_SEEDED_MEASUREMENT_VARIANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Variance added per day in the predict step ((mm/day)²)
    pub process_noise: f64,
    /// Variance of a raw ETo value around the true process ((mm/day)²)
    pub measurement_variance: f64,
    /// Innovation gate in standard deviations
    pub outlier_gate: f64,
    /// Trust in the raw series relative to the climate normal, in [0, 1].
    /// Only used by runs seeded from a normal.
    pub station_confidence: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            process_noise: 0.05,
            measurement_variance: 0.25,
            outlier_gate: 3.0,
            station_confidence: 0.85,
        }
    }
}

impl SmootherConfig {
    /// # Errors
    /// [`EtoError::InvalidConfig`] when a parameter is non-finite, the
    /// process noise is negative, the measurement variance or gate is not
    /// positive, or the station confidence is outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, value: f64, ok: bool| {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(EtoError::InvalidConfig {
                    reason: format!("smoother {name} = {value} is invalid"),
                })
            }
        };
        check("process_noise", self.process_noise, self.process_noise >= 0.0)?;
        check(
            "measurement_variance",
            self.measurement_variance,
            self.measurement_variance > 0.0,
        )?;
        check("outlier_gate", self.outlier_gate, self.outlier_gate > 0.0)?;
        check(
            "station_confidence",
            self.station_confidence,
            (0.0..=1.0).contains(&self.station_confidence),
        )
    }
}

/// How the runs of a smoothed series were started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Every run started from its own first value
    #[default]
    Standalone,
    /// At least one run started from a monthly climate normal
    Climatological,
}

/// Output of [`TimeSeriesSmoother::smooth`]
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    pub values: Vec<f64>,
    pub mode: SmoothingMode,
}

/// Noise parameters of one run
#[derive(Debug, Clone, Copy)]
struct RunNoise {
    process: f64,
    measurement: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TimeSeriesSmoother {
    config: SmootherConfig,
}

impl TimeSeriesSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Smooth a date-ordered raw ETo series.
    ///
    /// A gap in the dates or a non-finite value ends the current run; the
    /// next valid value starts a fresh one. Without a normal for its month,
    /// the first value of a run (and so any run of length one) is returned
    /// as is. With one, the run is seeded from the normal and every value,
    /// the first included, is an update. Output values are clamped to zero
    /// and rounded to 0.001 mm/day.
    pub fn smooth(
        &self,
        series: &[(NaiveDate, f64)],
        normals: Option<&ClimateNormals>,
    ) -> SmoothedSeries {
        let mut values = Vec::with_capacity(series.len());
        let mut mode = SmoothingMode::Standalone;
        let mut state: Option<(NaiveDate, Gaussian, RunNoise)> = None;

        for &(date, raw) in series {
            if !raw.is_finite() {
                values.push(raw);
                state = None;
                continue;
            }

            let (next, noise) = match state {
                Some((previous, estimate, noise))
                    if date.signed_duration_since(previous).num_days() == 1 =>
                {
                    (self.step(estimate, raw, noise), noise)
                }
                _ => match normals.and_then(|n| n.normal_for(date)) {
                    Some(normal) => {
                        let (prior, noise) = self.seed(normal);
                        debug!(
                            "Seeding smoother run at {} from normal {:.3} ± {:.3}",
                            date, normal.mean, normal.std_dev
                        );
                        mode = SmoothingMode::Climatological;
                        (self.step(prior, raw, noise), noise)
                    }
                    None => (
                        Gaussian::new(raw, self.config.measurement_variance),
                        self.standalone_noise(),
                    ),
                },
            };

            values.push(round_mm(next.mean.max(0.0)));
            state = Some((date, next, noise));
        }

        SmoothedSeries { values, mode }
    }

    /// Smooth values taken to be on consecutive days, without normals.
    pub fn smooth_values(&self, values: &[f64]) -> Vec<f64> {
        let start = NaiveDate::MIN;
        let series: Vec<(NaiveDate, f64)> = values
            .iter()
            .zip(start.iter_days())
            .map(|(v, d)| (d, *v))
            .collect();
        self.smooth(&series, None).values
    }

    fn standalone_noise(&self) -> RunNoise {
        RunNoise {
            process: self.config.process_noise,
            measurement: self.config.measurement_variance,
        }
    }

    /// Initial estimate and noise for a run seeded from `normal`.
    fn seed(&self, normal: MonthlyNormal) -> (Gaussian, RunNoise) {
        let spread = normal.std_dev.powi(2);
        let noise = RunNoise {
            process: (spread * NORMAL_PROCESS_FRACTION).max(MIN_SEEDED_PROCESS_NOISE),
            measurement: (spread * (1.0 - self.config.station_confidence))
                .max(MIN_SEEDED_MEASUREMENT_VARIANCE),
        };
        (Gaussian::new(normal.mean, normal.std_dev), noise)
    }

    fn step(&self, estimate: Gaussian, raw: f64, noise: RunNoise) -> Gaussian {
        let gate = self.config.outlier_gate;

        let prior = estimate.predict(noise.process);
        let innovation = raw - prior.mean;
        let innovation_variance = prior.variance + noise.measurement;

        let r = if innovation.abs() > gate * innovation_variance.sqrt() {
            noise.measurement * innovation.powi(2) / (gate.powi(2) * innovation_variance)
        } else {
            noise.measurement
        };

        prior
            .update(raw, r)
            .unwrap_or_else(|| Gaussian::new(raw, noise.measurement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn smoother() -> TimeSeriesSmoother {
        TimeSeriesSmoother::new(SmootherConfig::default())
    }

    #[test]
    fn constant_series_is_unchanged() {
        let out = smoother().smooth_values(&[3.5; 8]);
        assert_eq!(out, vec![3.5; 8]);
    }

    #[test]
    fn single_value_passes_through() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(smoother().smooth(&[(d, 6.123)], None).values, vec![6.123]);
    }

    #[test]
    fn gap_restarts_the_filter() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let out = smoother()
            .smooth(&[(d(1), 2.0), (d(2), 2.0), (d(5), 6.0), (d(6), 6.0)], None)
            .values;
        // 6.0 after the gap is a new run, not an innovation against 2.0
        assert_eq!(out, vec![2.0, 2.0, 6.0, 6.0]);
    }

    #[test]
    fn non_finite_value_is_passed_through_and_breaks_the_run() {
        let out = smoother().smooth_values(&[4.0, f64::NAN, 9.0, 9.0]);
        assert_eq!(out[0], 4.0);
        assert!(out[1].is_nan());
        assert_eq!(&out[2..], &[9.0, 9.0]);
    }

    #[test]
    fn sustained_shift_is_followed() {
        let mut raw = vec![4.0; 5];
        raw.extend([7.0; 10]);
        let out = smoother().smooth_values(&raw);
        assert!(out[5] > 4.0 && out[5] < 7.0);
        assert_abs_diff_eq!(out[14], 7.0, epsilon = 0.1);
        assert!(out.windows(2).skip(4).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn output_is_never_negative() {
        let out = smoother().smooth_values(&[0.2, 0.0, 0.0, 0.0]);
        assert!(out.iter().all(|v| *v >= 0.0));
    }

    fn june_series(values: &[f64]) -> Vec<(NaiveDate, f64)> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        start.iter_days().zip(values.iter().copied()).collect()
    }

    #[test]
    fn run_is_seeded_from_the_monthly_normal() {
        let normals = ClimateNormals::new().with_month(6, 3.0, 0.5);
        let out = smoother().smooth(&june_series(&[4.0; 5]), Some(&normals));
        assert_eq!(out.mode, SmoothingMode::Climatological);

        // Q = 0.0025, R = 0.0375: the first value is pulled toward 3.0
        assert_abs_diff_eq!(out.values[0], 3.931, epsilon = 1e-3);
        assert!(out.values.windows(2).all(|w| w[0] < w[1]));
        assert!(out.values.iter().all(|v| *v < 4.0));
        assert_abs_diff_eq!(out.values[4], 4.0, epsilon = 0.05);
    }

    #[test]
    fn month_without_normal_falls_back_to_standalone() {
        let normals = ClimateNormals::new().with_month(1, 3.0, 0.5);
        let series = june_series(&[4.0, 5.0, 4.5]);
        let seeded = smoother().smooth(&series, Some(&normals));
        let plain = smoother().smooth(&series, None);
        assert_eq!(seeded, plain);
        assert_eq!(plain.mode, SmoothingMode::Standalone);
        assert_eq!(plain.values[0], 4.0);
    }

    #[test]
    fn each_run_after_a_gap_is_reseeded() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let normals = ClimateNormals::new().with_month(6, 3.0, 0.5);
        let out = smoother().smooth(&[(d(1), 4.0), (d(10), 4.0)], Some(&normals));
        assert_eq!(out.values[0], out.values[1]);
        assert!(out.values[0] < 4.0);
    }

    #[test]
    fn full_station_confidence_still_has_a_noise_floor() {
        let config = SmootherConfig {
            station_confidence: 1.0,
            ..SmootherConfig::default()
        };
        let normals = ClimateNormals::new().with_month(6, 3.0, 0.5);
        let out = TimeSeriesSmoother::new(config).smooth(&june_series(&[4.0]), Some(&normals));
        assert!(out.values[0] > 3.9 && out.values[0] < 4.0);
    }

    #[test]
    fn config_validation() {
        assert!(SmootherConfig::default().validate().is_ok());
        let bad = SmootherConfig {
            measurement_variance: 0.0,
            ..SmootherConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SmootherConfig {
            process_noise: f64::INFINITY,
            ..SmootherConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SmootherConfig {
            station_confidence: 1.5,
            ..SmootherConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
