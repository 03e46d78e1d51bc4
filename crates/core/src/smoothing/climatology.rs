//! Monthly climate normals and ETo anomaly detection

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Floor on a monthly standard deviation (mm/day). Keeps z-scores finite
/// for months with very little spread in the history.
pub const MIN_STD_DEV: f64 = 0.4;

/// |z| above this marks a day as anomalous
pub const ANOMALY_Z_THRESHOLD: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNormal {
    pub mean: f64,
    pub std_dev: f64,
}

/// Deviation of one day's ETo from its month's normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// `eto - normal` (mm/day)
    pub deviation: f64,
    /// Deviation relative to the normal, `None` when the normal is zero
    pub deviation_percent: Option<f64>,
    pub z_score: f64,
    pub is_anomaly: bool,
}

/// Mean and spread of daily ETo per calendar month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateNormals {
    months: [Option<MonthlyNormal>; 12],
}

impl ClimateNormals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normal for `month` (1 = January). Out-of-range months are ignored.
    pub fn with_month(mut self, month: u32, mean: f64, std_dev: f64) -> Self {
        if let Some(slot) = month.checked_sub(1).and_then(|i| self.months.get_mut(i as usize)) {
            *slot = Some(MonthlyNormal {
                mean,
                std_dev: std_dev.max(MIN_STD_DEV),
            });
        }
        self
    }

    /// Build normals from a historical daily series. Months with no finite
    /// values stay unset.
    pub fn from_history(history: &[(NaiveDate, f64)]) -> Self {
        let mut buckets: [Vec<f64>; 12] = Default::default();
        for &(date, eto) in history {
            if eto.is_finite() {
                buckets[date.month0() as usize].push(eto);
            }
        }

        let mut normals = Self::new();
        for (i, values) in buckets.iter().enumerate() {
            if values.is_empty() {
                continue;
            }
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let std_dev = if values.len() > 1 {
                (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
            } else {
                0.0
            };
            normals = normals.with_month(i as u32 + 1, mean, std_dev);
        }
        normals
    }

    pub fn normal_for(&self, date: NaiveDate) -> Option<MonthlyNormal> {
        self.months[date.month0() as usize]
    }

    /// Compare `eto` on `date` with that month's normal.
    pub fn anomaly(&self, date: NaiveDate, eto: f64) -> Option<Anomaly> {
        let normal = self.normal_for(date)?;
        let deviation = eto - normal.mean;
        let z_score = deviation / normal.std_dev;
        Some(Anomaly {
            deviation,
            deviation_percent: (normal.mean.abs() > f64::EPSILON)
                .then(|| deviation / normal.mean * 100.0),
            z_score,
            is_anomaly: z_score.abs() > ANOMALY_Z_THRESHOLD,
        })
    }
}
