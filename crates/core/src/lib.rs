//! Reference Evapotranspiration Fusion Core
//!
//! Estimates daily FAO-56 reference evapotranspiration (ETo) at a point from
//! redundant, disagreeing observations supplied by several weather data
//! providers.
//!
//! ## Pipeline
//!
//! - **Fusion**: same-day readings of each variable are screened against
//!   regional plausibility bounds and reconciled by a sequential Kalman
//!   update weighted by per-source variances
//! - **Physics**: wind normalized to 2 m, solar geometry, atmospheric
//!   correction, net radiation and the Penman-Monteith equation
//! - **Smoothing**: a forward temporal filter over the raw ETo series,
//!   seeded from monthly climate normals when they are supplied
//!
//! ```
//! use chrono::NaiveDate;
//! use eto_fusion_core::{EtoPipeline, LocationContext, PipelineConfig, RawObservation, RegionTag, Variable};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let obs = vec![
//!     RawObservation::new(date, Variable::MaxTemp, 30.0, "nasa_power"),
//!     RawObservation::new(date, Variable::MinTemp, 18.0, "nasa_power"),
//!     RawObservation::new(date, Variable::RelativeHumidity, 55.0, "nasa_power"),
//!     RawObservation::new(date, Variable::WindSpeed, 2.2, "nasa_power"),
//!     RawObservation::new(date, Variable::SolarRadiation, 20.0, "nasa_power"),
//! ];
//! let location = LocationContext::new(-15.7939, -47.8828, 1172.0, RegionTag::Brazil);
//! let pipeline = EtoPipeline::new(PipelineConfig::default()).unwrap();
//! let output = pipeline.run(&location, &obs, None).unwrap();
//! assert_eq!(output.results.len(), 1);
//! assert!(output.results[0].eto_raw > 0.0);
//! ```

pub mod core_types;
pub mod error;
pub mod fusion;
pub mod physics;
pub mod pipeline;
pub mod smoothing;

pub use core_types::{
    EToQuality, EToResult, FusedDailyRecord, FusedValue, LocationContext, RawObservation,
    RegionTag, SourceId, SourceReading, Variable,
};
pub use error::{EtoError, Result, Warning};
pub use fusion::{FusionConfig, FusionEngine, FusionOutcome, PlausibilityBounds, VarianceEntry};
pub use pipeline::{EToSummary, EtoPipeline, LocationJob, PipelineConfig, PipelineOutput};
pub use smoothing::{
    Anomaly, ClimateNormals, SmoothedSeries, SmootherConfig, SmoothingMode, TimeSeriesSmoother,
};
