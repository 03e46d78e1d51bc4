//! Second-stage processing of the raw ETo series: temporal smoothing and
//! comparison against monthly climate normals

pub mod climatology;
pub mod smoother;

pub use climatology::{Anomaly, ClimateNormals, MonthlyNormal};
pub use smoother::{SmoothedSeries, SmootherConfig, SmoothingMode, TimeSeriesSmoother};
