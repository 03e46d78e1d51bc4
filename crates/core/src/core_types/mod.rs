//! Core data model: observations, location, fused records, results

pub mod location;
pub mod observation;
pub mod record;
pub mod units;

pub use location::{LocationContext, RegionTag, MIN_ELEVATION_M};
pub use observation::{RawObservation, SourceId, SourceReading, Variable};
pub use record::{EToQuality, EToResult, FusedDailyRecord, FusedValue};
pub use units::*;
