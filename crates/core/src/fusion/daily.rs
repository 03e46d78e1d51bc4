//! Daily record assembly
//!
//! Groups an unordered observation list by date and variable, converts each
//! source's wind to 2 m using that source's own anemometer height, and
//! fuses every variable into a [`FusedDailyRecord`].

use crate::core_types::units::{Meters, MetersPerSecond};
use crate::core_types::{FusedDailyRecord, FusedValue, RawObservation, SourceId, SourceReading, Variable};
use crate::error::{EtoError, Warning};
use crate::fusion::engine::{FusionEngine, FusionOutcome};
use crate::physics::wind_profile;
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// All readings for one calendar day, keyed by variable. Each source
/// contributes at most one reading per variable.
#[derive(Debug, Clone)]
pub struct DayObservations {
    pub date: NaiveDate,
    readings: FxHashMap<Variable, Vec<SourceReading>>,
    duplicates: Vec<Warning>,
}

impl DayObservations {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            readings: FxHashMap::default(),
            duplicates: Vec::new(),
        }
    }

    /// Add a reading. A repeat from a source that already reported
    /// `variable` today is dropped and recorded as a warning.
    pub fn push(&mut self, variable: Variable, reading: SourceReading) {
        let readings = self.readings.entry(variable).or_default();
        if readings.iter().any(|r| r.source == reading.source) {
            debug!(
                "Dropping repeated {} = {} from {} on {}",
                variable, reading.value, reading.source, self.date
            );
            self.duplicates.push(Warning::new(
                self.date,
                EtoError::DuplicateSource {
                    date: self.date,
                    variable,
                    source_id: reading.source,
                    value: reading.value,
                },
            ));
            return;
        }
        readings.push(reading);
    }

    /// Readings of `variable` in the order they were pushed.
    pub fn readings(&self, variable: Variable) -> &[SourceReading] {
        self.readings.get(&variable).map_or(&[], Vec::as_slice)
    }

    /// Warnings for the repeated readings dropped by [`DayObservations::push`].
    pub fn duplicates(&self) -> &[Warning] {
        &self.duplicates
    }
}

/// Group observations by date, earliest first. Within a day the input order
/// of each variable's readings is kept, and only the first reading of each
/// `(variable, source)` pair survives.
pub fn group_by_day(observations: &[RawObservation]) -> Vec<DayObservations> {
    let mut days: BTreeMap<NaiveDate, DayObservations> = BTreeMap::new();
    for obs in observations {
        days.entry(obs.date)
            .or_insert_with(|| DayObservations::new(obs.date))
            .push(obs.variable, SourceReading::from(obs));
    }
    days.into_values().collect()
}

/// Per-day result of fusion: the record when the day is usable, and every
/// warning raised along the way.
#[derive(Debug, Clone)]
pub struct DayFusion {
    pub date: NaiveDate,
    pub record: Option<FusedDailyRecord>,
    pub warnings: Vec<Warning>,
}

impl FusionEngine<'_> {
    /// Wind readings converted to 2 m, one per source with a usable height.
    fn wind_at_2m(&self, day: &DayObservations, warnings: &mut Vec<Warning>) -> Vec<SourceReading> {
        let mut heights: FxHashMap<&SourceId, f64> = FxHashMap::default();
        for reading in day.readings(Variable::WindHeight) {
            heights.entry(&reading.source).or_insert(reading.value);
        }

        let (accepted, range_warnings) =
            self.screen(day.date, Variable::WindSpeed, day.readings(Variable::WindSpeed));
        warnings.extend(range_warnings);

        accepted
            .into_iter()
            .filter_map(|reading| {
                let height = heights
                    .get(&reading.source)
                    .map_or(self.config().default_wind_height, |h| Meters::new(*h));
                match wind_profile::to_2m(MetersPerSecond::new(reading.value), height) {
                    Ok(u2) => Some(SourceReading {
                        value: *u2,
                        source: reading.source,
                    }),
                    Err(e) => {
                        warn!("Dropping wind from {} on {}: {}", reading.source, day.date, e);
                        warnings.push(Warning::new(day.date, e));
                        None
                    }
                }
            })
            .collect()
    }

    /// Fuse one day into a [`FusedDailyRecord`].
    ///
    /// The day is skipped (record `None`) when a required variable has no
    /// usable reading or the fused maximum temperature is below the fused
    /// minimum. A missing mean temperature is derived from the extremes.
    pub fn fuse_day(&self, day: &DayObservations) -> DayFusion {
        let date = day.date;
        let mut warnings = day.duplicates().to_vec();

        let mut outcomes: FxHashMap<Variable, FusionOutcome> = [
            Variable::MaxTemp,
            Variable::MinTemp,
            Variable::MeanTemp,
            Variable::RelativeHumidity,
            Variable::SolarRadiation,
            Variable::Precipitation,
        ]
        .into_iter()
        .map(|variable| {
            let (outcome, w) = self.reconcile(date, variable, day.readings(variable));
            warnings.extend(w);
            (variable, outcome)
        })
        .collect();

        let wind_readings = self.wind_at_2m(day, &mut warnings);
        let (wind_outcome, singular) = self.outcome(date, Variable::WindSpeed, &wind_readings);
        warnings.extend(singular);
        outcomes.insert(Variable::WindSpeed, wind_outcome);

        let fused = |variable: Variable| outcomes.get(&variable).and_then(FusionOutcome::value);
        let missing: Vec<Variable> = Variable::REQUIRED
            .into_iter()
            .filter(|variable| fused(*variable).is_none())
            .collect();

        let (
            Some(max_temp),
            Some(min_temp),
            Some(relative_humidity),
            Some(wind_speed),
            Some(solar_radiation),
        ) = (
            fused(Variable::MaxTemp),
            fused(Variable::MinTemp),
            fused(Variable::RelativeHumidity),
            fused(Variable::WindSpeed),
            fused(Variable::SolarRadiation),
        )
        else {
            warn!("Skipping {}: no usable observation of {:?}", date, missing);
            warnings.extend(
                missing
                    .into_iter()
                    .map(|variable| Warning::new(date, EtoError::MissingData { date, variable })),
            );
            return DayFusion {
                date,
                record: None,
                warnings,
            };
        };

        if max_temp.value < min_temp.value {
            warn!(
                "Skipping {}: fused Tmax {:.2} below Tmin {:.2}",
                date, max_temp.value, min_temp.value
            );
            warnings.push(Warning::new(
                date,
                EtoError::InconsistentTemperature {
                    date,
                    max: max_temp.value,
                    min: min_temp.value,
                },
            ));
            return DayFusion {
                date,
                record: None,
                warnings,
            };
        }

        let mean_temp = fused(Variable::MeanTemp).unwrap_or_else(|| {
            warn!("No mean temperature on {}, using (Tmax + Tmin) / 2", date);
            FusedValue::new(
                (max_temp.value + min_temp.value) / 2.0,
                (max_temp.variance + min_temp.variance) / 4.0,
                0,
            )
        });

        let relative_humidity = FusedValue {
            value: relative_humidity.value.clamp(0.0, 100.0),
            ..relative_humidity
        };

        DayFusion {
            date,
            record: Some(FusedDailyRecord {
                date,
                max_temp,
                min_temp,
                mean_temp,
                relative_humidity,
                wind_speed,
                solar_radiation,
                precipitation: fused(Variable::Precipitation),
            }),
            warnings,
        }
    }
}
