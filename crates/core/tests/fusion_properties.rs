//! Algebraic properties of multi-source fusion
//!
//! Identity, order independence, idempotence and variance reduction,
//! checked over seeded random inputs, plus the equal-variance and
//! out-of-bounds reconciliation cases.
use approx::assert_relative_eq;
use chrono::NaiveDate;
use eto_fusion_core::{
    EtoError, FusionConfig, FusionEngine, FusionOutcome, RegionTag, SourceReading, Variable,
    VarianceEntry,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Config giving each of `n` sources its own random variance.
fn random_sources(rng: &mut StdRng, n: usize) -> (FusionConfig, Vec<SourceReading>) {
    let mut config = FusionConfig::default();
    let mut readings = Vec::with_capacity(n);
    for i in 0..n {
        let source = format!("source_{i}");
        config = config.with_entry(VarianceEntry::new(source.as_str(), rng.random_range(0.05..5.0)));
        readings.push(SourceReading::new(rng.random_range(-20.0..45.0), source));
    }
    (config, readings)
}

#[test]
fn single_observation_is_returned_unchanged() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let (config, readings) = random_sources(&mut rng, 1);
        let engine = FusionEngine::new(&config, RegionTag::Global);
        let fused = engine.fuse(date(), Variable::MaxTemp, &readings).unwrap();
        assert_eq!(fused.value, readings[0].value);
        assert_eq!(
            fused.variance,
            engine.variance_for(&readings[0].source, Variable::MaxTemp)
        );
        assert_eq!(fused.source_count, 1);
    }
}

#[test]
fn pairwise_fusion_is_order_independent() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..500 {
        let (config, readings) = random_sources(&mut rng, 2);
        let engine = FusionEngine::new(&config, RegionTag::Global);
        let reversed: Vec<_> = readings.iter().rev().cloned().collect();

        let ab = engine.fuse(date(), Variable::MinTemp, &readings).unwrap();
        let ba = engine.fuse(date(), Variable::MinTemp, &reversed).unwrap();
        assert_relative_eq!(ab.value, ba.value, epsilon = 1e-9, max_relative = 1e-12);
        assert_relative_eq!(ab.variance, ba.variance, epsilon = 1e-12, max_relative = 1e-12);
    }
}

#[test]
fn fusing_twice_gives_identical_output() {
    let mut rng = StdRng::seed_from_u64(5);
    for n in 1..8 {
        let (config, readings) = random_sources(&mut rng, n);
        let engine = FusionEngine::new(&config, RegionTag::Global);
        let first = engine.fuse(date(), Variable::SolarRadiation, &readings);
        let second = engine.fuse(date(), Variable::SolarRadiation, &readings);
        assert_eq!(first, second);
    }
}

#[test]
fn fused_variance_is_below_every_source_variance() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 2..10 {
        let (config, readings) = random_sources(&mut rng, n);
        let engine = FusionEngine::new(&config, RegionTag::Global);
        let smallest = readings
            .iter()
            .map(|r| engine.variance_for(&r.source, Variable::RelativeHumidity))
            .fold(f64::INFINITY, f64::min);
        let fused = engine
            .fuse(date(), Variable::RelativeHumidity, &readings)
            .unwrap();
        assert!(
            fused.variance < smallest,
            "fused variance {} not below smallest source variance {} for n={n}",
            fused.variance,
            smallest
        );
    }
}

#[test]
fn equal_variance_agreement_halves_the_variance() {
    let config = FusionConfig::default();
    let engine = FusionEngine::new(&config, RegionTag::Global);
    let fused = engine
        .fuse(
            date(),
            Variable::MeanTemp,
            &[
                SourceReading::new(25.0, "nasa_power"),
                SourceReading::new(25.0, "open_meteo"),
            ],
        )
        .unwrap();
    assert_eq!(fused.value, 25.0);
    assert_eq!(fused.variance, config.default_variance / 2.0);
}

#[test]
fn out_of_bounds_reading_is_excluded_before_fusion() {
    let config = FusionConfig::default();
    let engine = FusionEngine::new(&config, RegionTag::Brazil);

    // Sole observation out of range: nothing left to fuse
    let (outcome, warnings) =
        engine.reconcile(date(), Variable::MaxTemp, &[SourceReading::new(-55.0, "bad")]);
    assert_eq!(outcome, FusionOutcome::Missing);
    assert!(matches!(
        warnings[0].cause,
        EtoError::PhysicalRange { min, max, .. } if min == -30.0 && max == 50.0
    ));

    // With other sources present fusion proceeds on the rest
    let (outcome, warnings) = engine.reconcile(
        date(),
        Variable::MaxTemp,
        &[
            SourceReading::new(-55.0, "bad"),
            SourceReading::new(29.0, "a"),
            SourceReading::new(31.0, "b"),
        ],
    );
    let FusionOutcome::Fused(value) = outcome else {
        panic!("expected a fused value, got {outcome:?}");
    };
    assert_relative_eq!(value.value, 30.0, epsilon = 1e-12);
    assert_eq!(value.source_count, 2);
    assert_eq!(warnings.len(), 1);
}
