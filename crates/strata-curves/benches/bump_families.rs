//! Benchmarks for bumped funding families.
//!
//! Run with: cargo bench -p strata-curves

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use strata_config::BumpConfig;
use strata_core::{Currency, Date};
use strata_curves::builders::ScenarioDiscountCurveBuilder;
use strata_curves::bumping::{FundingCalibration, ScenarioGenerator};
use strata_curves::calibration::{CalibrationLeg, LatentStateKind, LatentStateStretchSpec};
use strata_curves::instruments::{CalibrationInstrument, Deposit, QuoteMeasure, Swap};

// =============================================================================
// MARKET DATA
// =============================================================================

fn valuation() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn funding_spec() -> LatentStateStretchSpec {
    let spot = valuation().add_business_days(2);
    let deposits: Vec<Arc<dyn CalibrationInstrument>> = ["1M", "3M", "6M"]
        .iter()
        .map(|t| Arc::new(Deposit::from_tenor(spot, t.parse().unwrap(), Currency::USD).unwrap()) as _)
        .collect();
    let swaps: Vec<Arc<dyn CalibrationInstrument>> = ["1Y", "2Y", "3Y", "5Y", "7Y", "10Y", "15Y", "20Y", "30Y"]
        .iter()
        .map(|t| Arc::new(Swap::from_tenor(spot, t.parse().unwrap(), Currency::USD).unwrap()) as _)
        .collect();
    let legs = vec![
        CalibrationLeg::uniform(deposits, vec![0.0430, 0.0435, 0.0440], QuoteMeasure::Rate).unwrap(),
        CalibrationLeg::uniform(
            swaps,
            vec![0.0420, 0.0405, 0.0398, 0.0395, 0.0400, 0.0410, 0.0420, 0.0428, 0.0430],
            QuoteMeasure::SwapRate,
        )
        .unwrap(),
    ];
    LatentStateStretchSpec::new("USD", LatentStateKind::DiscountFactor, legs).unwrap()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_base_calibration(c: &mut Criterion) {
    let builder = ScenarioDiscountCurveBuilder::new(valuation());
    let spec = funding_spec();
    c.bench_function("funding_shape_preserving", |b| {
        b.iter(|| builder.calibrate(black_box(&spec)).unwrap())
    });
}

fn bench_family_generation(c: &mut Criterion) {
    let calibration = FundingCalibration::new(ScenarioDiscountCurveBuilder::new(valuation()), funding_spec()).unwrap();
    let mut group = c.benchmark_group("funding_family");
    group.sample_size(10);
    for parallel in [false, true] {
        let config = BumpConfig {
            parallel_execution: parallel,
            ..BumpConfig::standard()
        };
        let generator = ScenarioGenerator::new(config);
        let label = if parallel { "rayon" } else { "sequential" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &generator, |b, generator| {
            b.iter(|| generator.generate(black_box(&calibration)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(calibration, bench_base_calibration);
criterion_group!(families, bench_family_generation);
criterion_main!(calibration, families);
