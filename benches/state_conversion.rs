use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbconv::central_body::CentralBody;
use orbconv::constants::State6;
use orbconv::state_converter::StateConverter;
use orbconv::state_type::StateType;

/// Random elliptic Keplerian states above the atmosphere.
fn random_keplerian(rng: &mut StdRng, samples: usize) -> Vec<State6> {
    (0..samples)
        .map(|_| {
            State6::new(
                rng.random_range(6800.0..45_000.0),
                rng.random_range(0.0..0.6),
                rng.random_range(0.0..180.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..360.0),
            )
        })
        .collect()
}

/// Cartesian → every osculating representation.
fn bench_from_cartesian(c: &mut Criterion) {
    let converter = StateConverter::new(CentralBody::earth());
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let samples = 1_000usize;

    let mut group = c.benchmark_group("state_conversion/from_cartesian");
    for to in StateType::ALL
        .into_iter()
        .filter(|t| !matches!(t, StateType::Cartesian | StateType::BrouwerMeanShort | StateType::BrouwerMeanLong))
    {
        group.bench_function(to.name(), |b| {
            b.iter_batched(
                || {
                    random_keplerian(&mut rng, samples)
                        .iter()
                        .filter_map(|kep| converter.convert(kep, StateType::Keplerian, StateType::Cartesian).ok())
                        .collect::<Vec<_>>()
                },
                |cases| {
                    for cart in cases {
                        let _ = black_box(converter.convert(black_box(&cart), StateType::Cartesian, to));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Brouwer-Lyddane mean elements, both directions.
fn bench_brouwer(c: &mut Criterion) {
    let converter = StateConverter::new(CentralBody::earth());
    let mean = State6::new(7500.0, 0.02, 98.0, 40.0, 60.0, 80.0);
    let cart = converter
        .convert(&mean, StateType::BrouwerMeanLong, StateType::Cartesian)
        .unwrap();

    let mut group = c.benchmark_group("state_conversion/brouwer");
    for theory in [StateType::BrouwerMeanShort, StateType::BrouwerMeanLong] {
        group.bench_function(format!("{}_to_cartesian", theory.name()), |b| {
            b.iter(|| black_box(converter.convert(black_box(&mean), theory, StateType::Cartesian)))
        });
        group.bench_function(format!("cartesian_to_{}", theory.name()), |b| {
            b.iter(|| black_box(converter.convert(black_box(&cart), StateType::Cartesian, theory)))
        });
    }
    group.finish();
}

/// Finite-difference and analytic Jacobians at one state.
fn bench_jacobian(c: &mut Criterion) {
    let converter = StateConverter::new(CentralBody::earth());
    let kep = State6::new(9000.0, 0.1, 30.0, 40.0, 50.0, 60.0);

    c.bench_function("state_conversion/jacobian_keplerian_to_equinoctial", |b| {
        b.iter(|| {
            black_box(converter.jacobian(
                black_box(&kep),
                StateType::Keplerian,
                StateType::Keplerian,
                StateType::Equinoctial,
                None,
            ))
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_from_cartesian, bench_brouwer, bench_jacobian
);
criterion_main!(benches);
