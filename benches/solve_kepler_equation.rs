use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbconv::constants::KEPLER_TOL;
use orbconv::kepler::mean_to_true_anomaly;

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

fn random_cases(rng: &mut StdRng, samples: usize, ecc: impl Fn(&mut StdRng) -> f64) -> Vec<(f64, f64)> {
    (0..samples)
        .map(|_| {
            let e = ecc(rng);
            (rand_angle(rng), e)
        })
        .collect()
}

/// Typical regime: e ∈ [0.0, 0.7]
fn bench_typical(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 10_000usize;

    c.bench_function("solve_kepler_equation/typical_e<=0.7", |b| {
        b.iter_batched(
            // Pre-generate inputs to avoid RNG cost in the timed section
            || random_cases(&mut rng, samples, |r| r.random_range(0.0..=0.7)),
            |cases| {
                for (ma, e) in cases {
                    let ta = mean_to_true_anomaly(black_box(ma), black_box(e), KEPLER_TOL).unwrap();
                    black_box(ta);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// High-eccentricity (still elliptic): e ∈ [0.7, 0.99]
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let samples = 10_000usize;

    c.bench_function("solve_kepler_equation/high_e_0.7..0.99", |b| {
        b.iter_batched(
            || random_cases(&mut rng, samples, |r| r.random_range(0.7..0.99)),
            |cases| {
                for (ma, e) in cases {
                    let _ = black_box(mean_to_true_anomaly(black_box(ma), black_box(e), KEPLER_TOL));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Hyperbolic regime: e ∈ [1.01, 5], M ∈ [−20, 20]
fn bench_hyperbolic(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let samples = 10_000usize;

    c.bench_function("solve_kepler_equation/hyperbolic_1.01..5", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (rng.random_range(-20.0..20.0), rng.random_range(1.01..5.0)))
                    .collect::<Vec<(f64, f64)>>()
            },
            |cases| {
                for (ma, e) in cases {
                    let _ = black_box(mean_to_true_anomaly(black_box(ma), black_box(e), KEPLER_TOL));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Fixed near-parabolic case close to periapsis, the slowest Newton start.
fn bench_fixed_stress(c: &mut Criterion) {
    let e = 0.999_f64;
    let ma = 1.0e-3_f64;

    c.bench_function("solve_kepler_equation/fixed_stress_case", |b| {
        b.iter(|| {
            let ta = mean_to_true_anomaly(black_box(ma), black_box(e), KEPLER_TOL);
            black_box(ta.ok());
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_typical, bench_high_e, bench_hyperbolic, bench_fixed_stress
);
criterion_main!(benches);
