mod common;

use std::f64::consts::PI;

use orbconv::central_body::CentralBody;
use orbconv::constants::State6;
use orbconv::kepler::{convert_anomaly, convert_from_true_anomaly, convert_to_true_anomaly};
use orbconv::state_converter::StateConverter;
use orbconv::state_type::{AnomalyType, StateType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::angle_diff;

const SEED: u64 = 42;

fn random_elliptic(rng: &mut StdRng) -> State6 {
    State6::new(
        rng.random_range(6600.0..60_000.0),
        rng.random_range(0.0..0.9),
        rng.random_range(0.0..180.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
    )
}

fn random_hyperbolic(rng: &mut StdRng) -> State6 {
    let ecc: f64 = rng.random_range(1.05..5.0);
    let rp = rng.random_range(6600.0..50_000.0);
    // stay well inside the asymptotes
    let ta_max = 0.9 * (-1.0 / ecc).acos().to_degrees();
    State6::new(
        rp / (1.0 - ecc),
        ecc,
        rng.random_range(0.0..180.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
        rng.random_range(-ta_max..ta_max),
    )
}

#[test]
fn test_keplerian_output_invariants() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let converter = StateConverter::new(CentralBody::earth());

    for i in 0..400 {
        let kep = if i % 2 == 0 {
            random_elliptic(&mut rng)
        } else {
            random_hyperbolic(&mut rng)
        };
        let cart = converter
            .convert(&kep, StateType::Keplerian, StateType::Cartesian)
            .unwrap();
        let out = converter
            .convert(&cart, StateType::Cartesian, StateType::Keplerian)
            .unwrap();

        assert!(out[1] >= 0.0, "ECC = {}", out[1]);
        assert!((0.0..=180.0).contains(&out[2]), "INC = {}", out[2]);
        assert_eq!(out[0] < 0.0, out[1] > 1.0, "SMA = {}, ECC = {}", out[0], out[1]);
        for slot in 3..6 {
            assert!((0.0..360.0).contains(&out[slot]), "slot {slot} = {}", out[slot]);
        }

        let modified = converter
            .convert(&cart, StateType::Cartesian, StateType::ModifiedKeplerian)
            .unwrap();
        assert!((0.0..=180.0).contains(&modified[2]));
        assert!(modified[0] > 0.0);
        // negative RadApo marks an open orbit
        assert_eq!(modified[1] < 0.0, out[1] > 1.0);

        if out[1] < 1.0 {
            let delaunay = converter
                .convert(&cart, StateType::Cartesian, StateType::Delaunay)
                .unwrap();
            let (big_l, big_g, big_h) = (delaunay[3], delaunay[4], delaunay[5]);
            assert!(big_h.abs() <= big_g && big_g <= big_l * (1.0 + 1e-12));
        }
    }
}

#[test]
fn test_negative_eccentricity_is_flipped() {
    let converter = StateConverter::new(CentralBody::earth());
    let kep = State6::new(8000.0, -0.1, 30.0, 40.0, 50.0, 60.0);
    let cart = converter
        .convert(&kep, StateType::Keplerian, StateType::Cartesian)
        .unwrap();
    let out = converter
        .convert(&cart, StateType::Cartesian, StateType::Keplerian)
        .unwrap();

    assert!((out[1] - 0.1).abs() < 1e-10);
    assert!(angle_diff(out[4], 230.0).abs() < 1e-8);
    assert!(angle_diff(out[5], 240.0).abs() < 1e-8);
}

#[test]
fn test_elliptic_anomaly_consistency() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let diag = orbconv::diagnostics::Diagnostics::new();

    for _ in 0..1000 {
        let ecc = rng.random_range(0.0..0.99);
        let ta = rng.random_range(-PI..PI);

        let ma = convert_from_true_anomaly(AnomalyType::Mean, ta, ecc).unwrap();
        let ea = convert_from_true_anomaly(AnomalyType::Eccentric, ta, ecc).unwrap();
        // Kepler's equation ties the three together
        let kepler_residual = (ea - ecc * ea.sin() - ma).rem_euclid(2.0 * PI);
        assert!(kepler_residual.min(2.0 * PI - kepler_residual) < 1e-10);

        let back = convert_to_true_anomaly(AnomalyType::Mean, ma, ecc).unwrap();
        assert!(angle_diff(back.to_degrees(), ta.to_degrees()).abs() < 1e-6, "e = {ecc}, ν = {ta}");

        let back = convert_anomaly(AnomalyType::Eccentric, AnomalyType::True, ea, ecc, &diag).unwrap();
        assert!(angle_diff(back.to_degrees(), ta.to_degrees()).abs() < 1e-9);
    }
    assert!(diag.warned().is_empty());
}

#[test]
fn test_hyperbolic_anomaly_consistency() {
    let mut rng = StdRng::seed_from_u64(SEED);

    for _ in 0..1000 {
        let ecc: f64 = rng.random_range(1.01..5.0);
        let ta_max = 0.95 * (-1.0 / ecc).acos();
        let ta = rng.random_range(-ta_max..ta_max);

        let ha = convert_from_true_anomaly(AnomalyType::Hyperbolic, ta, ecc).unwrap();
        let ma = convert_from_true_anomaly(AnomalyType::Mean, ta, ecc).unwrap();
        assert!((ecc * ha.sinh() - ha - ma).abs() <= 1e-9 * ma.abs().max(1.0));

        let back = convert_to_true_anomaly(AnomalyType::Mean, ma, ecc).unwrap();
        assert!(angle_diff(back.to_degrees(), ta.to_degrees()).abs() < 1e-6, "e = {ecc}, ν = {ta}");

        let back = convert_to_true_anomaly(AnomalyType::Hyperbolic, ha, ecc).unwrap();
        assert!((back - ta).abs() < 1e-9);
    }
}
