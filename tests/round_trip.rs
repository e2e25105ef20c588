mod common;

use orbconv::central_body::CentralBody;
use orbconv::constants::State6;
use orbconv::state_converter::StateConverter;
use orbconv::state_type::{AnomalyType, StateType};

use crate::common::{assert_elements_close, cartesian_rel_error, flyby_keplerian, leo_cartesian};

/// Representations that are pure functions of the osculating Cartesian state.
fn osculating_types() -> impl Iterator<Item = StateType> {
    StateType::ALL
        .into_iter()
        .filter(|t| !matches!(t, StateType::Cartesian | StateType::BrouwerMeanShort | StateType::BrouwerMeanLong))
}

fn assert_cartesian_round_trip(converter: &StateConverter, cart: &State6, to: StateType, tolerance: f64) {
    let elements = converter
        .convert(cart, StateType::Cartesian, to)
        .unwrap_or_else(|e| panic!("Cartesian -> {to}: {e}"));
    let back = converter
        .convert(&elements, to, StateType::Cartesian)
        .unwrap_or_else(|e| panic!("{to} -> Cartesian: {e}"));
    let err = cartesian_rel_error(&back, cart);
    assert!(err < tolerance, "{to}: relative error {err:e}");
}

#[test]
fn test_every_representation_round_trips() {
    for anomaly_type in [AnomalyType::True, AnomalyType::Mean, AnomalyType::Eccentric] {
        let converter = StateConverter::new(CentralBody::earth()).with_anomaly_type(anomaly_type);
        for to in osculating_types() {
            assert_cartesian_round_trip(&converter, &leo_cartesian(), to, 1e-8);
        }
    }
}

#[test]
fn test_hyperbolic_round_trips() {
    let converter = StateConverter::new(CentralBody::earth());
    let cart = converter
        .convert(&flyby_keplerian(), StateType::Keplerian, StateType::Cartesian)
        .unwrap();

    for to in [
        StateType::Keplerian,
        StateType::ModifiedKeplerian,
        StateType::SphericalAzFpa,
        StateType::SphericalRaDec,
        StateType::ModifiedEquinoctial,
        StateType::Planetodetic,
        StateType::IncomingAsymptote,
        StateType::OutgoingAsymptote,
    ] {
        assert_cartesian_round_trip(&converter, &cart, to, 1e-8);
    }

    // hyperbolic anomaly slot
    let converter = converter.with_anomaly_type(AnomalyType::Hyperbolic);
    assert_cartesian_round_trip(&converter, &cart, StateType::Keplerian, 1e-8);
}

#[test]
fn test_keplerian_through_shortcuts_and_cartesian() {
    let kep = State6::new(9000.0, 0.2, 50.0, 120.0, 80.0, 300.0);
    let angles = [false, false, true, true, true, true];

    for anomaly_type in [AnomalyType::True, AnomalyType::Mean, AnomalyType::Eccentric] {
        let converter = StateConverter::new(CentralBody::earth()).with_anomaly_type(anomaly_type);
        for via in [
            StateType::ModifiedKeplerian,
            StateType::Delaunay,
            StateType::Equinoctial,
            StateType::Cartesian,
        ] {
            let out = converter.convert(&kep, StateType::Keplerian, via).unwrap();
            let back = converter.convert(&out, via, StateType::Keplerian).unwrap();
            assert_elements_close(&back, &kep, angles, 1e-10);
        }
    }
}

#[test]
fn test_conversion_by_name() {
    let converter = StateConverter::new(CentralBody::earth());
    let by_type = converter
        .convert(&leo_cartesian(), StateType::Cartesian, StateType::ModifiedEquinoctial)
        .unwrap();
    let by_name = converter
        .convert_by_name(&leo_cartesian(), "Cartesian", "ModifiedEquinoctial")
        .unwrap();
    assert_eq!(by_type, by_name);
}
