mod common;

use approx::assert_abs_diff_eq;
use orbconv::central_body::CentralBody;
use orbconv::constants::{State6, EARTH_MU};
use orbconv::conversion_errors::ConversionError;
use orbconv::state_converter::StateConverter;
use orbconv::state_type::StateType;

use crate::common::{angle_diff, cartesian_rel_error, circular_equatorial_cartesian, flyby_keplerian, periapsis_state};

#[test]
fn test_circular_equatorial_orbit() {
    let converter = StateConverter::new(CentralBody::earth());
    let cart = circular_equatorial_cartesian();

    let kep = converter
        .convert(&cart, StateType::Cartesian, StateType::Keplerian)
        .unwrap();
    assert_abs_diff_eq!(kep[1], 0.0, epsilon = 1e-4);
    assert_eq!(kep[2], 0.0);
    assert_eq!(kep[3], 0.0);
    // the in-plane angle is fully carried by the true longitude
    assert_abs_diff_eq!(angle_diff(kep[4] + kep[5], 0.0), 0.0, epsilon = 1e-9);

    // exactly circular: every undefined angle resolves to zero
    let exact = State6::new(7000.0, 0.0, 0.0, 0.0, (EARTH_MU / 7000.0).sqrt(), 0.0);
    let kep = converter
        .convert(&exact, StateType::Cartesian, StateType::Keplerian)
        .unwrap();
    assert_eq!(&kep.as_slice()[2..], &[0.0; 4]);

    // representations that need RAAN or AOP do not fail either
    for to in [
        StateType::ModifiedKeplerian,
        StateType::Delaunay,
        StateType::Equinoctial,
        StateType::AlternateEquinoctial,
        StateType::ModifiedEquinoctial,
    ] {
        let out = converter.convert(&exact, StateType::Cartesian, to).unwrap();
        assert!(out.iter().all(|x| x.is_finite()), "{to}");
    }
}

#[test]
fn test_geo_transfer_round_trip() {
    let converter = StateConverter::new(CentralBody::earth());
    let kep = State6::new(24396.0, 0.73, 7.0, 10.0, 5.0, 0.0);

    let cart = converter
        .convert(&kep, StateType::Keplerian, StateType::Cartesian)
        .unwrap();
    let back = converter
        .convert(&cart, StateType::Cartesian, StateType::Keplerian)
        .unwrap();

    assert_abs_diff_eq!(back[0], kep[0], epsilon = 1e-6);
    assert_abs_diff_eq!(back[1], kep[1], epsilon = 1e-6);
    for i in 2..6 {
        assert_abs_diff_eq!(angle_diff(back[i], kep[i]), 0.0, epsilon = 1e-6);
    }
    assert!(converter.diagnostics().warned().is_empty());
}

#[test]
fn test_hyperbolic_flyby_asymptote() {
    let converter = StateConverter::new(CentralBody::earth());
    let cart = converter
        .convert(&flyby_keplerian(), StateType::Keplerian, StateType::Cartesian)
        .unwrap();

    for asymptote in [StateType::OutgoingAsymptote, StateType::IncomingAsymptote] {
        let asym = converter.convert(&cart, StateType::Cartesian, asymptote).unwrap();
        assert!(asym[1] > 0.0, "C3 of a flyby is positive");
        let back = converter.convert(&asym, asymptote, StateType::Cartesian).unwrap();
        assert!(cartesian_rel_error(&back, &cart) < 1e-6);
    }
}

#[test]
fn test_parabolic_boundary_is_rejected() {
    let converter = StateConverter::new(CentralBody::earth());
    for ecc in [1.0 - 1e-8, 1.0 + 1e-8] {
        let cart = periapsis_state(7000.0, ecc);
        let result = converter.convert(&cart, StateType::Cartesian, StateType::OutgoingAsymptote);
        assert!(
            matches!(result, Err(ConversionError::NearParabolic(_))),
            "ECC = {ecc}: {result:?}"
        );
        assert!(matches!(
            converter.convert(&cart, StateType::Cartesian, StateType::Keplerian),
            Err(ConversionError::NearParabolic(_))
        ));
    }
}
