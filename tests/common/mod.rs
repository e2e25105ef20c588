#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use orbconv::constants::{State6, EARTH_MU};

/// Difference of two angles in degrees, wrapped to (−180, 180].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Compare two element sets slot by slot; slots flagged in `angles` are
/// compared modulo 360°, the others relatively.
pub fn assert_elements_close(actual: &State6, expected: &State6, angles: [bool; 6], tolerance: f64) {
    for i in 0..6 {
        if angles[i] {
            assert_abs_diff_eq!(angle_diff(actual[i], expected[i]), 0.0, epsilon = tolerance * 360.0);
        } else {
            let scale = expected[i].abs().max(1.0);
            assert!(
                (actual[i] - expected[i]).abs() <= tolerance * scale,
                "slot {i}: {} vs {} (tolerance {tolerance})\nactual = {actual:?}\nexpected = {expected:?}",
                actual[i],
                expected[i]
            );
        }
    }
}

/// Relative distance between two Cartesian states.
pub fn cartesian_rel_error(actual: &State6, expected: &State6) -> f64 {
    let dr = (actual.fixed_rows::<3>(0) - expected.fixed_rows::<3>(0)).norm();
    let dv = (actual.fixed_rows::<3>(3) - expected.fixed_rows::<3>(3)).norm();
    (dr / expected.fixed_rows::<3>(0).norm()).max(dv / expected.fixed_rows::<3>(3).norm())
}

/// Inclined, moderately eccentric low Earth orbit.
pub fn leo_cartesian() -> State6 {
    State6::new(-6045.0, -3490.0, 2500.0, -3.457, 6.618, 2.533)
}

/// Hyperbolic Earth flyby, ECC = 1.5, RadPer = 10 000 km, TA = 20°.
pub fn flyby_keplerian() -> State6 {
    State6::new(-20_000.0, 1.5, 30.0, 40.0, 50.0, 20.0)
}

/// Circular equatorial orbit at 7000 km.
pub fn circular_equatorial_cartesian() -> State6 {
    State6::new(7000.0, 0.0, 0.0, 0.0, 7.546, 0.0)
}

/// Periapsis state of an orbit with eccentricity `ecc` and radius of periapsis `rp`.
pub fn periapsis_state(rp: f64, ecc: f64) -> State6 {
    let v = (EARTH_MU * (1.0 + ecc) / rp).sqrt();
    State6::new(rp, 0.0, 0.0, 0.0, v * 0.8, v * 0.6)
}
