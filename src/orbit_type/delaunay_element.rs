//! # Delaunay elements
//!
//! Canonical action-angle variables of the two-body problem:
//!
//! | angle | action |
//! |---|---|
//! | `l = M` | `L = √(μa)` |
//! | `g = ω` | `G = L√(1 − e²)` |
//! | `h = Ω` | `H = G cos i` |
//!
//! Stored as `[l, g, h, L, G, H]`, angles in degrees. The actions are nested,
//! `|H| ≤ |G| ≤ L`, and only elliptic orbits have a Delaunay representation.

use crate::constants::{State6, DEGRAD, KEPLER_TOL, RADEG};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::Diagnostics;
use crate::kepler::{mean_to_true_anomaly, true_to_mean_anomaly};
use crate::orb_elem::acos_clamped;
use crate::orbit_type::keplerian_element::KeplerianElements;

/// Keplerian elements (true anomaly) to Delaunay elements.
///
/// Errors
/// ------
/// * Conic errors from [`KeplerianElements::check_conic`].
/// * [`ConversionError::OutOfRange`] if the orbit is hyperbolic.
pub fn keplerian_to_delaunay(
    mu: f64,
    keplerian: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    let kep = KeplerianElements::from(keplerian).normalized(diagnostics);
    kep.check_conic(mu)?;

    let ecc = kep.eccentricity;
    if ecc > 1.0 {
        return Err(ConversionError::out_of_range(
            "ECC",
            ecc,
            "0.0 <= ECC < 1.0 (Delaunay elements of a hyperbolic orbit)",
        ));
    }

    let big_l = (mu * kep.semi_major_axis).sqrt();
    let big_g = big_l * (1.0 - ecc * ecc).sqrt();
    let big_h = big_g * (kep.inclination * RADEG).cos();
    let l = true_to_mean_anomaly(kep.anomaly * RADEG, ecc)? * DEGRAD;

    Ok(State6::new(
        l,
        kep.periapsis_argument,
        kep.ascending_node_longitude,
        big_l,
        big_g,
        big_h,
    ))
}

/// Delaunay elements to Keplerian elements (true anomaly).
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] if `L ≤ 0`, `|H| > |G|`, `G/L > 1` or `G` is zero.
/// * [`ConversionError::KeplerNotConverged`] if the mean anomaly cannot be solved.
pub fn delaunay_to_keplerian(mu: f64, delaunay: &State6) -> Result<State6, ConversionError> {
    let big_l = delaunay[3];
    let big_g = delaunay[4];
    let big_h = delaunay[5];

    if big_l <= 0.0 {
        return Err(ConversionError::out_of_range("DelaunayL", big_l, "Real Number > 0"));
    }
    if big_h.abs() > big_g.abs() {
        return Err(ConversionError::out_of_range(
            "DelaunayH",
            big_h,
            format!("|DelaunayH| <= |DelaunayG| ({})", big_g.abs()),
        ));
    }
    if big_g / big_l > 1.0 {
        return Err(ConversionError::out_of_range(
            "DelaunayG",
            big_g,
            format!("DelaunayG / DelaunayL <= 1 (DelaunayL = {big_l})"),
        ));
    }
    if big_g == 0.0 {
        return Err(ConversionError::out_of_range("DelaunayG", big_g, "Real Number > 0"));
    }

    let sma = big_l * big_l / mu;
    let ratio = big_g / big_l;
    let ecc = (1.0 - ratio * ratio).sqrt();
    let inc = acos_clamped(big_h / big_g) * DEGRAD;
    let ta = mean_to_true_anomaly(delaunay[0] * RADEG, ecc, KEPLER_TOL)? * DEGRAD;

    Ok(State6::new(sma, ecc, inc, delaunay[2], delaunay[1], ta))
}

#[cfg(test)]
mod delaunay_element_test {
    use super::*;
    use crate::constants::EARTH_MU;
    use approx::assert_relative_eq;

    #[test]
    fn test_actions_are_nested() {
        let diag = Diagnostics::new();
        let kep = State6::new(12000.0, 0.3, 120.0, 80.0, 70.0, 45.0);
        let del = keplerian_to_delaunay(EARTH_MU, &kep, &diag).unwrap();
        assert_relative_eq!(del[3], (EARTH_MU * 12000.0).sqrt(), max_relative = 1e-14);
        assert!(del[5].abs() <= del[4].abs() && del[4] <= del[3]);
        assert!(del[5] < 0.0);
        assert_eq!(del[1], 70.0);
        assert_eq!(del[2], 80.0);

        let back = delaunay_to_keplerian(EARTH_MU, &del).unwrap();
        assert_relative_eq!(back, kep, max_relative = 1e-9);
    }

    #[test]
    fn test_rejections() {
        let diag = Diagnostics::new();
        let hyp = State6::new(-12000.0, 1.3, 10.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            keplerian_to_delaunay(EARTH_MU, &hyp, &diag),
            Err(ConversionError::OutOfRange { .. })
        ));

        let h_too_big = State6::new(0.0, 0.0, 0.0, 100.0, 50.0, 60.0);
        assert!(delaunay_to_keplerian(EARTH_MU, &h_too_big).is_err());
        let g_too_big = State6::new(0.0, 0.0, 0.0, 100.0, 150.0, 60.0);
        assert!(delaunay_to_keplerian(EARTH_MU, &g_too_big).is_err());
    }

    #[test]
    fn test_non_positive_l_rejected() {
        for big_l in [-100.0, 0.0] {
            let del = State6::new(0.0, 0.0, 0.0, big_l, 50.0, 10.0);
            assert!(matches!(
                delaunay_to_keplerian(EARTH_MU, &del),
                Err(ConversionError::OutOfRange { ref element, .. }) if element == "DelaunayL"
            ));
        }
    }
}
