//! # Modified equinoctial elements
//!
//! `(p, f, g, h, k, L)` with `p` the semi-latus rectum, `(f, g)` the eccentricity
//! vector in the equinoctial frame, `(h, k) = tan(i/2)·(cos Ω, sin Ω)` and `L`
//! the true longitude in degrees. Unlike the classical equinoctial set, the
//! modified set is valid for hyperbolic orbits.

use nalgebra::Vector3;

use crate::constants::{State6, DEGRAD, DPI, MU_TOL, PARABOLIC_TOL, RADEG};
use crate::conversion_errors::ConversionError;
use crate::orb_elem::{angular_momentum, eccentricity_vector, join_state, split_state};
use crate::state_type::StateType;

/// Smallest semi-latus rectum (km) describing a non-degenerate conic.
const SEMILATUS_RECTUM_FLOOR: f64 = 1.0e-7;

/// Cartesian state to modified equinoctial elements.
///
/// Errors
/// ------
/// * [`ConversionError::ZeroVector`] for a null position or angular momentum.
/// * [`ConversionError::InvalidGravitationalParameter`] if `mu` is too small.
/// * [`ConversionError::UnsupportedInclination`] when `1 + ĥ_z` vanishes (i = 180°).
pub fn cartesian_to_modified_equinoctial(
    mu: f64,
    cartesian: &State6,
) -> Result<State6, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    let r = pos.norm();
    if r <= 0.0 {
        return Err(ConversionError::ZeroVector("position"));
    }
    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }

    let h_vec = angular_momentum(&pos, &vel);
    let h_mag = h_vec.norm();
    if h_mag == 0.0 {
        return Err(ConversionError::ZeroVector("angular momentum"));
    }
    let r_hat = pos / r;
    let h_hat = h_vec / h_mag;
    let v_hat = (r * vel - pos.dot(&vel) / r * pos) / h_mag;

    let ecc_vec = eccentricity_vector(mu, &pos, &vel);
    let semi_latus = h_mag * h_mag / mu;

    let denom = 1.0 + h_hat.z;
    if denom.abs() < PARABOLIC_TOL {
        return Err(ConversionError::UnsupportedInclination(
            StateType::ModifiedEquinoctial,
        ));
    }

    let f_hat = Vector3::new(
        1.0 - h_hat.x * h_hat.x / denom,
        -h_hat.x * h_hat.y / denom,
        -h_hat.x,
    )
    .normalize();
    let g_hat = h_hat.cross(&f_hat).normalize();

    let f = ecc_vec.dot(&f_hat);
    let g = ecc_vec.dot(&g_hat);
    let k = h_hat.x / denom;
    let h = -h_hat.y / denom;

    let sin_l = r_hat.y - v_hat.x;
    let cos_l = r_hat.x + v_hat.y;
    let true_longitude = sin_l.atan2(cos_l).rem_euclid(DPI) * DEGRAD;

    Ok(State6::new(semi_latus, f, g, h, k, true_longitude))
}

/// Modified equinoctial elements to Cartesian state.
///
/// Errors
/// ------
/// * [`ConversionError::InvalidGravitationalParameter`] if `mu` is too small.
/// * [`ConversionError::OutOfRange`] if the semi-latus rectum is below `1e-7` km.
/// * [`ConversionError::SingularGeometry`] if the true longitude lies beyond the
///   asymptotes of a hyperbolic orbit.
pub fn modified_equinoctial_to_cartesian(
    mu: f64,
    modified: &State6,
) -> Result<State6, ConversionError> {
    let p = modified[0];
    let f = modified[1];
    let g = modified[2];
    let h = modified[3];
    let k = modified[4];
    let l = modified[5] * RADEG;

    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }
    if p < SEMILATUS_RECTUM_FLOOR {
        return Err(ConversionError::out_of_range(
            "SemilatusRectum",
            p,
            format!("{SEMILATUS_RECTUM_FLOOR:e} <= Real Number"),
        ));
    }

    let (sin_l, cos_l) = l.sin_cos();
    let w = 1.0 + f * cos_l + g * sin_l;
    if w <= 0.0 {
        return Err(ConversionError::SingularGeometry(format!(
            "true longitude {} deg lies beyond the asymptotes of the orbit",
            modified[5]
        )));
    }
    let r = p / w;
    let x1 = r * cos_l;
    let y1 = r * sin_l;
    let sqrt_mu_p = (mu / p).sqrt();
    let x1_dot = -sqrt_mu_p * (g + sin_l);
    let y1_dot = sqrt_mu_p * (f + cos_l);

    let alpha2 = h * h - k * k;
    let s2 = 1.0 + h * h + k * k;
    let f_hat = Vector3::new(1.0 + alpha2, 2.0 * k * h, -2.0 * k) / s2;
    let g_hat = Vector3::new(2.0 * k * h, 1.0 - alpha2, 2.0 * h) / s2;

    Ok(join_state(
        &(x1 * f_hat + y1 * g_hat),
        &(x1_dot * f_hat + y1_dot * g_hat),
    ))
}

#[cfg(test)]
mod modified_equinoctial_test {
    use super::*;
    use crate::constants::EARTH_MU;
    use crate::diagnostics::Diagnostics;
    use crate::orb_elem::keplerian_to_cartesian;
    use crate::state_type::AnomalyType;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_definition_and_round_trip() {
        let diag = Diagnostics::new();
        let (a, e, i, raan, aop, ta) = (9000.0, 0.2, 40.0, 30.0, 20.0, 10.0);
        let kep = State6::new(a, e, i, raan, aop, ta);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        let mee = cartesian_to_modified_equinoctial(EARTH_MU, &cart).unwrap();

        let lon_per = (raan + aop) * RADEG;
        let tan_half = (i * RADEG / 2.0).tan();
        assert_relative_eq!(mee[0], a * (1.0 - e * e), max_relative = 1e-10);
        assert_abs_diff_eq!(mee[1], e * lon_per.cos(), epsilon = 1e-10);
        assert_abs_diff_eq!(mee[2], e * lon_per.sin(), epsilon = 1e-10);
        assert_abs_diff_eq!(mee[3], tan_half * (raan * RADEG).cos(), epsilon = 1e-10);
        assert_abs_diff_eq!(mee[4], tan_half * (raan * RADEG).sin(), epsilon = 1e-10);
        assert_abs_diff_eq!(mee[5], raan + aop + ta, epsilon = 1e-8);

        let back = modified_equinoctial_to_cartesian(EARTH_MU, &mee).unwrap();
        assert_relative_eq!(back, cart, max_relative = 1e-10);
    }

    #[test]
    fn test_hyperbolic_orbit() {
        let diag = Diagnostics::new();
        let kep = State6::new(-15000.0, 1.8, 60.0, 200.0, 300.0, 40.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        let mee = cartesian_to_modified_equinoctial(EARTH_MU, &cart).unwrap();
        let back = modified_equinoctial_to_cartesian(EARTH_MU, &mee).unwrap();
        assert_relative_eq!(back, cart, max_relative = 1e-10);
    }

    #[test]
    fn test_rejections() {
        let retrograde = State6::new(7000.0, 0.0, 0.0, 0.0, -7.546, 0.0);
        assert!(matches!(
            cartesian_to_modified_equinoctial(EARTH_MU, &retrograde),
            Err(ConversionError::UnsupportedInclination(_))
        ));
        for p in [-1.0, 0.0, 1.0e-9] {
            let degenerate = State6::new(p, 0.1, 0.0, 0.0, 0.0, 30.0);
            assert!(matches!(
                modified_equinoctial_to_cartesian(EARTH_MU, &degenerate),
                Err(ConversionError::OutOfRange { ref element, .. }) if element == "SemilatusRectum"
            ));
        }
        let smallest = State6::new(1.0e-7, 0.1, 0.0, 0.0, 0.0, 30.0);
        let cart = modified_equinoctial_to_cartesian(EARTH_MU, &smallest).unwrap();
        assert!(cart.iter().all(|x| x.is_finite()));
    }
}
