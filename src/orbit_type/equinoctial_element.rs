//! # Equinoctial and alternate equinoctial elements
//!
//! The equinoctial set `(a, h, k, p, q, λ)` removes the singularities of the
//! classical elements at zero eccentricity and zero inclination:
//!
//! * `h = e·sin(ω + Ω)`, `k = e·cos(ω + Ω)`
//! * `p = tan(i/2)·sin Ω`, `q = tan(i/2)·cos Ω`
//! * `λ = M + ω + Ω` (mean longitude, degrees)
//!
//! The alternate set replaces `tan(i/2)` by `sin(i/2)` in `p` and `q`, which
//! keeps both components bounded by one.
//!
//! Both are only defined for elliptic, prograde-direct orbits: a hyperbolic
//! state or an inclination of 180° is rejected.

use std::f64::consts::PI;

use nalgebra::Vector3;
use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::constants::{
    State6, DEGRAD, DPI, EQUINOCTIAL_TOL, KEPLER_MAX_ITER, KEP_TOL, MU_TOL, ORBIT_TOL, RADEG,
    SINGULAR_TOL,
};
use crate::conversion_errors::ConversionError;
use crate::orb_elem::{acos_clamped, angular_momentum, eccentricity_vector, join_state, split_state};
use crate::state_type::StateType;

/// Equinoctial reference basis `(f̂, ĝ)` in the orbital plane.
fn equinoctial_basis(p: f64, q: f64) -> (Vector3<f64>, Vector3<f64>) {
    let s = 1.0 + p * p + q * q;
    let f = Vector3::new(1.0 - p * p + q * q, 2.0 * p * q, -2.0 * p) / s;
    let g = Vector3::new(2.0 * p * q, 1.0 + p * p - q * q, 2.0 * q) / s;
    (f.normalize(), g.normalize())
}

/// Solve the equinoctial Kepler equation `F + h·cos F − k·sin F = λ` for the
/// eccentric longitude `F` (radians).
fn solve_eccentric_longitude(h: f64, k: f64, lambda: f64) -> Result<f64, ConversionError> {
    let f = |x: f64| x + h * x.cos() - k * x.sin() - lambda;
    let df = |x: f64| 1.0 - h * x.sin() - k * x.cos();

    let mut convergency = SimpleConvergency {
        eps: ORBIT_TOL,
        max_iter: KEPLER_MAX_ITER,
    };

    find_root_newton_raphson(lambda, &f, &df, &mut convergency)
        .map_err(|_| ConversionError::EquinoctialNotConverged(KEPLER_MAX_ITER))
}

/// Cartesian state to equinoctial elements.
///
/// Arguments
/// ---------
/// * `mu` – Gravitational parameter (km³/s²).
/// * `cartesian` – `[x, y, z, vx, vy, vz]`.
///
/// Return
/// ------
/// * `[a, h, k, p, q, λ]`, with `λ` in degrees.
///
/// Errors
/// ------
/// * [`ConversionError::ZeroVector`] / [`ConversionError::InvalidGravitationalParameter`].
/// * [`ConversionError::OutOfRange`] if the orbit is parabolic or hyperbolic.
/// * [`ConversionError::SingularConic`] if the radius of periapsis is below one meter.
/// * [`ConversionError::UnsupportedInclination`] for a retrograde equatorial orbit.
pub fn cartesian_to_equinoctial(mu: f64, cartesian: &State6) -> Result<State6, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    let r = pos.norm();
    let v = vel.norm();
    if r <= 0.0 {
        return Err(ConversionError::ZeroVector("position"));
    }
    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }

    let ecc_vec = eccentricity_vector(mu, &pos, &vel);
    let e = ecc_vec.norm();
    if e > 1.0 - KEP_TOL {
        return Err(ConversionError::out_of_range(
            "ECC",
            e,
            "0.0 <= ECC < 1.0 (the orbit is parabolic or hyperbolic)",
        ));
    }

    let xi = 0.5 * v * v - mu / r;
    let sma = -mu / (2.0 * xi);
    if (sma * (1.0 - e)).abs() < SINGULAR_TOL {
        return Err(ConversionError::SingularConic((sma * (1.0 - e)).abs()));
    }

    let h_vec = angular_momentum(&pos, &vel);
    if h_vec.norm() == 0.0 {
        return Err(ConversionError::ZeroVector("angular momentum"));
    }
    let am = h_vec.normalize();
    let inc = acos_clamped(am.z);
    if inc >= PI - KEP_TOL {
        return Err(ConversionError::UnsupportedInclination(StateType::Equinoctial));
    }

    let denom = 1.0 + am.z;
    let f_hat = Vector3::new(1.0 - am.x * am.x / denom, -am.x * am.y / denom, -am.x).normalize();
    let g_hat = am.cross(&f_hat).normalize();

    let h = ecc_vec.dot(&g_hat);
    let k = ecc_vec.dot(&f_hat);
    let p = am.x / denom;
    let q = -am.y / denom;

    let x1 = pos.dot(&f_hat);
    let y1 = pos.dot(&g_hat);
    let tmp_sqrt = (1.0 - h * h - k * k).sqrt();
    let beta = 1.0 / (1.0 + tmp_sqrt);
    let cos_f = k + ((1.0 - k * k * beta) * x1 - h * k * beta * y1) / (sma * tmp_sqrt);
    let sin_f = h + ((1.0 - h * h * beta) * y1 - h * k * beta * x1) / (sma * tmp_sqrt);
    let big_f = sin_f.atan2(cos_f).rem_euclid(DPI);
    let lambda = (big_f + h * cos_f - k * sin_f) * DEGRAD;

    Ok(State6::new(sma, h, k, p, q, lambda))
}

/// Equinoctial elements to Cartesian state.
///
/// The eccentric longitude is found by Newton iteration, seeded with the mean
/// longitude, to [`ORBIT_TOL`].
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] if `√(h² + k²)` is not below `1 − 1e-5`.
/// * [`ConversionError::EquinoctialNotConverged`] if the Newton iteration stalls.
/// * [`ConversionError::SingularGeometry`] if the resulting radius is not positive.
pub fn equinoctial_to_cartesian(mu: f64, equinoctial: &State6) -> Result<State6, ConversionError> {
    let sma = equinoctial[0];
    let h = equinoctial[1];
    let k = equinoctial[2];
    let p = equinoctial[3];
    let q = equinoctial[4];
    let lambda = equinoctial[5] * RADEG;

    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }
    let e = (h * h + k * k).sqrt();
    let one_minus_eps = 1.0 - EQUINOCTIAL_TOL;
    if e > one_minus_eps {
        return Err(ConversionError::out_of_range(
            "EquinoctialH/EquinoctialK",
            e,
            format!("sqrt(h^2 + k^2) < {one_minus_eps}"),
        ));
    }

    let big_f = solve_eccentric_longitude(h, k, lambda)?.rem_euclid(DPI);

    let tmp_sqrt = (1.0 - h * h - k * k).sqrt();
    let beta = 1.0 / (1.0 + tmp_sqrt);
    let n = (mu / (sma * sma * sma)).sqrt();
    let (sin_f, cos_f) = big_f.sin_cos();
    let r = sma * (1.0 - k * cos_f - h * sin_f);
    if r <= 0.0 {
        return Err(ConversionError::SingularGeometry(
            "cannot convert equinoctial elements because RMAG <= 0".into(),
        ));
    }

    let x1 = sma * ((1.0 - h * h * beta) * cos_f + h * k * beta * sin_f - k);
    let y1 = sma * ((1.0 - k * k * beta) * sin_f + h * k * beta * cos_f - h);
    let x1_dot = (n * sma * sma / r) * (h * k * beta * cos_f - (1.0 - h * h * beta) * sin_f);
    let y1_dot = (n * sma * sma / r) * ((1.0 - k * k * beta) * cos_f - h * k * beta * sin_f);

    let (f_hat, g_hat) = equinoctial_basis(p, q);
    Ok(join_state(
        &(x1 * f_hat + y1 * g_hat),
        &(x1_dot * f_hat + y1_dot * g_hat),
    ))
}

/// Equinoctial to alternate equinoctial elements.
///
/// Errors
/// ------
/// * [`ConversionError::UnsupportedInclination`] if the inclination is 180°.
pub fn equinoctial_to_alternate(equinoctial: &State6) -> Result<State6, ConversionError> {
    let p = equinoctial[3];
    let q = equinoctial[4];
    let inc = 2.0 * (p * p + q * q).sqrt().atan();
    if (inc - PI).abs() < KEP_TOL {
        return Err(ConversionError::UnsupportedInclination(
            StateType::AlternateEquinoctial,
        ));
    }
    let cos_half = (inc / 2.0).cos();

    let mut alt = *equinoctial;
    alt[3] = p * cos_half;
    alt[4] = q * cos_half;
    Ok(alt)
}

/// Alternate equinoctial to equinoctial elements.
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] if `altP² + altQ² > 1`.
/// * [`ConversionError::UnsupportedInclination`] if the inclination is 180°.
pub fn alternate_to_equinoctial(alternate: &State6) -> Result<State6, ConversionError> {
    let alt_p = alternate[3];
    let alt_q = alternate[4];
    let sin_half = (alt_p * alt_p + alt_q * alt_q).sqrt();
    if sin_half > 1.0 {
        return Err(ConversionError::out_of_range(
            "AltEquinoctialP/AltEquinoctialQ",
            sin_half,
            "sqrt(altP^2 + altQ^2) <= 1",
        ));
    }
    let inc = 2.0 * sin_half.asin();
    let cos_half = (inc / 2.0).cos();
    if cos_half.abs() < KEP_TOL {
        return Err(ConversionError::UnsupportedInclination(
            StateType::AlternateEquinoctial,
        ));
    }

    let mut eq = *alternate;
    eq[3] = alt_p / cos_half;
    eq[4] = alt_q / cos_half;
    Ok(eq)
}
