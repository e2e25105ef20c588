//! # Anomaly conversions
//!
//! Conversions between the true (ν), mean (M), eccentric (E) and hyperbolic (H)
//! anomalies of a conic of eccentricity `e`, including the Newton solvers of
//! Kepler's equation `M = E − e·sin E` and of its hyperbolic analogue
//! `M = e·sinh H − H`.
//!
//! All angles handled by this module are in **radians**.
//!
//! ## Regimes
//!
//! - `e < 1 − KEP_TOL`: elliptic, M, E and ν are reduced to `[0, 2π)`.
//! - `e > 1 + KEP_TOL`: hyperbolic, M and H are unbounded.
//! - otherwise the orbit is treated as parabolic: the mean anomaly is undefined
//!   and reported as `0`.

use crate::constants::{Radian, DPI, KEPLER_MAX_ITER, KEP_TOL};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::state_type::AnomalyType;
use std::f64::consts::PI;

/// Tolerance used by [`eccentric_anomaly_from_mean`].
const ECCENTRIC_ANOMALY_TOL: f64 = 1.0e-12;

/// Principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Mean anomaly (rad) above which the hyperbolic solver is seeded with `asinh(M/e)`.
const HYPERBOLIC_SEED_SWITCH: f64 = 6.0;

/// Whether an eccentricity is close enough to one for the anomalies to be undefined.
fn is_near_parabolic(ecc: f64) -> bool {
    ecc >= 1.0 - KEP_TOL && ecc <= 1.0 + KEP_TOL
}

/// Solve Kepler's equation `E − e·sin E = M` for an ellipse.
///
/// Damped Newton iteration seeded with `E₀ = M + e·sin M`, the derivative being
/// evaluated half a step ahead (`1 − e·cos(E − f/2)`).
///
/// Errors
/// ------
/// * [`ConversionError::KeplerNotConverged`] after [`KEPLER_MAX_ITER`] iterations.
fn solve_kepler_ellipse(mean_anomaly: Radian, ecc: f64, tol: f64) -> Result<Radian, ConversionError> {
    let mut ea = mean_anomaly + ecc * mean_anomaly.sin();

    for _ in 0..KEPLER_MAX_ITER {
        let f = ea - ecc * ea.sin() - mean_anomaly;
        let d = 1.0 - ecc * (ea - 0.5 * f).cos();
        let next = ea - f / d;
        if (next - ea).abs() < tol {
            return Ok(next);
        }
        ea = next;
    }

    Err(ConversionError::KeplerNotConverged {
        iterations: KEPLER_MAX_ITER,
        tolerance: tol,
    })
}

/// Solve `e·sinh H − H = M` for a hyperbola by Newton iteration.
///
/// The seed is `H₀ = M/2`, or `asinh(M/e)` once `|M|` is large enough for
/// `sinh(M/2)` to dwarf the root (and overflow for `|M| ≳ 1400`).
fn solve_kepler_hyperbola(mean_anomaly: Radian, ecc: f64, tol: f64) -> Result<Radian, ConversionError> {
    let mut ha = if mean_anomaly.abs() > HYPERBOLIC_SEED_SWITCH {
        (mean_anomaly / ecc).asinh()
    } else {
        mean_anomaly / 2.0
    };

    for _ in 0..KEPLER_MAX_ITER {
        let next = ha - (ecc * ha.sinh() - ha - mean_anomaly) / (ecc * ha.cosh() - 1.0);
        if !next.is_finite() {
            break;
        }
        if (next - ha).abs() < tol {
            return Ok(next);
        }
        ha = next;
    }

    Err(ConversionError::KeplerNotConverged {
        iterations: KEPLER_MAX_ITER,
        tolerance: tol,
    })
}

/// Eccentric (or hyperbolic) anomaly from the mean anomaly.
///
/// Arguments
/// ---------
/// * `ecc` – Eccentricity, `e < 1` selects the elliptic solver, `e > 1` the hyperbolic one.
/// * `mean_anomaly` – Mean anomaly (rad).
///
/// Return
/// ------
/// * `E` for an ellipse or `H` for a hyperbola, solved to `1e-12` rad.
///
/// Errors
/// ------
/// * [`ConversionError::NearParabolic`] when `e == 1`.
/// * [`ConversionError::KeplerNotConverged`] if the Newton iteration stalls.
pub fn eccentric_anomaly_from_mean(ecc: f64, mean_anomaly: Radian) -> Result<Radian, ConversionError> {
    if (0.0..1.0).contains(&ecc) {
        solve_kepler_ellipse(mean_anomaly, ecc, ECCENTRIC_ANOMALY_TOL)
    } else if ecc > 1.0 {
        solve_kepler_hyperbola(mean_anomaly, ecc, ECCENTRIC_ANOMALY_TOL)
    } else {
        Err(ConversionError::NearParabolic(ecc))
    }
}

/// Eccentric anomaly from the true anomaly, in `[0, 2π)`.
///
/// Returns `0` when the orbit is not elliptic.
pub fn true_to_eccentric_anomaly(ta: Radian, ecc: f64) -> Radian {
    if ecc > 1.0 - KEP_TOL {
        return 0.0;
    }
    let cos_ta = ta.cos();
    let denom = 1.0 + ecc * cos_ta;
    let sin_ea = (1.0 - ecc * ecc).sqrt() * ta.sin() / denom;
    let cos_ea = (ecc + cos_ta) / denom;
    principal_angle(sin_ea.atan2(cos_ea))
}

/// Hyperbolic anomaly from the true anomaly, `tanh(H/2) = √((e−1)/(e+1))·tan(ν/2)`.
///
/// Returns `0` when the orbit is not hyperbolic.
///
/// Errors
/// ------
/// * [`ConversionError::UndefinedAnomaly`] if `ν` lies beyond the asymptotes.
pub fn true_to_hyperbolic_anomaly(ta: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    if ecc < 1.0 + KEP_TOL {
        return Ok(0.0);
    }
    let tanh_half = (ta / 2.0).tan() * ((ecc - 1.0) / (ecc + 1.0)).sqrt();
    if tanh_half.abs() >= 1.0 {
        return Err(ConversionError::UndefinedAnomaly {
            anomaly: format!("true anomaly {ta} rad"),
            eccentricity: ecc,
        });
    }
    Ok(2.0 * tanh_half.atanh())
}

/// Mean anomaly from the true anomaly.
///
/// Elliptic results are reduced to `[0, 2π)`, hyperbolic ones are unbounded.
/// A near parabolic orbit yields `0`.
pub fn true_to_mean_anomaly(ta: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    if ecc < 1.0 - KEP_TOL {
        let ea = true_to_eccentric_anomaly(ta, ecc);
        Ok(principal_angle(ea - ecc * ea.sin()))
    } else if ecc > 1.0 + KEP_TOL {
        let ha = true_to_hyperbolic_anomaly(ta, ecc)?;
        Ok(ecc * ha.sinh() - ha)
    } else {
        log::debug!("near parabolic orbit (e = {ecc}) in mean anomaly calculation, MA set to 0");
        Ok(0.0)
    }
}

/// True anomaly from the mean anomaly, by Newton iteration on Kepler's equation.
///
/// Arguments
/// ---------
/// * `ma` – Mean anomaly (rad).
/// * `ecc` – Eccentricity; `e ≤ 1` is solved as an ellipse, `e > 1` as a hyperbola.
/// * `tol` – Convergence threshold on the eccentric/hyperbolic anomaly step (rad).
///
/// Return
/// ------
/// * True anomaly in `[0, 2π)`.
///
/// Errors
/// ------
/// * [`ConversionError::KeplerNotConverged`] after [`KEPLER_MAX_ITER`] iterations.
/// * [`ConversionError::NearParabolic`] if the half-angle relation degenerates.
///
/// See also
/// --------
/// * [`true_to_mean_anomaly`] – Inverse mapping.
pub fn mean_to_true_anomaly(ma: Radian, ecc: f64, tol: f64) -> Result<Radian, ConversionError> {
    let ta = if ecc <= 1.0 {
        let ea = principal_angle(solve_kepler_ellipse(ma, ecc, tol)?);
        if (ea - PI).abs() >= 1.0e-8 {
            let one_minus_e = 1.0 - ecc;
            if one_minus_e.abs() < f64::EPSILON {
                return Err(ConversionError::NearParabolic(ecc));
            }
            2.0 * (((1.0 + ecc) / one_minus_e).sqrt() * (ea / 2.0).tan()).atan()
        } else {
            ea
        }
    } else {
        let ha = solve_kepler_hyperbola(ma, ecc, tol)?;
        2.0 * (((ecc + 1.0) / (ecc - 1.0)).sqrt() * (ha / 2.0).tanh()).atan()
    };

    Ok(principal_angle(ta))
}

/// True anomaly from the eccentric anomaly, in `(−π, π]`.
pub fn eccentric_to_true_anomaly(ea: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    let cos_ea = ea.cos();
    let one_minus_ecos = 1.0 - ecc * cos_ea;
    if one_minus_ecos == 0.0 {
        return Err(ConversionError::UndefinedAnomaly {
            anomaly: format!("eccentric anomaly {ea} rad"),
            eccentricity: ecc,
        });
    }
    let sin_ta = (1.0 - ecc * ecc).sqrt() * ea.sin() / one_minus_ecos;
    let cos_ta = (cos_ea - ecc) / one_minus_ecos;
    Ok(sin_ta.atan2(cos_ta))
}

/// True anomaly from the hyperbolic anomaly, in `(−π, π]`.
pub fn hyperbolic_to_true_anomaly(ha: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    let cosh_ha = ha.cosh();
    let ecosh_minus_one = ecc * cosh_ha - 1.0;
    if ecosh_minus_one == 0.0 {
        return Err(ConversionError::UndefinedAnomaly {
            anomaly: format!("hyperbolic anomaly {ha} rad"),
            eccentricity: ecc,
        });
    }
    let sin_ta = (ecc * ecc - 1.0).sqrt() * ha.sinh() / ecosh_minus_one;
    let cos_ta = (ecc - cosh_ha) / ecosh_minus_one;
    Ok(sin_ta.atan2(cos_ta))
}

/// Express a true anomaly as an anomaly of type `to`.
pub fn convert_from_true_anomaly(to: AnomalyType, ta: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    match to {
        AnomalyType::True => Ok(ta),
        AnomalyType::Mean => true_to_mean_anomaly(ta, ecc),
        AnomalyType::Eccentric => Ok(true_to_eccentric_anomaly(ta, ecc)),
        AnomalyType::Hyperbolic => true_to_hyperbolic_anomaly(ta, ecc),
    }
}

/// Convert an anomaly of type `from` to a true anomaly.
pub fn convert_to_true_anomaly(from: AnomalyType, value: Radian, ecc: f64) -> Result<Radian, ConversionError> {
    match from {
        AnomalyType::True => Ok(value),
        AnomalyType::Mean => mean_to_true_anomaly(value, ecc, crate::constants::KEPLER_TOL),
        AnomalyType::Eccentric => eccentric_to_true_anomaly(value, ecc),
        AnomalyType::Hyperbolic => hyperbolic_to_true_anomaly(value, ecc),
    }
}

/// Convert an anomaly between any two [`AnomalyType`]s for eccentricity `ecc`.
///
/// The conversion goes through the true anomaly. When the result is a mean
/// anomaly of a near parabolic orbit, it is reported as `0` and a
/// [`Advisory::NearParabolicAnomaly`] advisory is emitted on `diagnostics`.
///
/// Arguments
/// ---------
/// * `from`, `to` – Anomaly flavours.
/// * `value` – Anomaly of type `from` (rad).
/// * `ecc` – Eccentricity.
/// * `diagnostics` – Sink receiving the advisory.
///
/// Return
/// ------
/// * The anomaly of type `to` (rad).
pub fn convert_anomaly(
    from: AnomalyType,
    to: AnomalyType,
    value: Radian,
    ecc: f64,
    diagnostics: &Diagnostics,
) -> Result<Radian, ConversionError> {
    if from == to {
        return Ok(value);
    }
    if to == AnomalyType::Mean && is_near_parabolic(ecc) {
        diagnostics.warn_once(
            Advisory::NearParabolicAnomaly,
            "Warning: Orbit is near parabolic in mean anomaly calculation. Setting MA = 0",
        );
        return Ok(0.0);
    }
    let ta = convert_to_true_anomaly(from, value, ecc)?;
    convert_from_true_anomaly(to, ta, ecc)
}
