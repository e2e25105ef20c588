//! # Classical element conversions
//!
//! Cartesian state `(r, v)` ⇄ Keplerian elements `(a, e, i, Ω, ω, anomaly)`, and
//! the vector-algebra building blocks (angular momentum, eccentricity vector,
//! line of nodes) reused by the other representations.
//!
//! ## Orbit classification
//!
//! The right ascension of the node and the argument of periapsis are undefined
//! on circular and/or equatorial orbits. [`cartesian_to_keplerian`] classifies
//! the orbit with the [`KEP_TOL`] threshold and resolves the undefined angles
//! deterministically:
//!
//! | case | Ω | ω | ν measured from |
//! |---|---|---|---|
//! | non-circular, inclined | node vector | node → e | e |
//! | non-circular, equatorial | 0 | x̂ → e | e |
//! | circular, inclined | node vector | 0 | node |
//! | circular, equatorial | 0 | 0 | x̂ |

use nalgebra::Vector3;

use crate::constants::{
    Degree, State6, DEGRAD, DPI, INFINITE_TOL, KEP_TOL, MU_TOL, ORBIT_TOL,
    PARABOLIC_TOL, RADEG, SINGULAR_TOL,
};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::kepler::{convert_from_true_anomaly, convert_to_true_anomaly};
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::state_type::AnomalyType;

/// `acos` with its argument clamped to `[-1, 1]`.
pub(crate) fn acos_clamped(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// `asin` with its argument clamped to `[-1, 1]`.
pub(crate) fn asin_clamped(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

/// Split a Cartesian state into position and velocity.
pub(crate) fn split_state(state: &State6) -> (Vector3<f64>, Vector3<f64>) {
    (
        Vector3::new(state[0], state[1], state[2]),
        Vector3::new(state[3], state[4], state[5]),
    )
}

/// Join position and velocity into a Cartesian state.
pub(crate) fn join_state(position: &Vector3<f64>, velocity: &Vector3<f64>) -> State6 {
    State6::new(
        position.x, position.y, position.z, velocity.x, velocity.y, velocity.z,
    )
}

/// Specific angular momentum `h = r × v`.
pub fn angular_momentum(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    position.cross(velocity)
}

/// Direction of the line of nodes `n = ẑ × h` (not normalized).
pub fn line_of_nodes(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    Vector3::z().cross(&angular_momentum(position, velocity))
}

/// Eccentricity vector `e = ((v² − μ/r) r − (r·v) v) / μ`, pointing to periapsis.
pub fn eccentricity_vector(mu: f64, position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    let r = position.norm();
    let v2 = velocity.norm_squared();
    ((v2 - mu / r) * position - position.dot(velocity) * velocity) / mu
}

fn check_cartesian(mu: f64, position: &Vector3<f64>, velocity: &Vector3<f64>) -> Result<(), ConversionError> {
    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }
    if position.norm_squared() <= ORBIT_TOL * ORBIT_TOL {
        return Err(ConversionError::ZeroVector("position"));
    }
    if velocity.norm_squared() <= ORBIT_TOL * ORBIT_TOL {
        return Err(ConversionError::ZeroVector("velocity"));
    }
    Ok(())
}

/// Convert a Cartesian state to Keplerian elements.
///
/// Arguments
/// ---------
/// * `mu` – Gravitational parameter of the central body (km³/s²).
/// * `cartesian` – State `[x, y, z, vx, vy, vz]` (km, km/s).
/// * `anomaly_type` – Flavour of the anomaly written in the last slot.
///
/// Return
/// ------
/// * `[a, e, i, Ω, ω, anomaly]`, angles in degrees in `[0, 360)` (a hyperbolic
///   mean or hyperbolic anomaly is unbounded).
///
/// Errors
/// ------
/// * [`ConversionError::InvalidGravitationalParameter`] if `mu` is too small.
/// * [`ConversionError::ZeroVector`] for a null position, velocity, angular momentum
///   or line of nodes used as a divisor.
/// * [`ConversionError::NearParabolic`] if `|1 − e| ≤ PARABOLIC_TOL`.
/// * [`ConversionError::SingularConic`] if the radius of periapsis is below one meter.
///
/// See also
/// --------
/// * [`keplerian_to_cartesian`] – Inverse conversion.
pub fn cartesian_to_keplerian(
    mu: f64,
    cartesian: &State6,
    anomaly_type: AnomalyType,
) -> Result<State6, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    check_cartesian(mu, &pos, &vel)?;

    let h_vec = angular_momentum(&pos, &vel);
    let h = h_vec.norm();
    let node = Vector3::z().cross(&h_vec);
    let n = node.norm();
    let r = pos.norm();
    let v = vel.norm();

    let ecc_vec = eccentricity_vector(mu, &pos, &vel);
    let e = ecc_vec.norm();

    let zeta = 0.5 * v * v - mu / r;
    if zeta == 0.0 {
        return Err(ConversionError::NearParabolic(e));
    }
    if (1.0 - e).abs() <= PARABOLIC_TOL {
        return Err(ConversionError::NearParabolic(e));
    }

    let sma = -mu / (2.0 * zeta);
    let rad_per = (sma * (1.0 - e)).abs();
    if rad_per < SINGULAR_TOL {
        return Err(ConversionError::SingularConic(rad_per));
    }
    if h == 0.0 {
        return Err(ConversionError::ZeroVector("angular momentum"));
    }

    let inc = acos_clamped(h_vec.z / h);
    let circular = e < KEP_TOL;
    let equatorial = inc < KEP_TOL || inc > std::f64::consts::PI - KEP_TOL;
    let retrograde = inc > std::f64::consts::PI - KEP_TOL;
    let r_dot_v = pos.dot(&vel);

    let (raan, aop, ta) = match (circular, equatorial) {
        (false, false) => {
            if n == 0.0 {
                return Err(ConversionError::ZeroVector("line-of-nodes"));
            }
            let mut raan = acos_clamped(node.x / n);
            if node.y < 0.0 {
                raan = DPI - raan;
            }
            let mut aop = acos_clamped(node.dot(&ecc_vec) / (n * e));
            if ecc_vec.z < 0.0 {
                aop = DPI - aop;
            }
            let mut ta = acos_clamped(ecc_vec.dot(&pos) / (e * r));
            if r_dot_v < 0.0 {
                ta = DPI - ta;
            }
            (raan, aop, ta)
        }
        (false, true) => {
            let mut aop = acos_clamped(ecc_vec.x / e);
            if ecc_vec.y < 0.0 {
                aop = DPI - aop;
            }
            if retrograde {
                aop = -aop;
            }
            let mut ta = acos_clamped(ecc_vec.dot(&pos) / (e * r));
            if r_dot_v < 0.0 {
                ta = DPI - ta;
            }
            (0.0, aop.rem_euclid(DPI), ta)
        }
        (true, false) => {
            if n == 0.0 {
                return Err(ConversionError::ZeroVector("line-of-nodes"));
            }
            let mut raan = acos_clamped(node.x / n);
            if node.y < 0.0 {
                raan = DPI - raan;
            }
            let mut ta = acos_clamped(node.dot(&pos) / (n * r));
            if pos.z < 0.0 {
                ta = DPI - ta;
            }
            (raan, 0.0, ta)
        }
        (true, true) => {
            let mut ta = acos_clamped(pos.x / r);
            if pos.y < 0.0 {
                ta = DPI - ta;
            }
            if retrograde {
                ta = -ta;
            }
            (0.0, 0.0, ta.rem_euclid(DPI))
        }
    };

    let anomaly = convert_from_true_anomaly(anomaly_type, ta, e)?;

    Ok(State6::new(
        sma,
        e,
        inc * DEGRAD,
        raan * DEGRAD,
        aop * DEGRAD,
        anomaly * DEGRAD,
    ))
}

/// Convert Keplerian elements to a Cartesian state.
///
/// The element set is first normalized (see [`KeplerianElements::normalized`]),
/// then checked against the periapsis floor and the parabolic boundary, and the
/// anomaly is converted to a true anomaly before the perifocal-to-inertial rotation.
///
/// Arguments
/// ---------
/// * `mu` – Gravitational parameter (km³/s²).
/// * `keplerian` – `[a, e, i, Ω, ω, anomaly]`, angles in degrees.
/// * `anomaly_type` – Flavour of the anomaly slot.
/// * `diagnostics` – Sink for the normalization advisories.
///
/// Return
/// ------
/// * Cartesian state `[x, y, z, vx, vy, vz]`.
///
/// Errors
/// ------
/// * [`ConversionError::InvalidGravitationalParameter`], [`ConversionError::SingularConic`],
///   [`ConversionError::NearParabolic`] from the conic checks.
/// * [`ConversionError::KeplerNotConverged`] if a mean anomaly cannot be solved.
/// * [`ConversionError::SingularGeometry`] if the true anomaly lies beyond the
///   asymptotes of a hyperbola.
pub fn keplerian_to_cartesian(
    mu: f64,
    keplerian: &State6,
    anomaly_type: AnomalyType,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    let kep = KeplerianElements::from(keplerian).normalized(diagnostics);
    kep.check_conic(mu)?;

    let ecc = kep.eccentricity;
    let ta = convert_to_true_anomaly(anomaly_type, kep.anomaly * RADEG, ecc)?;

    let p = kep.semi_major_axis * (1.0 - ecc * ecc);
    if p.abs() < INFINITE_TOL {
        return Err(ConversionError::NearParabolic(ecc));
    }

    let one_plus_ecos = 1.0 + ecc * ta.cos();
    if one_plus_ecos <= 0.0 {
        return Err(ConversionError::SingularGeometry(format!(
            "true anomaly {:.6} deg lies beyond the asymptotes of a hyperbola with ECC = {ecc}",
            ta * DEGRAD
        )));
    }
    if one_plus_ecos < ORBIT_TOL {
        diagnostics.warn_once(
            Advisory::LargeOrbitalRadius,
            "Warning: The orbital radius is large in the conversion from Keplerian elements to Cartesian state and the state may be near a singularity, causing numerical errors in the conversion.",
        );
    }

    Ok(perifocal_to_cartesian(
        mu,
        p,
        ecc,
        kep.inclination * RADEG,
        kep.ascending_node_longitude * RADEG,
        kep.periapsis_argument * RADEG,
        ta,
    ))
}

/// Closed-form position and velocity from `(p, e, i, Ω, ω, ν)`, angles in radians.
fn perifocal_to_cartesian(mu: f64, p: f64, ecc: f64, inc: f64, raan: f64, aop: f64, ta: f64) -> State6 {
    let rad = p / (1.0 + ecc * ta.cos());
    let (sin_u, cos_u) = (aop + ta).sin_cos();
    let (sin_i, cos_i) = inc.sin_cos();
    let (sin_o, cos_o) = raan.sin_cos();
    let (sin_w, cos_w) = aop.sin_cos();
    let sqrt_mu_p = (mu / p).sqrt();
    let cos_ta_e = ta.cos() + ecc;
    let sin_ta = ta.sin();

    let position = Vector3::new(
        rad * (cos_u * cos_o - cos_i * sin_u * sin_o),
        rad * (cos_u * sin_o + cos_i * sin_u * cos_o),
        rad * sin_u * sin_i,
    );
    let velocity = Vector3::new(
        sqrt_mu_p * cos_ta_e * (-sin_w * cos_o - cos_i * sin_o * cos_w)
            - sqrt_mu_p * sin_ta * (cos_w * cos_o - cos_i * sin_o * sin_w),
        sqrt_mu_p * cos_ta_e * (-sin_w * sin_o + cos_i * cos_o * cos_w)
            - sqrt_mu_p * sin_ta * (cos_w * sin_o + cos_i * cos_o * sin_w),
        sqrt_mu_p * (cos_ta_e * sin_i * cos_w - sin_ta * sin_i * sin_w),
    );
    join_state(&position, &velocity)
}

/// Cartesian state of a conic given its orientation vectors rather than angles.
///
/// Arguments
/// ---------
/// * `mu` – Gravitational parameter.
/// * `sma`, `ecc` – Size and shape of the conic.
/// * `h_hat` – Unit orbit normal.
/// * `e_hat` – Unit vector towards periapsis, orthogonal to `h_hat`.
/// * `ta` – True anomaly (rad).
pub(crate) fn conic_to_cartesian(
    mu: f64,
    sma: f64,
    ecc: f64,
    h_hat: &Vector3<f64>,
    e_hat: &Vector3<f64>,
    ta: f64,
) -> Result<State6, ConversionError> {
    let p = sma * (1.0 - ecc * ecc);
    if p.abs() < INFINITE_TOL {
        return Err(ConversionError::NearParabolic(ecc));
    }
    let q_hat = h_hat.cross(e_hat);
    let (sin_ta, cos_ta) = ta.sin_cos();
    if 1.0 + ecc * cos_ta <= 0.0 {
        return Err(ConversionError::SingularGeometry(format!(
            "true anomaly {:.6} deg lies beyond the asymptotes of a hyperbola with ECC = {ecc}",
            ta * DEGRAD
        )));
    }
    let rad = p / (1.0 + ecc * cos_ta);
    let sqrt_mu_p = (mu / p).sqrt();
    let position = rad * (cos_ta * e_hat + sin_ta * q_hat);
    let velocity = sqrt_mu_p * (-sin_ta * e_hat + (ecc + cos_ta) * q_hat);
    Ok(join_state(&position, &velocity))
}

/// Semi-major axis from a Cartesian state (km).
pub fn cartesian_to_sma(mu: f64, cartesian: &State6) -> Result<f64, ConversionError> {
    Ok(cartesian_to_keplerian(mu, cartesian, AnomalyType::True)?[0])
}

/// Eccentricity from a Cartesian state.
pub fn cartesian_to_ecc(mu: f64, cartesian: &State6) -> Result<f64, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    check_cartesian(mu, &pos, &vel)?;
    Ok(eccentricity_vector(mu, &pos, &vel).norm())
}

/// Inclination from a Cartesian state (degrees).
pub fn cartesian_to_inc(cartesian: &State6) -> Result<Degree, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    let h = angular_momentum(&pos, &vel);
    if h.norm() == 0.0 {
        return Err(ConversionError::ZeroVector("angular momentum"));
    }
    Ok(acos_clamped(h.z / h.norm()) * DEGRAD)
}

/// Right ascension of the ascending node from a Cartesian state (degrees).
pub fn cartesian_to_raan(mu: f64, cartesian: &State6) -> Result<Degree, ConversionError> {
    Ok(cartesian_to_keplerian(mu, cartesian, AnomalyType::True)?[3])
}

/// Argument of periapsis from a Cartesian state (degrees).
pub fn cartesian_to_aop(mu: f64, cartesian: &State6) -> Result<Degree, ConversionError> {
    Ok(cartesian_to_keplerian(mu, cartesian, AnomalyType::True)?[4])
}

/// Anomaly of the requested flavour from a Cartesian state (degrees).
///
/// See also
/// --------
/// * [`cartesian_to_keplerian`] – Full element set.
pub fn cartesian_to_anomaly(
    mu: f64,
    cartesian: &State6,
    anomaly_type: AnomalyType,
) -> Result<Degree, ConversionError> {
    Ok(cartesian_to_keplerian(mu, cartesian, anomaly_type)?[5])
}

/// Re-express the anomaly slot of Keplerian-family elements (degrees).
///
/// `from` and `to` must both be defined for the eccentricity `kep[1]`.
pub(crate) fn with_anomaly(kep: &State6, from: AnomalyType, to: AnomalyType) -> Result<State6, ConversionError> {
    if from == to {
        return Ok(*kep);
    }
    let mut out = *kep;
    let ta = convert_to_true_anomaly(from, kep[5] * RADEG, kep[1])?;
    let mut value = convert_from_true_anomaly(to, ta, kep[1])?;
    if to != AnomalyType::Hyperbolic {
        value = value.rem_euclid(DPI);
    }
    out[5] = value * DEGRAD;
    Ok(out)
}

#[cfg(test)]
mod orb_elem_test {
    use super::*;
    use crate::constants::EARTH_MU;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_circular_equatorial() {
        let v_circ = (EARTH_MU / 7000.0).sqrt();
        let cart = State6::new(7000.0, 0.0, 0.0, 0.0, v_circ, 0.0);
        let kep = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert!(kep[1] < KEP_TOL);
        assert_eq!(kep[2], 0.0);
        assert_eq!(kep[3], 0.0);
        assert_eq!(kep[4], 0.0);
        assert_eq!(kep[5], 0.0);

        // 7.546 km/s is slightly below circular speed: the state is the apoapsis
        // of a nearly circular equatorial ellipse
        let cart = State6::new(7000.0, 0.0, 0.0, 0.0, 7.546, 0.0);
        let kep = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert_abs_diff_eq!(kep[1], 0.0, epsilon = 1e-4);
        assert_eq!(kep[2], 0.0);
        assert_eq!(kep[3], 0.0);
        let true_longitude = (kep[4] + kep[5] + 180.0).rem_euclid(360.0) - 180.0;
        assert_abs_diff_eq!(true_longitude, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_geo_transfer_round_trip() {
        let diag = Diagnostics::new();
        let kep = State6::new(24396.0, 0.73, 7.0, 10.0, 5.0, 0.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        let back = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert_abs_diff_eq!(back[0], kep[0], epsilon = 1e-6);
        assert_abs_diff_eq!(back[1], kep[1], epsilon = 1e-6);
        for i in 2..5 {
            assert_abs_diff_eq!(back[i], kep[i], epsilon = 1e-6);
        }
        // TA = 0 may come back as 360 - tiny
        let ta = if back[5] > 180.0 { back[5] - 360.0 } else { back[5] };
        assert_abs_diff_eq!(ta, 0.0, epsilon = 1e-6);
        assert!(diag.warned().is_empty());
    }

    #[test]
    fn test_mean_anomaly_slot() {
        let diag = Diagnostics::new();
        let kep = State6::new(8000.0, 0.2, 45.0, 120.0, 60.0, 75.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::Mean, &diag).unwrap();
        let back = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::Mean).unwrap();
        assert_abs_diff_eq!(back[5], 75.0, epsilon = 1e-6);

        let ta = with_anomaly(&kep, AnomalyType::Mean, AnomalyType::True).unwrap();
        let cart_ta = keplerian_to_cartesian(EARTH_MU, &ta, AnomalyType::True, &diag).unwrap();
        assert_abs_diff_eq!((cart - cart_ta).norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hyperbolic_state() {
        let diag = Diagnostics::new();
        let kep = State6::new(-20000.0, 1.5, 30.0, 40.0, 50.0, 20.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        let back = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert_abs_diff_eq!(back[0], -20000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back[1], 1.5, epsilon = 1e-10);
        assert_abs_diff_eq!(back[5], 20.0, epsilon = 1e-8);

        // beyond the asymptote (TA max = 131.8 deg)
        let bad = State6::new(-20000.0, 1.5, 30.0, 40.0, 50.0, 150.0);
        assert!(matches!(
            keplerian_to_cartesian(EARTH_MU, &bad, AnomalyType::True, &diag),
            Err(ConversionError::SingularGeometry(_))
        ));
    }

    #[test]
    fn test_circular_inclined_and_retrograde() {
        let diag = Diagnostics::new();
        let kep = State6::new(7000.0, 0.0, 51.6, 100.0, 0.0, 30.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        let back = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert_abs_diff_eq!(back[3], 100.0, epsilon = 1e-8);
        assert_eq!(back[4], 0.0);
        assert_abs_diff_eq!(back[5], 30.0, epsilon = 1e-8);

        let cart = State6::new(7000.0, 0.0, 0.0, 0.0, -7.546, 0.0);
        let kep = cartesian_to_keplerian(EARTH_MU, &cart, AnomalyType::True).unwrap();
        assert_abs_diff_eq!(kep[2], 180.0, epsilon = 1e-12);
        assert_eq!(kep[3], 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let diag = Diagnostics::new();
        let zero = State6::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(
            cartesian_to_keplerian(EARTH_MU, &zero, AnomalyType::True),
            Err(ConversionError::ZeroVector("position"))
        );
        let radial = State6::new(7000.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert!(cartesian_to_keplerian(EARTH_MU, &radial, AnomalyType::True).is_err());

        let parabolic = State6::new(7000.0, 1.0, 10.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            keplerian_to_cartesian(EARTH_MU, &parabolic, AnomalyType::True, &diag),
            Err(ConversionError::SingularConic(_)) | Err(ConversionError::NearParabolic(_))
        ));
    }

    #[test]
    fn test_single_elements() {
        let diag = Diagnostics::new();
        let kep = State6::new(9000.0, 0.1, 28.5, 15.0, 25.0, 35.0);
        let cart = keplerian_to_cartesian(EARTH_MU, &kep, AnomalyType::True, &diag).unwrap();
        assert_abs_diff_eq!(cartesian_to_sma(EARTH_MU, &cart).unwrap(), 9000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cartesian_to_ecc(EARTH_MU, &cart).unwrap(), 0.1, epsilon = 1e-10);
        assert_abs_diff_eq!(cartesian_to_inc(&cart).unwrap(), 28.5, epsilon = 1e-10);
        assert_abs_diff_eq!(cartesian_to_raan(EARTH_MU, &cart).unwrap(), 15.0, epsilon = 1e-8);
        assert_abs_diff_eq!(cartesian_to_aop(EARTH_MU, &cart).unwrap(), 25.0, epsilon = 1e-8);
        assert_abs_diff_eq!(
            cartesian_to_anomaly(EARTH_MU, &cart, AnomalyType::True).unwrap(),
            35.0,
            epsilon = 1e-8
        );
    }
}
