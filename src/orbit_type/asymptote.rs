//! # Hyperbolic asymptote elements
//!
//! Flyby states described by their approach or departure asymptote:
//!
//! 1. **RadPer** – radius of periapsis (km)
//! 2. **C3** – characteristic energy `v² − 2μ/r` (km²/s²)
//! 3. **RHA** – right ascension of the asymptote (degrees)
//! 4. **DHA** – declination of the asymptote (degrees)
//! 5. **BVA** – B-plane vector azimuth at infinity (degrees)
//! 6. **TA** – true anomaly (degrees)
//!
//! For an elliptic state (`C3 < 0`) there is no asymptote; the apsides vector
//! takes its place and a one-time advisory is emitted.

use nalgebra::Vector3;

use crate::constants::{State6, DEGRAD, DPI, MU_TOL, PARABOLIC_TOL, RADEG};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::orb_elem::{acos_clamped, angular_momentum, asin_clamped, conic_to_cartesian, eccentricity_vector, split_state};

/// Which branch of the hyperbola the asymptote belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsymptoteDirection {
    Incoming,
    Outgoing,
}

impl AsymptoteDirection {
    fn sign(self) -> f64 {
        match self {
            AsymptoteDirection::Incoming => -1.0,
            AsymptoteDirection::Outgoing => 1.0,
        }
    }

    fn advisory(self) -> Advisory {
        match self {
            AsymptoteDirection::Incoming => Advisory::ApsidesForIncomingAsymptote,
            AsymptoteDirection::Outgoing => Advisory::ApsidesForOutgoingAsymptote,
        }
    }

    fn label(self) -> &'static str {
        match self {
            AsymptoteDirection::Incoming => "Incoming Asymptote",
            AsymptoteDirection::Outgoing => "Outgoing Asymptote",
        }
    }
}

/// East and north unit vectors of the plane orthogonal to `s_hat`.
fn asymptote_frame(s_hat: &Vector3<f64>, direction: AsymptoteDirection) -> Result<(Vector3<f64>, Vector3<f64>), ConversionError> {
    let uz = Vector3::z();
    if acos_clamped(s_hat.dot(&uz).abs()) < PARABOLIC_TOL {
        return Err(ConversionError::AsymptoteSingularity(format!(
            "the {} vector is aligned with the z-direction",
            direction.label()
        )));
    }
    let east = uz.cross(s_hat).normalize();
    let north = s_hat.cross(&east);
    Ok((east, north))
}

/// Cartesian state to asymptote elements.
///
/// Arguments
/// ---------
/// * `mu` – Gravitational parameter.
/// * `cartesian` – `[x, y, z, vx, vy, vz]`.
/// * `direction` – Incoming or outgoing asymptote.
/// * `diagnostics` – Receives the apsides-vector advisory for elliptic states.
///
/// Errors
/// ------
/// * [`ConversionError::NearParabolic`] if `|1 − e| ≤ 1e-7` or `|C3| < 1e-7`.
/// * [`ConversionError::AsymptoteSingularity`] for a null velocity, a circular
///   orbit, or an asymptote aligned with the polar axis.
pub fn cartesian_to_asymptote(
    mu: f64,
    cartesian: &State6,
    direction: AsymptoteDirection,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }
    let (pos, vel) = split_state(cartesian);
    let r = pos.norm();
    let v = vel.norm();
    if r == 0.0 {
        return Err(ConversionError::ZeroVector("position"));
    }
    let h_vec = angular_momentum(&pos, &vel);
    let h = h_vec.norm();
    let ecc_vec = eccentricity_vector(mu, &pos, &vel);
    let ecc = ecc_vec.norm();
    let c3 = v * v - 2.0 * mu / r;

    if (1.0 - ecc).abs() <= PARABOLIC_TOL || c3.abs() < PARABOLIC_TOL {
        return Err(ConversionError::NearParabolic(ecc));
    }
    if v < PARABOLIC_TOL {
        return Err(ConversionError::AsymptoteSingularity(format!(
            "{} elements are undefined for a zero-velocity orbit",
            direction.label()
        )));
    }
    if ecc <= PARABOLIC_TOL {
        return Err(ConversionError::AsymptoteSingularity(format!(
            "{} elements are undefined for a circular orbit (ECC = {ecc})",
            direction.label()
        )));
    }
    if h == 0.0 {
        return Err(ConversionError::ZeroVector("angular momentum"));
    }

    let sma = -mu / c3;
    let rad_per = sma * (1.0 - ecc);

    let s_hat = if c3 > 0.0 {
        let fac1 = 1.0 / (1.0 + c3 * h * h / (mu * mu));
        fac1 * (direction.sign() * c3.sqrt() / mu * h_vec.cross(&ecc_vec) - ecc_vec)
    } else {
        diagnostics.warn_once(
            direction.advisory(),
            "Warning: Orbit is elliptic so using Apsides vector for asymptote.",
        );
        -ecc_vec / ecc
    };

    let (east, north) = asymptote_frame(&s_hat, direction)?;
    let b_vec = h_vec.cross(&s_hat);
    let sin_bva = b_vec.dot(&east) / h;
    let cos_bva = -b_vec.dot(&north) / h;
    let bva = sin_bva.atan2(cos_bva).rem_euclid(DPI);

    let dha = asin_clamped(s_hat.z);
    let rha = s_hat.y.atan2(s_hat.x).rem_euclid(DPI);

    let mut ta = acos_clamped(ecc_vec.dot(&pos) / (ecc * r));
    if pos.dot(&vel) < 0.0 {
        ta = DPI - ta;
    }

    Ok(State6::new(
        rad_per,
        c3,
        rha * DEGRAD,
        dha * DEGRAD,
        bva * DEGRAD,
        ta * DEGRAD,
    ))
}

/// Asymptote elements to Cartesian state.
///
/// The orbit normal is rebuilt from the B-plane azimuth and the periapsis
/// direction from the asymptote and the limiting true anomaly `acos(−1/e)`;
/// the state then follows from the perifocal frame directly.
///
/// Errors
/// ------
/// * [`ConversionError::NearParabolic`] if `|1 − e| ≤ 1e-7` or `|C3| < 1e-7`.
/// * [`ConversionError::AsymptoteSingularity`] for a circular orbit or an
///   asymptote aligned with the polar axis.
/// * [`ConversionError::SingularGeometry`] if the true anomaly lies beyond the asymptotes.
pub fn asymptote_to_cartesian(
    mu: f64,
    asymptote: &State6,
    direction: AsymptoteDirection,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    if mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(mu));
    }
    let rad_per = asymptote[0];
    let c3 = asymptote[1];
    let rha = asymptote[2] * RADEG;
    let dha = asymptote[3] * RADEG;
    let bva = asymptote[4] * RADEG;
    let ta = asymptote[5] * RADEG;

    let sma = -mu / c3;
    let ecc = 1.0 - rad_per / sma;
    if (1.0 - ecc).abs() <= PARABOLIC_TOL || c3.abs() < PARABOLIC_TOL {
        return Err(ConversionError::NearParabolic(ecc));
    }
    if ecc < PARABOLIC_TOL {
        return Err(ConversionError::AsymptoteSingularity(format!(
            "{} elements are undefined for a circular orbit (ECC = {ecc})",
            direction.label()
        )));
    }

    let s_hat = Vector3::new(dha.cos() * rha.cos(), dha.cos() * rha.sin(), dha.sin());
    let (east, north) = asymptote_frame(&s_hat, direction)?;

    // azimuth at infinity
    let ami = std::f64::consts::FRAC_PI_2 - bva;
    let h_hat = ami.sin() * east + ami.cos() * north;

    let e_hat = if c3 < 0.0 {
        diagnostics.warn_once(
            direction.advisory(),
            "Warning: Orbit is elliptic so using Apsides vector for asymptote.",
        );
        -s_hat
    } else {
        let ta_max = acos_clamped(-1.0 / ecc);
        let o_hat = h_hat.cross(&s_hat);
        -direction.sign() * ta_max.sin() * o_hat + ta_max.cos() * s_hat
    };

    conic_to_cartesian(mu, sma, ecc, &h_hat, &e_hat, ta)
}
