//! # Spherical representations
//!
//! Two spherical forms of the Cartesian state, both independent of the central
//! body:
//!
//! * **SphericalAZFPA** `(r, α, δ, v, azimuth, FPA)`: the velocity is described in
//!   the local horizontal frame (north-pointing `z`) by its flight-path azimuth
//!   and its vertical flight-path angle measured from the radial direction.
//! * **SphericalRADEC** `(r, α, δ, v, αᵥ, δᵥ)`: the velocity is described by its
//!   own right ascension and declination.
//!
//! Right ascensions are returned in `(−180°, 180°]`, declinations in `[−90°, 90°]`.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{State6, DEGRAD, RADEG};
use crate::conversion_errors::ConversionError;
use crate::orb_elem::{acos_clamped, asin_clamped, join_state, split_state};

const MAGNITUDE_FLOOR: f64 = 1e-10;

fn check_magnitudes(target: &str, r: f64, v: f64) -> Result<(), ConversionError> {
    if r < MAGNITUDE_FLOOR {
        return Err(ConversionError::SingularGeometry(format!(
            "{target} elements are undefined because RMAG ({r}) is less than 1e-10"
        )));
    }
    if v < MAGNITUDE_FLOOR {
        return Err(ConversionError::SingularGeometry(format!(
            "{target} elements are undefined because VMAG ({v}) is less than 1e-10"
        )));
    }
    Ok(())
}

/// Rotation from the inertial frame to the local frame at right ascension `lambda`
/// and declination `delta` (rows: radial, east, north).
pub(crate) fn local_frame(lambda: f64, delta: f64) -> Matrix3<f64> {
    let (sin_l, cos_l) = lambda.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();
    Matrix3::new(
        cos_d * cos_l, cos_d * sin_l, sin_d,
        -sin_l, cos_l, 0.0,
        -sin_d * cos_l, -sin_d * sin_l, cos_d,
    )
}

fn spherical_position(r: f64, lambda: f64, delta: f64) -> Vector3<f64> {
    Vector3::new(
        r * delta.cos() * lambda.cos(),
        r * delta.cos() * lambda.sin(),
        r * delta.sin(),
    )
}

/// Cartesian state to SphericalAZFPA.
///
/// Errors
/// ------
/// * [`ConversionError::SingularGeometry`] if the position or velocity magnitude
///   is below `1e-10`.
pub fn cartesian_to_spherical_azfpa(cartesian: &State6) -> Result<State6, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    let r = pos.norm();
    let v = vel.norm();
    check_magnitudes("SphericalAZFPA", r, v)?;

    let lambda = pos.y.atan2(pos.x);
    let delta = asin_clamped(pos.z / r);
    let psi = acos_clamped(pos.dot(&vel) / (r * v));

    let v_local = local_frame(lambda, delta) * vel;
    let azimuth = v_local[1].atan2(v_local[2]);

    Ok(State6::new(
        r,
        lambda * DEGRAD,
        delta * DEGRAD,
        v,
        azimuth * DEGRAD,
        psi * DEGRAD,
    ))
}

/// SphericalAZFPA to Cartesian state.
pub fn spherical_azfpa_to_cartesian(spherical: &State6) -> State6 {
    let r = spherical[0];
    let lambda = spherical[1] * RADEG;
    let delta = spherical[2] * RADEG;
    let v = spherical[3];
    let azimuth = spherical[4] * RADEG;
    let psi = spherical[5] * RADEG;

    let (sin_d, cos_d) = delta.sin_cos();
    let (sin_l, cos_l) = lambda.sin_cos();
    let (sin_p, cos_p) = psi.sin_cos();
    let (sin_a, cos_a) = azimuth.sin_cos();

    let vel = Vector3::new(
        v * (cos_p * cos_d * cos_l - sin_p * (sin_a * sin_l + cos_a * sin_d * cos_l)),
        v * (cos_p * cos_d * sin_l + sin_p * (sin_a * cos_l - cos_a * sin_d * sin_l)),
        v * (cos_p * sin_d + sin_p * cos_a * cos_d),
    );
    join_state(&spherical_position(r, lambda, delta), &vel)
}

/// Cartesian state to SphericalRADEC.
///
/// Errors
/// ------
/// * [`ConversionError::SingularGeometry`] if the position or velocity magnitude
///   is below `1e-10`.
pub fn cartesian_to_spherical_radec(cartesian: &State6) -> Result<State6, ConversionError> {
    let (pos, vel) = split_state(cartesian);
    let r = pos.norm();
    let v = vel.norm();
    check_magnitudes("SphericalRADEC", r, v)?;

    Ok(State6::new(
        r,
        pos.y.atan2(pos.x) * DEGRAD,
        asin_clamped(pos.z / r) * DEGRAD,
        v,
        vel.y.atan2(vel.x) * DEGRAD,
        asin_clamped(vel.z / v) * DEGRAD,
    ))
}

/// SphericalRADEC to Cartesian state.
pub fn spherical_radec_to_cartesian(spherical: &State6) -> State6 {
    let pos = spherical_position(spherical[0], spherical[1] * RADEG, spherical[2] * RADEG);
    let vel = spherical_position(spherical[3], spherical[4] * RADEG, spherical[5] * RADEG);
    join_state(&pos, &vel)
}
