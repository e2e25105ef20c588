//! # Planetodetic representation
//!
//! `(r, λ, φ_d, v, azimuth, HFPA)`: the spherical AZFPA state with the
//! planetocentric latitude replaced by the planetodetic (geodetic) latitude of
//! the body's reference ellipsoid, and the vertical flight-path angle replaced
//! by the horizontal one (`HFPA = 90° − FPA`).
//!
//! The state must be expressed in a body-fixed frame; that frame transformation
//! is the caller's concern.
//!
//! Cartesian → planetodetic solves `tan φ_d = (z + N e² sin φ_d) / √(x² + y²)` by
//! fixed-point iteration. The reverse direction is closed form: the height `h`
//! above the ellipsoid along the normal is the positive root of
//! `(N + h)² cos² φ_d + (N(1 − e²) + h)² sin² φ_d = r²`.

use crate::central_body::CentralBody;
use crate::constants::{State6, DEGRAD, KEPLER_MAX_ITER, LATITUDE_TOL, RADEG};
use crate::conversion_errors::ConversionError;
use crate::orbit_type::spherical_element::{cartesian_to_spherical_azfpa, spherical_azfpa_to_cartesian};

/// Latitudes closer than this to a pole (rad) stop the iteration.
const POLE_TOL: f64 = 0.001 * RADEG;

fn first_eccentricity_squared(flattening: f64) -> f64 {
    2.0 * flattening - flattening * flattening
}

/// Cartesian state (body-fixed) to planetodetic elements.
///
/// Errors
/// ------
/// * [`ConversionError::SingularGeometry`] if the position or velocity is null.
pub fn cartesian_to_planetodetic(
    cartesian: &State6,
    body: &CentralBody,
) -> Result<State6, ConversionError> {
    let spherical = cartesian_to_spherical_azfpa(cartesian)?;
    let e2 = first_eccentricity_squared(body.flattening);

    let r_z = cartesian[2];
    let r_xy = cartesian[0].hypot(cartesian[1]);

    // capped at KEPLER_MAX_ITER; the last iterate is kept if the cap is hit
    let mut latd = spherical[2] * RADEG;
    let mut converged = false;
    for _ in 0..KEPLER_MAX_ITER {
        if (latd.abs() - std::f64::consts::FRAC_PI_2).abs() < POLE_TOL {
            converged = true;
            break;
        }
        let sin_lat = latd.sin();
        let c = body.equatorial_radius / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = ((r_z + c * e2 * sin_lat) / r_xy).atan();
        let step = (next - latd).abs();
        latd = next;
        if step < LATITUDE_TOL {
            converged = true;
            break;
        }
    }
    if !converged {
        log::debug!(
            "planetodetic latitude not converged to {LATITUDE_TOL:e} rad after {KEPLER_MAX_ITER} iterations, keeping {} deg",
            latd * DEGRAD
        );
    }

    Ok(State6::new(
        spherical[0],
        spherical[1],
        latd * DEGRAD,
        spherical[3],
        spherical[4],
        90.0 - spherical[5],
    ))
}

/// Planetodetic elements to Cartesian state (body-fixed).
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] if the latitude or the horizontal flight-path
///   angle lies outside `[-90°, 90°]`.
/// * [`ConversionError::SingularGeometry`] if the radius is too small to lie on
///   the normal of the ellipsoid at that latitude.
pub fn planetodetic_to_cartesian(
    planetodetic: &State6,
    body: &CentralBody,
) -> Result<State6, ConversionError> {
    let r_mag = planetodetic[0];
    let latd_deg = planetodetic[2];
    let hfpa = planetodetic[5];

    if !(-90.0..=90.0).contains(&latd_deg) {
        return Err(ConversionError::out_of_range("PlanetodeticLAT", latd_deg, "-90 <= Real Number <= 90"));
    }
    if !(-90.0..=90.0).contains(&hfpa) {
        return Err(ConversionError::out_of_range("PlanetodeticHFPA", hfpa, "-90 <= Real Number <= 90"));
    }

    let latd = latd_deg * RADEG;
    let e2 = first_eccentricity_squared(body.flattening);
    let (sin_d, cos_d) = latd.sin_cos();
    let n = body.equatorial_radius / (1.0 - e2 * sin_d * sin_d).sqrt();

    // h² + 2Ah + C − r² = 0
    let a = n * (1.0 - e2 * sin_d * sin_d);
    let c = n * n * (cos_d * cos_d + (1.0 - e2) * (1.0 - e2) * sin_d * sin_d);
    let discriminant = a * a - c + r_mag * r_mag;
    if discriminant < 0.0 {
        return Err(ConversionError::SingularGeometry(format!(
            "radius {r_mag} km does not reach the ellipsoid normal at planetodetic latitude {latd_deg} deg"
        )));
    }
    let height = -a + discriminant.sqrt();
    let latg = ((n * (1.0 - e2) + height) * sin_d).atan2((n + height) * cos_d);

    let spherical = State6::new(
        r_mag,
        planetodetic[1],
        latg * DEGRAD,
        planetodetic[3],
        planetodetic[4],
        90.0 - hfpa,
    );
    Ok(spherical_azfpa_to_cartesian(&spherical))
}
