//! # Modified Keplerian elements
//!
//! `(r_p, r_a, i, Ω, ω, anomaly)`: the size and shape of the conic are given by
//! the radii of periapsis and apoapsis instead of `(a, e)`. The radius of
//! apoapsis is negative for hyperbolic orbits. The orientation angles and the
//! anomaly slot are shared with [`KeplerianElements`].

use crate::constants::State6;
use crate::conversion_errors::ConversionError;
use crate::diagnostics::Diagnostics;
use crate::orbit_type::keplerian_element::KeplerianElements;

/// Keplerian to modified Keplerian elements.
///
/// The input is normalized first (see [`KeplerianElements::normalized`]).
///
/// Errors
/// ------
/// * [`ConversionError::SingularConic`] if the radius of periapsis is below one meter.
/// * [`ConversionError::NearParabolic`] if the orbit is nearly parabolic or `a` is infinite.
pub fn keplerian_to_modified_keplerian(
    keplerian: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    if keplerian[0].is_infinite() {
        return Err(ConversionError::NearParabolic(keplerian[1]));
    }
    let kep = KeplerianElements::from(keplerian).normalized(diagnostics);
    kep.check_shape()?;

    let a = kep.semi_major_axis;
    let e = kep.eccentricity;
    Ok(State6::new(
        a * (1.0 - e),
        a * (1.0 + e),
        kep.inclination,
        kep.ascending_node_longitude,
        kep.periapsis_argument,
        kep.anomaly,
    ))
}

/// Modified Keplerian to Keplerian elements.
///
/// Errors
/// ------
/// * [`ConversionError::OutOfRange`] if the radius of apoapsis is zero (within one
///   meter), if `0 < r_a < r_p`, or if the radius of periapsis is not positive.
pub fn modified_keplerian_to_keplerian(modified: &State6) -> Result<State6, ConversionError> {
    let rad_per = modified[0];
    let rad_apo = modified[1];

    if rad_apo.abs() < 1e-3 {
        return Err(ConversionError::out_of_range(
            "RadApo",
            rad_apo,
            "Real Number != 0",
        ));
    }
    if rad_apo < rad_per && rad_apo > 0.0 {
        return Err(ConversionError::out_of_range(
            "RadApo",
            rad_apo,
            format!("RadApo >= RadPer ({rad_per}) or RadApo < 0"),
        ));
    }
    if rad_per <= 0.0 || rad_per.abs() < 1e-3 {
        return Err(ConversionError::out_of_range("RadPer", rad_per, "Real Number > 0"));
    }

    let ratio = rad_per / rad_apo;
    let e = (1.0 - ratio) / (1.0 + ratio);
    let a = rad_per / (1.0 - e);

    Ok(State6::new(a, e, modified[2], modified[3], modified[4], modified[5]))
}

#[cfg(test)]
mod modified_keplerian_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ellipse_and_hyperbola() {
        let diag = Diagnostics::new();
        let kep = State6::new(24396.0, 0.73, 7.0, 10.0, 5.0, 0.0);
        let modk = keplerian_to_modified_keplerian(&kep, &diag).unwrap();
        assert_relative_eq!(modk[0], 24396.0 * 0.27, max_relative = 1e-14);
        assert_relative_eq!(modk[1], 24396.0 * 1.73, max_relative = 1e-14);
        assert_relative_eq!(modified_keplerian_to_keplerian(&modk).unwrap(), kep, max_relative = 1e-12);

        let hyp = State6::new(-20000.0, 1.5, 30.0, 40.0, 50.0, 20.0);
        let modk = keplerian_to_modified_keplerian(&hyp, &diag).unwrap();
        assert!(modk[1] < 0.0);
        assert_relative_eq!(modified_keplerian_to_keplerian(&modk).unwrap(), hyp, max_relative = 1e-12);
    }

    #[test]
    fn test_domain_errors() {
        let bad_apo = State6::new(7000.0, 6000.0, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            modified_keplerian_to_keplerian(&bad_apo),
            Err(ConversionError::OutOfRange { .. })
        ));
        let zero_apo = State6::new(7000.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(modified_keplerian_to_keplerian(&zero_apo).is_err());
        let neg_per = State6::new(-7000.0, 8000.0, 0.0, 0.0, 0.0, 0.0);
        assert!(modified_keplerian_to_keplerian(&neg_per).is_err());

        let diag = Diagnostics::new();
        let inf = State6::new(f64::INFINITY, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(keplerian_to_modified_keplerian(&inf, &diag).is_err());
    }
}
