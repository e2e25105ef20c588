//! # Keplerian orbital elements
//!
//! This module defines the [`KeplerianElements`] struct, the typed view of a
//! state tagged [`StateType::Keplerian`](crate::state_type::StateType::Keplerian),
//! together with the **sign normalizations** applied before any conversion.
//!
//! ## Elements
//!
//! 1. **a** – Semi-major axis (km), negative for hyperbolic orbits
//! 2. **e** – Eccentricity (unitless)
//! 3. **i** – Inclination (degrees)
//! 4. **Ω** – Right ascension of the ascending node (degrees)
//! 5. **ω** – Argument of periapsis (degrees)
//! 6. **anomaly** – True, mean, eccentric or hyperbolic anomaly (degrees), its
//!    flavour given by the accompanying [`AnomalyType`](crate::state_type::AnomalyType)
//!
//! ## Normalization
//!
//! [`KeplerianElements::normalized`] makes the element set self-consistent:
//!
//! - a negative eccentricity is made positive and the periapsis direction is
//!   reversed (ω and the anomaly move by 180°), which describes the same state;
//! - the sign of `a` is forced to match the conic (`a > 0 ⇔ e < 1`).
//!
//! Each correction emits a one-time advisory on the caller's
//! [`Diagnostics`](crate::diagnostics::Diagnostics).

use std::fmt;

use crate::constants::{State6, MU_TOL, PARABOLIC_TOL, SINGULAR_TOL};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::{Advisory, Diagnostics};

/// Classical Keplerian elements, angles in degrees.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct KeplerianElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub anomaly: f64,
}

impl KeplerianElements {
    /// Radius of periapsis `a(1 − e)` (km).
    pub fn periapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Return a copy whose eccentricity and semi-major axis signs are consistent.
    ///
    /// Arguments
    /// ---------
    /// * `diagnostics` – Sink receiving the [`Advisory::NegativeEccentricity`] and
    ///   [`Advisory::SemiMajorAxisSign`] advisories.
    pub fn normalized(&self, diagnostics: &Diagnostics) -> Self {
        let mut kep = *self;

        if kep.eccentricity < 0.0 {
            diagnostics.warn_once(
                Advisory::NegativeEccentricity,
                &format!(
                    "*** Warning *** Eccentricity ({}) cannot be less than 0.0. The sign of the eccentricity has been changed.",
                    kep.eccentricity
                ),
            );
            kep.eccentricity = -kep.eccentricity;
            kep.periapsis_argument = (kep.periapsis_argument + 180.0).rem_euclid(360.0);
            kep.anomaly = (kep.anomaly + 180.0).rem_euclid(360.0);
        }

        let hyperbolic_with_positive_sma = kep.semi_major_axis > 0.0 && kep.eccentricity > 1.0;
        let elliptic_with_negative_sma = kep.semi_major_axis < 0.0 && kep.eccentricity < 1.0;
        if hyperbolic_with_positive_sma || elliptic_with_negative_sma {
            diagnostics.warn_once(
                Advisory::SemiMajorAxisSign,
                &format!(
                    "*** Warning *** Semimajor axis ({}) sign is inconsistent with eccentricity ({}). The sign of the semimajor axis has been changed.",
                    kep.semi_major_axis, kep.eccentricity
                ),
            );
            kep.semi_major_axis = -kep.semi_major_axis;
        }

        kep
    }

    /// Check the conic against the periapsis floor and the parabolic boundary.
    ///
    /// Errors
    /// ------
    /// * [`ConversionError::InvalidGravitationalParameter`] if `mu` is too small.
    /// * [`ConversionError::SingularConic`] if `|a(1 − e)|` is below one meter.
    /// * [`ConversionError::NearParabolic`] if `|1 − e|` is below [`PARABOLIC_TOL`].
    pub fn check_conic(&self, mu: f64) -> Result<(), ConversionError> {
        if mu < MU_TOL {
            return Err(ConversionError::InvalidGravitationalParameter(mu));
        }
        self.check_shape()
    }

    /// Same checks as [`KeplerianElements::check_conic`] without the
    /// gravitational parameter.
    pub fn check_shape(&self) -> Result<(), ConversionError> {
        let rad_per = self.periapsis_radius().abs();
        if rad_per < SINGULAR_TOL {
            return Err(ConversionError::SingularConic(rad_per));
        }
        if (1.0 - self.eccentricity).abs() < PARABOLIC_TOL {
            return Err(ConversionError::NearParabolic(self.eccentricity));
        }
        Ok(())
    }
}

impl From<&State6> for KeplerianElements {
    fn from(s: &State6) -> Self {
        KeplerianElements {
            semi_major_axis: s[0],
            eccentricity: s[1],
            inclination: s[2],
            ascending_node_longitude: s[3],
            periapsis_argument: s[4],
            anomaly: s[5],
        }
    }
}

impl From<KeplerianElements> for State6 {
    fn from(k: KeplerianElements) -> Self {
        State6::new(
            k.semi_major_axis,
            k.eccentricity,
            k.inclination,
            k.ascending_node_longitude,
            k.periapsis_argument,
            k.anomaly,
        )
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keplerian Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} km",
            self.semi_major_axis
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.9}", self.eccentricity)?;
        writeln!(f, "  i   (inclination)           = {:.6}°", self.inclination)?;
        writeln!(
            f,
            "  Ω   (ascending node)        = {:.6}°",
            self.ascending_node_longitude
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument
        )?;
        writeln!(f, "  ν   (anomaly)               = {:.6}°", self.anomaly)
    }
}

#[cfg(test)]
mod keplerian_element_test {
    use super::*;

    fn kep(a: f64, e: f64) -> KeplerianElements {
        KeplerianElements {
            semi_major_axis: a,
            eccentricity: e,
            inclination: 10.0,
            ascending_node_longitude: 20.0,
            periapsis_argument: 30.0,
            anomaly: 40.0,
        }
    }

    #[test]
    fn test_normalize_negative_eccentricity() {
        let diag = Diagnostics::new();
        let k = kep(7000.0, -0.1).normalized(&diag);
        assert_eq!(k.eccentricity, 0.1);
        assert_eq!(k.periapsis_argument, 210.0);
        assert_eq!(k.anomaly, 220.0);
        assert!(diag.has_warned(Advisory::NegativeEccentricity));
        assert!(!diag.has_warned(Advisory::SemiMajorAxisSign));
    }

    #[test]
    fn test_normalize_sma_sign() {
        let diag = Diagnostics::new();
        assert_eq!(kep(7000.0, 1.5).normalized(&diag).semi_major_axis, -7000.0);
        assert_eq!(kep(-7000.0, 0.5).normalized(&diag).semi_major_axis, 7000.0);
        assert_eq!(kep(-7000.0, 1.5).normalized(&diag).semi_major_axis, -7000.0);
        assert!(diag.has_warned(Advisory::SemiMajorAxisSign));
    }

    #[test]
    fn test_check_conic() {
        assert!(kep(7000.0, 0.1).check_conic(398600.4415).is_ok());
        assert_eq!(
            kep(7000.0, 0.1).check_conic(0.0),
            Err(ConversionError::InvalidGravitationalParameter(0.0))
        );
        assert_eq!(
            kep(0.0005, 0.1).check_conic(1.0),
            Err(ConversionError::SingularConic(0.0))
        );
        assert_eq!(
            kep(1.0e9, 1.0 + 1e-8).check_conic(1.0),
            Err(ConversionError::NearParabolic(0.0))
        );
    }

    #[test]
    fn test_state_round_trip() {
        let k = kep(24396.0, 0.73);
        let s: State6 = k.into();
        assert_eq!(KeplerianElements::from(&s), k);
    }
}
