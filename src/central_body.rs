//! # Central-body parameters
//!
//! Read-only physical constants consumed by the converters: gravitational
//! parameter, equatorial radius and flattening. The default solar-system bodies
//! are available as constants and through the [`CentralBody::from_name`]
//! registry lookup.

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_EQUATORIAL_RADIUS, EARTH_FLATTENING, EARTH_MU, MU_TOL};
use crate::conversion_errors::ConversionError;

/// Gravitational and shape parameters of the body the state is expressed about.
///
/// Units
/// -----
/// * `mu`: km³/s²
/// * `equatorial_radius`: km
/// * `flattening`: unitless
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralBody {
    pub name: String,
    pub mu: f64,
    pub equatorial_radius: f64,
    pub flattening: f64,
}

/// (name, μ, equatorial radius, flattening) of the built-in bodies.
const DEFAULT_BODIES: [(&str, f64, f64, f64); 11] = [
    ("Sun", 132_712_440_017.99, 695_990.0, 0.0),
    ("Mercury", 22_032.080_486_418, 2_439.7, 0.0),
    ("Venus", 324_858.598_826_46, 6_051.9, 0.0),
    ("Earth", EARTH_MU, EARTH_EQUATORIAL_RADIUS, EARTH_FLATTENING),
    ("Luna", 4_902.800_582_147_8, 1_738.2, 0.0),
    ("Mars", 42_828.314_258_067, 3_397.0, 0.006_476_30),
    ("Jupiter", 126_712_767.857_80, 71_492.0, 0.064_874_39),
    ("Saturn", 37_940_626.061_137, 60_268.0, 0.097_962_43),
    ("Uranus", 5_794_549.007_071_9, 25_559.0, 0.022_927_34),
    ("Neptune", 6_836_534.063_879_3, 25_269.0, 0.018_560_29),
    ("Pluto", 981.600_887_707, 1_162.0, 0.0),
];

impl CentralBody {
    /// Build a custom central body.
    ///
    /// Errors
    /// ------
    /// * [`ConversionError::InvalidGravitationalParameter`] if `mu` is below the
    ///   admissible floor.
    pub fn new(
        name: &str,
        mu: f64,
        equatorial_radius: f64,
        flattening: f64,
    ) -> Result<Self, ConversionError> {
        if mu < MU_TOL {
            return Err(ConversionError::InvalidGravitationalParameter(mu));
        }
        Ok(Self {
            name: name.to_string(),
            mu,
            equatorial_radius,
            flattening,
        })
    }

    /// Default Earth parameters.
    pub fn earth() -> Self {
        Self {
            name: "Earth".to_string(),
            mu: EARTH_MU,
            equatorial_radius: EARTH_EQUATORIAL_RADIUS,
            flattening: EARTH_FLATTENING,
        }
    }

    /// Look a default body up by name (case-insensitive, "Moon" is an alias of "Luna").
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = if name.eq_ignore_ascii_case("moon") {
            "Luna"
        } else {
            name
        };
        DEFAULT_BODIES
            .iter()
            .find(|(n, ..)| n.eq_ignore_ascii_case(wanted))
            .map(|&(n, mu, radius, flattening)| Self {
                name: n.to_string(),
                mu,
                equatorial_radius: radius,
                flattening,
            })
    }

    /// Names of the built-in bodies.
    pub fn default_names() -> impl Iterator<Item = &'static str> {
        DEFAULT_BODIES.iter().map(|(n, ..)| *n)
    }
}

impl Default for CentralBody {
    fn default() -> Self {
        Self::earth()
    }
}

#[cfg(test)]
mod central_body_test {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let earth = CentralBody::from_name("earth").unwrap();
        assert_eq!(earth, CentralBody::earth());

        let moon = CentralBody::from_name("Moon").unwrap();
        assert_eq!(moon.name, "Luna");
        assert_eq!(moon.mu, 4_902.800_582_147_8);

        assert!(CentralBody::from_name("Vulcan").is_none());
        assert_eq!(CentralBody::default_names().count(), 11);
    }

    #[test]
    fn test_invalid_mu() {
        assert!(matches!(
            CentralBody::new("Dust", 0.0, 1.0, 0.0),
            Err(ConversionError::InvalidGravitationalParameter(_))
        ));
    }
}
