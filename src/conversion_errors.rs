//! # Conversion errors
//!
//! Every fatal failure of a conversion is a [`ConversionError`]. Variants carry
//! the rejected value and, where one exists, the admissible range, so a host
//! layer can report the problem without re-deriving it. Recoverable input
//! normalizations are not errors; they go to [`crate::diagnostics::Diagnostics`].

use thiserror::Error;

use crate::state_type::StateType;

/// Fatal failure of a conversion, a Jacobian or a value check.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    /// `μ` is below `MU_TOL`.
    #[error("Gravitational parameter ({0}) is too small to convert the state")]
    InvalidGravitationalParameter(f64),

    /// A position, velocity, angular momentum or node vector used as a divisor is null.
    #[error("Cannot convert the state: the {0} vector is a zero vector")]
    ZeroVector(&'static str),

    /// The radius of periapsis is below one meter.
    #[error(
        "A nearly singular conic section was encountered: the radius of periapsis ({0}) must be greater than 1 meter"
    )]
    SingularConic(f64),

    /// `|1 − e|` lies within the parabolic tolerance, or the energy is zero.
    #[error("A nearly parabolic orbit (ECC = {0}) was encountered; the elements are undefined for a parabolic orbit")]
    NearParabolic(f64),

    #[error("Orbits with an inclination of 180 degrees are not supported by the {0} representation")]
    UnsupportedInclination(StateType),

    /// An element lies outside its domain.
    #[error("The value {value} for field \"{element}\" is not allowed. The allowed values are: [{range}]")]
    OutOfRange {
        element: String,
        value: f64,
        range: String,
    },

    #[error("Unknown state type \"{0}\". Allowed values are: {1}")]
    UnknownStateType(String, String),

    #[error("Unknown anomaly type \"{0}\". Allowed values are: {1}")]
    UnknownAnomalyType(String, String),

    /// No converter, or no analytic partials, for the requested pair.
    #[error("Cannot convert a state from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    /// The Kepler solver hit its iteration cap.
    #[error("Kepler equation did not converge within {iterations} iterations using a tolerance of {tolerance}")]
    KeplerNotConverged { iterations: usize, tolerance: f64 },

    /// The eccentric-longitude Newton iteration of the equinoctial inverse failed.
    #[error("Mean longitude equation did not converge within {0} iterations")]
    EquinoctialNotConverged(usize),

    /// Body, eccentricity, periapsis or inclination outside the Brouwer-Lyddane theory.
    #[error("Brouwer-Lyddane mean elements: {0}")]
    BrouwerDomain(String),

    #[error("Asymptote conversion: {0}")]
    AsymptoteSingularity(String),

    #[error("Singular geometry: {0}")]
    SingularGeometry(String),

    #[error("Jacobian matrix is singular and cannot be inverted ({0})")]
    SingularJacobian(String),

    /// The anomaly lies beyond the asymptotes, or its defining denominator vanishes.
    #[error("Anomaly {anomaly} is not defined for eccentricity {eccentricity}")]
    UndefinedAnomaly { anomaly: String, eccentricity: f64 },
}

impl ConversionError {
    /// Build an [`ConversionError::OutOfRange`] from a label, the rejected value and the allowed range.
    pub(crate) fn out_of_range(element: &str, value: f64, range: impl Into<String>) -> Self {
        ConversionError::OutOfRange {
            element: element.to_string(),
            value,
            range: range.into(),
        }
    }
}

impl PartialEq for ConversionError {
    fn eq(&self, other: &Self) -> bool {
        use ConversionError::*;
        match (self, other) {
            // Floating payloads are compared by variant only
            (InvalidGravitationalParameter(_), InvalidGravitationalParameter(_)) => true,
            (SingularConic(_), SingularConic(_)) => true,
            (NearParabolic(_), NearParabolic(_)) => true,
            (OutOfRange { element: a, .. }, OutOfRange { element: b, .. }) => a == b,
            (KeplerNotConverged { .. }, KeplerNotConverged { .. }) => true,
            (UndefinedAnomaly { anomaly: a, .. }, UndefinedAnomaly { anomaly: b, .. }) => a == b,

            (ZeroVector(a), ZeroVector(b)) => a == b,
            (UnsupportedInclination(a), UnsupportedInclination(b)) => a == b,
            (UnknownStateType(a, _), UnknownStateType(b, _)) => a == b,
            (UnknownAnomalyType(a, _), UnknownAnomalyType(b, _)) => a == b,
            (
                UnsupportedConversion { from: f1, to: t1 },
                UnsupportedConversion { from: f2, to: t2 },
            ) => f1 == f2 && t1 == t2,
            (EquinoctialNotConverged(a), EquinoctialNotConverged(b)) => a == b,
            (BrouwerDomain(a), BrouwerDomain(b)) => a == b,
            (AsymptoteSingularity(a), AsymptoteSingularity(b)) => a == b,
            (SingularGeometry(a), SingularGeometry(b)) => a == b,
            (SingularJacobian(a), SingularJacobian(b)) => a == b,

            _ => false,
        }
    }
}
