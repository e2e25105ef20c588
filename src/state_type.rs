//! # Representation and anomaly tags
//!
//! A six-element state vector never carries its own meaning: the caller always
//! supplies a [`StateType`] alongside it, and, for the Keplerian family, an
//! [`AnomalyType`] describing the content of the anomaly slot.
//!
//! Both tags map to and from their canonical script names (`"Cartesian"`,
//! `"BrouwerMeanLong"`, `"TA"` / `"True Anomaly"`, …) through [`std::str::FromStr`]
//! and [`std::fmt::Display`].

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::conversion_errors::ConversionError;

/// The fourteen supported state representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateType {
    Cartesian,
    Keplerian,
    ModifiedKeplerian,
    SphericalAzFpa,
    SphericalRaDec,
    Equinoctial,
    ModifiedEquinoctial,
    AlternateEquinoctial,
    Delaunay,
    Planetodetic,
    OutgoingAsymptote,
    IncomingAsymptote,
    BrouwerMeanShort,
    BrouwerMeanLong,
}

impl StateType {
    /// Every representation, in canonical order.
    pub const ALL: [StateType; 14] = [
        StateType::Cartesian,
        StateType::Keplerian,
        StateType::ModifiedKeplerian,
        StateType::SphericalAzFpa,
        StateType::SphericalRaDec,
        StateType::Equinoctial,
        StateType::ModifiedEquinoctial,
        StateType::AlternateEquinoctial,
        StateType::Delaunay,
        StateType::Planetodetic,
        StateType::OutgoingAsymptote,
        StateType::IncomingAsymptote,
        StateType::BrouwerMeanShort,
        StateType::BrouwerMeanLong,
    ];

    /// Canonical script name of the representation.
    pub fn name(&self) -> &'static str {
        match self {
            StateType::Cartesian => "Cartesian",
            StateType::Keplerian => "Keplerian",
            StateType::ModifiedKeplerian => "ModifiedKeplerian",
            StateType::SphericalAzFpa => "SphericalAZFPA",
            StateType::SphericalRaDec => "SphericalRADEC",
            StateType::Equinoctial => "Equinoctial",
            StateType::ModifiedEquinoctial => "ModifiedEquinoctial",
            StateType::AlternateEquinoctial => "AlternateEquinoctial",
            StateType::Delaunay => "Delaunay",
            StateType::Planetodetic => "Planetodetic",
            StateType::OutgoingAsymptote => "OutgoingAsymptote",
            StateType::IncomingAsymptote => "IncomingAsymptote",
            StateType::BrouwerMeanShort => "BrouwerMeanShort",
            StateType::BrouwerMeanLong => "BrouwerMeanLong",
        }
    }

    /// Whether the representation is only meaningful about a celestial body,
    /// i.e. needs the body's gravitational parameter.
    pub fn requires_central_body(&self) -> bool {
        !matches!(
            self,
            StateType::Cartesian
                | StateType::SphericalAzFpa
                | StateType::SphericalRaDec
                | StateType::AlternateEquinoctial
        )
    }

    /// Whether the representation must be expressed in a body-fixed (rotating) frame.
    pub fn requires_fixed_frame(&self) -> bool {
        matches!(self, StateType::Planetodetic)
    }

    /// Whether the last element of the state is an anomaly whose flavour is given
    /// by an [`AnomalyType`].
    pub fn has_anomaly_slot(&self) -> bool {
        matches!(self, StateType::Keplerian | StateType::ModifiedKeplerian)
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StateType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                ConversionError::UnknownStateType(
                    s.to_string(),
                    StateType::ALL.iter().map(|t| t.name()).join(", "),
                )
            })
    }
}

/// Flavour of the anomaly stored in the last slot of a Keplerian-family state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnomalyType {
    #[default]
    True,
    Mean,
    Eccentric,
    Hyperbolic,
}

impl AnomalyType {
    pub const ALL: [AnomalyType; 4] = [
        AnomalyType::True,
        AnomalyType::Mean,
        AnomalyType::Eccentric,
        AnomalyType::Hyperbolic,
    ];

    /// Two-letter script name ("TA", "MA", "EA", "HA").
    pub fn short_text(&self) -> &'static str {
        match self {
            AnomalyType::True => "TA",
            AnomalyType::Mean => "MA",
            AnomalyType::Eccentric => "EA",
            AnomalyType::Hyperbolic => "HA",
        }
    }

    /// Long script name ("True Anomaly", …).
    pub fn long_text(&self) -> &'static str {
        match self {
            AnomalyType::True => "True Anomaly",
            AnomalyType::Mean => "Mean Anomaly",
            AnomalyType::Eccentric => "Eccentric Anomaly",
            AnomalyType::Hyperbolic => "Hyperbolic Anomaly",
        }
    }

    /// Whether `text` names an anomaly type, in either short or long form.
    pub fn is_valid(text: &str) -> bool {
        text.parse::<AnomalyType>().is_ok()
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_text())
    }
}

impl FromStr for AnomalyType {
    type Err = ConversionError;

    /// Long names are tried first, then the two-letter names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnomalyType::ALL
            .into_iter()
            .find(|a| a.long_text() == s)
            .or_else(|| AnomalyType::ALL.into_iter().find(|a| a.short_text() == s))
            .ok_or_else(|| {
                ConversionError::UnknownAnomalyType(
                    s.to_string(),
                    AnomalyType::ALL
                        .iter()
                        .flat_map(|a| [a.short_text(), a.long_text()])
                        .map(|name| format!("\"{name}\""))
                        .join(", "),
                )
            })
    }
}
