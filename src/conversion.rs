//! # Dispatch router
//!
//! [`convert`] moves a state between any two [`StateType`]s. The routing rule is
//! explicit:
//!
//! 1. identical tags return the input unchanged;
//! 2. a pair listed in the shortcut table is converted by its closed-form
//!    converter (Keplerian ⇄ ModifiedKeplerian, Keplerian ⇄ Delaunay,
//!    Equinoctial ⇄ AlternateEquinoctial);
//! 3. every other pair goes `from → Cartesian → to`.
//!
//! The physical and numerical settings of a call (central body, flavour of the
//! Keplerian anomaly slot, diagnostics sink) travel together in a
//! [`ConversionContext`].
//!
//! ```rust
//! use orbconv::central_body::CentralBody;
//! use orbconv::constants::State6;
//! use orbconv::conversion::{convert, ConversionContext};
//! use orbconv::diagnostics::Diagnostics;
//! use orbconv::state_type::{AnomalyType, StateType};
//!
//! let earth = CentralBody::earth();
//! let diagnostics = Diagnostics::new();
//! let ctx = ConversionContext::new(&earth, AnomalyType::True, &diagnostics);
//!
//! let kep = State6::new(24396.0, 0.73, 7.0, 10.0, 5.0, 0.0);
//! let eq = convert(&kep, StateType::Keplerian, StateType::Equinoctial, &ctx).unwrap();
//! assert!((eq[0] - 24396.0).abs() < 1e-6);
//! ```

use crate::central_body::CentralBody;
use crate::constants::{State6, MU_TOL};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::Diagnostics;
use crate::brouwer::{brouwer_mean_to_cartesian, cartesian_to_brouwer_mean, BrouwerTheory};
use crate::orb_elem::{cartesian_to_keplerian, keplerian_to_cartesian, with_anomaly};
use crate::orbit_type::asymptote::{asymptote_to_cartesian, cartesian_to_asymptote, AsymptoteDirection};
use crate::orbit_type::delaunay_element::{delaunay_to_keplerian, keplerian_to_delaunay};
use crate::orbit_type::equinoctial_element::{
    alternate_to_equinoctial, cartesian_to_equinoctial, equinoctial_to_alternate, equinoctial_to_cartesian,
};
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::orbit_type::modified_equinoctial::{cartesian_to_modified_equinoctial, modified_equinoctial_to_cartesian};
use crate::orbit_type::modified_keplerian::{keplerian_to_modified_keplerian, modified_keplerian_to_keplerian};
use crate::orbit_type::planetodetic::{cartesian_to_planetodetic, planetodetic_to_cartesian};
use crate::orbit_type::spherical_element::{
    cartesian_to_spherical_azfpa, cartesian_to_spherical_radec, spherical_azfpa_to_cartesian,
    spherical_radec_to_cartesian,
};
use crate::state_type::{AnomalyType, StateType};

/// Settings shared by every leg of a conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    /// Body the state is expressed about.
    pub body: &'a CentralBody,
    /// Flavour of the anomaly slot of Keplerian and ModifiedKeplerian states,
    /// on input and on output.
    pub anomaly_type: AnomalyType,
    pub diagnostics: &'a Diagnostics,
}

impl<'a> ConversionContext<'a> {
    pub fn new(body: &'a CentralBody, anomaly_type: AnomalyType, diagnostics: &'a Diagnostics) -> Self {
        Self {
            body,
            anomaly_type,
            diagnostics,
        }
    }
}

type Converter = fn(&State6, &ConversionContext) -> Result<State6, ConversionError>;

/// Closed-form conversions that do not go through the Cartesian state.
const SHORTCUTS: [(StateType, StateType, Converter); 6] = [
    (StateType::Keplerian, StateType::ModifiedKeplerian, keplerian_to_modified),
    (StateType::ModifiedKeplerian, StateType::Keplerian, modified_to_keplerian),
    (StateType::Keplerian, StateType::Delaunay, keplerian_to_delaunay_elements),
    (StateType::Delaunay, StateType::Keplerian, delaunay_to_keplerian_elements),
    (StateType::Equinoctial, StateType::AlternateEquinoctial, equinoctial_to_alternate_elements),
    (StateType::AlternateEquinoctial, StateType::Equinoctial, alternate_to_equinoctial_elements),
];

fn keplerian_to_modified(state: &State6, ctx: &ConversionContext) -> Result<State6, ConversionError> {
    keplerian_to_modified_keplerian(state, ctx.diagnostics)
}

fn modified_to_keplerian(state: &State6, _ctx: &ConversionContext) -> Result<State6, ConversionError> {
    modified_keplerian_to_keplerian(state)
}

fn keplerian_to_delaunay_elements(state: &State6, ctx: &ConversionContext) -> Result<State6, ConversionError> {
    let kep = State6::from(KeplerianElements::from(state).normalized(ctx.diagnostics));
    let kep_ta = with_anomaly(&kep, ctx.anomaly_type, AnomalyType::True)?;
    keplerian_to_delaunay(ctx.body.mu, &kep_ta, ctx.diagnostics)
}

fn delaunay_to_keplerian_elements(state: &State6, ctx: &ConversionContext) -> Result<State6, ConversionError> {
    let kep_ta = delaunay_to_keplerian(ctx.body.mu, state)?;
    with_anomaly(&kep_ta, AnomalyType::True, ctx.anomaly_type)
}

fn equinoctial_to_alternate_elements(state: &State6, _ctx: &ConversionContext) -> Result<State6, ConversionError> {
    equinoctial_to_alternate(state)
}

fn alternate_to_equinoctial_elements(state: &State6, _ctx: &ConversionContext) -> Result<State6, ConversionError> {
    alternate_to_equinoctial(state)
}

fn shortcut(from: StateType, to: StateType) -> Option<Converter> {
    SHORTCUTS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, converter)| *converter)
}

/// Convert `state` from the representation `from` to the representation `to`.
///
/// Arguments
/// ---------
/// * `state` – Six elements laid out as `from` prescribes.
/// * `from`, `to` – Representation tags.
/// * `ctx` – Central body, anomaly flavour and diagnostics sink.
///
/// Return
/// ------
/// * The six elements of the `to` representation.
///
/// Errors
/// ------
/// * [`ConversionError::InvalidGravitationalParameter`] if either tag needs a
///   central body and its gravitational parameter is too small.
/// * Any error raised by the converters along the route.
///
/// See also
/// --------
/// * [`convert_by_name`] – Same, with tags given by their script names.
pub fn convert(
    state: &State6,
    from: StateType,
    to: StateType,
    ctx: &ConversionContext,
) -> Result<State6, ConversionError> {
    if from == to {
        return Ok(*state);
    }
    if (from.requires_central_body() || to.requires_central_body()) && ctx.body.mu < MU_TOL {
        return Err(ConversionError::InvalidGravitationalParameter(ctx.body.mu));
    }

    if let Some(converter) = shortcut(from, to) {
        log::debug!("converting {from} -> {to} by closed form");
        return converter(state, ctx);
    }

    log::debug!("converting {from} -> Cartesian -> {to}");
    let cartesian = to_cartesian(state, from, ctx)?;
    from_cartesian(&cartesian, to, ctx)
}

/// [`convert`] with the representation tags given by their script names
/// (`"Keplerian"`, `"BrouwerMeanLong"`, …).
///
/// Errors
/// ------
/// * [`ConversionError::UnsupportedConversion`] naming both tags if either is unknown.
pub fn convert_by_name(
    state: &State6,
    from: &str,
    to: &str,
    ctx: &ConversionContext,
) -> Result<State6, ConversionError> {
    match (from.parse::<StateType>(), to.parse::<StateType>()) {
        (Ok(from_type), Ok(to_type)) => convert(state, from_type, to_type, ctx),
        _ => Err(ConversionError::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Cartesian state of `state`, expressed in the representation `from`.
pub fn to_cartesian(state: &State6, from: StateType, ctx: &ConversionContext) -> Result<State6, ConversionError> {
    let mu = ctx.body.mu;
    let diag = ctx.diagnostics;
    match from {
        StateType::Cartesian => Ok(*state),
        StateType::Keplerian => keplerian_to_cartesian(mu, state, ctx.anomaly_type, diag),
        StateType::ModifiedKeplerian => {
            let kep = modified_keplerian_to_keplerian(state)?;
            keplerian_to_cartesian(mu, &kep, ctx.anomaly_type, diag)
        }
        StateType::SphericalAzFpa => Ok(spherical_azfpa_to_cartesian(state)),
        StateType::SphericalRaDec => Ok(spherical_radec_to_cartesian(state)),
        StateType::Equinoctial => equinoctial_to_cartesian(mu, state),
        StateType::ModifiedEquinoctial => modified_equinoctial_to_cartesian(mu, state),
        StateType::AlternateEquinoctial => equinoctial_to_cartesian(mu, &alternate_to_equinoctial(state)?),
        StateType::Delaunay => {
            let kep = delaunay_to_keplerian(mu, state)?;
            keplerian_to_cartesian(mu, &kep, AnomalyType::True, diag)
        }
        StateType::Planetodetic => planetodetic_to_cartesian(state, ctx.body),
        StateType::OutgoingAsymptote => asymptote_to_cartesian(mu, state, AsymptoteDirection::Outgoing, diag),
        StateType::IncomingAsymptote => asymptote_to_cartesian(mu, state, AsymptoteDirection::Incoming, diag),
        StateType::BrouwerMeanShort => brouwer_mean_to_cartesian(BrouwerTheory::ShortPeriod, mu, state, diag),
        StateType::BrouwerMeanLong => brouwer_mean_to_cartesian(BrouwerTheory::LongPeriod, mu, state, diag),
    }
}

/// Elements of the representation `to` of the Cartesian state `cartesian`.
pub fn from_cartesian(cartesian: &State6, to: StateType, ctx: &ConversionContext) -> Result<State6, ConversionError> {
    let mu = ctx.body.mu;
    let diag = ctx.diagnostics;
    match to {
        StateType::Cartesian => Ok(*cartesian),
        StateType::Keplerian => cartesian_to_keplerian(mu, cartesian, ctx.anomaly_type),
        StateType::ModifiedKeplerian => {
            let kep = cartesian_to_keplerian(mu, cartesian, ctx.anomaly_type)?;
            keplerian_to_modified_keplerian(&kep, diag)
        }
        StateType::SphericalAzFpa => cartesian_to_spherical_azfpa(cartesian),
        StateType::SphericalRaDec => cartesian_to_spherical_radec(cartesian),
        StateType::Equinoctial => cartesian_to_equinoctial(mu, cartesian),
        StateType::ModifiedEquinoctial => cartesian_to_modified_equinoctial(mu, cartesian),
        StateType::AlternateEquinoctial => equinoctial_to_alternate(&cartesian_to_equinoctial(mu, cartesian)?),
        StateType::Delaunay => {
            let kep = cartesian_to_keplerian(mu, cartesian, AnomalyType::True)?;
            keplerian_to_delaunay(mu, &kep, diag)
        }
        StateType::Planetodetic => cartesian_to_planetodetic(cartesian, ctx.body),
        StateType::OutgoingAsymptote => cartesian_to_asymptote(mu, cartesian, AsymptoteDirection::Outgoing, diag),
        StateType::IncomingAsymptote => cartesian_to_asymptote(mu, cartesian, AsymptoteDirection::Incoming, diag),
        StateType::BrouwerMeanShort => cartesian_to_brouwer_mean(BrouwerTheory::ShortPeriod, mu, cartesian, diag),
        StateType::BrouwerMeanLong => cartesian_to_brouwer_mean(BrouwerTheory::LongPeriod, mu, cartesian, diag),
    }
}
