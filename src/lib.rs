//! # orbconv
//!
//! Conversion of a six-element spacecraft state between fourteen equivalent
//! representations: Cartesian, Keplerian, modified Keplerian, SphericalAZFPA,
//! SphericalRADEC, equinoctial, modified and alternate equinoctial, Delaunay,
//! planetodetic, incoming and outgoing asymptote, and Brouwer-Lyddane mean
//! elements (short-period and long-period theories).
//!
//! ## Layout
//!
//! - [`kepler`] – true, mean, eccentric and hyperbolic anomalies, Kepler's equation.
//! - [`orb_elem`] – Cartesian ⇄ Keplerian and the shared vector algebra.
//! - [`orbit_type`] – the alternate representations.
//! - [`brouwer`] – Brouwer-Lyddane mean ⇄ osculating elements.
//! - [`conversion`] – dispatch between any two representations.
//! - [`jacobian`] – 6×6 partial derivatives between representations.
//! - [`validation`] – per-element value checks.
//! - [`state_converter`] – configured engine handle.
//!
//! Fatal problems are returned as [`conversion_errors::ConversionError`];
//! recoverable ones (input normalization, stalled Brouwer-Lyddane refinement)
//! are reported once per category on a caller-owned
//! [`diagnostics::Diagnostics`] sink through the `log` facade.
//!
//! ```rust
//! use orbconv::central_body::CentralBody;
//! use orbconv::constants::State6;
//! use orbconv::state_converter::StateConverter;
//! use orbconv::state_type::StateType;
//!
//! let converter = StateConverter::new(CentralBody::earth());
//! let kep = State6::new(24396.0, 0.73, 7.0, 10.0, 5.0, 0.0);
//! let cart = converter.convert(&kep, StateType::Keplerian, StateType::Cartesian).unwrap();
//! let back = converter.convert(&cart, StateType::Cartesian, StateType::Keplerian).unwrap();
//! assert!((back[0] - 24396.0).abs() < 1e-6);
//! ```

pub mod brouwer;
pub mod central_body;
pub mod constants;
pub mod conversion;
pub mod conversion_errors;
pub mod diagnostics;
pub mod jacobian;
pub mod kepler;
pub mod orb_elem;
pub mod orbit_type;
pub mod state_converter;
pub mod state_type;
pub mod validation;
