//! # Orbital state representations
//!
//! One submodule per family of six-element representations, each exposing a
//! pair of pure conversion functions to and from its natural neighbour
//! (Cartesian state, Keplerian elements or equinoctial elements):
//!
//! - [`keplerian_element`] – Typed Keplerian elements and their sign normalization.
//! - [`modified_keplerian`] – `(r_p, r_a, i, Ω, ω, ν)` ⇄ Keplerian.
//! - [`spherical_element`] – SphericalAZFPA and SphericalRADEC ⇄ Cartesian.
//! - [`equinoctial_element`] – Equinoctial ⇄ Cartesian, alternate equinoctial ⇄ equinoctial.
//! - [`modified_equinoctial`] – Modified equinoctial ⇄ Cartesian.
//! - [`delaunay_element`] – Delaunay ⇄ Keplerian.
//! - [`planetodetic`] – Planetodetic ⇄ body-fixed Cartesian.
//! - [`asymptote`] – Incoming/outgoing asymptote ⇄ Cartesian.
//!
//! The classical Cartesian ⇄ Keplerian pair lives in [`crate::orb_elem`] and the
//! Brouwer-Lyddane mean elements in [`crate::brouwer`]. Chaining between any two
//! representations is the job of [`crate::conversion`].
//!
//! ## Typical workflow
//!
//! ```rust
//! use orbconv::constants::{State6, EARTH_MU};
//! use orbconv::orbit_type::equinoctial_element::{cartesian_to_equinoctial, equinoctial_to_alternate};
//!
//! let cartesian = State6::new(7000.0, 0.0, 0.0, 0.0, 6.5, 3.0);
//! let equinoctial = cartesian_to_equinoctial(EARTH_MU, &cartesian).unwrap();
//! let alternate = equinoctial_to_alternate(&equinoctial).unwrap();
//! assert!(alternate[3].hypot(alternate[4]) < 1.0);
//! ```

/// Incoming and outgoing hyperbolic asymptote elements.
pub mod asymptote;

/// Delaunay action-angle variables.
pub mod delaunay_element;

/// Equinoctial and alternate equinoctial elements.
pub mod equinoctial_element;

/// Classical Keplerian elements structure and utilities.
pub mod keplerian_element;

/// Modified equinoctial elements.
pub mod modified_equinoctial;

/// Modified Keplerian elements.
pub mod modified_keplerian;

/// Planetodetic (geodetic latitude) representation.
pub mod planetodetic;

/// Spherical AZFPA and RADEC representations.
pub mod spherical_element;
