//! # Constants and type definitions for orbconv
//!
//! This module centralizes the **unit conversions**, **numerical tolerances** and
//! **common type aliases** used throughout the conversion engine.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians)
//! - Singularity and convergence tolerances shared by every converter
//! - Earth parameters used by the Brouwer-Lyddane mean-element theory
//! - Core type aliases (angles, distances, six-element state vectors)
//!
//! Element vectors carry their angles in **degrees**; the anomaly helpers in
//! [`crate::kepler`] work in **radians**.

use nalgebra::{Matrix6, Vector6};

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Tolerances
// -------------------------------------------------------------------------------------------------

/// Minimum magnitude for position and velocity vectors (km, km/s)
pub const ORBIT_TOL: f64 = 1.0e-10;

/// Singularity floor on the radius of periapsis (km), i.e. one meter
pub const SINGULAR_TOL: f64 = 1.0e-3;

/// Distance of the eccentricity from one under which the orbit is parabolic
pub const PARABOLIC_TOL: f64 = 1.0e-7;

/// Smallest admissible gravitational parameter (km³/s²)
pub const MU_TOL: f64 = 1.0e-15;

/// Margin kept between equinoctial `h`, `k` and the unit circle
pub const EQUINOCTIAL_TOL: f64 = 1.0e-5;

/// Threshold under which a quantity is considered numerically null
pub const INFINITE_TOL: f64 = 1.0e-30;

/// Circular / equatorial classification threshold of the classical elements
pub const KEP_TOL: f64 = 1.0e-11;

/// Default convergence tolerance of the mean → true anomaly solver (rad)
pub const KEPLER_TOL: f64 = 1.0e-8;

/// Iteration cap of the Kepler equation solvers
pub const KEPLER_MAX_ITER: usize = 1000;

/// Convergence tolerance of the planetodetic latitude iteration (rad)
pub const LATITUDE_TOL: f64 = 1.0e-13;

/// Relative Cartesian round-trip tolerance of the Brouwer-Lyddane refinement
pub const BROUWER_TOL: f64 = 1.0e-8;

/// Iteration cap of the Brouwer-Lyddane refinement
pub const BROUWER_MAX_ITER: usize = 75;

// -------------------------------------------------------------------------------------------------
// Earth parameters (Brouwer-Lyddane theory)
// -------------------------------------------------------------------------------------------------

/// Earth gravitational parameter (km³/s²)
pub const EARTH_MU: f64 = 398_600.4415;

/// Earth equatorial radius (km)
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.1363;

/// Earth flattening coefficient
pub const EARTH_FLATTENING: f64 = 0.003_352_70;

/// Earth zonal harmonics J2..J5 (unnormalized)
pub const EARTH_J2: f64 = 1.082_626_925_638_815e-3;
pub const EARTH_J3: f64 = -0.253_230_781_819_177_4e-5;
pub const EARTH_J4: f64 = -0.162_042_999_000_000_0e-5;
pub const EARTH_J5: f64 = -0.227_071_104_392_034_3e-6;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;

/// Six-element orbital state; its meaning is given by the accompanying
/// [`StateType`](crate::state_type::StateType) tag.
pub type State6 = Vector6<f64>;

/// 6×6 partial-derivative matrix between two representations.
pub type Jacobian6 = Matrix6<f64>;
