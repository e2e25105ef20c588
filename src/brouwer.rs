//! # Brouwer-Lyddane mean elements
//!
//! Analytic J2 (short-period theory) and J2..J5 (short and long-period theory)
//! transformations between Brouwer-Lyddane mean Keplerian elements and
//! osculating Keplerian elements, for Earth orbits only.
//!
//! Mean elements are stored as `[a, e, i, Ω, ω, M]` (km, degrees) and are
//! restricted to `0 ≤ e ≤ 0.99`, a radius of periapsis above 3000 km and
//! `i ≤ 180°`. Orbits with `i > 175°` are handled by reflecting them to
//! `(180° − i, −Ω)` and back.
//!
//! ## Osculating → mean
//!
//! There is no closed-form inverse. [`cartesian_to_brouwer_mean`] starts from
//! the osculating elements and applies the fixed-point correction
//! `mean ← mean + (target − osc(mean))` in the non-singular form
//! `(a, e·sin(ω+Ω), e·cos(ω+Ω), sin(i/2)·sin Ω, sin(i/2)·cos Ω, Ω+ω+M)`, until the
//! relative Cartesian round-trip error drops below [`BROUWER_TOL`]. A stalled
//! or exhausted iteration is not an error: the best iterate is returned and a
//! one-time advisory is emitted.
//!
//! ## Critical inclination
//!
//! The long-period terms contain `1 − 5cos²i` in their denominators. Near
//! 63.4° and 116.6° those terms are dropped and a
//! [`Advisory::CriticalInclination`] advisory is emitted.

use std::f64::consts::PI;

use nalgebra::Vector6;

use crate::constants::{
    State6, BROUWER_MAX_ITER, BROUWER_TOL, DEGRAD, DPI, EARTH_EQUATORIAL_RADIUS, EARTH_J2,
    EARTH_J3, EARTH_J4, EARTH_J5, EARTH_MU, RADEG,
};
use crate::conversion_errors::ConversionError;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::kepler::{mean_to_true_anomaly, true_to_mean_anomaly};
use crate::orb_elem::{asin_clamped, cartesian_to_keplerian, keplerian_to_cartesian};
use crate::state_type::{AnomalyType, StateType};

/// Mean eccentricity upper bound.
const MAX_ECCENTRICITY: f64 = 0.99;
/// Radius of periapsis floor (km).
const MIN_PERIAPSIS: f64 = 3000.0;
/// Below this radius of periapsis (km) the orbit dips inside the Earth.
const EARTH_SURFACE_PERIAPSIS: f64 = 6378.0;
/// Inclinations above this value (deg) are reflected.
const REFLECTION_INCLINATION: f64 = 175.0;

/// Which Brouwer-Lyddane theory to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrouwerTheory {
    /// J2 short-period terms only (`BrouwerMeanShort`).
    ShortPeriod,
    /// J2..J5 short and long-period terms (`BrouwerMeanLong`).
    LongPeriod,
}

impl BrouwerTheory {
    pub fn state_type(self) -> StateType {
        match self {
            BrouwerTheory::ShortPeriod => StateType::BrouwerMeanShort,
            BrouwerTheory::LongPeriod => StateType::BrouwerMeanLong,
        }
    }

    fn not_converging(self) -> Advisory {
        match self {
            BrouwerTheory::ShortPeriod => Advisory::BrouwerNotConvergingShort,
            BrouwerTheory::LongPeriod => Advisory::BrouwerNotConvergingLong,
        }
    }

    fn possible_inaccuracy(self) -> Advisory {
        match self {
            BrouwerTheory::ShortPeriod => Advisory::PossibleInaccuracyShort,
            BrouwerTheory::LongPeriod => Advisory::PossibleInaccuracyLong,
        }
    }

    /// Osculating Keplerian elements (mean anomaly) of the mean state `mean`.
    pub fn to_osculating(self, mu: f64, mean: &State6, diagnostics: &Diagnostics) -> Result<State6, ConversionError> {
        match self {
            BrouwerTheory::ShortPeriod => brouwer_mean_short_to_osculating(mu, mean, diagnostics),
            BrouwerTheory::LongPeriod => brouwer_mean_long_to_osculating(mu, mean, diagnostics),
        }
    }
}

fn check_earth(mu: f64, theory: BrouwerTheory) -> Result<(), ConversionError> {
    if (mu - EARTH_MU).abs() > 1.0 {
        return Err(ConversionError::BrouwerDomain(format!(
            "{} is applicable only to the Earth (mu = {mu})",
            theory.state_type()
        )));
    }
    Ok(())
}

fn check_periapsis(
    theory: BrouwerTheory,
    rad_per: f64,
    diagnostics: &Diagnostics,
) -> Result<(), ConversionError> {
    if rad_per < MIN_PERIAPSIS {
        return Err(ConversionError::BrouwerDomain(format!(
            "{} is applicable only if RadPer ({rad_per}) is larger than 3000 km",
            theory.state_type()
        )));
    }
    if rad_per < EARTH_SURFACE_PERIAPSIS {
        diagnostics.warn_once(
            theory.possible_inaccuracy(),
            &format!(
                "Warning: For {}, when RadPer < 6378km, there is a possible inaccuracy due to singularity related with inside-of-earth orbit.",
                theory.state_type()
            ),
        );
    }
    Ok(())
}

/// Mean angles after the negative-eccentricity flip and the 175° reflection.
struct PreparedMean {
    sma: f64,
    ecc: f64,
    inc: f64,
    raan: f64,
    aop: f64,
    ma: f64,
    reflected: bool,
}

fn prepare_mean(
    theory: BrouwerTheory,
    mean: &State6,
    diagnostics: &Diagnostics,
) -> Result<PreparedMean, ConversionError> {
    let mut inc = mean[2] * RADEG;
    if !(0.0..=PI).contains(&inc) {
        return Err(ConversionError::BrouwerDomain(format!(
            "{} is applicable only if 0 <= mean INC ({}) <= 180 deg",
            theory.state_type(),
            mean[2]
        )));
    }
    check_periapsis(theory, mean[0] * (1.0 - mean[1]), diagnostics)?;

    let mut ecc = mean[1];
    let mut aop = mean[4] * RADEG;
    let mut ma = mean[5] * RADEG;
    if ecc < 0.0 {
        ecc = -ecc;
        ma -= PI;
        aop += PI;
        diagnostics.warn_once(
            Advisory::BrouwerSmallEccentricity,
            "Warning: Because eccentricity is smaller than 0.0, the current apoapsis will be taken to be new periapsis.",
        );
    }
    if ecc > MAX_ECCENTRICITY {
        return Err(ConversionError::BrouwerDomain(format!(
            "{} is applicable only if mean ECC ({ecc}) is smaller than 0.99",
            theory.state_type()
        )));
    }

    let mut raan = mean[3] * RADEG;
    let reflected = inc > REFLECTION_INCLINATION * RADEG;
    if reflected {
        inc = PI - inc;
        raan = -raan;
    }

    Ok(PreparedMean {
        sma: mean[0] / EARTH_EQUATORIAL_RADIUS,
        ecc,
        inc,
        raan: raan.rem_euclid(DPI),
        aop: aop.rem_euclid(DPI),
        ma: ma.rem_euclid(DPI),
        reflected,
    })
}

/// Assemble osculating elements (radians, normalized radii) into a state in km/degrees.
fn osculating_state(sma: f64, ecc: f64, inc: f64, raan: f64, aop: f64, ma: f64, reflected: bool) -> State6 {
    let mut kep = State6::new(
        sma * EARTH_EQUATORIAL_RADIUS,
        ecc,
        inc * DEGRAD,
        raan.rem_euclid(DPI) * DEGRAD,
        aop.rem_euclid(DPI) * DEGRAD,
        ma.rem_euclid(DPI) * DEGRAD,
    );
    if reflected {
        kep[2] = 180.0 - kep[2];
        kep[3] = (360.0 - kep[3]).rem_euclid(360.0);
    }
    kep
}

/// Inclination and node from the `sin(i/2)·(sin Ω, cos Ω)` components.
fn node_from_half_angle(sin_half_sin: f64, sin_half_cos: f64) -> (f64, f64) {
    let inc = 2.0 * asin_clamped(sin_half_sin.hypot(sin_half_cos));
    let raan = if inc == 0.0 || inc == PI {
        0.0
    } else {
        sin_half_sin.atan2(sin_half_cos).rem_euclid(DPI)
    };
    (inc, raan)
}

/// Brouwer-Lyddane mean elements (short-period theory) to osculating Keplerian
/// elements with a mean anomaly.
///
/// Arguments
/// ---------
/// * `mu` – Must be the Earth's gravitational parameter (within 1 km³/s²).
/// * `mean` – `[a, e, i, Ω, ω, M]`, km and degrees.
/// * `diagnostics` – Receives the low-periapsis and negative-eccentricity advisories.
///
/// Errors
/// ------
/// * [`ConversionError::BrouwerDomain`] for a non-Earth `mu`, `e > 0.99`, a
///   radius of periapsis below 3000 km or an inclination outside `[0°, 180°]`.
pub fn brouwer_mean_short_to_osculating(
    mu: f64,
    mean: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    let theory = BrouwerTheory::ShortPeriod;
    check_earth(mu, theory)?;
    let m = prepare_mean(theory, mean, diagnostics)?;
    let (smap, eccp, incp, raanp, aopp, map) = (m.sma, m.ecc, m.inc, m.raan, m.aop, m.ma);

    let eta = (1.0 - eccp * eccp).sqrt();
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let eta6 = eta3 * eta3;
    let theta = incp.cos();
    let theta2 = theta * theta;
    let p = smap * eta2;
    let k2 = 0.5 * EARTH_J2;
    let gm2 = k2 / (smap * smap);
    let gm2p = gm2 / (eta2 * eta2);

    let tap = mean_to_true_anomaly(map, eccp, BROUWER_TOL)?;
    let (sin_ta, cos_ta) = tap.sin_cos();
    let rp = p / (1.0 + eccp * cos_ta);
    let adr = smap / rp;
    let adr2 = adr * adr;
    let adr3 = adr2 * adr;
    let cos_ta2 = cos_ta * cos_ta;
    let cos_ta3 = cos_ta2 * cos_ta;
    let equation_of_center = tap - map + eccp * sin_ta;

    let sma1 = smap
        + smap
            * gm2
            * ((adr3 - 1.0 / eta3) * (-1.0 + 3.0 * theta2)
                + 3.0 * (1.0 - theta2) * adr3 * (2.0 * aopp + 2.0 * tap).cos());

    let decc = eta2 / 2.0
        * (3.0 / eta6
            * gm2
            * (1.0 - theta2)
            * (2.0 * aopp + 2.0 * tap).cos()
            * (3.0 * eccp * cos_ta2 + 3.0 * cos_ta + eccp * eccp * cos_ta3 + eccp)
            - gm2p
                * (1.0 - theta2)
                * (3.0 * (2.0 * aopp + tap).cos() + (3.0 * tap + 2.0 * aopp).cos())
            + (3.0 * theta2 - 1.0) * gm2 / eta6
                * (eccp * eta
                    + eccp / (1.0 + eta)
                    + 3.0 * eccp * cos_ta2
                    + 3.0 * cos_ta
                    + eccp * eccp * cos_ta3));

    let dinc = gm2p / 2.0
        * theta
        * incp.sin()
        * (3.0 * (2.0 * aopp + 2.0 * tap).cos()
            + 3.0 * eccp * (2.0 * aopp + tap).cos()
            + eccp * (2.0 * aopp + 3.0 * tap).cos());

    let draan = -gm2p / 2.0
        * theta
        * (6.0 * equation_of_center
            - 3.0 * (2.0 * aopp + 2.0 * tap).sin()
            - 3.0 * eccp * (2.0 * aopp + tap).sin()
            - eccp * (2.0 * aopp + 3.0 * tap).sin());

    let lgh = raanp
        + aopp
        + map
        + gm2p / 4.0
            * (6.0 * (-1.0 - 2.0 * theta + 5.0 * theta2) * equation_of_center
                + (3.0 + 2.0 * theta - 5.0 * theta2)
                    * (3.0 * (2.0 * aopp + 2.0 * tap).sin()
                        + 3.0 * eccp * (2.0 * aopp + tap).sin()
                        + eccp * (2.0 * aopp + 3.0 * tap).sin()))
        + gm2p / 4.0 * eta2 / (eta + 1.0)
            * eccp
            * (3.0
                * (1.0 - theta2)
                * ((3.0 * tap + 2.0 * aopp).sin() * (1.0 / 3.0 + adr2 * eta2 + adr)
                    + (2.0 * aopp + tap).sin() * (1.0 - adr2 * eta2 - adr))
                + 2.0 * sin_ta * (3.0 * theta2 - 1.0) * (1.0 + adr2 * eta2 + adr));

    let eccpdl = -eta3 / 4.0
        * gm2p
        * (2.0 * (-1.0 + 3.0 * theta2) * (adr2 * eta2 + adr + 1.0) * sin_ta
            + 3.0
                * (1.0 - theta2)
                * ((-adr2 * eta2 - adr + 1.0) * (2.0 * aopp + tap).sin()
                    + (adr2 * eta2 + adr + 1.0 / 3.0) * (2.0 * aopp + 3.0 * tap).sin()));

    let (sin_m, cos_m) = map.sin_cos();
    let ecosl = (eccp + decc) * cos_m - eccpdl * sin_m;
    let esinl = (eccp + decc) * sin_m + eccpdl * cos_m;
    let ecc1 = ecosl.hypot(esinl);
    let ma1 = if ecc1 < 1.0e-11 {
        0.0
    } else {
        esinl.atan2(ecosl).rem_euclid(DPI)
    };

    let (sin_half, cos_half) = (0.5 * incp).sin_cos();
    let (sin_raan, cos_raan) = raanp.sin_cos();
    let node_term = 0.5 * incp.sin() / cos_half * draan;
    let half_term = sin_half + cos_half * 0.5 * dinc;
    let (inc1, raan1) = node_from_half_angle(
        half_term * sin_raan + node_term * cos_raan,
        half_term * cos_raan - node_term * sin_raan,
    );
    let aop1 = lgh - ma1 - raan1;

    Ok(osculating_state(sma1, ecc1, inc1, raan1, aop1, ma1, m.reflected))
}

/// Brouwer-Lyddane mean elements (short and long-period theory) to osculating
/// Keplerian elements with a mean anomaly.
///
/// Near the critical inclinations the long-period corrections are dropped and
/// an [`Advisory::CriticalInclination`] advisory is emitted.
///
/// Errors
/// ------
/// * [`ConversionError::BrouwerDomain`], as for [`brouwer_mean_short_to_osculating`].
pub fn brouwer_mean_long_to_osculating(
    mu: f64,
    mean: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    let theory = BrouwerTheory::LongPeriod;
    check_earth(mu, theory)?;
    let m = prepare_mean(theory, mean, diagnostics)?;
    let (smadp, eccdp, incdp, raandp, aopdp, madp) = (m.sma, m.ecc, m.inc, m.raan, m.aop, m.ma);

    let bk2 = 0.5 * EARTH_J2;
    let bk3 = -EARTH_J3;
    let bk4 = -(3.0 / 8.0) * EARTH_J4;
    let bk5 = -EARTH_J5;

    let eccdp2 = eccdp * eccdp;
    let cn2 = 1.0 - eccdp2;
    let cn = cn2.sqrt();
    let gm2 = bk2 / smadp.powi(2);
    let gmp2 = gm2 / (cn2 * cn2);
    let gm3 = bk3 / smadp.powi(3);
    let gmp3 = gm3 / (cn2 * cn2 * cn2);
    let gm4 = bk4 / smadp.powi(4);
    let gmp4 = gm4 / cn.powi(8);
    let gm5 = bk5 / smadp.powi(5);
    let gmp5 = gm5 / cn.powi(10);
    let g3dg2 = gmp3 / gmp2;
    let g4dg2 = gmp4 / gmp2;
    let g5dg2 = gmp5 / gmp2;

    let theta = incdp.cos();
    let theta2 = theta * theta;
    let theta4 = theta2 * theta2;
    let sin_i = incdp.sin();
    let (sin_i2, cos_i2) = (incdp / 2.0).sin_cos();
    let tan_i2 = (incdp / 2.0).tan();
    let (sin_madp, cos_madp) = madp.sin_cos();
    let (sin_raandp, cos_raandp) = raandp.sin_cos();

    let tadp = mean_to_true_anomaly(madp, eccdp, 1.0e-12)?;
    let rp = smadp * (1.0 - eccdp2) / (1.0 + eccdp * tadp.cos());
    let adr = smadp / rp;
    let adr2 = adr * adr;
    let adr3 = adr2 * adr;
    let (sinta, costa) = tadp.sin_cos();
    let costa2 = costa * costa;

    let cs2gta = (2.0 * aopdp + 2.0 * tadp).cos();
    let sn2gta = (2.0 * aopdp + 2.0 * tadp).sin();
    let snf2gd = (2.0 * aopdp + tadp).sin();
    let csf2gd = (2.0 * aopdp + tadp).cos();
    let sn2gd = (2.0 * aopdp).sin();
    let cs2gd = (2.0 * aopdp).cos();
    let sin3gd = (3.0 * aopdp).sin();
    let cs3gd = (3.0 * aopdp).cos();
    let sn3fgd = (3.0 * tadp + 2.0 * aopdp).sin();
    let cs3fgd = (3.0 * tadp + 2.0 * aopdp).cos();
    let (sin_gd, cos_gd) = aopdp.sin_cos();

    // (1 − 5cos²i)⁻² · 25cos⁵i · γ₂' e² ≥ 1e-3, tested without the division
    let critical_denom = 1.0 - 5.0 * theta2;
    let critical = 25.0 * theta4 * theta * gmp2 * eccdp2 >= 1.0e-3 * critical_denom * critical_denom;

    let (blghp, dlt1e, eccdpdl, dlt_i, sin_dh) = if critical {
        diagnostics.warn_once(
            Advisory::CriticalInclination,
            "Warning: Mean inclination is close to critical inclination 63 or 117 DEG. There is a possible inaccuracy.",
        );
        (0.0, 0.0, 0.0, 0.0, 0.0)
    } else {
        let a1 = (0.125 * gmp2 * cn2) * (1.0 - 11.0 * theta2 - 40.0 * theta4 / critical_denom);
        let a2 = ((5.0 / 12.0) * g4dg2 * cn2) * (1.0 - 8.0 * theta4 / critical_denom - 3.0 * theta2);
        let a3 = g5dg2 * (3.0 * eccdp2 + 4.0);
        let a4 = g5dg2 * (1.0 - 24.0 * theta4 / critical_denom - 9.0 * theta2);
        let a5 = a3 * (1.0 - 24.0 * theta4 / critical_denom - 9.0 * theta2);
        let a6 = 0.25 * g3dg2;
        let a10 = cn2 * sin_i;
        let a7 = a6 * a10;
        let a8p = g5dg2 * eccdp * (1.0 - 16.0 * theta4 / critical_denom - 5.0 * theta2);
        let a8 = a8p * eccdp;
        let a11 = 2.0 + eccdp2;
        let a12 = 3.0 * eccdp2 + 2.0;
        let a13 = theta2 * a12;
        let a14 = (5.0 * eccdp2 + 2.0) * (theta4 / critical_denom);
        let a17 = theta4 / (critical_denom * critical_denom);
        let a15 = eccdp2 * theta4 * theta2 / (critical_denom * critical_denom);
        let a16 = theta2 / critical_denom;
        let a18 = eccdp * sin_i;
        let a19 = a18 / (1.0 + cn);
        let a21 = eccdp * theta;
        let a22 = eccdp2 * theta;
        let a26 = 16.0 * a16 + 40.0 * a17 + 3.0;
        let a27 = a22 * 0.125 * (11.0 + 200.0 * a17 + 80.0 * a16);

        let b1 = cn * (a1 - a2)
            - ((a11 - 400.0 * a15 - 40.0 * a14 - 11.0 * a13) / 16.0
                + (11.0 + 200.0 * a17 + 80.0 * a16) * a22 / 8.0)
                * gmp2
            + ((-80.0 * a15 - 8.0 * a14 - 3.0 * a13 + a11) * (5.0 / 24.0)
                + (5.0 / 12.0) * a26 * a22)
                * g4dg2;
        let b2 = a6 * a19 * (2.0 + cn - eccdp2)
            + (5.0 / 64.0) * a5 * a19 * cn2
            - (15.0 / 32.0) * a4 * a18 * cn * cn2
            + ((5.0 / 64.0) * a5 + a6) * a21 * tan_i2
            + (9.0 * eccdp2 + 26.0) * (5.0 / 64.0) * a4 * a18
            + (15.0 / 32.0) * a3 * a21 * a26 * sin_i * (1.0 - theta);
        let b3 = (80.0 * a17 + 5.0 + 32.0 * a16)
            * a22
            * sin_i
            * (theta - 1.0)
            * (35.0 / 576.0)
            * g5dg2
            * eccdp
            - (a22 * tan_i2 + (2.0 * eccdp2 + 3.0 * (1.0 - cn2 * cn)) * sin_i) * (35.0 / 1152.0) * a8p;
        let b4 = cn * eccdp * (a1 - a2);
        let b5 = ((9.0 * eccdp2 + 4.0) * a10 * a4 * (5.0 / 64.0) + a7) * cn;
        let b6 = (35.0 / 384.0) * a8 * cn2 * cn * sin_i;
        let b7 = (cn2 * a18 / critical_denom)
            * (0.125 * gmp2 * (1.0 - 15.0 * theta2) - (1.0 - 7.0 * theta2) * g4dg2 * (5.0 / 12.0));
        let b8 = (5.0 / 64.0) * (a3 * cn2 * (1.0 - 9.0 * theta2 - 24.0 * theta4 / critical_denom))
            + a6 * cn2;
        let b9 = a8 * (35.0 / 384.0) * cn2;
        let b10 = sin_i * (a22 * a26 * g4dg2 * (5.0 / 12.0) - a27 * gmp2);
        let b11 = a21 * (a5 * (5.0 / 64.0) + a6 + a3 * a26 * (15.0 / 32.0) * sin_i * sin_i);
        let b12 = -((80.0 * a17 + 32.0 * a16 + 5.0) * (a22 * eccdp * sin_i * sin_i * (35.0 / 576.0) * g5dg2)
            + a8 * a21 * (35.0 / 1152.0));
        let b13 = eccdp * (a1 - a2);
        let b14 = a7 + (5.0 / 64.0) * a5 * a10;
        let b15 = a8 * a10 * (35.0 / 384.0);

        let blghp = (raandp + aopdp + madp + b3 * cs3gd + b1 * sn2gd + b2 * cos_gd).rem_euclid(DPI);
        let dlt1e = b14 * sin_gd + b13 * cs2gd - b15 * sin3gd;
        let eccdpdl = b4 * sn2gd - b5 * cos_gd + b6 * cs3gd
            - 0.25
                * cn2
                * cn
                * gmp2
                * (2.0 * (3.0 * theta2 - 1.0) * (adr2 * cn2 + adr + 1.0) * sinta
                    + 3.0
                        * (1.0 - theta2)
                        * ((-adr2 * cn2 - adr + 1.0) * snf2gd + (adr2 * cn2 + adr + 1.0 / 3.0) * sn3fgd));
        let dlt_i = 0.5 * theta * gmp2 * sin_i * (eccdp * cs3fgd + 3.0 * (eccdp * csf2gd + cs2gta))
            - (a21 / cn2) * (b8 * sin_gd + b7 * cs2gd - b9 * sin3gd);
        let sin_dh = (1.0 / cos_i2)
            * (0.5
                * (b12 * cs3gd + b11 * cos_gd + b10 * sn2gd
                    - (0.5
                        * gmp2
                        * theta
                        * sin_i
                        * (6.0 * (eccdp * sinta - madp + tadp)
                            - (3.0 * (sn2gta + eccdp * snf2gd) + eccdp * sn3fgd)))));
        (blghp, dlt1e, eccdpdl, dlt_i, sin_dh)
    };

    let sma = smadp
        * (1.0
            + gm2
                * ((3.0 * theta2 - 1.0) * (eccdp2 / (cn2 * cn2 * cn2)) * (cn + 1.0 / (1.0 + cn))
                    + ((3.0 * theta2 - 1.0) / (cn2 * cn2 * cn2))
                        * (eccdp * costa)
                        * (3.0 + 3.0 * eccdp * costa + eccdp2 * costa2)
                    + 3.0 * (1.0 - theta2) * adr3 * cs2gta));

    let blgh = (blghp
        + (1.0 / (cn + 1.0))
            * 0.25
            * eccdp
            * gmp2
            * cn2
            * (3.0
                * (1.0 - theta2)
                * (sn3fgd * (1.0 / 3.0 + adr2 * cn2 + adr) + snf2gd * (1.0 - (adr2 * cn2 + adr)))
                + 2.0 * sinta * (3.0 * theta2 - 1.0) * (adr2 * cn2 + adr + 1.0))
        + gmp2 * 1.5 * ((-2.0 * theta - 1.0 + 5.0 * theta2) * (eccdp * sinta + tadp - madp))
        + (3.0 + 2.0 * theta - 5.0 * theta2)
            * (gmp2 * 0.25 * (eccdp * sn3fgd + 3.0 * (sn2gta + eccdp * snf2gd))))
    .rem_euclid(DPI);

    let dlte = dlt1e
        + 0.5
            * cn2
            * (3.0 * (1.0 / (cn2 * cn2 * cn2))
                * gm2
                * (1.0 - theta2)
                * cs2gta
                * (3.0 * eccdp * costa2 + 3.0 * costa + eccdp2 * costa * costa2 + eccdp)
                - gmp2 * (1.0 - theta2) * (3.0 * csf2gd + cs3fgd)
                + (3.0 * theta2 - 1.0)
                    * gm2
                    * (1.0 / (cn2 * cn2 * cn2))
                    * (eccdp * cn
                        + eccdp / (1.0 + cn)
                        + 3.0 * eccdp * costa2
                        + 3.0 * costa
                        + eccdp2 * costa * costa2));

    let ecc = eccdpdl.hypot(eccdp + dlte);
    let half_term = 0.5 * dlt_i * cos_i2 + sin_i2;
    let inc = (2.0 * asin_clamped(sin_dh.hypot(half_term))).rem_euclid(DPI);

    let node = || (sin_dh * cos_raandp + sin_raandp * half_term).atan2(cos_raandp * half_term - sin_dh * sin_raandp);

    let (raan, aop, ma) = if ecc <= 1.0e-11 {
        if inc <= 1.0e-7 {
            (0.0, 0.0, blgh)
        } else {
            let raan = node();
            (raan, 0.0, blgh - raan)
        }
    } else {
        let ma = (eccdpdl * cos_madp + (eccdp + dlte) * sin_madp)
            .atan2((eccdp + dlte) * cos_madp - eccdpdl * sin_madp)
            .rem_euclid(DPI);
        if inc <= 1.0e-7 {
            (0.0, blgh - ma, ma)
        } else {
            let raan = node();
            (raan, blgh - ma - raan, ma)
        }
    };

    Ok(osculating_state(sma, ecc, inc, raan, aop, ma, m.reflected))
}

/// Non-singular form `(a, e·sin ϖ, e·cos ϖ, sin(i/2)·sin Ω, sin(i/2)·cos Ω, λ)`
/// of Keplerian elements with a mean anomaly, `ϖ = ω + Ω`, `λ` in degrees.
fn to_nonsingular(kep: &State6) -> Vector6<f64> {
    let lon_per = (kep[3] + kep[4]) * RADEG;
    let sin_half = (kep[2] / 2.0 * RADEG).sin();
    let raan = kep[3] * RADEG;
    Vector6::new(
        kep[0],
        kep[1] * lon_per.sin(),
        kep[1] * lon_per.cos(),
        sin_half * raan.sin(),
        sin_half * raan.cos(),
        kep[3] + kep[4] + kep[5],
    )
}

fn from_nonsingular(aeq: &Vector6<f64>) -> State6 {
    let ecc = aeq[1].hypot(aeq[2]);
    let sin_half2 = (aeq[3] * aeq[3] + aeq[4] * aeq[4]).min(1.0);
    let inc = (1.0 - 2.0 * sin_half2).acos() * DEGRAD;
    let raan = aeq[3].atan2(aeq[4]) * DEGRAD;
    let lon_per = aeq[1].atan2(aeq[2]) * DEGRAD;
    State6::new(
        aeq[0],
        ecc,
        inc,
        raan.rem_euclid(360.0),
        (lon_per - raan).rem_euclid(360.0),
        (aeq[5] - lon_per).rem_euclid(360.0),
    )
}

/// `target − current` with the mean longitude difference wrapped to `(−180°, 180°]`.
fn nonsingular_difference(target: &Vector6<f64>, current: &Vector6<f64>) -> Vector6<f64> {
    let mut diff = target - current;
    diff[5] = (diff[5] + 180.0).rem_euclid(360.0) - 180.0;
    diff
}

/// Osculating Cartesian state to Brouwer-Lyddane mean elements.
///
/// Arguments
/// ---------
/// * `theory` – Short-period or short+long-period theory.
/// * `mu` – Must be the Earth's gravitational parameter.
/// * `cartesian` – Osculating state.
/// * `diagnostics` – Receives the domain and non-convergence advisories.
///
/// Return
/// ------
/// * Mean `[a, e, i, Ω, ω, M]`, angles in `[0°, 360°)`.
///
/// Errors
/// ------
/// * [`ConversionError::BrouwerDomain`] if the osculating orbit is outside the
///   domain of the theory.
/// * Any error of [`cartesian_to_keplerian`].
///
/// See also
/// --------
/// * [`brouwer_mean_to_cartesian`] – Inverse conversion.
pub fn cartesian_to_brouwer_mean(
    theory: BrouwerTheory,
    mu: f64,
    cartesian: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    check_earth(mu, theory)?;
    let mut kep = cartesian_to_keplerian(mu, cartesian, AnomalyType::True)?;

    if kep[1] > MAX_ECCENTRICITY || kep[1] < 0.0 {
        return Err(ConversionError::BrouwerDomain(format!(
            "{} is applicable only if 0.0 <= ECC ({}) <= 0.99",
            theory.state_type(),
            kep[1]
        )));
    }
    check_periapsis(theory, kep[0] * (1.0 - kep[1]), diagnostics)?;
    if theory == BrouwerTheory::LongPeriod
        && ((58.80 < kep[2] && kep[2] < 65.78) || (114.22 < kep[2] && kep[2] < 121.2))
    {
        diagnostics.warn_once(
            Advisory::InaccuracyCriticalAngle,
            "Warning: For BrouwerMeanLong, when 58.80 DEG < INC < 65.78 DEG, or 114.22 DEG < INC < 121.2 DEG, there is a possible inaccuracy due to singularity related with critical angle.",
        );
    }

    kep[5] = true_to_mean_anomaly(kep[5] * RADEG, kep[1])? * DEGRAD;

    let reflected = kep[2] > REFLECTION_INCLINATION;
    let target_cart = if reflected {
        kep[2] = 180.0 - kep[2];
        kep[3] = -kep[3];
        keplerian_to_cartesian(mu, &kep, AnomalyType::Mean, diagnostics)?
    } else {
        *cartesian
    };
    let target_norm = target_cart.norm();
    let target = to_nonsingular(&kep);

    let first_osc = theory.to_osculating(mu, &kep, diagnostics)?;
    let mut guess = target + nonsingular_difference(&target, &to_nonsingular(&first_osc));
    let mut best = guess;
    let mut best_err = f64::INFINITY;
    let mut converged = false;

    for iteration in 0..=BROUWER_MAX_ITER {
        let osc = theory.to_osculating(mu, &from_nonsingular(&guess), diagnostics)?;
        let cart = keplerian_to_cartesian(mu, &osc, AnomalyType::Mean, diagnostics)?;
        let err = (target_cart - cart).norm() / target_norm;
        log::trace!("{} iteration {iteration}: relative error {err:e}", theory.state_type());

        if err >= best_err {
            diagnostics.warn_once(
                theory.not_converging(),
                &format!(
                    "Warning: the iterative algorithm converting from Cartesian to {} is not converging. So, it has been interrupted. The current relative error is {best_err:.10}.",
                    theory.state_type()
                ),
            );
            break;
        }
        best = guess;
        best_err = err;
        if err <= BROUWER_TOL {
            converged = true;
            break;
        }
        guess += nonsingular_difference(&target, &to_nonsingular(&osc));
    }

    if !converged && best_err < f64::INFINITY && best_err > BROUWER_TOL {
        diagnostics.warn_once(
            theory.not_converging(),
            &format!(
                "Warning: Maximum iteration number has been reached converting to {}. There is a possible inaccuracy (relative error {best_err:e}).",
                theory.state_type()
            ),
        );
    }

    let mut mean = from_nonsingular(&best);
    if reflected {
        mean[2] = 180.0 - mean[2];
        mean[3] = (-mean[3]).rem_euclid(360.0);
    }
    Ok(mean)
}

/// Brouwer-Lyddane mean elements to an osculating Cartesian state.
///
/// Errors
/// ------
/// * Any error of [`BrouwerTheory::to_osculating`] or [`keplerian_to_cartesian`].
pub fn brouwer_mean_to_cartesian(
    theory: BrouwerTheory,
    mu: f64,
    mean: &State6,
    diagnostics: &Diagnostics,
) -> Result<State6, ConversionError> {
    let osc = theory.to_osculating(mu, mean, diagnostics)?;
    keplerian_to_cartesian(mu, &osc, AnomalyType::Mean, diagnostics)
}
