//! # Partial derivatives between representations
//!
//! Three entry points build 6×6 Jacobians at a given state:
//!
//! * [`jacobian_of_cartesian`] – `∂X/∂S`, Cartesian with respect to a representation `S`;
//! * [`jacobian_wrt_cartesian`] – `∂S/∂X`, a representation with respect to Cartesian;
//! * [`state_conv_jacobian`] – `∂T/∂S = ∂T/∂X · ∂X/∂S`, chained through Cartesian.
//!
//! Two strategies are available:
//!
//! * [`JacobianStrategy::Analytic`] – closed-form partials for Keplerian elements
//!   (true or mean anomaly, elliptic orbits) and for SphericalAZFPA. The inverse
//!   direction is the matrix inverse of the closed form.
//! * [`JacobianStrategy::FiniteDifference`] – central differences through the
//!   dispatch router, with a step of `1e-6 · max(|xⱼ|, 1)` on each input element.
//!   Differences of angular outputs are wrapped to `(−180°, 180°]`.
//!
//! When no strategy is given, the analytic one is used whenever it exists.
//!
//! Angular elements are stored in degrees, so their partials are per degree.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{Jacobian6, State6, PARABOLIC_TOL, RADEG};
use crate::conversion::{convert, ConversionContext};
use crate::conversion_errors::ConversionError;
use crate::kepler::convert_to_true_anomaly;
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::orbit_type::spherical_element::local_frame;
use crate::state_type::{AnomalyType, StateType};

/// Relative step of the central differences.
const FD_STEP: f64 = 1e-6;

/// How a Jacobian is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianStrategy {
    Analytic,
    FiniteDifference,
}

impl JacobianStrategy {
    /// Strategy used when the caller does not choose one: analytic if the
    /// representation `rep` has closed-form partials at `elements`.
    pub fn for_state(rep: StateType, elements: &State6, anomaly_type: AnomalyType) -> Self {
        if has_analytic_partials(rep, elements, anomaly_type) {
            JacobianStrategy::Analytic
        } else {
            JacobianStrategy::FiniteDifference
        }
    }
}

fn has_analytic_partials(rep: StateType, elements: &State6, anomaly_type: AnomalyType) -> bool {
    match rep {
        StateType::SphericalAzFpa => true,
        StateType::Keplerian => {
            matches!(anomaly_type, AnomalyType::True | AnomalyType::Mean)
                && elements[1].abs() < 1.0 - PARABOLIC_TOL
        }
        _ => false,
    }
}

/// Slots of `rep` holding an angle (degrees).
fn angle_slots(rep: StateType) -> [bool; 6] {
    match rep {
        StateType::Cartesian => [false; 6],
        StateType::Keplerian
        | StateType::ModifiedKeplerian
        | StateType::OutgoingAsymptote
        | StateType::IncomingAsymptote
        | StateType::BrouwerMeanShort
        | StateType::BrouwerMeanLong => [false, false, true, true, true, true],
        StateType::SphericalAzFpa | StateType::SphericalRaDec | StateType::Planetodetic => {
            [false, true, true, false, true, true]
        }
        StateType::Equinoctial | StateType::ModifiedEquinoctial | StateType::AlternateEquinoctial => {
            [false, false, false, false, false, true]
        }
        StateType::Delaunay => [true, true, true, false, false, false],
    }
}

fn set_column(jac: &mut Jacobian6, col: usize, d_pos: &Vector3<f64>, d_vel: &Vector3<f64>) {
    jac.fixed_view_mut::<3, 1>(0, col).copy_from(d_pos);
    jac.fixed_view_mut::<3, 1>(3, col).copy_from(d_vel);
}

fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

fn d_rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(0.0, 0.0, 0.0, 0.0, -s, -c, 0.0, c, -s)
}

fn d_rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(-s, -c, 0.0, c, -s, 0.0, 0.0, 0.0, 0.0)
}

/// `∂X/∂K` for elliptic Keplerian elements `[a, e, i, Ω, ω, anomaly]` whose
/// anomaly is a true or mean anomaly.
///
/// The state is `R · (r_pf, v_pf)` with `R = R_z(Ω) R_x(i) R_z(ω)` and the
/// perifocal vectors `r_pf = r (cos ν, sin ν, 0)`,
/// `v_pf = √(μ/p) (−sin ν, e + cos ν, 0)`. For a mean anomaly the `e` and `M`
/// columns pick up `∂ν/∂e|_M = sin ν (2 + e cos ν) / (1 − e²)` and
/// `∂ν/∂M = (1 + e cos ν)² / (1 − e²)^{3/2}`.
fn keplerian_partials(mu: f64, kep: &State6, anomaly_type: AnomalyType) -> Result<Jacobian6, ConversionError> {
    let (a, e) = (kep[0], kep[1]);
    let (inc, raan, aop) = (kep[2] * RADEG, kep[3] * RADEG, kep[4] * RADEG);
    let nu = convert_to_true_anomaly(anomaly_type, kep[5] * RADEG, e)?;

    let one_m_e2 = 1.0 - e * e;
    let p = a * one_m_e2;
    let (s, c) = nu.sin_cos();
    let den = 1.0 + e * c;
    let r = p / den;
    let sqrt_mu_p = (mu / p).sqrt();

    let r_pf = Vector3::new(r * c, r * s, 0.0);
    let v_pf = sqrt_mu_p * Vector3::new(-s, e + c, 0.0);

    let (rz_raan, rx_inc, rz_aop) = (rot_z(raan), rot_x(inc), rot_z(aop));
    let rot = rz_raan * rx_inc * rz_aop;

    let dr_de = a * (-2.0 * e * den - one_m_e2 * c) / (den * den);
    let mut dpos_de = rot * Vector3::new(dr_de * c, dr_de * s, 0.0);
    let mut dvel_de = rot * (a * e / p * v_pf + sqrt_mu_p * Vector3::y());

    let dr_dnu = r * r * e * s / p;
    let mut dpos_dnu = rot * Vector3::new(dr_dnu * c - r * s, dr_dnu * s + r * c, 0.0);
    let mut dvel_dnu = rot * (sqrt_mu_p * Vector3::new(-c, -s, 0.0));

    if anomaly_type == AnomalyType::Mean {
        let dnu_de = s * (2.0 + e * c) / one_m_e2;
        let dnu_dm = den * den / one_m_e2.powf(1.5);
        dpos_de += dpos_dnu * dnu_de;
        dvel_de += dvel_dnu * dnu_de;
        dpos_dnu *= dnu_dm;
        dvel_dnu *= dnu_dm;
    }

    let d_inc = rz_raan * d_rot_x(inc) * rz_aop;
    let d_raan = d_rot_z(raan) * rx_inc * rz_aop;
    let d_aop = rz_raan * rx_inc * d_rot_z(aop);

    let mut jac = Jacobian6::zeros();
    set_column(&mut jac, 0, &(rot * r_pf / a), &(rot * v_pf * (-0.5 / a)));
    set_column(&mut jac, 1, &dpos_de, &dvel_de);
    set_column(&mut jac, 2, &(d_inc * r_pf * RADEG), &(d_inc * v_pf * RADEG));
    set_column(&mut jac, 3, &(d_raan * r_pf * RADEG), &(d_raan * v_pf * RADEG));
    set_column(&mut jac, 4, &(d_aop * r_pf * RADEG), &(d_aop * v_pf * RADEG));
    set_column(&mut jac, 5, &(dpos_dnu * RADEG), &(dvel_dnu * RADEG));
    Ok(jac)
}

/// `∂X/∂S` for SphericalAZFPA elements `[r, λ, δ, v, azimuth, FPA]`.
///
/// With `L` the local frame (rows radial, east, north), the velocity is
/// `v Lᵀ u` where `u = (cos ψ, sin ψ sin A, sin ψ cos A)`.
fn spherical_azfpa_partials(sph: &State6) -> Jacobian6 {
    let r = sph[0];
    let (lambda, delta) = (sph[1] * RADEG, sph[2] * RADEG);
    let v = sph[3];
    let (azimuth, psi) = (sph[4] * RADEG, sph[5] * RADEG);

    let (sin_l, cos_l) = lambda.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();
    let (sin_a, cos_a) = azimuth.sin_cos();
    let (sin_p, cos_p) = psi.sin_cos();

    let frame_t = local_frame(lambda, delta).transpose();
    let u = Vector3::new(cos_p, sin_p * sin_a, sin_p * cos_a);
    let du_da = Vector3::new(0.0, sin_p * cos_a, -sin_p * sin_a);
    let du_dpsi = Vector3::new(-sin_p, cos_p * sin_a, cos_p * cos_a);

    #[rustfmt::skip]
    let d_frame_dl = Matrix3::new(
        -cos_d * sin_l, cos_d * cos_l, 0.0,
        -cos_l, -sin_l, 0.0,
        sin_d * sin_l, -sin_d * cos_l, 0.0,
    );
    #[rustfmt::skip]
    let d_frame_dd = Matrix3::new(
        -sin_d * cos_l, -sin_d * sin_l, cos_d,
        0.0, 0.0, 0.0,
        -cos_d * cos_l, -cos_d * sin_l, -sin_d,
    );

    let radial = Vector3::new(cos_d * cos_l, cos_d * sin_l, sin_d);
    let zero = Vector3::zeros();

    let mut jac = Jacobian6::zeros();
    set_column(&mut jac, 0, &radial, &zero);
    set_column(
        &mut jac,
        1,
        &(r * RADEG * Vector3::new(-cos_d * sin_l, cos_d * cos_l, 0.0)),
        &(v * RADEG * d_frame_dl.transpose() * u),
    );
    set_column(
        &mut jac,
        2,
        &(r * RADEG * Vector3::new(-sin_d * cos_l, -sin_d * sin_l, cos_d)),
        &(v * RADEG * d_frame_dd.transpose() * u),
    );
    set_column(&mut jac, 3, &zero, &(frame_t * u));
    set_column(&mut jac, 4, &zero, &(v * RADEG * frame_t * du_da));
    set_column(&mut jac, 5, &zero, &(v * RADEG * frame_t * du_dpsi));
    jac
}

fn analytic_of_cartesian(rep: StateType, elements: &State6, ctx: &ConversionContext) -> Result<Jacobian6, ConversionError> {
    if !has_analytic_partials(rep, elements, ctx.anomaly_type) {
        return Err(ConversionError::UnsupportedConversion {
            from: format!("{rep} ({} anomaly, ECC = {})", ctx.anomaly_type, elements[1]),
            to: "Cartesian with analytic partials".to_string(),
        });
    }
    match rep {
        StateType::SphericalAzFpa => Ok(spherical_azfpa_partials(elements)),
        _ => {
            let kep = State6::from(KeplerianElements::from(elements).normalized(ctx.diagnostics));
            keplerian_partials(ctx.body.mu, &kep, ctx.anomaly_type)
        }
    }
}

/// Central differences of `f` at `x`; differences of the angular slots of
/// `output` are wrapped to `(−180°, 180°]`.
fn central_difference<F>(x: &State6, output: StateType, f: F) -> Result<Jacobian6, ConversionError>
where
    F: Fn(&State6) -> Result<State6, ConversionError>,
{
    let angles = angle_slots(output);
    let mut jac = Jacobian6::zeros();
    for j in 0..6 {
        let step = FD_STEP * x[j].abs().max(1.0);
        let mut forward = *x;
        forward[j] += step;
        let mut backward = *x;
        backward[j] -= step;

        let mut diff = f(&forward)? - f(&backward)?;
        for (k, is_angle) in angles.iter().enumerate() {
            if *is_angle {
                diff[k] = (diff[k] + 180.0).rem_euclid(360.0) - 180.0;
            }
        }
        jac.set_column(j, &(diff / (2.0 * step)));
    }
    Ok(jac)
}

/// Partial derivatives of the Cartesian state with respect to the elements of
/// `wrt`, at `state` given in the representation `from`.
///
/// Arguments
/// ---------
/// * `state`, `from` – Evaluation point and its representation.
/// * `wrt` – Representation whose elements are the independent variables.
/// * `strategy` – Forced strategy, or `None` to use the analytic form when it exists.
/// * `ctx` – Central body, anomaly flavour and diagnostics.
///
/// Return
/// ------
/// * `J[r][c] = ∂Xᵣ/∂S_c`.
///
/// Errors
/// ------
/// * [`ConversionError::UnsupportedConversion`] if [`JacobianStrategy::Analytic`]
///   is forced on a representation without closed-form partials.
/// * Any conversion error at the evaluation point or at a perturbed point.
pub fn jacobian_of_cartesian(
    state: &State6,
    from: StateType,
    wrt: StateType,
    strategy: Option<JacobianStrategy>,
    ctx: &ConversionContext,
) -> Result<Jacobian6, ConversionError> {
    if wrt == StateType::Cartesian {
        return Ok(Jacobian6::identity());
    }
    let elements = convert(state, from, wrt, ctx)?;
    let strategy = strategy.unwrap_or_else(|| JacobianStrategy::for_state(wrt, &elements, ctx.anomaly_type));
    log::debug!("d(Cartesian)/d({wrt}) by {strategy:?}");

    match strategy {
        JacobianStrategy::Analytic => analytic_of_cartesian(wrt, &elements, ctx),
        JacobianStrategy::FiniteDifference => central_difference(&elements, StateType::Cartesian, |x| {
            convert(x, wrt, StateType::Cartesian, ctx)
        }),
    }
}

/// Partial derivatives of the elements of `of` with respect to the Cartesian
/// state, at `state` given in the representation `from`.
///
/// Errors
/// ------
/// * [`ConversionError::SingularJacobian`] if the analytic forward partials
///   cannot be inverted.
/// * As for [`jacobian_of_cartesian`].
pub fn jacobian_wrt_cartesian(
    state: &State6,
    from: StateType,
    of: StateType,
    strategy: Option<JacobianStrategy>,
    ctx: &ConversionContext,
) -> Result<Jacobian6, ConversionError> {
    if of == StateType::Cartesian {
        return Ok(Jacobian6::identity());
    }
    let cartesian = convert(state, from, StateType::Cartesian, ctx)?;
    let elements = convert(&cartesian, StateType::Cartesian, of, ctx)?;
    let strategy = strategy.unwrap_or_else(|| JacobianStrategy::for_state(of, &elements, ctx.anomaly_type));
    log::debug!("d({of})/d(Cartesian) by {strategy:?}");

    match strategy {
        JacobianStrategy::Analytic => analytic_of_cartesian(of, &elements, ctx)?
            .try_inverse()
            .ok_or_else(|| ConversionError::SingularJacobian(format!("d(Cartesian)/d({of}) at {elements:?}"))),
        JacobianStrategy::FiniteDifference => {
            central_difference(&cartesian, of, |x| convert(x, StateType::Cartesian, of, ctx))
        }
    }
}

/// Partial derivatives of the elements of `jac_out` with respect to the
/// elements of `jac_in`, at `state` given in the representation `from`.
///
/// The result is the matrix product `∂(jac_out)/∂X · ∂X/∂(jac_in)`; each factor
/// uses `strategy` (or its own automatic choice).
///
/// See also
/// --------
/// * [`jacobian_of_cartesian`], [`jacobian_wrt_cartesian`] – The two factors.
pub fn state_conv_jacobian(
    state: &State6,
    from: StateType,
    jac_in: StateType,
    jac_out: StateType,
    strategy: Option<JacobianStrategy>,
    ctx: &ConversionContext,
) -> Result<Jacobian6, ConversionError> {
    if jac_in == jac_out {
        return Ok(Jacobian6::identity());
    }
    let d_out_d_cart = jacobian_wrt_cartesian(state, from, jac_out, strategy, ctx)?;
    let d_cart_d_in = jacobian_of_cartesian(state, from, jac_in, strategy, ctx)?;
    Ok(d_out_d_cart * d_cart_d_in)
}
