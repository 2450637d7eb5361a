//! Closed-form Jacobians of the state → helix map.
//!
//! Both functions below evaluate the same 30 partial derivatives; they are derived
//! independently so that each can be checked against the other and against
//! [`numeric_jacobian`](super::numeric::numeric_jacobian).
//!
//! Notation used in the comments:
//!
//! ```text
//! pt    = hypot(px, py)             q   = chargeSign
//! alpha = UNIT_SCALE / (c · B)      aq  = q / alpha        omega = aq / pt
//! (xc, yc) = (x + py/aq, y − px/aq) rho = hypot(xc, yc)
//! phi0  = atan2(q·xc, −q·yc)        d0  = 1/omega − q·rho
//! s     = phidomain(phi0 − atan2(py, px)) / omega
//! z0    = z − s·tanLambda           tanLambda = pz / pt
//! ```
use nalgebra::{Matrix6, Rotation3, Vector3};

use super::{
    columns::{PX, PY, PZ, X, Y, Z},
    rows::{D0, OMEGA, PHI0, TAN_LAMBDA, Z0},
    Jacobian,
};
use crate::{
    angles::phidomain,
    constants::{rigidity_alpha, Tesla, SPEED_OF_LIGHT, UNIT_SCALE},
    helix::{check_curvature, check_field, CartesianState},
    helix_errors::HelixError,
};

/// Analytic Jacobian evaluated in the frame of the transverse momentum.
///
/// The state is rotated about z by `−atan2(py, px)` so that its momentum becomes
/// `(pt, 0, pz)`. In that frame `py` vanishes and the perigee derivatives reduce to
///
/// ```text
/// ∂d0/∂(x, y)     = (−sin phi0, cos phi0)
/// ∂d0/∂(px, py)   = ((1 − cos phi0)/aq, −sin phi0/aq)
/// ∂phi0/∂(x, y)   = q·(cos phi0, sin phi0)/rho
/// ∂phi0/∂(px, py) = q·(−sin phi0, cos phi0)/(aq·rho)
/// ∂omega/∂px      = −omega/pt
/// ∂tanλ/∂(px, pz) = (−tanλ/pt, 1/pt)
/// ∂z0/∂z          = 1
/// ```
///
/// the `z0` row following from `z0 = z − s·tanλ` with `∂s = (∂phi0 − ∂φ)/omega − s·∂omega/omega`.
/// Rotating about the z axis only shifts `phi0` by a constant, so the laboratory-frame
/// Jacobian is the rotated-frame one times `diag(R, R)`.
///
/// At the perigee itself (`phi0 = 0` in the rotated frame) this gives the familiar
/// `∂phi0/∂x = omega`, `∂phi0/∂py = 1/pt` and `∂z0/∂x = −pz/pt`.
///
/// Errors
/// ------
/// * [`HelixError::DegenerateCurvature`] for a zero transverse momentum.
/// * [`HelixError::InvalidFieldStrength`] for a non-positive field.
pub fn rotated_frame_jacobian(
    state: &CartesianState,
    field: Tesla,
) -> Result<Jacobian, HelixError> {
    check_field(field)?;

    let q = state.charge.value();
    let pt = state.transverse_momentum();
    let aq = q / rigidity_alpha(field);
    let omega = aq / pt;
    check_curvature(omega)?;

    let rotation = Rotation3::from_axis_angle(
        &Vector3::z_axis(),
        -state.momentum.y.atan2(state.momentum.x),
    );
    let position = rotation * state.position;
    let tan_lambda = state.momentum.z / pt;

    let xc = position.x;
    let yc = position.y - pt / aq;
    let rho = xc.hypot(yc);
    let phi0 = (q * xc).atan2(-q * yc);
    let (sin_phi0, cos_phi0) = phi0.sin_cos();
    let arc = phidomain(phi0) / omega;

    let mut local = Jacobian::zeros();

    local[(D0, X)] = -sin_phi0;
    local[(D0, Y)] = cos_phi0;
    local[(D0, PX)] = (1.0 - cos_phi0) / aq;
    local[(D0, PY)] = -sin_phi0 / aq;

    local[(PHI0, X)] = q * cos_phi0 / rho;
    local[(PHI0, Y)] = q * sin_phi0 / rho;
    local[(PHI0, PX)] = -q * sin_phi0 / (aq * rho);
    local[(PHI0, PY)] = q * cos_phi0 / (aq * rho);

    local[(OMEGA, PX)] = -omega / pt;

    local[(TAN_LAMBDA, PX)] = -tan_lambda / pt;
    local[(TAN_LAMBDA, PZ)] = 1.0 / pt;

    // arc length from the perigee to the state; atan2(py, px) moves only along py here
    let ds_dx = local[(PHI0, X)] / omega;
    let ds_dy = local[(PHI0, Y)] / omega;
    let ds_dpx = local[(PHI0, PX)] / omega + arc / pt;
    let ds_dpy = (local[(PHI0, PY)] - 1.0 / pt) / omega;

    local[(Z0, X)] = -tan_lambda * ds_dx;
    local[(Z0, Y)] = -tan_lambda * ds_dy;
    local[(Z0, Z)] = 1.0;
    local[(Z0, PX)] = -tan_lambda * ds_dpx + arc * tan_lambda / pt;
    local[(Z0, PY)] = -tan_lambda * ds_dpy;
    local[(Z0, PZ)] = -arc / pt;

    let mut frame = Matrix6::zeros();
    frame
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(rotation.matrix());
    frame
        .fixed_view_mut::<3, 3>(3, 3)
        .copy_from(rotation.matrix());

    Ok(local * frame)
}

/// Analytic Jacobian written directly in the laboratory frame.
///
/// Uses the explicit rigidity constant `alpha = 1/(B·c)·1e4` and `aq = q/alpha`; every
/// entry keeps its full `(px, py)` dependence instead of relying on a rotation.
///
/// Errors
/// ------
/// * [`HelixError::DegenerateCurvature`] for a zero transverse momentum.
/// * [`HelixError::InvalidFieldStrength`] for a non-positive field.
pub fn direct_jacobian(state: &CartesianState, field: Tesla) -> Result<Jacobian, HelixError> {
    check_field(field)?;

    let alpha = 1.0 / (field * SPEED_OF_LIGHT) * UNIT_SCALE;
    let q = state.charge.value();
    let aq = q / alpha;

    let (x, y) = (state.position.x, state.position.y);
    let (px, py, pz) = (state.momentum.x, state.momentum.y, state.momentum.z);
    let pt = px.hypot(py);
    let pt2 = pt * pt;
    let omega = aq / pt;
    check_curvature(omega)?;

    let xc = x + py / aq;
    let yc = y - px / aq;
    let rho = xc.hypot(yc);
    let phi0 = phidomain((q * xc).atan2(-q * yc));
    let (sin_phi0, cos_phi0) = phi0.sin_cos();
    let tan_lambda = pz / pt;
    let arc = phidomain(phi0 - py.atan2(px)) / omega;

    let mut jac = Jacobian::zeros();

    // d0 = pt/aq − q·rho
    jac[(D0, X)] = -sin_phi0;
    jac[(D0, Y)] = cos_phi0;
    jac[(D0, PX)] = px / (aq * pt) - cos_phi0 / aq;
    jac[(D0, PY)] = py / (aq * pt) - sin_phi0 / aq;

    jac[(PHI0, X)] = q * cos_phi0 / rho;
    jac[(PHI0, Y)] = q * sin_phi0 / rho;
    jac[(PHI0, PX)] = -q * sin_phi0 / (aq * rho);
    jac[(PHI0, PY)] = q * cos_phi0 / (aq * rho);

    jac[(OMEGA, PX)] = -omega * px / pt2;
    jac[(OMEGA, PY)] = -omega * py / pt2;

    jac[(TAN_LAMBDA, PX)] = -pz * px / (pt2 * pt);
    jac[(TAN_LAMBDA, PY)] = -pz * py / (pt2 * pt);
    jac[(TAN_LAMBDA, PZ)] = 1.0 / pt;

    // z0 = z − s·tanλ
    let dphi_dpx = -py / pt2;
    let dphi_dpy = px / pt2;
    let ds = |dphi0: f64, dphi: f64, domega: f64| (dphi0 - dphi) / omega - arc * domega / omega;

    let ds_dx = ds(jac[(PHI0, X)], 0.0, 0.0);
    let ds_dy = ds(jac[(PHI0, Y)], 0.0, 0.0);
    let ds_dpx = ds(jac[(PHI0, PX)], dphi_dpx, jac[(OMEGA, PX)]);
    let ds_dpy = ds(jac[(PHI0, PY)], dphi_dpy, jac[(OMEGA, PY)]);

    jac[(Z0, X)] = -tan_lambda * ds_dx;
    jac[(Z0, Y)] = -tan_lambda * ds_dy;
    jac[(Z0, Z)] = 1.0;
    jac[(Z0, PX)] = -tan_lambda * ds_dpx - arc * jac[(TAN_LAMBDA, PX)];
    jac[(Z0, PY)] = -tan_lambda * ds_dpy - arc * jac[(TAN_LAMBDA, PY)];
    jac[(Z0, PZ)] = -arc * jac[(TAN_LAMBDA, PZ)];

    Ok(jac)
}

#[cfg(test)]
mod analytic_test {
    use super::*;
    use crate::helix::ChargeSign;
    use approx::assert_relative_eq;

    #[test]
    fn test_perigee_entries() {
        // state sitting on its own perigee, momentum along +x
        let pt = 2.0;
        let pz = 0.8;
        let state = CartesianState::new(
            Vector3::zeros(),
            Vector3::new(pt, 0.0, pz),
            ChargeSign::Positive,
        );
        let field = 3.5;
        let jac = rotated_frame_jacobian(&state, field).unwrap();
        let alpha = rigidity_alpha(field);

        assert_relative_eq!(jac[(D0, X)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(D0, Y)], 1.0, epsilon = 1e-12);
        assert_eq!(jac[(D0, Z)], 0.0);
        assert_relative_eq!(jac[(PHI0, X)], 1.0 / (alpha * pt), max_relative = 1e-12);
        assert_relative_eq!(jac[(PHI0, PY)], 1.0 / pt, max_relative = 1e-12);
        assert_relative_eq!(jac[(OMEGA, PX)], -1.0 / (alpha * pt * pt), max_relative = 1e-12);
        assert_relative_eq!(jac[(TAN_LAMBDA, PX)], -pz / (pt * pt), max_relative = 1e-12);
        assert_relative_eq!(jac[(TAN_LAMBDA, PZ)], 1.0 / pt, max_relative = 1e-12);
        assert_relative_eq!(jac[(Z0, X)], -pz / pt, max_relative = 1e-9);
        assert_eq!(jac[(Z0, Z)], 1.0);
        for column in [X, Y, Z] {
            assert_eq!(jac[(OMEGA, column)], 0.0);
        }
    }

    #[test]
    fn test_variants_agree() {
        let state = CartesianState::new(
            Vector3::new(-4.0, 7.0, 1.0),
            Vector3::new(-0.3, -1.1, 0.9),
            ChargeSign::Negative,
        );
        let rotated = rotated_frame_jacobian(&state, 2.0).unwrap();
        let direct = direct_jacobian(&state, 2.0).unwrap();

        assert_relative_eq!(rotated, direct, epsilon = 1e-9, max_relative = 1e-8);
    }

    #[test]
    fn test_degenerate_state() {
        let state = CartesianState::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            ChargeSign::Positive,
        );
        assert!(matches!(
            rotated_frame_jacobian(&state, 3.5),
            Err(HelixError::DegenerateCurvature(_))
        ));
        assert!(matches!(
            direct_jacobian(&state, 3.5),
            Err(HelixError::DegenerateCurvature(_))
        ));
    }
}
