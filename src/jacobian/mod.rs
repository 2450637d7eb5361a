//! # Helix ← Cartesian Jacobians
//!
//! This module builds the 5×6 sensitivity matrix `∂(d0, phi0, omega, z0, tanLambda) /
//! ∂(x, y, z, px, py, pz)` used to linearize the state → helix map inside a Kalman-style
//! fitter, and propagates Cartesian covariances through it.
//!
//! ## Strategies
//!
//! Three interchangeable implementations are selected through [`JacobianMethod`]:
//!
//! - [`JacobianMethod::AnalyticRotated`] – closed form evaluated in a frame rotated so
//!   that the transverse momentum lies along +x, then composed with the rotation
//!   ([`analytic::rotated_frame_jacobian`]).
//! - [`JacobianMethod::AnalyticDirect`] – independently derived closed form in the
//!   laboratory frame, written with the rigidity constant `aq = chargeSign / alpha`
//!   ([`analytic::direct_jacobian`]).
//! - [`JacobianMethod::Numeric`] – forward differences through
//!   [`Helix::from_cartesian`](crate::helix::Helix::from_cartesian)
//!   ([`numeric::numeric_jacobian`]).
//!
//! The numeric strategy is the reference the analytic ones are checked against, and the
//! analytic ones are the runtime fallback when a finite-difference step diverges
//! ([`JacobianMethod::compute_with_fallback`]).
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::{Matrix6, Vector3};
//! use trackhelix::helix::{CartesianState, ChargeSign};
//! use trackhelix::jacobian::{propagate_covariance, JacobianMethod};
//! use trackhelix::kernel_params::KernelParams;
//!
//! let state = CartesianState::new(
//!     Vector3::new(0.5, -1.0, 2.0),
//!     Vector3::new(1.2, 0.4, 0.3),
//!     ChargeSign::Positive,
//! );
//! let params = KernelParams::default();
//! let jac = JacobianMethod::AnalyticRotated.compute(&state, 3.5, &params).unwrap();
//! let helix_cov = propagate_covariance(&jac, &Matrix6::identity());
//! assert!(helix_cov[(0, 0)] > 0.0);
//! ```

use log::debug;
use nalgebra::{Matrix5, Matrix6, SMatrix};
use serde::{Deserialize, Serialize};

use crate::{
    constants::Tesla, helix::CartesianState, helix_errors::HelixError,
    kernel_params::KernelParams,
};

pub mod analytic;
pub mod numeric;

/// `∂(d0, phi0, omega, z0, tanLambda) / ∂(x, y, z, px, py, pz)`.
pub type Jacobian = SMatrix<f64, 5, 6>;

/// Row indices of a [`Jacobian`].
pub mod rows {
    pub const D0: usize = 0;
    pub const PHI0: usize = 1;
    pub const OMEGA: usize = 2;
    pub const Z0: usize = 3;
    pub const TAN_LAMBDA: usize = 4;
}

/// Column indices of a [`Jacobian`].
pub mod columns {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const Z: usize = 2;
    pub const PX: usize = 3;
    pub const PY: usize = 4;
    pub const PZ: usize = 5;
}

/// Strategy used to evaluate a [`Jacobian`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JacobianMethod {
    AnalyticRotated,
    AnalyticDirect,
    Numeric,
}

impl JacobianMethod {
    /// Evaluate the Jacobian of the state → helix map at `state`.
    ///
    /// Arguments
    /// ---------
    /// * `state`: the Cartesian linearization point.
    /// * `field`: magnetic field strength along z (T).
    /// * `params`: only `numeric_step` is read, by [`JacobianMethod::Numeric`].
    ///
    /// Errors
    /// ------
    /// * [`HelixError::DegenerateCurvature`] for a zero transverse momentum.
    /// * [`HelixError::InvalidFieldStrength`] for a non-positive field.
    /// * [`HelixError::NumericDivergence`] from the numeric strategy only.
    pub fn compute(
        self,
        state: &CartesianState,
        field: Tesla,
        params: &KernelParams,
    ) -> Result<Jacobian, HelixError> {
        match self {
            JacobianMethod::AnalyticRotated => analytic::rotated_frame_jacobian(state, field),
            JacobianMethod::AnalyticDirect => analytic::direct_jacobian(state, field),
            JacobianMethod::Numeric => {
                numeric::numeric_jacobian(state, field, params.numeric_step)
            }
        }
    }

    /// Like [`JacobianMethod::compute`], but a diverging numeric Jacobian is replaced by
    /// the direct analytic one.
    pub fn compute_with_fallback(
        self,
        state: &CartesianState,
        field: Tesla,
        params: &KernelParams,
    ) -> Result<Jacobian, HelixError> {
        match self.compute(state, field, params) {
            Err(HelixError::NumericDivergence { row, column }) => {
                debug!(
                    "numeric Jacobian diverged at ({row}, {column}), falling back to analytic"
                );
                analytic::direct_jacobian(state, field)
            }
            other => other,
        }
    }
}

/// Propagate a Cartesian covariance into helix parameter space, `J · C · Jᵀ`.
///
/// Arguments
/// ---------
/// * `jacobian`: the state → helix Jacobian at the linearization point.
/// * `covariance`: 6×6 covariance of `(x, y, z, px, py, pz)`.
///
/// Return
/// ------
/// * The 5×5 covariance of `(d0, phi0, omega, z0, tanLambda)`.
pub fn propagate_covariance(jacobian: &Jacobian, covariance: &Matrix6<f64>) -> Matrix5<f64> {
    jacobian * covariance * jacobian.transpose()
}
