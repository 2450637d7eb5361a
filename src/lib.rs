//! # trackhelix
//!
//! Numerical kernel for charged-particle tracks in a uniform solenoidal field: perigee
//! helix parameters, the Jacobian of the Cartesian → helix map, and points of closest
//! approach used as vertex candidates.
//!
//! ## Modules
//!
//! - [`helix`] – the [`Helix`] parameterization, [`CartesianState`] and the closed-form
//!   conversions between them.
//! - [`jacobian`] – analytic and numeric 5×6 Jacobians, covariance propagation.
//! - [`poca`] – helix–helix and helix–point closest approach.
//! - [`kernel_params`] – numeric step and turn window, with a validating builder.
//! - [`angles`] – [`phidomain`] normalization into `(-π, π]`.
//! - [`constants`] – unit aliases and physical constants.
//! - [`helix_errors`] – the crate-wide [`HelixError`].
//!
//! ## Units
//!
//! Lengths are in mm, momenta in GeV/c, fields in T and angles in radians.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use trackhelix::{helix_poca, CartesianState, ChargeSign, Helix};
//!
//! let field = 3.5;
//! let vertex = Vector3::new(1.0, -2.0, 4.0);
//! let (h1, _) = Helix::from_cartesian(
//!     &CartesianState::new(vertex, Vector3::new(1.0, 0.5, 0.2), ChargeSign::Positive),
//!     field,
//! )
//! .unwrap();
//! let (h2, _) = Helix::from_cartesian(
//!     &CartesianState::new(vertex, Vector3::new(-0.3, 1.2, -0.4), ChargeSign::Negative),
//!     field,
//! )
//! .unwrap();
//!
//! let poca = helix_poca(&h1, &h2, false).unwrap();
//! assert!(poca.separation < 1e-6);
//! assert!((poca.vertex - vertex).norm() < 1e-6);
//! ```
pub mod angles;
pub mod constants;
pub mod helix;
pub mod helix_errors;
pub mod jacobian;
pub mod kernel_params;
pub mod poca;

pub use angles::phidomain;
pub use helix::{CartesianState, ChargeSign, Helix};
pub use helix_errors::HelixError;
pub use jacobian::{propagate_covariance, Jacobian, JacobianMethod};
pub use kernel_params::{KernelParams, KernelParamsBuilder};
pub use poca::{
    helix_point::{point_poca, point_poca_with_params},
    two_helix::{helix_poca, helix_poca_with_params},
    IntersectionBranch, PocaResult, PointPocaResult,
};
