//! # Helix track parameters
//!
//! This module defines the [`Helix`] perigee parameterization of a charged-particle
//! trajectory in a uniform magnetic field along z, the [`CartesianState`] it is
//! linearized against, and the conversions between the two.
//!
//! ## Perigee parameters
//!
//! 1. **d0** – signed transverse distance of closest approach to the z axis (mm)
//! 2. **phi0** – direction of travel at the point of closest approach, in `(-π, π]`
//! 3. **omega** – signed curvature `chargeSign / R` (1/mm)
//! 4. **z0** – z of the point of closest approach (mm)
//! 5. **tanLambda** – tangent of the dip angle, `dz / ds` along the transverse arc
//!
//! ## Geometry
//!
//! The transverse direction at arc length `s` is `φ(s) = phi0 − omega·s`, so a positive
//! particle in a positive field turns clockwise seen from +z. The circle centre is
//!
//! ```text
//! xc =  (1/omega − d0) · sin(phi0)
//! yc = −(1/omega − d0) · cos(phi0)
//! ```
//!
//! and the position at arc length `s` is `(xc − sin φ(s)/omega, yc + cos φ(s)/omega,
//! z0 + s·tanLambda)`.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use trackhelix::helix::{CartesianState, ChargeSign, Helix};
//!
//! let state = CartesianState::new(
//!     Vector3::new(1.0, 2.0, 3.0),
//!     Vector3::new(0.8, 0.3, 0.4),
//!     ChargeSign::Negative,
//! );
//! let (helix, arc_length) = Helix::from_cartesian(&state, 3.5).unwrap();
//! let back = helix.to_cartesian(arc_length, 3.5).unwrap();
//! assert!((back.position - state.position).norm() < 1e-9);
//! ```

use std::fmt;

use nalgebra::{Vector2, Vector3, Vector5};
use serde::{Deserialize, Serialize};

use crate::{
    angles::phidomain,
    constants::{rigidity_alpha, GeV, InverseMillimeter, Millimeter, Radian, Tesla},
    helix_errors::HelixError,
};

/// Reject a zero or non-finite curvature.
#[inline]
pub(crate) fn check_curvature(omega: InverseMillimeter) -> Result<(), HelixError> {
    if omega == 0.0 || !omega.is_finite() {
        return Err(HelixError::DegenerateCurvature(omega));
    }
    Ok(())
}

/// Reject a non-positive or non-finite field strength.
#[inline]
pub(crate) fn check_field(field: Tesla) -> Result<(), HelixError> {
    if field > 0.0 && field.is_finite() {
        Ok(())
    } else {
        Err(HelixError::InvalidFieldStrength(field))
    }
}

/// Sign of the particle charge.
///
/// It cannot be recovered from a momentum vector, so it travels next to it in
/// [`CartesianState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeSign {
    Positive,
    Negative,
}

impl ChargeSign {
    /// `+1.0` or `-1.0`.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            ChargeSign::Positive => 1.0,
            ChargeSign::Negative => -1.0,
        }
    }

    /// The opposite charge.
    pub fn opposite(self) -> Self {
        match self {
            ChargeSign::Positive => ChargeSign::Negative,
            ChargeSign::Negative => ChargeSign::Positive,
        }
    }

    /// Charge sign carried by a signed curvature.
    ///
    /// Errors
    /// ------
    /// * [`HelixError::DegenerateCurvature`] if `omega` is zero or non-finite.
    pub fn from_curvature(omega: InverseMillimeter) -> Result<Self, HelixError> {
        check_curvature(omega)?;
        Ok(if omega > 0.0 {
            ChargeSign::Positive
        } else {
            ChargeSign::Negative
        })
    }
}

/// Position, momentum and charge sign of a particle.
///
/// Units
/// -----
/// * `position`: mm.
/// * `momentum`: GeV/c.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianState {
    pub position: Vector3<f64>,
    pub momentum: Vector3<f64>,
    pub charge: ChargeSign,
}

impl CartesianState {
    pub fn new(position: Vector3<f64>, momentum: Vector3<f64>, charge: ChargeSign) -> Self {
        Self {
            position,
            momentum,
            charge,
        }
    }

    /// Build a state from `[x, y, z, px, py, pz]`.
    pub fn from_array(components: &[f64; 6], charge: ChargeSign) -> Self {
        Self {
            position: Vector3::new(components[0], components[1], components[2]),
            momentum: Vector3::new(components[3], components[4], components[5]),
            charge,
        }
    }

    /// The six Cartesian components `[x, y, z, px, py, pz]`, in Jacobian column order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.momentum.x,
            self.momentum.y,
            self.momentum.z,
        ]
    }

    /// Transverse momentum `hypot(px, py)`.
    #[inline]
    pub fn transverse_momentum(&self) -> GeV {
        self.momentum.x.hypot(self.momentum.y)
    }
}

/// Perigee helix parameters with respect to the z axis.
///
/// Units
/// -----
/// * `d0`, `z0`: mm.
/// * `phi0`: radians, in `(-π, π]` when built through [`Helix::new`] or
///   [`Helix::from_cartesian`].
/// * `omega`: 1/mm, sign equal to the charge sign.
/// * `tan_lambda`: unitless.
///
/// The field strength is not stored; operations that need a momentum take it as an argument.
///
/// See also
/// --------
/// * [`Helix::from_cartesian`] – build a helix from a [`CartesianState`].
/// * [`Helix::to_cartesian`] – evaluate a [`CartesianState`] along the helix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Helix {
    pub d0: Millimeter,
    pub phi0: Radian,
    pub omega: InverseMillimeter,
    pub z0: Millimeter,
    pub tan_lambda: f64,
}

impl Helix {
    /// Build a helix, bringing `phi0` into `(-π, π]`.
    pub fn new(
        d0: Millimeter,
        phi0: Radian,
        omega: InverseMillimeter,
        z0: Millimeter,
        tan_lambda: f64,
    ) -> Self {
        Self {
            d0,
            phi0: phidomain(phi0),
            omega,
            z0,
            tan_lambda,
        }
    }

    /// Parameters as `[d0, phi0, omega, z0, tanLambda]`, in Jacobian row order.
    pub fn to_vector(&self) -> Vector5<f64> {
        Vector5::new(self.d0, self.phi0, self.omega, self.z0, self.tan_lambda)
    }

    /// Inverse of [`Helix::to_vector`].
    pub fn from_vector(params: &Vector5<f64>) -> Self {
        Self::new(params[0], params[1], params[2], params[3], params[4])
    }

    pub fn charge_sign(&self) -> Result<ChargeSign, HelixError> {
        ChargeSign::from_curvature(self.omega)
    }

    /// Signed transverse radius `1/omega` (mm).
    pub fn radius(&self) -> Result<Millimeter, HelixError> {
        check_curvature(self.omega)?;
        Ok(1.0 / self.omega)
    }

    /// Centre of the transverse circle (mm).
    pub fn center(&self) -> Result<Vector2<f64>, HelixError> {
        let lever = self.radius()? - self.d0;
        let (sin_phi0, cos_phi0) = self.phi0.sin_cos();
        Ok(Vector2::new(lever * sin_phi0, -lever * cos_phi0))
    }

    /// Transverse direction of travel at arc length `s`, in `(-π, π]`.
    #[inline]
    pub fn phi_at(&self, arc_length: Millimeter) -> Radian {
        phidomain(self.phi0 - self.omega * arc_length)
    }

    /// z coordinate at transverse arc length `s`.
    #[inline]
    pub fn z_at(&self, arc_length: Millimeter) -> Millimeter {
        self.z0 + arc_length * self.tan_lambda
    }

    /// Position at transverse arc length `s` (mm).
    ///
    /// Errors
    /// ------
    /// * [`HelixError::DegenerateCurvature`] if `omega` is zero or non-finite.
    pub fn position_at(&self, arc_length: Millimeter) -> Result<Vector3<f64>, HelixError> {
        let center = self.center()?;
        let (sin_phi, cos_phi) = (self.phi0 - self.omega * arc_length).sin_cos();
        Ok(Vector3::new(
            center.x - sin_phi / self.omega,
            center.y + cos_phi / self.omega,
            self.z_at(arc_length),
        ))
    }

    /// Unit tangent of the trajectory at transverse arc length `s`.
    pub fn direction_at(&self, arc_length: Millimeter) -> Vector3<f64> {
        let (sin_phi, cos_phi) = (self.phi0 - self.omega * arc_length).sin_cos();
        Vector3::new(cos_phi, sin_phi, self.tan_lambda).normalize()
    }

    /// Convert a transverse arc length into a 3D path length, `s / cos(λ)`.
    #[inline]
    pub fn arc_length_3d(&self, arc_length: Millimeter) -> Millimeter {
        arc_length * (1.0 + self.tan_lambda * self.tan_lambda).sqrt()
    }

    /// Transverse momentum `1 / (alpha · |omega|)` in the field `field`.
    pub fn transverse_momentum(&self, field: Tesla) -> Result<GeV, HelixError> {
        check_field(field)?;
        check_curvature(self.omega)?;
        Ok(1.0 / (rigidity_alpha(field) * self.omega.abs()))
    }

    /// Momentum vector at transverse arc length `s` (GeV/c).
    pub fn momentum_at(
        &self,
        arc_length: Millimeter,
        field: Tesla,
    ) -> Result<Vector3<f64>, HelixError> {
        let pt = self.transverse_momentum(field)?;
        let (sin_phi, cos_phi) = (self.phi0 - self.omega * arc_length).sin_cos();
        Ok(Vector3::new(pt * cos_phi, pt * sin_phi, pt * self.tan_lambda))
    }

    /// Evaluate the Cartesian state at a signed transverse arc length.
    ///
    /// Arguments
    /// ---------
    /// * `arc_length`: transverse arc length from the perigee (mm), positive along the motion.
    /// * `field`: magnetic field strength along z (T).
    ///
    /// Return
    /// ------
    /// * The [`CartesianState`] at that point, charge sign taken from `omega`.
    ///
    /// Errors
    /// ------
    /// * [`HelixError::DegenerateCurvature`] if `omega` is zero or non-finite.
    /// * [`HelixError::InvalidFieldStrength`] if `field` is not strictly positive.
    pub fn to_cartesian(
        &self,
        arc_length: Millimeter,
        field: Tesla,
    ) -> Result<CartesianState, HelixError> {
        let charge = self.charge_sign()?;
        let momentum = self.momentum_at(arc_length, field)?;
        let position = self.position_at(arc_length)?;
        Ok(CartesianState {
            position,
            momentum,
            charge,
        })
    }

    /// Build the helix passing through a Cartesian state.
    ///
    /// The helix is expressed at its own perigee with respect to the z axis, so the
    /// transverse arc length at which the input position lies on it is returned as well.
    /// The solve is closed-form: the circle centre follows linearly from the state, the
    /// perigee direction and the arc length from two arctangents.
    ///
    /// Arguments
    /// ---------
    /// * `state`: position (mm), momentum (GeV/c) and charge sign.
    /// * `field`: magnetic field strength along z (T).
    ///
    /// Return
    /// ------
    /// * `(helix, arc_length)` with `helix.to_cartesian(arc_length, field) == state`.
    ///
    /// Errors
    /// ------
    /// * [`HelixError::DegenerateCurvature`] if the transverse momentum is zero or non-finite.
    /// * [`HelixError::InvalidFieldStrength`] if `field` is not strictly positive.
    pub fn from_cartesian(
        state: &CartesianState,
        field: Tesla,
    ) -> Result<(Self, Millimeter), HelixError> {
        check_field(field)?;

        let q = state.charge.value();
        let pt = state.transverse_momentum();
        let aq = q / rigidity_alpha(field);
        let omega = aq / pt;
        check_curvature(omega)?;

        let (px, py, pz) = (state.momentum.x, state.momentum.y, state.momentum.z);
        let xc = state.position.x + py / aq;
        let yc = state.position.y - px / aq;

        let phi0 = phidomain((q * xc).atan2(-q * yc));
        let d0 = 1.0 / omega - q * xc.hypot(yc);
        let tan_lambda = pz / pt;

        let arc_length = phidomain(phi0 - py.atan2(px)) / omega;
        let z0 = state.position.z - arc_length * tan_lambda;

        Ok((
            Self {
                d0,
                phi0,
                omega,
                z0,
                tan_lambda,
            },
            arc_length,
        ))
    }
}

impl fmt::Display for Helix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Helix perigee parameters")?;
        writeln!(f, "------------------------")?;
        writeln!(f, "  d0        = {:.6} mm", self.d0)?;
        writeln!(
            f,
            "  phi0      = {:.6} rad ({:.4}°)",
            self.phi0,
            self.phi0.to_degrees()
        )?;
        writeln!(f, "  omega     = {:.6e} 1/mm", self.omega)?;
        writeln!(f, "  z0        = {:.6} mm", self.z0)?;
        write!(f, "  tanLambda = {:.6}", self.tan_lambda)
    }
}
