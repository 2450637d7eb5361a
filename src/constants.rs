//! # Constants and type definitions for trackhelix
//!
//! This module centralizes the **unit conventions**, **numerical defaults** and **type
//! aliases** shared by the helix converter, the Jacobian builders and the
//! closest-approach solver.
//!
//! ## Unit system
//!
//! - Lengths: **millimetres**
//! - Momenta: **GeV/c**
//! - Magnetic field: **tesla**
//!
//! With these units the transverse radius of a unit-charge track is
//! `R = alpha · pt` where `alpha = UNIT_SCALE / (SPEED_OF_LIGHT · B)`, see [`rigidity_alpha`].

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, one full turn in radians
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Speed of light in units of 10⁸ m/s
pub const SPEED_OF_LIGHT: f64 = 2.99792458;

/// Scale turning `1 / (B · c)` into millimetres per GeV/c
pub const UNIT_SCALE: f64 = 1.0e4;

// -------------------------------------------------------------------------------------------------
// Numerical defaults
// -------------------------------------------------------------------------------------------------

/// Forward-difference step of the numeric Jacobian (natural units)
pub const NUMERIC_JACOBIAN_STEP: f64 = 1.0e-5;

/// First turn number scanned when resolving the periodic z ambiguity
pub const TURN_WINDOW_MIN: i32 = -1;

/// Last turn number (inclusive) scanned when resolving the periodic z ambiguity
pub const TURN_WINDOW_MAX: i32 = 3;

/// Widest turn window accepted by [`crate::kernel_params::KernelParamsBuilder::build`]
pub const MAX_TURN_WINDOW: i32 = 32;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Length in millimetres
pub type Millimeter = f64;
/// Momentum in GeV/c
pub type GeV = f64;
/// Magnetic field in tesla
pub type Tesla = f64;
/// Signed curvature in 1/mm
pub type InverseMillimeter = f64;

/// Transverse radius per unit transverse momentum for a unit charge in the field `field`.
///
/// Arguments
/// ---------
/// * `field`: magnetic field strength along z (T).
///
/// Return
/// ------
/// * `alpha = UNIT_SCALE / (field · SPEED_OF_LIGHT)` in mm per GeV/c.
#[inline]
pub fn rigidity_alpha(field: Tesla) -> f64 {
    1.0 / (field * SPEED_OF_LIGHT) * UNIT_SCALE
}

#[cfg(test)]
mod constants_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rigidity_alpha() {
        // 1 GeV/c in 1 T bends on a 3.3356 m radius
        assert_relative_eq!(rigidity_alpha(1.0), 3335.640951981521, max_relative = 1e-12);
        assert_relative_eq!(
            rigidity_alpha(3.5),
            rigidity_alpha(1.0) / 3.5,
            max_relative = 1e-14
        );
    }
}
