//! # Kernel tuning parameters
//!
//! This module defines [`KernelParams`], the small set of numerical knobs shared by the
//! Jacobian builders and the closest-approach solver, together with its validating
//! builder [`KernelParamsBuilder`].
//!
//! ## Parameters
//!
//! - `numeric_step` – forward-difference step of the numeric Jacobian (natural units).
//! - `turn_min`, `turn_max` – inclusive window of turn numbers scanned when resolving the
//!   periodic z ambiguity of a helix.
//!
//! The [`Default`] values reproduce the fixed constants of the kernel
//! (`numeric_step = 1e-5`, turns `-1..=3`), so callers that never touch this module get
//! the reference behaviour.
//!
//! ## Example
//!
//! ```rust
//! use trackhelix::kernel_params::KernelParams;
//!
//! let params = KernelParams::builder()
//!     .numeric_step(1e-6)
//!     .turn_window(-2, 4)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.turn_window().count(), 7);
//! ```
use std::cmp::Ordering::Greater;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{MAX_TURN_WINDOW, NUMERIC_JACOBIAN_STEP, TURN_WINDOW_MAX, TURN_WINDOW_MIN},
    helix_errors::HelixError,
};

/// Numerical parameters of the helix kernel.
///
/// Fields
/// -----------------
/// * `numeric_step` – forward-difference step used by
///   [`numeric_jacobian`](crate::jacobian::numeric::numeric_jacobian).
/// * `turn_min` – first turn number of the z-ambiguity scan.
/// * `turn_max` – last turn number (inclusive) of the z-ambiguity scan.
///
/// Defaults
/// -----------------
/// * `numeric_step`: 1.0e-5
/// * `turn_min`: -1
/// * `turn_max`: 3
///
/// See also
/// -----------------
/// * [`KernelParamsBuilder::build`] – validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    pub numeric_step: f64,
    pub turn_min: i32,
    pub turn_max: i32,
}

impl KernelParams {
    /// Reference parameters, usable in `const` context.
    pub const DEFAULT: KernelParams = KernelParams {
        numeric_step: NUMERIC_JACOBIAN_STEP,
        turn_min: TURN_WINDOW_MIN,
        turn_max: TURN_WINDOW_MAX,
    };

    /// Equivalent to [`KernelParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> KernelParamsBuilder {
        KernelParamsBuilder::new()
    }

    /// Turn numbers scanned by the closest-approach solver, ascending.
    #[inline]
    pub fn turn_window(&self) -> RangeInclusive<i32> {
        self.turn_min..=self.turn_max
    }
}

impl Default for KernelParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`KernelParams`], with validation.
#[derive(Debug, Clone)]
pub struct KernelParamsBuilder {
    params: KernelParams,
}

impl Default for KernelParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: KernelParams::default(),
        }
    }

    pub fn numeric_step(mut self, v: f64) -> Self {
        self.params.numeric_step = v;
        self
    }

    pub fn turn_window(mut self, min: i32, max: i32) -> Self {
        self.params.turn_min = min;
        self.params.turn_max = max;
        self
    }

    /// Return true iff x > 0.0, finite and comparable.
    #[inline]
    fn finite_gt0(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `numeric_step` must be finite and strictly positive.
    /// * `turn_min <= turn_max` – the window may not be empty.
    /// * `turn_max - turn_min < MAX_TURN_WINDOW` – the scan stays a small bounded loop.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(KernelParams)` when every rule holds.
    /// * `Err(HelixError::InvalidKernelParameter)` naming the first rule that fails.
    pub fn build(self) -> Result<KernelParams, HelixError> {
        let p = &self.params;

        if !Self::finite_gt0(p.numeric_step) {
            return Err(HelixError::InvalidKernelParameter(
                "numeric_step must be finite and > 0".into(),
            ));
        }
        if p.turn_min > p.turn_max {
            return Err(HelixError::InvalidKernelParameter(
                "require turn_min <= turn_max".into(),
            ));
        }
        if i64::from(p.turn_max) - i64::from(p.turn_min) >= i64::from(MAX_TURN_WINDOW) {
            return Err(HelixError::InvalidKernelParameter(format!(
                "turn window wider than {MAX_TURN_WINDOW} turns"
            )));
        }

        Ok(self.params)
    }
}

impl fmt::Display for KernelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Helix Kernel Parameters")?;
            writeln!(f, "-----------------------")?;
            writeln!(
                f,
                "  numeric_step = {:<12.1e}  # Forward-difference step of the numeric Jacobian",
                self.numeric_step
            )?;
            writeln!(
                f,
                "  turn_window  = {:<12}  # Turn numbers scanned for the z ambiguity",
                format!("{}..={}", self.turn_min, self.turn_max)
            )
        } else {
            write!(
                f,
                "KernelParams(numeric_step={:.1e}, turns={}..={})",
                self.numeric_step, self.turn_min, self.turn_max
            )
        }
    }
}

#[cfg(test)]
mod kernel_params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = KernelParams::default();
        assert_eq!(params.numeric_step, 1e-5);
        assert_eq!(params.turn_window().collect::<Vec<_>>(), vec![-1, 0, 1, 2, 3]);
        assert_eq!(KernelParams::builder().build().unwrap(), params);
    }

    #[test]
    fn test_builder_rejects_bad_step() {
        for step in [0.0, -1e-5, f64::NAN, f64::INFINITY] {
            let res = KernelParams::builder().numeric_step(step).build();
            assert!(matches!(res, Err(HelixError::InvalidKernelParameter(_))));
        }
    }

    #[test]
    fn test_builder_rejects_bad_window() {
        assert_eq!(
            KernelParams::builder().turn_window(2, 1).build(),
            Err(HelixError::InvalidKernelParameter(
                "require turn_min <= turn_max".into()
            ))
        );
        assert!(KernelParams::builder().turn_window(-20, 20).build().is_err());
        assert!(KernelParams::builder().turn_window(0, 0).build().is_ok());
    }

    #[test]
    fn test_display() {
        let params = KernelParams::default();
        assert_eq!(
            params.to_string(),
            "KernelParams(numeric_step=1.0e-5, turns=-1..=3)"
        );
        assert!(format!("{params:#}").contains("turn_window  = -1..=3"));
    }
}
