//! # Point of closest approach
//!
//! This module finds vertex candidates as points of closest approach (POCA) between two
//! helices ([`two_helix::helix_poca`]) or between a helix and a fixed point
//! ([`helix_point::point_poca`]).
//!
//! ## Algorithm
//!
//! Both entry points share one core:
//!
//! 1. **Transverse geometry** – each helix is reduced to its transverse circle
//!    ([`Circle`]). The candidate direction on a circle is the one facing the other
//!    circle's centre (or the fixed point), corrected by the two-circle intersection
//!    half-angles when the circles properly intersect.
//! 2. **Turn ambiguity** – a transverse direction is reached once per turn, so every
//!    candidate maps to flight lengths `s + n·2π/|omega|`. Turn numbers are scanned over
//!    [`KernelParams::turn_window`](crate::kernel_params::KernelParams::turn_window)
//!    (`-1..=3` by default) and the combination with the smallest z mismatch wins.
//! 3. **Result** – positions are evaluated on the helices at the winning flight lengths;
//!    flight lengths are reported as 3D path lengths.
//!
//! ## Approximate branches
//!
//! When the transverse circles do not properly intersect the solver does not fail: it
//! returns the best estimate of the [`IntersectionBranch::Nested`] or
//! [`IntersectionBranch::Disjoint`] branch. Such a result is an approximation; consumers
//! should gate on [`PocaResult::separation`], which is large whenever the tracks do not
//! actually meet.
//!
//! ## Tie-breaking
//!
//! Candidates are visited in a fixed order (solution index, then the first helix's turn
//! number, then the second's, all ascending) and only a strictly smaller z mismatch
//! replaces the current best, so on ties the first combination visited wins. The two
//! crossings of the proper-intersection branch are indexed by their transverse point,
//! smaller `x` first (then smaller `y`), so swapping the helices visits them in the same
//! order.
use std::fmt;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    angles::phidomain,
    constants::{Millimeter, Radian, DPI},
    helix::Helix,
    helix_errors::HelixError,
};

pub mod helix_point;
pub mod two_helix;

/// Which transverse configuration produced a [`PocaResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntersectionBranch {
    /// The circles cross at two points; the result sits on one of them.
    Proper,
    /// One circle lies inside the other (or the parallel hint was set and the centres are
    /// closer than the larger radius). Approximation.
    Nested,
    /// The circles are apart or touch externally; the result faces across the gap.
    Disjoint,
}

/// Closest approach between two helices.
///
/// Fields
/// ------
/// * `vertex`: midpoint of the two helix points (mm).
/// * `flight_length1`, `flight_length2`: signed 3D path lengths from each perigee (mm).
/// * `separation`: distance between the two helix points (mm), the quality of the vertex.
/// * `branch`: transverse configuration the result comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PocaResult {
    pub vertex: Vector3<f64>,
    pub flight_length1: Millimeter,
    pub flight_length2: Millimeter,
    pub separation: Millimeter,
    pub branch: IntersectionBranch,
}

/// Closest approach between a helix and a fixed point.
///
/// Fields
/// ------
/// * `vertex`: the point on the helix (mm).
/// * `flight_length`: signed 3D path length from the perigee (mm).
/// * `separation`: distance from `vertex` to the fixed point (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPocaResult {
    pub vertex: Vector3<f64>,
    pub flight_length: Millimeter,
    pub separation: Millimeter,
}

/// Transverse projection of a helix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circle {
    pub(crate) center: Vector2<f64>,
    pub(crate) radius: Millimeter,
    charge: f64,
}

impl Circle {
    pub(crate) fn of(helix: &Helix) -> Result<Self, HelixError> {
        let charge = helix.charge_sign()?.value();
        Ok(Self {
            center: helix.center()?,
            radius: helix.radius()?.abs(),
            charge,
        })
    }

    /// Helix direction `φ` at which the circle point faces `target` from the centre.
    ///
    /// A helix point sits at `centre + q·R·(−sin φ, cos φ)`, hence the
    /// `atan2(−q·Δx, q·Δy)`: `−atan2(Δx, Δy)` for a positive charge and its
    /// complement `±π` for a negative one.
    pub(crate) fn facing_angle(&self, target: &Vector2<f64>) -> Radian {
        self.angle_along(&(target - self.center))
    }

    /// Transverse point of the circle where the helix travels along `phi`.
    pub(crate) fn point_at(&self, phi: Radian) -> Vector2<f64> {
        let (sin_phi, cos_phi) = phi.sin_cos();
        self.center + Vector2::new(-sin_phi, cos_phi) * (self.charge * self.radius)
    }

    /// Helix direction `φ` at which the circle point lies along `offset` from the centre.
    pub(crate) fn angle_along(&self, offset: &Vector2<f64>) -> Radian {
        phidomain((-self.charge * offset.x).atan2(self.charge * offset.y))
    }
}

/// Transverse arc length at which `helix` points along `phi`, shifted by `turn` full turns.
///
/// Turn 0 is the arc within half a turn of the perigee; positive turns are further along
/// the direction of motion.
#[inline]
pub(crate) fn arc_length_at(helix: &Helix, phi: Radian, turn: i32) -> Millimeter {
    phidomain(helix.phi0 - phi) / helix.omega + f64::from(turn) * DPI / helix.omega.abs()
}

impl fmt::Display for IntersectionBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntersectionBranch::Proper => "proper intersection",
            IntersectionBranch::Nested => "nested circles (approximate)",
            IntersectionBranch::Disjoint => "disjoint circles (approximate)",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PocaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "POCA vertex=({:.4}, {:.4}, {:.4}) mm, s1={:.4} mm, s2={:.4} mm, separation={:.3e} mm [{}]",
            self.vertex.x,
            self.vertex.y,
            self.vertex.z,
            self.flight_length1,
            self.flight_length2,
            self.separation,
            self.branch
        )
    }
}

impl fmt::Display for PointPocaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "POCA vertex=({:.4}, {:.4}, {:.4}) mm, s={:.4} mm, separation={:.3e} mm",
            self.vertex.x, self.vertex.y, self.vertex.z, self.flight_length, self.separation
        )
    }
}
