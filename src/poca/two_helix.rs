use itertools::iproduct;
use log::debug;
use smallvec::{smallvec, SmallVec};

use super::{arc_length_at, Circle, IntersectionBranch, PocaResult};
use crate::{
    angles::phidomain, constants::Radian, helix::Helix, helix_errors::HelixError,
    kernel_params::KernelParams,
};

/// At most two `(φ₁, φ₂)` direction pairs, one per circle intersection.
type CandidatePairs = SmallVec<[(Radian, Radian); 2]>;

/// Angle at `own` centre between the line to the other centre and an intersection point.
fn intersection_half_angle(distance: f64, own_radius: f64, other_radius: f64) -> Radian {
    let cos_angle = (distance * distance - other_radius * other_radius
        + own_radius * own_radius)
        / (2.0 * distance * own_radius);
    cos_angle.clamp(-1.0, 1.0).acos()
}

/// Candidate direction pairs on both circles, and the branch they come from.
///
/// The first entry of each pair belongs to `first`. In the proper-intersection branch the
/// pairs are `(φ₁ + θ₁, φ₂ − θ₂)` and `(φ₁ − θ₁, φ₂ + θ₂)`: both members of a pair land on
/// the same crossing point. They are sorted by that point, `x` then `y`, which does not
/// depend on the order of the two circles.
fn candidate_pairs(
    first: &Circle,
    second: &Circle,
    parallel_hint: bool,
) -> (IntersectionBranch, CandidatePairs) {
    let distance = (second.center - first.center).norm();
    let base1 = first.facing_angle(&second.center);
    let base2 = second.facing_angle(&first.center);
    let (r1, r2) = (first.radius, second.radius);

    if !parallel_hint && (r1 - r2).abs() < distance && distance < r1 + r2 {
        let theta1 = intersection_half_angle(distance, r1, r2);
        let theta2 = intersection_half_angle(distance, r2, r1);
        let mut pairs: CandidatePairs = smallvec![
            (phidomain(base1 + theta1), phidomain(base2 - theta2)),
            (phidomain(base1 - theta1), phidomain(base2 + theta2)),
        ];

        // midpoint of both circles' points: bit-identical whichever circle comes first
        let crossing = |&(phi1, phi2): &(Radian, Radian)| {
            let point = (first.point_at(phi1) + second.point_at(phi2)) * 0.5;
            (point.x, point.y)
        };
        if crossing(&pairs[1]) < crossing(&pairs[0]) {
            pairs.swap(0, 1);
        }
        return (IntersectionBranch::Proper, pairs);
    }

    if distance < r1.max(r2) {
        debug!(
            "nested transverse circles (d = {distance:.4}, r1 = {r1:.4}, r2 = {r2:.4}, hint = {parallel_hint}), using approximate POCA"
        );
        // both points on the ray from the larger centre through the smaller one, which
        // amounts to turning the smaller circle's facing angle by π
        let offset = if r1 > r2 {
            second.center - first.center
        } else {
            first.center - second.center
        };
        let pair = (first.angle_along(&offset), second.angle_along(&offset));
        return (IntersectionBranch::Nested, smallvec![pair]);
    }

    if parallel_hint {
        debug!("parallel hint set on separated circles (d = {distance:.4}), using facing points");
    }
    (IntersectionBranch::Disjoint, smallvec![(base1, base2)])
}

/// Closest approach of two helices, with the reference turn window.
///
/// See [`helix_poca_with_params`].
pub fn helix_poca(
    first: &Helix,
    second: &Helix,
    parallel_hint: bool,
) -> Result<PocaResult, HelixError> {
    helix_poca_with_params(first, second, parallel_hint, &KernelParams::DEFAULT)
}

/// Closest approach of two helices.
///
/// The transverse candidates are the circle crossings when the circles properly intersect,
/// and the facing (or, for nested circles, aligned) points otherwise. For each candidate
/// every pair of turn numbers in `params.turn_window()` is tried and the one with the
/// smallest `|z₁ − z₂|` is kept, first one visited on ties.
///
/// Arguments
/// ---------
/// * `first`, `second`: the two helices.
/// * `parallel_hint`: skip the intersection branch, treating the tracks as non-crossing.
/// * `params`: turn window of the z-ambiguity scan.
///
/// Return
/// ------
/// * A [`PocaResult`]: midpoint vertex, 3D flight lengths on each helix, the distance
///   between the two helix points and the branch used. Outside
///   [`IntersectionBranch::Proper`] the vertex is an approximation and the separation is
///   the signal to use.
///
/// Errors
/// ------
/// * [`HelixError::DegenerateCurvature`] if either `omega` is zero or non-finite.
pub fn helix_poca_with_params(
    first: &Helix,
    second: &Helix,
    parallel_hint: bool,
    params: &KernelParams,
) -> Result<PocaResult, HelixError> {
    let circle1 = Circle::of(first)?;
    let circle2 = Circle::of(second)?;
    let (branch, candidates) = candidate_pairs(&circle1, &circle2, parallel_hint);

    let mut best: Option<(f64, f64, f64)> = None;
    for (&(phi1, phi2), turn1, turn2) in iproduct!(
        candidates.iter(),
        params.turn_window(),
        params.turn_window()
    ) {
        let s1 = arc_length_at(first, phi1, turn1);
        let s2 = arc_length_at(second, phi2, turn2);
        let dz = (first.z_at(s1) - second.z_at(s2)).abs();

        if best.map_or(true, |(best_dz, _, _)| dz < best_dz) {
            best = Some((dz, s1, s2));
        }
    }

    // a validated turn window is never empty, an unvalidated one falls back to turn 0
    let (_, s1, s2) = best.unwrap_or_else(|| {
        let (phi1, phi2) = candidates[0];
        (
            0.0,
            arc_length_at(first, phi1, 0),
            arc_length_at(second, phi2, 0),
        )
    });

    let point1 = first.position_at(s1)?;
    let point2 = second.position_at(s2)?;

    Ok(PocaResult {
        vertex: (point1 + point2) * 0.5,
        flight_length1: first.arc_length_3d(s1),
        flight_length2: second.arc_length_3d(s2),
        separation: (point1 - point2).norm(),
        branch,
    })
}
