use nalgebra::Vector3;

use super::{arc_length_at, Circle, PointPocaResult};
use crate::{helix::Helix, helix_errors::HelixError, kernel_params::KernelParams};

/// Closest approach of a helix to a fixed point, with the reference turn window.
///
/// See [`point_poca_with_params`].
pub fn point_poca(helix: &Helix, point: &Vector3<f64>) -> Result<PointPocaResult, HelixError> {
    point_poca_with_params(helix, point, &KernelParams::DEFAULT)
}

/// Closest approach of a helix to a fixed point.
///
/// The transverse candidate is the circle point facing `point` from the circle centre;
/// the turn whose z is nearest to `point.z` is kept, first one visited on ties.
///
/// Arguments
/// ---------
/// * `helix`: the track.
/// * `point`: a fixed position, typically a beam spot or a primary vertex (mm).
/// * `params`: turn window of the z-ambiguity scan.
///
/// Return
/// ------
/// * A [`PointPocaResult`] whose vertex is the helix point itself.
///
/// Errors
/// ------
/// * [`HelixError::DegenerateCurvature`] if `omega` is zero or non-finite.
pub fn point_poca_with_params(
    helix: &Helix,
    point: &Vector3<f64>,
    params: &KernelParams,
) -> Result<PointPocaResult, HelixError> {
    let circle = Circle::of(helix)?;
    let phi = circle.facing_angle(&point.xy());

    let arc_length = params
        .turn_window()
        .map(|turn| arc_length_at(helix, phi, turn))
        .fold(None, |best: Option<(f64, f64)>, s| {
            let dz = (helix.z_at(s) - point.z).abs();
            match best {
                Some((best_dz, _)) if best_dz <= dz => best,
                _ => Some((dz, s)),
            }
        })
        .map_or_else(|| arc_length_at(helix, phi, 0), |(_, s)| s);

    let vertex = helix.position_at(arc_length)?;
    Ok(PointPocaResult {
        vertex,
        flight_length: helix.arc_length_3d(arc_length),
        separation: (vertex - point).norm(),
    })
}

#[cfg(test)]
mod helix_point_test {
    use super::*;
    use crate::constants::DPI;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_on_helix() {
        let helix = Helix::new(3.0, -0.4, -1.0 / 600.0, 2.0, 0.25);
        let s = 150.0;
        let target = helix.position_at(s).unwrap();

        let poca = point_poca(&helix, &target).unwrap();
        assert!(poca.separation < 1e-8);
        assert_relative_eq!(poca.vertex, target, epsilon = 1e-8);
        assert_relative_eq!(poca.flight_length, helix.arc_length_3d(s), max_relative = 1e-10);
    }

    #[test]
    fn test_origin_gives_perigee() {
        let helix = Helix::new(-1.5, 2.2, 1.0 / 800.0, -4.0, 0.3);
        let poca = point_poca(&helix, &Vector3::new(0.0, 0.0, -4.0)).unwrap();

        assert_relative_eq!(poca.flight_length, 0.0, epsilon = 1e-9);
        assert_relative_eq!(poca.separation, 1.5, max_relative = 1e-9);
    }

    #[test]
    fn test_picks_turn_nearest_in_z() {
        let radius = 400.0;
        let helix = Helix::new(0.0, 0.0, 1.0 / radius, 0.0, 0.05);
        // same transverse point, two turns further along
        let s = 2.0 * DPI * radius + 10.0;
        let target = helix.position_at(s).unwrap();

        let poca = point_poca(&helix, &target).unwrap();
        assert_relative_eq!(poca.flight_length, helix.arc_length_3d(s), max_relative = 1e-10);
        assert!(poca.separation < 1e-8);
    }

    #[test]
    fn test_narrow_window_misses_far_turn() {
        let radius = 400.0;
        let helix = Helix::new(0.0, 0.0, 1.0 / radius, 0.0, 0.05);
        let target = helix.position_at(2.0 * DPI * radius + 10.0).unwrap();
        let params = KernelParams::builder().turn_window(0, 0).build().unwrap();

        let poca = point_poca_with_params(&helix, &target, &params).unwrap();
        assert_relative_eq!(poca.separation, 0.05 * 2.0 * DPI * radius, max_relative = 1e-8);
    }

    #[test]
    fn test_degenerate_curvature() {
        let straight = Helix::new(0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            point_poca(&straight, &Vector3::zeros()),
            Err(HelixError::DegenerateCurvature(_))
        ));
    }
}
