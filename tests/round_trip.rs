mod common;

use approx::assert_relative_eq;
use common::{random_helix, random_state, seeded_rng, FIELDS};
use rand::Rng;
use trackhelix::{phidomain, Helix};

#[test]
fn state_to_helix_and_back() {
    let mut rng = seeded_rng();
    for _ in 0..500 {
        let state = random_state(&mut rng);
        for field in FIELDS {
            let (helix, arc_length) = Helix::from_cartesian(&state, field).unwrap();
            let back = helix.to_cartesian(arc_length, field).unwrap();

            assert_eq!(back.charge, state.charge);
            assert_relative_eq!(back.position, state.position, epsilon = 1e-9, max_relative = 1e-9);
            assert_relative_eq!(back.momentum, state.momentum, epsilon = 1e-9, max_relative = 1e-9);
        }
    }
}

#[test]
fn helix_to_state_and_back() {
    let mut rng = seeded_rng();
    for _ in 0..500 {
        let helix = random_helix(&mut rng);
        let arc_length = rng.random_range(-100.0..100.0);
        let field = 3.0;

        let state = helix.to_cartesian(arc_length, field).unwrap();
        let (rebuilt, rebuilt_arc) = Helix::from_cartesian(&state, field).unwrap();

        assert_relative_eq!(rebuilt.d0, helix.d0, epsilon = 1e-8);
        assert_relative_eq!(phidomain(rebuilt.phi0 - helix.phi0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(rebuilt.omega, helix.omega, max_relative = 1e-9);
        assert_relative_eq!(rebuilt.z0, helix.z0, epsilon = 1e-8);
        assert_relative_eq!(rebuilt.tan_lambda, helix.tan_lambda, epsilon = 1e-10);
        assert_relative_eq!(rebuilt_arc, arc_length, epsilon = 1e-8);
    }
}

#[test]
fn perigee_lies_on_the_helix() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let state = random_state(&mut rng);
        let (helix, _) = Helix::from_cartesian(&state, 3.5).unwrap();
        let perigee = helix.position_at(0.0).unwrap();

        let (sin_phi0, cos_phi0) = helix.phi0.sin_cos();
        assert_relative_eq!(perigee.x, -helix.d0 * sin_phi0, epsilon = 1e-9);
        assert_relative_eq!(perigee.y, helix.d0 * cos_phi0, epsilon = 1e-9);
        assert_relative_eq!(perigee.z, helix.z0, epsilon = 1e-9);
        assert!(helix.phi0 > -std::f64::consts::PI && helix.phi0 <= std::f64::consts::PI);
    }
}
