use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use trackhelix::{constants::DPI, phidomain};

#[test]
fn wrapped_angles_stay_in_the_principal_domain() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..10_000 {
        let angle: f64 = rng.random_range(-1e3..1e3);
        let wrapped = phidomain(angle);

        assert!(wrapped > -PI && wrapped <= PI, "{angle} -> {wrapped}");
        let turns = ((angle - wrapped) / DPI).round();
        assert_abs_diff_eq!(angle - wrapped, turns * DPI, epsilon = 1e-9);
    }
}

#[test]
fn wrapping_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..10_000 {
        let once = phidomain(rng.random_range(-50.0..50.0));
        assert_eq!(phidomain(once), once);
    }
}

#[test]
fn shifting_by_whole_turns_is_invisible() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..1_000 {
        let base: f64 = rng.random_range(-3.0..3.0);
        let turns = f64::from(rng.random_range(-20..=20));
        assert_abs_diff_eq!(phidomain(base + turns * DPI), base, epsilon = 1e-12);
    }
}
