#![allow(dead_code)]

use std::f64::consts::PI;

use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use trackhelix::{CartesianState, ChargeSign, Helix, Jacobian};

pub const FIELDS: [f64; 3] = [2.0, 3.0, 3.5];

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_7a0c)
}

fn random_charge(rng: &mut StdRng) -> ChargeSign {
    if rng.random_bool(0.5) {
        ChargeSign::Positive
    } else {
        ChargeSign::Negative
    }
}

/// A state near the beam line: |x|, |y| ≤ 10 mm, pt in [0.5, 5] GeV/c.
pub fn random_state(rng: &mut StdRng) -> CartesianState {
    let position = Vector3::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-50.0..50.0),
    );
    let pt: f64 = rng.random_range(0.5..5.0);
    let phi: f64 = rng.random_range(-PI..PI);
    let momentum = Vector3::new(pt * phi.cos(), pt * phi.sin(), rng.random_range(-2.0..2.0));
    CartesianState::new(position, momentum, random_charge(rng))
}

/// A helix with a perigee close to the beam line and a radius in [500, 5000] mm.
pub fn random_helix(rng: &mut StdRng) -> Helix {
    let radius: f64 = rng.random_range(500.0..5000.0);
    let sign = random_charge(rng).value();
    Helix::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-PI..PI),
        sign / radius,
        rng.random_range(-50.0..50.0),
        rng.random_range(-1.5..1.5),
    )
}

/// Two states leaving the same position, with independent momenta.
pub fn random_vertex_pair(rng: &mut StdRng) -> (CartesianState, CartesianState) {
    let first = random_state(rng);
    let mut second = random_state(rng);
    second.position = first.position;
    (first, second)
}

/// Entry-wise `|a − b| ≤ tolerance · (1 + |a|)`, reporting the first offending entry.
pub fn assert_jacobian_close(actual: &Jacobian, reference: &Jacobian, tolerance: f64) {
    for row in 0..5 {
        for column in 0..6 {
            let a = actual[(row, column)];
            let b = reference[(row, column)];
            assert!(
                (a - b).abs() <= tolerance * (1.0 + a.abs()),
                "entry ({row}, {column}): {a} vs {b}\nactual = {actual}\nreference = {reference}"
            );
        }
    }
}
