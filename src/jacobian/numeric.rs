use super::{rows::OMEGA, rows::PHI0, rows::Z0, Jacobian};
use crate::{
    angles::phidomain,
    constants::{Tesla, DPI},
    helix::{CartesianState, Helix},
    helix_errors::HelixError,
};

/// Forward-difference Jacobian of the state → helix map.
///
/// Each Cartesian component is shifted by `step`, the helix is rebuilt with
/// [`Helix::from_cartesian`] and `(helix(shifted) − helix(state)) / step` fills the
/// corresponding column. The `phi0` difference is taken modulo 2π so that a state whose
/// perigee direction sits near ±π does not produce a spurious 2π/step entry. Likewise a
/// state about half a turn from its perigee has its shifted arc length brought back to
/// the reference turn before the `z0` difference is taken.
///
/// Arguments
/// ---------
/// * `state`: the Cartesian linearization point.
/// * `field`: magnetic field strength along z (T).
/// * `step`: finite-difference step, the same for positions (mm) and momenta (GeV/c).
///
/// Errors
/// ------
/// * [`HelixError::InvalidKernelParameter`] if `step` is not finite and positive.
/// * Any error of [`Helix::from_cartesian`] on the unshifted state.
/// * [`HelixError::NumericDivergence`] if a shifted state is degenerate or an entry is not finite.
pub fn numeric_jacobian(
    state: &CartesianState,
    field: Tesla,
    step: f64,
) -> Result<Jacobian, HelixError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(HelixError::InvalidKernelParameter(format!(
            "numeric Jacobian step must be finite and > 0, got {step}"
        )));
    }

    let (reference, reference_arc) = Helix::from_cartesian(state, field)?;
    let reference = reference.to_vector();
    let components = state.to_array();

    let mut jacobian = Jacobian::zeros();
    for column in 0..6 {
        let mut shifted = components;
        shifted[column] += step;

        let (helix, arc) =
            Helix::from_cartesian(&CartesianState::from_array(&shifted, state.charge), field)
                .map_err(|_| HelixError::NumericDivergence { row: OMEGA, column })?;

        let mut delta = helix.to_vector() - reference;
        delta[PHI0] = phidomain(delta[PHI0]);

        // arc lengths live in (-πR, πR]: undo a jump across the half-turn boundary
        let turn = DPI / helix.omega.abs();
        let jumped_turns = ((arc - reference_arc) / turn).round();
        if jumped_turns != 0.0 {
            delta[Z0] += jumped_turns * turn * helix.tan_lambda;
        }
        let derivative = delta / step;

        if let Some(row) = derivative.iter().position(|v| !v.is_finite()) {
            return Err(HelixError::NumericDivergence { row, column });
        }
        jacobian.set_column(column, &derivative);
    }

    Ok(jacobian)
}
