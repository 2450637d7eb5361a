use thiserror::Error;

/// Errors raised by the helix kernel.
///
/// A closest-approach search that finds no proper circle intersection is not an error:
/// it is reported through [`crate::poca::IntersectionBranch`] and the separation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HelixError {
    #[error("Degenerate curvature: omega = {0} (zero or non-finite)")]
    DegenerateCurvature(f64),

    #[error("Invalid magnetic field strength: {0} T (must be positive and finite)")]
    InvalidFieldStrength(f64),

    #[error("Numeric Jacobian diverged at row {row}, column {column}")]
    NumericDivergence { row: usize, column: usize },

    #[error("Invalid kernel parameter: {0}")]
    InvalidKernelParameter(String),
}

#[cfg(test)]
mod helix_errors_test {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HelixError::DegenerateCurvature(0.0).to_string(),
            "Degenerate curvature: omega = 0 (zero or non-finite)"
        );
        assert_eq!(
            HelixError::NumericDivergence { row: 2, column: 3 }.to_string(),
            "Numeric Jacobian diverged at row 2, column 3"
        );
    }
}
