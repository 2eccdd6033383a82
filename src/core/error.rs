use thiserror::Error;

/// Failures surfaced by a single engine computation.
///
/// None of these are fatal to the host: each is scoped to one call and
/// carries a message meant for display next to the control that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// The target is mathematically infeasible (negative discriminant,
    /// out-of-range target, etc.).
    #[error("No solution: {0}")]
    Domain(String),

    /// The query is underdetermined, e.g. the given quantity does not depend
    /// on the unknown.
    #[error("Not solvable: {0}")]
    NotSolvable(String),

    /// The given/solve-for combination makes no sense.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No physical flight time exists for the launch.
    #[error("Unreachable: {0}")]
    Unreachable(String),

    /// A parameter is outside its physical range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A root finder ran out of iterations. Only produced when the caller
    /// insists on convergence; otherwise the best estimate is used.
    #[error("No convergence after {iterations} iterations (best {value:.4}, residual {residual:.4})")]
    NoConvergence {
        value: f64,
        residual: f64,
        iterations: usize,
    },
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;

pub(crate) fn require_finite(value: f64, label: &str) -> KinematicsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KinematicsError::InvalidInput(format!(
            "{label} must be a finite number, got {value}."
        )))
    }
}

pub(crate) fn require_positive(value: f64, label: &str) -> KinematicsResult<f64> {
    require_finite(value, label)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(KinematicsError::InvalidInput(format!(
            "{label} must be greater than zero, got {value}."
        )))
    }
}

pub(crate) fn require_non_negative(value: f64, label: &str) -> KinematicsResult<f64> {
    require_finite(value, label)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(KinematicsError::InvalidInput(format!(
            "{label} cannot be negative, got {value}."
        )))
    }
}
