//! Error types for the MILP solver

use std::time::Duration;

use thiserror::Error;

/// Errors raised while validating or solving a model.
///
/// Infeasibility is not an error; it is reported as
/// [`Solution::Infeasible`](crate::Solution::Infeasible).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    /// The model references unknown variables or holds non-finite numbers.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The node limit was reached before optimality was proven.
    #[error("Node limit of {0} reached before the search completed")]
    NodeLimit(u64),

    /// The time limit was reached before optimality was proven.
    #[error("Time limit of {0:?} reached before the search completed")]
    TimeLimit(Duration),

    /// The search was cancelled through its external flag.
    #[error("Solver was cancelled")]
    Cancelled,
}
