//! Error types for RosterForge

use thiserror::Error;

/// Main error type for lineup generation.
///
/// Configuration and data errors are raised before any solve. An empty batch
/// is reported as [`LineupError::Infeasible`], never as an empty success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineupError {
    /// Malformed or out-of-range request or roster parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid player data, or nothing left to choose from
    #[error("Data error: {0}")]
    Data(String),

    /// No lineup satisfies the constraints
    #[error("No lineup: {0}")]
    Infeasible(String),

    /// The solver failed before reaching a definitive answer
    #[error("Solver error: {0}")]
    Solver(String),
}

/// Result type alias for lineup operations
pub type Result<T> = std::result::Result<T, LineupError>;
