//! RosterForge MILP - binary integer programs and an exact solver
//!
//! This crate provides:
//! - A data-oriented [`Model`]: binary variables, a linear objective, and
//!   linear constraints stored as explicit `(variable, coefficient)` terms
//! - The [`MilpSolver`] trait, the seam between model construction and solving
//! - [`BranchAndBoundSolver`], a pure-Rust exact solver for binary programs
//! - Search limits (node count, wall clock, external cancellation)
//!
//! # Example
//!
//! ```
//! use rosterforge_milp::{
//!     BranchAndBoundSolver, ConstraintBounds, LinearConstraint, MilpSolver, Model, Sense,
//! };
//!
//! let mut model = Model::new("pick_two", Sense::Maximize);
//! let a = model.add_variable(3.0);
//! let b = model.add_variable(2.0);
//! let c = model.add_variable(4.0);
//! model.add_constraint(LinearConstraint::new(
//!     "cardinality",
//!     vec![(a, 1.0), (b, 1.0), (c, 1.0)],
//!     ConstraintBounds::equal(2.0),
//! ));
//!
//! let solution = BranchAndBoundSolver::new().solve(&model).unwrap();
//! assert_eq!(solution.objective(), Some(7.0));
//! assert_eq!(solution.value(b), Some(false));
//! ```

pub mod branch_and_bound;
pub mod error;
pub mod model;
pub mod solution;
pub mod statistics;
pub mod termination;

pub use branch_and_bound::{BranchAndBoundConfig, BranchAndBoundSolver};
pub use error::SolverError;
pub use model::{ConstraintBounds, LinearConstraint, Model, Sense, VarId};
pub use solution::Solution;
pub use statistics::SolveStatistics;
pub use termination::SearchLimits;

/// Solves binary integer programs.
///
/// Implementations must either prove optimality or prove infeasibility.
/// A search that cannot finish (limits, cancellation) is an error, never a
/// partial [`Solution`].
pub trait MilpSolver: Send + Sync {
    /// Solves the model to optimality.
    fn solve(&self, model: &Model) -> Result<Solution, SolverError>;

    /// Returns the solver name used in logs.
    fn solver_name(&self) -> &'static str;
}
