//! Exact branch-and-bound for binary programs.
//!
//! The search is depth first, trying 1 before 0. Variables are branched on
//! in order of decreasing weight, priced by the budget multiplier that gives
//! the tightest root bound. Each child goes through three checks:
//! - every constraint touched by the branching variable must still be
//!   satisfiable by some setting of the free variables;
//! - a laminar capacity bound with Lagrangian budget terms must beat the
//!   incumbent;
//! - a grouped knapsack relaxation must be feasible and beat the incumbent.
//!
//! When the variables attaining the knapsack bound satisfy the whole model,
//! they are recorded as a leaf and the child is closed without branching.
//!
//! Ties are resolved by keeping the first optimum found, which makes the
//! result a deterministic function of the model.

mod bounder;
mod knapsack;
mod problem;

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::SolverError;
use crate::model::Model;
use crate::solution::Solution;
use crate::statistics::SolveStatistics;
use crate::termination::SearchLimits;
use crate::MilpSolver;

use bounder::Bounder;
use knapsack::{KnapsackScratch, Relaxed};
use problem::{NodeState, SearchProblem};

/// Minimum objective gain for a node to count as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Default wall-clock limit for one solve.
const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Configuration for the branch-and-bound solver.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchAndBoundConfig {
    /// Maximum number of nodes to explore (None = unlimited).
    pub node_limit: Option<u64>,
    /// Maximum wall-clock time per solve (None = unlimited).
    pub time_limit: Option<Duration>,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            time_limit: Some(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS)),
        }
    }
}

/// Exact solver for binary programs.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rosterforge_milp::{BranchAndBoundConfig, BranchAndBoundSolver, MilpSolver, Model, Sense};
///
/// let solver = BranchAndBoundSolver::with_config(BranchAndBoundConfig {
///     node_limit: Some(1_000_000),
///     time_limit: Some(Duration::from_secs(5)),
/// });
///
/// let mut model = Model::new("empty", Sense::Maximize);
/// model.add_variable(1.0);
/// let solution = solver.solve(&model).unwrap();
/// assert_eq!(solution.objective(), Some(1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    config: BranchAndBoundConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl BranchAndBoundSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BranchAndBoundConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attaches a flag that aborts any running solve once set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }

    fn limits(&self) -> SearchLimits {
        let mut limits = SearchLimits::none();
        if let Some(nodes) = self.config.node_limit {
            limits = limits.with_node_limit(nodes);
        }
        if let Some(time) = self.config.time_limit {
            limits = limits.with_time_limit(time);
        }
        if let Some(flag) = &self.cancel {
            limits = limits.with_cancel_flag(Arc::clone(flag));
        }
        limits
    }

    /// Solves the model and returns the search statistics alongside.
    pub fn solve_with_statistics(
        &self,
        model: &Model,
    ) -> Result<(Solution, SolveStatistics), SolverError> {
        model.validate()?;

        let problem = SearchProblem::new(model);
        let bounder = Bounder::new(&problem);
        let limits = self.limits();

        debug!(
            event = "milp_start",
            model = model.name(),
            variable_count = model.variable_count() as u64,
            constraint_count = model.constraint_count() as u64,
            fixed_count = model.fixed_count() as u64,
            capacity_rows = bounder.family_size() as u64,
            relaxations = bounder.relaxation_count() as u64,
            groups = bounder.group_count() as u64,
        );

        let mut search = Search::new(&problem, &bounder, &limits);
        search.stats.start();
        let outcome = search.run();
        search.stats.finish();
        let stats = search.stats.clone();

        debug!(
            event = "milp_end",
            model = model.name(),
            nodes = stats.nodes_explored,
            pruned_by_bound = stats.pruned_by_bound,
            pruned_by_feasibility = stats.pruned_by_feasibility,
            incumbents = stats.incumbents_found,
            closed_by_relaxation = stats.closed_by_relaxation,
            duration_ms = stats.duration.as_millis() as u64,
            nodes_per_second = stats.nodes_per_second(),
            completed = outcome.is_ok(),
        );
        outcome?;

        let solution = match search.best {
            Some(values) => {
                let objective = model.evaluate(&values);
                Solution::Optimal { values, objective }
            }
            None => Solution::Infeasible,
        };
        Ok((solution, stats))
    }
}

impl MilpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &Model) -> Result<Solution, SolverError> {
        self.solve_with_statistics(model).map(|(solution, _)| solution)
    }

    fn solver_name(&self) -> &'static str {
        "BranchAndBound"
    }
}

/// Mutable state of one depth-first search.
struct Search<'a> {
    problem: &'a SearchProblem,
    bounder: &'a Bounder,
    limits: &'a SearchLimits,
    order: Vec<usize>,
    state: NodeState,
    capacity: Vec<i64>,
    knapsack: KnapsackScratch,
    stats: SolveStatistics,
    best_objective: f64,
    best: Option<Vec<bool>>,
}

impl Debug for Search<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("depth_limit", &self.order.len())
            .field("best_objective", &self.best_objective)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a> Search<'a> {
    fn new(problem: &'a SearchProblem, bounder: &'a Bounder, limits: &'a SearchLimits) -> Self {
        Self {
            problem,
            bounder,
            limits,
            order: Vec::new(),
            state: NodeState::new(problem),
            capacity: Vec::new(),
            knapsack: KnapsackScratch::default(),
            stats: SolveStatistics::default(),
            best_objective: f64::NEG_INFINITY,
            best: None,
        }
    }

    fn run(&mut self) -> Result<(), SolverError> {
        for (var, fixed) in self.problem.fixed.iter().enumerate() {
            if let Some(value) = *fixed {
                self.state.assign(self.problem, var, value);
            }
        }
        if !self.state.all_rows_satisfiable(self.problem) {
            return Ok(());
        }
        self.order = self
            .bounder
            .branching_order(self.problem, &self.state, &mut self.capacity);
        self.explore(0)
    }

    fn improves(&self, value: f64) -> bool {
        self.best.is_none() || value > self.best_objective + IMPROVEMENT_EPSILON
    }

    fn explore(&mut self, depth: usize) -> Result<(), SolverError> {
        self.limits.check(&self.stats)?;
        self.stats.record_node();

        let Some(&var) = self.order.get(depth) else {
            self.record_leaf();
            return Ok(());
        };

        for value in [true, false] {
            self.state.assign(self.problem, var, value);
            if self.state.column_satisfiable(self.problem, var) {
                self.visit(depth + 1)?;
            } else {
                self.stats.record_feasibility_prune();
            }
            self.state.unassign(self.problem, var);
        }
        Ok(())
    }

    /// Bounds the current node and explores it if it can still improve.
    fn visit(&mut self, depth: usize) -> Result<(), SolverError> {
        let bound = self
            .bounder
            .optimistic_bound(self.problem, &self.state, &mut self.capacity);
        if !self.improves(bound) {
            self.stats.record_bound_prune();
            return Ok(());
        }

        let relaxed = self
            .bounder
            .refine(self.problem, &self.state, bound, &mut self.knapsack);
        match relaxed {
            Relaxed::Infeasible => self.stats.record_feasibility_prune(),
            Relaxed::Bound { value, .. } if !self.improves(value) => {
                self.stats.record_bound_prune();
            }
            Relaxed::Bound { attained, .. } => {
                if attained && self.complete_from_relaxation() {
                    self.stats.record_relaxation_close();
                } else {
                    self.explore(depth)?;
                }
            }
        }
        Ok(())
    }

    /// Sets the variables attaining the knapsack bound and records the result
    /// if it satisfies every row. Nothing below the node can do better.
    fn complete_from_relaxation(&mut self) -> bool {
        let chosen = std::mem::take(&mut self.knapsack.chosen);
        for &var in &chosen {
            self.state.assign(self.problem, var, true);
        }
        let feasible = self.state.rows_hold(self.problem);
        if feasible {
            self.record_leaf();
        }
        for &var in chosen.iter().rev() {
            self.state.unassign(self.problem, var);
        }
        self.knapsack.chosen = chosen;
        feasible
    }

    fn record_leaf(&mut self) {
        let objective = self.state.objective;
        if self.improves(objective) {
            trace!(
                event = "incumbent",
                objective = objective,
                nodes = self.stats.nodes_explored,
            );
            self.best_objective = objective;
            self.best = Some(self.state.values());
            self.stats.record_incumbent();
        }
    }
}
