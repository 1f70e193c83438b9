//! The batch loop.

use std::time::Instant;

use tracing::{debug, info, warn};

use rosterforge_config::GeneratorConfig;
use rosterforge_core::{
    Batch, BatchRequest, BatchStatus, Lineup, LineupError, PartialReason, PlayerTable, Result,
};
use rosterforge_milp::{BranchAndBoundConfig, BranchAndBoundSolver, MilpSolver};

use crate::builder::build_model;
use crate::extractor::extract;
use crate::state::BatchState;

/// Produces batches of distinct lineups.
///
/// Each call to [`generate`](Self::generate) owns its own [`BatchState`]; a
/// generator holds no state between calls and can serve concurrent requests
/// over a shared table.
#[derive(Debug, Clone)]
pub struct LineupGenerator<S: MilpSolver = BranchAndBoundSolver> {
    solver: S,
}

impl LineupGenerator<BranchAndBoundSolver> {
    /// Creates a generator backed by the default branch-and-bound solver.
    pub fn new() -> Self {
        Self::with_solver(BranchAndBoundSolver::new())
    }

    /// Creates a generator whose solver honors the `[termination]` limits.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let defaults = BranchAndBoundConfig::default();
        Self::with_solver(BranchAndBoundSolver::with_config(BranchAndBoundConfig {
            node_limit: config.node_limit().or(defaults.node_limit),
            time_limit: config.time_limit().or(defaults.time_limit),
        }))
    }
}

impl Default for LineupGenerator<BranchAndBoundSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MilpSolver> LineupGenerator<S> {
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Generates up to `request.count` distinct lineups.
    ///
    /// The loop stops early when an attempt is infeasible or the attempt
    /// budget (`count × attempt_multiplier`) runs out; the batch status
    /// records which.
    ///
    /// # Errors
    ///
    /// - [`LineupError::Config`] if the request is invalid
    /// - [`LineupError::Data`] if no players remain after exclusions
    /// - [`LineupError::Solver`] if the solver fails; nothing from the failed
    ///   attempt is kept
    /// - [`LineupError::Infeasible`] if not a single lineup was produced
    pub fn generate(&self, table: &PlayerTable, request: &BatchRequest) -> Result<Batch> {
        request.validate()?;
        let config = &request.configuration;

        let pool = table.without(&config.excluded);
        if pool.is_empty() {
            return Err(LineupError::Data(
                "no players available after exclusions".to_string(),
            ));
        }
        if let Some(locked) = &config.locked {
            if pool.index_of(locked).is_none() {
                warn!(event = "lock_ignored", player = %locked);
            }
        }

        let attempt_budget = config.attempt_budget(request.count);
        let started = Instant::now();
        info!(
            event = "batch_start",
            requested = request.count as u64,
            pool_size = pool.len() as u64,
            excluded = (table.len() - pool.len()) as u64,
            attempt_budget = attempt_budget as u64,
            solver = self.solver.solver_name(),
        );

        let mut state = BatchState::new();
        let mut lineups: Vec<Lineup> = Vec::with_capacity(request.count);
        let mut attempts = 0;
        let mut status = BatchStatus::Partial {
            reason: PartialReason::AttemptBudget,
        };

        while attempts < attempt_budget {
            attempts += 1;
            let model = build_model(&pool, config, &state, request.count);
            debug!(
                event = "attempt",
                attempt = attempts as u64,
                variables = model.variable_count() as u64,
                constraints = model.constraint_count() as u64,
                fixed = model.fixed_count() as u64,
            );

            let solution = self
                .solver
                .solve(&model)
                .map_err(|e| LineupError::Solver(e.to_string()))?;

            let Some(lineup) = extract(&pool, &solution) else {
                debug!(event = "attempt_infeasible", attempt = attempts as u64);
                status = BatchStatus::Partial {
                    reason: PartialReason::Exhausted,
                };
                break;
            };

            if state.contains_selection(lineup.names()) {
                warn!(event = "duplicate_lineup", attempt = attempts as u64);
                continue;
            }

            state.record(&lineup);
            info!(
                event = "lineup",
                index = lineups.len() as u64 + 1,
                salary = lineup.total_salary(),
                points = lineup.total_points(),
            );
            lineups.push(lineup);

            if lineups.len() == request.count {
                status = BatchStatus::Complete;
                break;
            }
        }

        info!(
            event = "batch_end",
            produced = lineups.len() as u64,
            requested = request.count as u64,
            attempts = attempts as u64,
            status = %status,
            duration_ms = started.elapsed().as_millis() as u64,
        );

        if lineups.is_empty() {
            return Err(LineupError::Infeasible(
                "infeasible under current constraints".to_string(),
            ));
        }

        Ok(Batch {
            lineups,
            status,
            requested: request.count,
            attempts_used: attempts,
        })
    }
}
