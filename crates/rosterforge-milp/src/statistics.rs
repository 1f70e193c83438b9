//! Search statistics.

use std::time::{Duration, Instant};

/// Counters collected during one branch-and-bound run.
///
/// # Example
///
/// ```
/// use rosterforge_milp::SolveStatistics;
///
/// let mut stats = SolveStatistics::default();
/// stats.start();
/// stats.record_node();
/// stats.record_node();
/// stats.record_bound_prune();
///
/// assert_eq!(stats.nodes_explored, 2);
/// assert_eq!(stats.pruned_by_bound, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolveStatistics {
    start_time: Option<Instant>,
    /// Time spent searching, set by [`finish`](Self::finish).
    pub duration: Duration,
    /// Nodes visited.
    pub nodes_explored: u64,
    /// Children discarded because their optimistic bound could not beat the incumbent.
    pub pruned_by_bound: u64,
    /// Children discarded because a constraint could no longer be satisfied.
    pub pruned_by_feasibility: u64,
    /// Number of times the incumbent improved.
    pub incumbents_found: u64,
    /// Children closed because the best completion of a relaxation turned
    /// out to satisfy the whole model.
    pub closed_by_relaxation: u64,
}

impl SolveStatistics {
    /// Marks the start of searching.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since searching started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Freezes the elapsed time into `duration`.
    pub fn finish(&mut self) {
        self.duration = self.elapsed();
    }

    pub fn record_node(&mut self) {
        self.nodes_explored += 1;
    }

    pub fn record_bound_prune(&mut self) {
        self.pruned_by_bound += 1;
    }

    pub fn record_feasibility_prune(&mut self) {
        self.pruned_by_feasibility += 1;
    }

    pub fn record_incumbent(&mut self) {
        self.incumbents_found += 1;
    }

    pub fn record_relaxation_close(&mut self) {
        self.closed_by_relaxation += 1;
    }

    /// Returns the nodes per second rate.
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.nodes_explored as f64 / secs) as u64
        } else {
            0
        }
    }
}
