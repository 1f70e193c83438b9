//! Search limits.
//!
//! Solve time of an integer program is not bounded by its size alone, so
//! every search runs under optional node and wall-clock limits and can be
//! cancelled from another thread through a shared flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::SolverError;
use crate::statistics::SolveStatistics;

/// Limits checked while searching.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use rosterforge_milp::SearchLimits;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let limits = SearchLimits::none()
///     .with_time_limit(Duration::from_secs(30))
///     .with_cancel_flag(Arc::clone(&flag));
///
/// // Later, from another thread:
/// flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    /// No limits at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Returns an error once any limit is exceeded.
    pub fn check(&self, stats: &SolveStatistics) -> Result<(), SolverError> {
        if let Some(limit) = self.node_limit {
            if stats.nodes_explored >= limit {
                return Err(SolverError::NodeLimit(limit));
            }
        }
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(SolverError::Cancelled);
            }
        }
        if let Some(limit) = self.time_limit {
            if stats.elapsed() >= limit {
                return Err(SolverError::TimeLimit(limit));
            }
        }
        Ok(())
    }
}
