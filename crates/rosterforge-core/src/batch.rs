//! Batch requests and results.

use std::fmt;

use crate::error::{LineupError, Result};
use crate::lineup::Lineup;
use crate::roster::RosterConfiguration;

/// Largest batch a single request may ask for.
pub const MAX_LINEUP_COUNT: usize = 1000;

/// A request for `count` distinct lineups.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchRequest {
    pub count: usize,
    pub configuration: RosterConfiguration,
}

impl BatchRequest {
    pub fn new(count: usize, configuration: RosterConfiguration) -> Self {
        Self {
            count,
            configuration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(LineupError::Config(
                "lineup count must be at least 1".to_string(),
            ));
        }
        if self.count > MAX_LINEUP_COUNT {
            return Err(LineupError::Config(format!(
                "lineup count {} exceeds the maximum of {MAX_LINEUP_COUNT}",
                self.count
            )));
        }
        self.configuration.validate()
    }
}

/// Why a batch stopped short of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartialReason {
    /// An attempt found no feasible lineup.
    Exhausted,
    /// Every allowed attempt was used.
    AttemptBudget,
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchStatus {
    Complete,
    Partial { reason: PartialReason },
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Complete => f.write_str("complete"),
            BatchStatus::Partial {
                reason: PartialReason::Exhausted,
            } => f.write_str("partial (no further feasible lineup)"),
            BatchStatus::Partial {
                reason: PartialReason::AttemptBudget,
            } => f.write_str("partial (attempt budget spent)"),
        }
    }
}

/// Lineups produced by one request, in generation order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Batch {
    pub lineups: Vec<Lineup>,
    pub status: BatchStatus,
    pub requested: usize,
    pub attempts_used: usize,
}

impl Batch {
    pub fn is_complete(&self) -> bool {
        self.status == BatchStatus::Complete
    }

    pub fn len(&self) -> usize {
        self.lineups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lineups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lineup> {
        self.lineups.iter()
    }

    /// Number of lineups each player appears in.
    pub fn exposure(&self, name: &str) -> usize {
        self.lineups.iter().filter(|l| l.contains(name)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Player, Position};

    #[test]
    fn test_zero_count_rejected() {
        let request = BatchRequest::new(0, RosterConfiguration::default());
        assert!(matches!(request.validate(), Err(LineupError::Config(_))));
        assert!(BatchRequest::new(1, RosterConfiguration::default())
            .validate()
            .is_ok());
    }

    #[test]
    fn test_count_above_maximum_rejected() {
        let config = RosterConfiguration::default();
        assert!(BatchRequest::new(MAX_LINEUP_COUNT, config.clone())
            .validate()
            .is_ok());
        assert!(matches!(
            BatchRequest::new(MAX_LINEUP_COUNT + 1, config.clone()).validate(),
            Err(LineupError::Config(_))
        ));
        assert!(matches!(
            BatchRequest::new(1usize << 60, config).validate(),
            Err(LineupError::Config(_))
        ));
    }

    #[test]
    fn test_exposure_counts_lineups() {
        let shared = Player::new("x", Position::Pitcher, "ATL", 1.0, 1.0);
        let other = Player::new("y", Position::Pitcher, "ATL", 1.0, 1.0);
        let batch = Batch {
            lineups: vec![
                Lineup::new(vec![shared.clone()]),
                Lineup::new(vec![shared, other]),
            ],
            status: BatchStatus::Partial {
                reason: PartialReason::Exhausted,
            },
            requested: 3,
            attempts_used: 3,
        };
        assert_eq!(batch.exposure("x"), 2);
        assert_eq!(batch.exposure("y"), 1);
        assert!(!batch.is_complete());
        assert_eq!(batch.status.to_string(), "partial (no further feasible lineup)");
    }
}
