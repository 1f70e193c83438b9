//! Roster rules and per-request configuration.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{LineupError, Result};
use crate::player::Position;

/// Absorbs representation error in `fraction × target` before flooring.
const ALLOWANCE_EPSILON: f64 = 1e-9;

/// Composition rules every lineup must satisfy.
///
/// # Examples
///
/// ```
/// use rosterforge_core::{Position, RosterRules};
///
/// let rules = RosterRules::default();
/// assert_eq!(rules.roster_size, 10);
/// assert_eq!(rules.quota(Position::Outfield), Some(3));
/// assert_eq!(rules.quota(Position::Pitcher), Some(2));
/// assert!(rules.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterRules {
    pub salary_floor: f64,
    pub salary_ceiling: f64,
    /// Exact number of players in a lineup.
    pub roster_size: usize,
    /// Exact count per position. Positions without an entry are unconstrained.
    pub quotas: BTreeMap<Position, usize>,
    pub min_hitters: usize,
}

impl Default for RosterRules {
    fn default() -> Self {
        Self {
            salary_floor: 45_000.0,
            salary_ceiling: 50_000.0,
            roster_size: 10,
            quotas: BTreeMap::from([
                (Position::Pitcher, 2),
                (Position::Catcher, 1),
                (Position::FirstBase, 1),
                (Position::SecondBase, 1),
                (Position::ThirdBase, 1),
                (Position::Shortstop, 1),
                (Position::Outfield, 3),
            ]),
            min_hitters: 8,
        }
    }
}

impl RosterRules {
    pub fn quota(&self, position: Position) -> Option<usize> {
        self.quotas.get(&position).copied()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.salary_floor.is_finite() || !self.salary_ceiling.is_finite() {
            return Err(LineupError::Config("salary bounds must be finite".to_string()));
        }
        if self.salary_floor < 0.0 || self.salary_floor > self.salary_ceiling {
            return Err(LineupError::Config(format!(
                "invalid salary range [{}, {}]",
                self.salary_floor, self.salary_ceiling
            )));
        }
        if self.roster_size == 0 {
            return Err(LineupError::Config("roster size must be positive".to_string()));
        }
        let quota_total: usize = self.quotas.values().sum();
        if quota_total > self.roster_size {
            return Err(LineupError::Config(format!(
                "position quotas need {quota_total} players but the roster holds {}",
                self.roster_size
            )));
        }
        if self.min_hitters > self.roster_size {
            return Err(LineupError::Config(format!(
                "minimum hitters {} exceeds roster size {}",
                self.min_hitters, self.roster_size
            )));
        }
        Ok(())
    }
}

/// Minimum number of players from one team.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackRequirement {
    team: String,
    size: usize,
}

impl StackRequirement {
    /// Creates a stack requirement. The team code is upper-cased.
    pub fn new(team: impl AsRef<str>, size: usize) -> Self {
        Self {
            team: team.as_ref().trim().to_uppercase(),
            size,
        }
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// A stack only constrains anything with a team and a positive size.
    pub fn is_active(&self) -> bool {
        !self.team.is_empty() && self.size > 0
    }
}

/// Everything that shapes one batch: rules plus request options.
///
/// # Examples
///
/// ```
/// use rosterforge_core::{RosterConfiguration, StackRequirement};
///
/// let config = RosterConfiguration::default()
///     .with_stack(StackRequirement::new("nyy", 3))
///     .with_locked("Aaron Judge")
///     .with_excluded(["Injured Guy"])
///     .with_max_exposure(0.4);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.exposure_allowance(5), Some(2));
/// assert_eq!(config.attempt_budget(5), 15);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterConfiguration {
    pub rules: RosterRules,
    pub stack: Option<StackRequirement>,
    /// Player that must appear in every lineup, when present in the pool.
    pub locked: Option<String>,
    /// Players removed from the pool before solving.
    pub excluded: BTreeSet<String>,
    /// Maximum share of the batch any player may appear in, in `(0, 1]`.
    pub max_exposure: Option<f64>,
    /// Attempts allowed per requested lineup.
    pub attempt_multiplier: usize,
}

impl Default for RosterConfiguration {
    fn default() -> Self {
        Self {
            rules: RosterRules::default(),
            stack: None,
            locked: None,
            excluded: BTreeSet::new(),
            max_exposure: None,
            attempt_multiplier: 3,
        }
    }
}

impl RosterConfiguration {
    pub fn new(rules: RosterRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_stack(mut self, stack: StackRequirement) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn with_locked(mut self, name: impl Into<String>) -> Self {
        self.locked = Some(name.into());
        self
    }

    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_max_exposure(mut self, fraction: f64) -> Self {
        self.max_exposure = Some(fraction);
        self
    }

    pub fn with_attempt_multiplier(mut self, multiplier: usize) -> Self {
        self.attempt_multiplier = multiplier;
        self
    }

    /// Returns the stack requirement if it constrains anything.
    pub fn active_stack(&self) -> Option<&StackRequirement> {
        self.stack.as_ref().filter(|s| s.is_active())
    }

    /// Checks rules and options before any model is built.
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        if let Some(stack) = self.active_stack() {
            if stack.size() > self.rules.roster_size {
                return Err(LineupError::Config(format!(
                    "stack of {} exceeds roster size {}",
                    stack.size(),
                    self.rules.roster_size
                )));
            }
        }
        if let Some(fraction) = self.max_exposure {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(LineupError::Config(format!(
                    "exposure fraction {fraction} is outside (0, 1]"
                )));
            }
        }
        if self.attempt_multiplier == 0 {
            return Err(LineupError::Config(
                "attempt multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of lineups a player may appear in before being banned, for a
    /// batch of `target` lineups. `None` when exposure is uncapped.
    pub fn exposure_allowance(&self, target: usize) -> Option<usize> {
        self.max_exposure
            .map(|fraction| (fraction * target as f64 + ALLOWANCE_EPSILON).floor() as usize)
    }

    /// Total solve attempts for a batch of `target` lineups.
    pub fn attempt_budget(&self, target: usize) -> usize {
        target.saturating_mul(self.attempt_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = RosterRules::default();
        assert_eq!(rules.quotas.values().sum::<usize>(), 10);
        assert_eq!(rules.salary_floor, 45_000.0);
        assert_eq!(rules.salary_ceiling, 50_000.0);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_invalid_rules() {
        let inverted = RosterRules {
            salary_floor: 60_000.0,
            ..RosterRules::default()
        };
        assert!(matches!(inverted.validate(), Err(LineupError::Config(_))));

        let crowded = RosterRules {
            roster_size: 9,
            ..RosterRules::default()
        };
        assert!(crowded.validate().is_err());

        let empty = RosterRules {
            roster_size: 0,
            quotas: BTreeMap::new(),
            min_hitters: 0,
            ..RosterRules::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_exposure_allowance_floors() {
        let config = RosterConfiguration::default().with_max_exposure(0.2);
        assert_eq!(config.exposure_allowance(5), Some(1));
        assert_eq!(config.exposure_allowance(4), Some(0));

        let config = RosterConfiguration::default().with_max_exposure(0.29);
        assert_eq!(config.exposure_allowance(100), Some(29));

        assert_eq!(RosterConfiguration::default().exposure_allowance(5), None);
    }

    #[test]
    fn test_exposure_must_be_a_fraction() {
        for fraction in [0.0, -0.5, 1.5, f64::NAN] {
            let config = RosterConfiguration::default().with_max_exposure(fraction);
            assert!(config.validate().is_err(), "{fraction} should be rejected");
        }
        assert!(RosterConfiguration::default()
            .with_max_exposure(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_inactive_stack_is_ignored() {
        let config = RosterConfiguration::default().with_stack(StackRequirement::new("", 4));
        assert!(config.active_stack().is_none());
        let config = RosterConfiguration::default().with_stack(StackRequirement::new("NYY", 0));
        assert!(config.active_stack().is_none());
        let config = RosterConfiguration::default().with_stack(StackRequirement::new("nyy", 11));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_attempt_multiplier() {
        let config = RosterConfiguration::default().with_attempt_multiplier(5);
        assert_eq!(config.attempt_budget(4), 20);
        assert!(RosterConfiguration::default()
            .with_attempt_multiplier(0)
            .validate()
            .is_err());
    }
}
