//! A single roster produced by one solve.

use std::collections::BTreeSet;

use crate::player::{Player, Position};

/// Presentation slots of a standard lineup.
pub const SLOT_ORDER: [Position; 10] = [
    Position::Pitcher,
    Position::Pitcher,
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::Shortstop,
    Position::Outfield,
    Position::Outfield,
    Position::Outfield,
];

/// Rounds to two decimals.
///
/// ```
/// assert_eq!(rosterforge_core::round_points(12.345_1), 12.35);
/// assert_eq!(rosterforge_core::round_points(-0.004), -0.0);
/// ```
pub fn round_points(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Selected players in slot order, with totals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lineup {
    players: Vec<Player>,
    total_salary: f64,
    total_points: f64,
    names: BTreeSet<String>,
}

impl Lineup {
    /// Builds a lineup from players already in presentation order.
    ///
    /// Total points are rounded to two decimals.
    pub fn new(players: Vec<Player>) -> Self {
        let total_salary = players.iter().map(Player::salary).sum();
        let total_points = round_points(players.iter().map(Player::projected_points).sum());
        let names = players.iter().map(|p| p.name().to_string()).collect();
        Self {
            players,
            total_salary,
            total_points,
            names,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn total_salary(&self) -> f64 {
        self.total_salary
    }

    pub fn total_points(&self) -> f64 {
        self.total_points
    }

    /// Names of the selected players.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn count_position(&self, position: Position) -> usize {
        self.players
            .iter()
            .filter(|p| p.position() == position)
            .count()
    }

    pub fn count_team(&self, team: &str) -> usize {
        self.players.iter().filter(|p| p.team() == team).count()
    }

    pub fn hitter_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_hitter()).count()
    }

    /// Players present in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Lineup) -> impl Iterator<Item = &'a str> + 'a {
        self.names.difference(&other.names).map(String::as_str)
    }
}
