//! Seeded random player pools.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rosterforge_core::{round_points, Player, PlayerTable, Position};

/// Position pattern repeated over the pool: a quarter pitchers, a third
/// outfielders.
const POSITION_CYCLE: [Position; 12] = [
    Position::Pitcher,
    Position::Outfield,
    Position::Catcher,
    Position::FirstBase,
    Position::Pitcher,
    Position::Outfield,
    Position::SecondBase,
    Position::ThirdBase,
    Position::Pitcher,
    Position::Outfield,
    Position::Shortstop,
    Position::Outfield,
];

const DEFAULT_TEAMS: [&str; 8] = ["ATL", "BOS", "CHC", "HOU", "LAD", "NYY", "SEA", "TOR"];

/// Builder for a reproducible random pool.
///
/// Pitchers cost 6000-11000 and hitters 2000-6000, in steps of 100. Points
/// track salary with some noise, so the salary ceiling binds.
///
/// # Example
///
/// ```
/// use rosterforge_test::RandomPool;
///
/// let a = RandomPool::new(42).with_size(36).build();
/// let b = RandomPool::new(42).with_size(36).build();
/// assert_eq!(a.players(), b.players());
/// ```
#[derive(Debug, Clone)]
pub struct RandomPool {
    seed: u64,
    size: usize,
    teams: Vec<String>,
}

impl RandomPool {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            size: 60,
            teams: DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_teams(mut self, teams: &[&str]) -> Self {
        self.teams = teams.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn build(&self) -> PlayerTable {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let players = (0..self.size)
            .map(|i| {
                let position = POSITION_CYCLE[i % POSITION_CYCLE.len()];
                let team = &self.teams[rng.random_range(0..self.teams.len())];
                let (low, high, rate) = if position.is_hitter() {
                    (20, 60, 2.0)
                } else {
                    (60, 110, 1.8)
                };
                let salary = rng.random_range(low..=high) as f64 * 100.0;
                let noise: f64 = rng.random_range(-3.0..3.0);
                let points = round_points((salary / 1000.0 * rate + noise).max(0.0));
                Player::new(format!("Player {:03}", i + 1), position, team, salary, points)
            })
            .collect();
        PlayerTable::new(players).expect("generated players are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_changes_pool() {
        let a = RandomPool::new(1).build();
        let b = RandomPool::new(2).build();
        assert_eq!(a.len(), b.len());
        assert_ne!(a.players(), b.players());
    }

    #[test]
    fn test_salary_bands() {
        let pool = RandomPool::new(3).with_size(120).with_teams(&["AAA", "BBB"]).build();
        for player in &pool {
            if player.is_hitter() {
                assert!((2000.0..=6000.0).contains(&player.salary()));
            } else {
                assert!((6000.0..=11000.0).contains(&player.salary()));
            }
        }
        assert_eq!(pool.teams(), vec!["AAA", "BBB"]);
    }
}
