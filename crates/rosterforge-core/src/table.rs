//! The validated player pool.

use std::collections::{BTreeSet, HashMap};

use crate::error::{LineupError, Result};
use crate::player::Player;

/// An immutable, validated collection of players.
///
/// Names are unique and every numeric field is finite, with salaries
/// non-negative. Filtering never mutates a table; it returns a new one, so a
/// single table can be shared read-only by concurrent requests.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use rosterforge_core::{Player, PlayerTable, Position};
///
/// let table = PlayerTable::new(vec![
///     Player::new("Ace", Position::Pitcher, "SEA", 9000.0, 18.0),
///     Player::new("Backstop", Position::Catcher, "NYY", 3200.0, 6.5),
/// ]).unwrap();
///
/// let excluded = BTreeSet::from(["Ace".to_string()]);
/// let pool = table.without(&excluded);
/// assert_eq!(pool.len(), 1);
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.teams(), vec!["NYY", "SEA"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlayerTable {
    players: Vec<Player>,
    index: HashMap<String, usize>,
}

impl PlayerTable {
    /// Validates and wraps a list of players, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`LineupError::Data`] for duplicate or empty names, non-finite
    /// numbers, or a negative salary.
    pub fn new(players: Vec<Player>) -> Result<Self> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            validate_player(player)?;
            if index.insert(player.name().to_string(), i).is_some() {
                return Err(LineupError::Data(format!(
                    "duplicate player name '{}'",
                    player.name()
                )));
            }
        }
        Ok(Self { players, index })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by exact name.
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.index_of(name).map(|i| &self.players[i])
    }

    /// Returns the position of a player in table order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns a new table without the named players. Unknown names are
    /// ignored.
    pub fn without(&self, excluded: &BTreeSet<String>) -> PlayerTable {
        if excluded.is_empty() {
            return self.clone();
        }
        let players: Vec<Player> = self
            .players
            .iter()
            .filter(|p| !excluded.contains(p.name()))
            .cloned()
            .collect();
        let index = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_string(), i))
            .collect();
        PlayerTable { players, index }
    }

    /// Sorted, de-duplicated team codes.
    pub fn teams(&self) -> Vec<&str> {
        self.players
            .iter()
            .map(Player::team)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a PlayerTable {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

fn validate_player(player: &Player) -> Result<()> {
    if player.name().trim().is_empty() {
        return Err(LineupError::Data("player with an empty name".to_string()));
    }
    if !player.salary().is_finite() || player.salary() < 0.0 {
        return Err(LineupError::Data(format!(
            "player '{}' has invalid salary {}",
            player.name(),
            player.salary()
        )));
    }
    if !player.projected_points().is_finite() {
        return Err(LineupError::Data(format!(
            "player '{}' has non-finite projected points",
            player.name()
        )));
    }
    Ok(())
}
