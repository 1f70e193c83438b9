//! Per-batch bookkeeping.

use std::collections::{BTreeMap, BTreeSet};

use rosterforge_core::Lineup;

/// What earlier lineups of the same batch selected.
///
/// Created empty for each batch and updated only after a lineup has been
/// fully extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchState {
    previous_selections: Vec<BTreeSet<String>>,
    exposure_counts: BTreeMap<String, usize>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player-name sets of earlier lineups, in generation order.
    pub fn previous_selections(&self) -> &[BTreeSet<String>] {
        &self.previous_selections
    }

    /// Lineups each player has appeared in so far. Players never selected
    /// have no entry.
    pub fn exposure_counts(&self) -> &BTreeMap<String, usize> {
        &self.exposure_counts
    }

    pub fn exposure(&self, name: &str) -> usize {
        self.exposure_counts.get(name).copied().unwrap_or(0)
    }

    pub fn lineup_count(&self) -> usize {
        self.previous_selections.len()
    }

    /// Returns true if an earlier lineup selected exactly these players.
    pub fn contains_selection(&self, names: &BTreeSet<String>) -> bool {
        self.previous_selections.iter().any(|s| s == names)
    }

    pub fn record(&mut self, lineup: &Lineup) {
        for name in lineup.names() {
            *self.exposure_counts.entry(name.clone()).or_insert(0) += 1;
        }
        self.previous_selections.push(lineup.names().clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::{Player, Position};

    fn lineup(names: &[&str]) -> Lineup {
        Lineup::new(
            names
                .iter()
                .map(|n| Player::new(*n, Position::Outfield, "MIA", 1.0, 1.0))
                .collect(),
        )
    }

    #[test]
    fn test_record_updates_counts() {
        let mut state = BatchState::new();
        assert_eq!(state.exposure("a"), 0);
        assert!(state.exposure_counts().is_empty());

        state.record(&lineup(&["a", "b"]));
        state.record(&lineup(&["a", "c"]));

        assert_eq!(state.lineup_count(), 2);
        assert_eq!(state.exposure("a"), 2);
        assert_eq!(state.exposure("c"), 1);
        assert_eq!(
            state.previous_selections()[1],
            BTreeSet::from(["a".to_string(), "c".to_string()])
        );
        assert!(state.contains_selection(lineup(&["b", "a"]).names()));
        assert!(!state.contains_selection(lineup(&["b", "c"]).names()));
    }
}
