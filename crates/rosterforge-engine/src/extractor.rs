//! Turns a solved assignment back into a lineup.

use rosterforge_core::{Lineup, Player, PlayerTable, SLOT_ORDER};
use rosterforge_milp::Solution;

/// Builds the lineup selected by `solution`, or `None` when the model was
/// infeasible or nothing was selected.
///
/// `pool` must be the table the model was built from.
pub fn extract(pool: &PlayerTable, solution: &Solution) -> Option<Lineup> {
    let selected: Vec<&Player> = solution
        .selected()
        .filter_map(|var| pool.players().get(var.index()))
        .collect();
    if selected.is_empty() {
        return None;
    }
    Some(Lineup::new(order_slots(&selected)))
}

/// Orders players into the slots `P,P,C,1B,2B,3B,SS,OF,OF,OF`.
///
/// Each slot takes the first unplaced player of its position. Players left
/// over are appended in their original order.
pub fn order_slots(players: &[&Player]) -> Vec<Player> {
    let mut placed = vec![false; players.len()];
    let mut ordered = Vec::with_capacity(players.len());

    for slot in SLOT_ORDER {
        let next = players
            .iter()
            .enumerate()
            .find(|&(i, p)| !placed[i] && p.position() == slot);
        if let Some((i, player)) = next {
            placed[i] = true;
            ordered.push((*player).clone());
        }
    }

    ordered.extend(
        players
            .iter()
            .zip(&placed)
            .filter(|(_, &done)| !done)
            .map(|(p, _)| (*p).clone()),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::Position;

    fn player(name: &str, position: Position) -> Player {
        Player::new(name, position, "CLE", 4000.0, 7.125)
    }

    fn names(players: &[Player]) -> Vec<&str> {
        players.iter().map(Player::name).collect()
    }

    #[test]
    fn test_full_roster_order() {
        let pool = vec![
            player("of1", Position::Outfield),
            player("ss", Position::Shortstop),
            player("p1", Position::Pitcher),
            player("of2", Position::Outfield),
            player("c", Position::Catcher),
            player("3b", Position::ThirdBase),
            player("1b", Position::FirstBase),
            player("p2", Position::Pitcher),
            player("2b", Position::SecondBase),
            player("of3", Position::Outfield),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        assert_eq!(
            names(&order_slots(&refs)),
            vec!["p1", "p2", "c", "1b", "2b", "3b", "ss", "of1", "of2", "of3"]
        );
    }

    #[test]
    fn test_leftovers_are_appended() {
        let pool = vec![
            player("c1", Position::Catcher),
            player("p1", Position::Pitcher),
            player("c2", Position::Catcher),
            player("of1", Position::Outfield),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        assert_eq!(names(&order_slots(&refs)), vec!["p1", "c1", "of1", "c2"]);
    }

    #[test]
    fn test_extract_selected_players() {
        let table = PlayerTable::new(vec![
            player("a", Position::Outfield),
            player("b", Position::Pitcher),
            player("c", Position::Catcher),
        ])
        .unwrap();
        let solution = Solution::Optimal {
            values: vec![true, true, false],
            objective: 14.25,
        };
        let lineup = extract(&table, &solution).unwrap();
        assert_eq!(names(lineup.players()), vec!["b", "a"]);
        assert_eq!(lineup.total_salary(), 8000.0);
        assert_eq!(lineup.total_points(), 14.25);
        assert!(lineup.contains("a"));
        assert!(!lineup.contains("c"));
    }

    #[test]
    fn test_extract_nothing() {
        let table = PlayerTable::new(vec![player("a", Position::Outfield)]).unwrap();
        assert!(extract(&table, &Solution::Infeasible).is_none());
        let empty = Solution::Optimal {
            values: vec![false],
            objective: 0.0,
        };
        assert!(extract(&table, &empty).is_none());
    }
}
