//! Hand-built player pools.
//!
//! Salaries are chosen so that every ten-player roster lands inside the
//! default 45000-50000 window. The salary rule is then never binding and the
//! optimal lineup is simply the best players per position.

use rosterforge_core::{Player, PlayerTable, Position};

/// Players per position in [`quota_pool`]: twice the default quota.
const QUOTA_POOL: [(Position, usize); 7] = [
    (Position::Pitcher, 4),
    (Position::Catcher, 2),
    (Position::FirstBase, 2),
    (Position::SecondBase, 2),
    (Position::ThirdBase, 2),
    (Position::Shortstop, 2),
    (Position::Outfield, 6),
];

/// Players per position in [`deep_pool`]: six times the default quota.
const DEEP_POOL: [(Position, usize); 7] = [
    (Position::Pitcher, 12),
    (Position::Catcher, 6),
    (Position::FirstBase, 6),
    (Position::SecondBase, 6),
    (Position::ThirdBase, 6),
    (Position::Shortstop, 6),
    (Position::Outfield, 18),
];

const DEEP_TEAMS: [&str; 4] = ["NYY", "BOS", "LAD", "HOU"];

/// Twenty players, exactly two full rosters deep.
///
/// Names are `<POS><n>` (`P1`..`P4`, `C1`, `C2`, `OF1`..`OF6`, ...), with
/// lower `n` projecting more points. Every salary is 4800. The first half of
/// each position plays for `NYY`, the rest for `BOS`.
///
/// The optimal lineup is `P1 P2 C1 1B1 2B1 3B1 SS1 OF1 OF2 OF3`.
pub fn quota_pool() -> PlayerTable {
    let mut players = Vec::with_capacity(20);
    for (position, count) in QUOTA_POOL {
        for n in 1..=count {
            let team = if n <= count / 2 { "NYY" } else { "BOS" };
            // points fall off quadratically with depth
            let points = 20.0 - (n * n) as f64 - position_offset(position);
            players.push(Player::new(
                format!("{}{n}", position.code()),
                position,
                team,
                4800.0,
                points,
            ));
        }
    }
    table(players)
}

/// Sixty players, six rosters deep, spread round-robin over four teams.
///
/// Salaries range over 4500-4990 so any roster is within budget. Names are
/// `<POS>-<n>` with lower `n` projecting more points.
pub fn deep_pool() -> PlayerTable {
    let mut players = Vec::with_capacity(60);
    let mut index = 0usize;
    for (position, count) in DEEP_POOL {
        for n in 1..=count {
            let salary = 4500.0 + ((index * 37) % 50) as f64 * 10.0;
            let points = 30.0 - n as f64 * 1.25 - ((index * 7) % 10) as f64 * 0.01;
            players.push(Player::new(
                format!("{}-{n}", position.code()),
                position,
                DEEP_TEAMS[index % DEEP_TEAMS.len()],
                salary,
                points,
            ));
            index += 1;
        }
    }
    table(players)
}

fn position_offset(position: Position) -> f64 {
    Position::ALL
        .iter()
        .position(|&p| p == position)
        .unwrap_or(0) as f64
        * 0.1
}

fn table(players: Vec<Player>) -> PlayerTable {
    PlayerTable::new(players).expect("fixture players are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_pool_shape() {
        let pool = quota_pool();
        assert_eq!(pool.len(), 20);
        assert_eq!(
            pool.iter().filter(|p| p.position() == Position::Outfield).count(),
            6
        );
        assert_eq!(pool.get("OF4").map(Player::team), Some("BOS"));
        assert_eq!(pool.get("C1").map(Player::team), Some("NYY"));
        assert!(pool.get("P1").unwrap().projected_points() > pool.get("P2").unwrap().projected_points());
    }

    #[test]
    fn test_deep_pool_budget() {
        let pool = deep_pool();
        assert_eq!(pool.len(), 60);
        assert!(pool.iter().all(|p| (4500.0..5000.0).contains(&p.salary())));
        assert_eq!(pool.teams(), vec!["BOS", "HOU", "LAD", "NYY"]);
    }
}
