//! Assertions over generated lineups.

use rosterforge_core::{Lineup, RosterRules, SLOT_ORDER};

/// Panics unless `lineup` satisfies every composition rule.
pub fn assert_valid_lineup(lineup: &Lineup, rules: &RosterRules) {
    assert_eq!(
        lineup.len(),
        rules.roster_size,
        "lineup has {} players",
        lineup.len()
    );
    let salary = lineup.total_salary();
    assert!(
        salary >= rules.salary_floor - 1e-6 && salary <= rules.salary_ceiling + 1e-6,
        "salary {salary} outside [{}, {}]",
        rules.salary_floor,
        rules.salary_ceiling
    );
    for (&position, &quota) in &rules.quotas {
        assert_eq!(
            lineup.count_position(position),
            quota,
            "wrong number of {position}"
        );
    }
    assert!(
        lineup.hitter_count() >= rules.min_hitters,
        "only {} hitters",
        lineup.hitter_count()
    );
}

/// Panics unless players sit in the standard slot order.
pub fn assert_slot_order(lineup: &Lineup) {
    let positions: Vec<_> = lineup.players().iter().map(|p| p.position()).collect();
    assert_eq!(positions, SLOT_ORDER.to_vec());
}

/// Panics if any two lineups select the same players.
pub fn assert_distinct(lineups: &[Lineup]) {
    for (i, a) in lineups.iter().enumerate() {
        for (j, b) in lineups.iter().enumerate().skip(i + 1) {
            assert_ne!(a.names(), b.names(), "lineups {i} and {j} are identical");
        }
    }
}
