//! Translates a pool and a roster configuration into a binary program.
//!
//! Variable `i` selects player `i` of the pool. Constraint names:
//!
//! | name | rows |
//! |---|---|
//! | `salary` | `floor <= Σ salary·x <= ceiling` |
//! | `roster_size` | `Σ x = roster size` |
//! | `position_<POS>` | `Σ x over POS = quota`, one per quota entry |
//! | `min_hitters` | `Σ x over hitters >= minimum` |
//! | `stack_<TEAM>` | `Σ x over TEAM >= size`, when a stack is active |
//! | `lock` | `x_locked = 1`, when the locked player is in the pool |
//! | `diversity_<k>` | `Σ x over lineup k <= |lineup k| - 1` |
//!
//! Players who reached their exposure allowance are fixed to 0.

use rosterforge_core::{Player, PlayerTable, RosterConfiguration};
use rosterforge_milp::{ConstraintBounds, LinearConstraint, Model, Sense, VarId};

use crate::state::BatchState;

/// Builds the model for the next lineup of a batch of `target_count`.
///
/// `pool` must already have excluded players removed. Nothing is mutated.
pub fn build_model(
    pool: &PlayerTable,
    config: &RosterConfiguration,
    state: &BatchState,
    target_count: usize,
) -> Model {
    let rules = &config.rules;
    let mut model = Model::new(
        format!("lineup_{}", state.lineup_count() + 1),
        Sense::Maximize,
    );
    let vars: Vec<VarId> = pool
        .iter()
        .map(|p| model.add_variable(p.projected_points()))
        .collect();

    let select = |keep: &dyn Fn(&Player) -> bool| -> Vec<VarId> {
        pool.iter()
            .zip(&vars)
            .filter(|(p, _)| keep(p))
            .map(|(_, &v)| v)
            .collect()
    };

    model.add_constraint(LinearConstraint::new(
        "salary",
        pool.iter().zip(&vars).map(|(p, &v)| (v, p.salary())).collect(),
        ConstraintBounds::between(rules.salary_floor, rules.salary_ceiling),
    ));

    model.add_constraint(LinearConstraint::count(
        "roster_size",
        vars.iter().copied(),
        ConstraintBounds::equal(rules.roster_size as f64),
    ));

    for (&position, &quota) in &rules.quotas {
        model.add_constraint(LinearConstraint::count(
            format!("position_{position}"),
            select(&|p| p.position() == position),
            ConstraintBounds::equal(quota as f64),
        ));
    }

    model.add_constraint(LinearConstraint::count(
        "min_hitters",
        select(&|p| p.is_hitter()),
        ConstraintBounds::at_least(rules.min_hitters as f64),
    ));

    if let Some(stack) = config.active_stack() {
        model.add_constraint(LinearConstraint::count(
            format!("stack_{}", stack.team()),
            select(&|p| p.team() == stack.team()),
            ConstraintBounds::at_least(stack.size() as f64),
        ));
    }

    if let Some(index) = config.locked.as_deref().and_then(|name| pool.index_of(name)) {
        model.add_constraint(LinearConstraint::count(
            "lock",
            [vars[index]],
            ConstraintBounds::equal(1.0),
        ));
    }

    for (k, previous) in state.previous_selections().iter().enumerate() {
        let present: Vec<VarId> = previous
            .iter()
            .filter_map(|name| pool.index_of(name))
            .map(|i| vars[i])
            .collect();
        // the right side counts the whole previous lineup, present or not
        model.add_constraint(LinearConstraint::count(
            format!("diversity_{k}"),
            present,
            ConstraintBounds::at_most(previous.len() as f64 - 1.0),
        ));
    }

    if let Some(allowance) = config.exposure_allowance(target_count) {
        for (name, &count) in state.exposure_counts() {
            if count < allowance {
                continue;
            }
            if let Some(index) = pool.index_of(name) {
                model.fix(vars[index], false);
            }
        }
    }

    model
}
