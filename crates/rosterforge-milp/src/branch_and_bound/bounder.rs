//! Optimistic bounds for branch-and-bound pruning.
//!
//! The bound at a node is the optimum of a relaxation that keeps only a
//! laminar family of cardinality constraints (rows whose coefficients are all
//! 1 and whose upper side is finite). Any two rows in a laminar family are
//! either disjoint or nested, so the relaxation is a laminar matroid and
//! taking free variables greedily by weight solves it exactly.
//!
//! Rows with non-negative coefficients and a finite upper side (budgets) are
//! folded in by Lagrangian relaxation: for a multiplier `λ >= 0` the weights
//! become `w - λ·a` and the bound gains `λ·(upper - activity)`. Every
//! multiplier yields a valid bound, so the smallest over a fixed set of
//! multipliers is used.
//!
//! This bound is cheap. Nodes it cannot prune are passed on to the grouped
//! knapsack relaxation, which is exact on the position groups and the
//! budget together.

use smallvec::SmallVec;

use super::knapsack::{GroupKnapsack, KnapsackScratch, Relaxed};
use super::problem::{NodeState, SearchProblem};

/// Multipliers tried per budget row, besides `λ = 0`.
const MULTIPLIER_STEPS: usize = 16;

/// One relaxation: fixed multiplier, its adjusted weights, and the positive
/// weight variables sorted best first.
#[derive(Debug)]
struct Relaxation {
    /// Relaxed budget row, `None` for the plain capacity bound.
    row: Option<usize>,
    multiplier: f64,
    weights: Vec<f64>,
    order: Vec<usize>,
}

impl Relaxation {
    fn new(problem: &SearchProblem, row: Option<usize>, multiplier: f64) -> Self {
        let mut weights = problem.weights.clone();
        if let Some(r) = row {
            for &(j, a) in &problem.rows[r].terms {
                weights[j] -= multiplier * a;
            }
        }
        let mut order: Vec<usize> = (0..weights.len()).filter(|&j| weights[j] > 0.0).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then_with(|| a.cmp(&b)));
        Self {
            row,
            multiplier,
            weights,
            order,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Bounder {
    /// Row indices of the laminar capacity family.
    family: Vec<usize>,
    /// Per variable: positions in `family` of the rows containing it.
    membership: Vec<SmallVec<[usize; 4]>>,
    relaxations: Vec<Relaxation>,
    knapsack: GroupKnapsack,
}

impl Bounder {
    pub(crate) fn new(problem: &SearchProblem) -> Self {
        let family = laminar_family(problem);

        let mut membership = vec![SmallVec::new(); problem.variable_count()];
        for (f, &r) in family.iter().enumerate() {
            for &(j, _) in &problem.rows[r].terms {
                membership[j].push(f);
            }
        }

        let mut relaxations = vec![Relaxation::new(problem, None, 0.0)];
        for (r, row) in problem.rows.iter().enumerate() {
            if !row.is_budget() {
                continue;
            }
            for multiplier in candidate_multipliers(problem, r) {
                relaxations.push(Relaxation::new(problem, Some(r), multiplier));
            }
        }

        let knapsack = GroupKnapsack::new(problem, &family);
        Self {
            family,
            membership,
            relaxations,
            knapsack,
        }
    }

    /// Number of relaxations evaluated per node.
    pub(crate) fn relaxation_count(&self) -> usize {
        self.relaxations.len()
    }

    /// Number of rows in the laminar capacity family.
    pub(crate) fn family_size(&self) -> usize {
        self.family.len()
    }

    /// Number of groups in the knapsack relaxation.
    pub(crate) fn group_count(&self) -> usize {
        self.knapsack.group_count()
    }

    /// Free variables, best first under the multiplier that gives the
    /// tightest bound at `state`. Ties go to the lower index.
    pub(crate) fn branching_order(
        &self,
        problem: &SearchProblem,
        state: &NodeState,
        capacity: &mut Vec<i64>,
    ) -> Vec<usize> {
        let mut tightest = &self.relaxations[0];
        let mut tightest_bound = f64::INFINITY;
        for relaxation in &self.relaxations {
            let bound = self.relaxation_bound(relaxation, problem, state, capacity);
            if bound < tightest_bound {
                tightest = relaxation;
                tightest_bound = bound;
            }
        }

        let weights = &tightest.weights;
        let mut order: Vec<usize> = (0..problem.variable_count())
            .filter(|&j| state.is_free(j))
            .collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then_with(|| a.cmp(&b)));
        order
    }

    /// Tightens a bound from [`optimistic_bound`](Self::optimistic_bound)
    /// with the grouped knapsack relaxation.
    pub(crate) fn refine(
        &self,
        problem: &SearchProblem,
        state: &NodeState,
        bound: f64,
        scratch: &mut KnapsackScratch,
    ) -> Relaxed {
        self.knapsack.refine(problem, state, bound, scratch)
    }

    /// Upper bound on the objective of any completion of `state`.
    ///
    /// `capacity` is scratch space reused across calls.
    pub(crate) fn optimistic_bound(
        &self,
        problem: &SearchProblem,
        state: &NodeState,
        capacity: &mut Vec<i64>,
    ) -> f64 {
        self.relaxations
            .iter()
            .map(|relaxation| self.relaxation_bound(relaxation, problem, state, capacity))
            .fold(f64::INFINITY, f64::min)
    }

    fn relaxation_bound(
        &self,
        relaxation: &Relaxation,
        problem: &SearchProblem,
        state: &NodeState,
        capacity: &mut Vec<i64>,
    ) -> f64 {
        let mut bound = state.objective;
        if let Some(r) = relaxation.row {
            let slack = problem.rows[r].upper - state.activity[r];
            bound += relaxation.multiplier * slack.max(0.0);
        }

        capacity.clear();
        capacity.extend(self.family.iter().map(|&r| {
            let remaining = problem.rows[r].upper - state.activity[r];
            (remaining + 1e-9).floor().max(0.0) as i64
        }));

        for &j in &relaxation.order {
            if !state.is_free(j) {
                continue;
            }
            let fits = self.membership[j].iter().all(|&f| capacity[f] > 0);
            if fits {
                for &f in &self.membership[j] {
                    capacity[f] -= 1;
                }
                bound += relaxation.weights[j];
            }
        }
        bound
    }
}

/// Picks unit-coefficient rows with a finite upper side that are pairwise
/// disjoint or nested.
///
/// Equality rows are considered first, larger supports before smaller ones,
/// so structural quotas win over rows that cut across them.
pub(super) fn laminar_family(problem: &SearchProblem) -> Vec<usize> {
    let mut candidates: Vec<usize> = problem
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_unit() && row.upper.is_finite())
        .map(|(r, _)| r)
        .collect();
    candidates.sort_by_key(|&r| {
        let row = &problem.rows[r];
        let is_equality = row.lower == row.upper;
        (!is_equality, std::cmp::Reverse(row.terms.len()), r)
    });

    let mut family: Vec<usize> = Vec::new();
    let mut supports: Vec<Vec<usize>> = Vec::new();
    for r in candidates {
        // terms are sorted by variable index
        let support: Vec<usize> = problem.rows[r].terms.iter().map(|&(j, _)| j).collect();
        if supports.iter().all(|other| is_laminar_pair(&support, other)) {
            family.push(r);
            supports.push(support);
        }
    }
    family
}

/// Sorted index sets are laminar when disjoint or one contains the other.
fn is_laminar_pair(a: &[usize], b: &[usize]) -> bool {
    let shared = count_shared(a, b);
    shared == 0 || shared == a.len() || shared == b.len()
}

pub(super) fn count_shared(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut k, mut shared) = (0, 0, 0);
    while i < a.len() && k < b.len() {
        match a[i].cmp(&b[k]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => k += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                k += 1;
            }
        }
    }
    shared
}

/// Quantiles of the weight-to-coefficient ratios of a budget row.
fn candidate_multipliers(problem: &SearchProblem, row: usize) -> Vec<f64> {
    let mut ratios: Vec<f64> = problem.rows[row]
        .terms
        .iter()
        .filter(|&&(j, a)| a > 0.0 && problem.weights[j] > 0.0)
        .map(|&(j, a)| problem.weights[j] / a)
        .collect();
    if ratios.is_empty() {
        return Vec::new();
    }
    ratios.sort_by(f64::total_cmp);

    let last = ratios.len() - 1;
    let mut multipliers: Vec<f64> = (1..=MULTIPLIER_STEPS)
        .map(|step| ratios[last * step / MULTIPLIER_STEPS])
        .collect();
    multipliers.dedup();
    multipliers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintBounds, LinearConstraint, Model, Sense, VarId};

    fn vars(ids: &[usize]) -> Vec<VarId> {
        ids.iter().map(|&i| VarId::new(i)).collect()
    }

    #[test]
    fn test_laminar_pair() {
        assert!(is_laminar_pair(&[1, 2], &[3, 4]));
        assert!(is_laminar_pair(&[1, 2], &[0, 1, 2, 3]));
        assert!(!is_laminar_pair(&[1, 2], &[2, 3]));
        assert_eq!(count_shared(&[0, 2, 4], &[1, 2, 3, 4]), 2);
    }

    #[test]
    fn test_family_prefers_equalities_and_skips_crossing_rows() {
        let mut model = Model::new("family", Sense::Maximize);
        for w in [5.0, 4.0, 3.0, 2.0] {
            model.add_variable(w);
        }
        // crossing "at most" row listed first
        model.add_constraint(LinearConstraint::count(
            "cross",
            vars(&[1, 2]),
            ConstraintBounds::at_most(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "left",
            vars(&[0, 1]),
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "right",
            vars(&[2, 3]),
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "all",
            vars(&[0, 1, 2, 3]),
            ConstraintBounds::equal(2.0),
        ));
        let problem = SearchProblem::new(&model);
        let mut family = laminar_family(&problem);
        family.sort();
        assert_eq!(family, vec![1, 2, 3]);
    }

    #[test]
    fn test_capacity_bound_at_root() {
        let mut model = Model::new("bound", Sense::Maximize);
        for w in [5.0, 4.0, 3.0, 2.0] {
            model.add_variable(w);
        }
        model.add_constraint(LinearConstraint::count(
            "left",
            vars(&[0, 1]),
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "right",
            vars(&[2, 3]),
            ConstraintBounds::equal(1.0),
        ));
        let problem = SearchProblem::new(&model);
        let bounder = Bounder::new(&problem);
        let state = NodeState::new(&problem);
        let mut scratch = Vec::new();
        assert_eq!(bounder.family_size(), 2);
        assert_eq!(bounder.relaxation_count(), 1);
        assert_eq!(bounder.optimistic_bound(&problem, &state, &mut scratch), 8.0);
    }

    #[test]
    fn test_budget_relaxation_tightens_bound() {
        // pick two of three, budget 10: the best pair by weight costs 20
        let mut model = Model::new("budget", Sense::Maximize);
        let a = model.add_variable(10.0);
        let b = model.add_variable(9.0);
        let c = model.add_variable(1.0);
        model.add_constraint(LinearConstraint::count(
            "pick",
            [a, b, c],
            ConstraintBounds::equal(2.0),
        ));
        model.add_constraint(LinearConstraint::new(
            "budget",
            vec![(a, 10.0), (b, 10.0), (c, 0.5)],
            ConstraintBounds::at_most(10.5),
        ));
        let problem = SearchProblem::new(&model);
        let bounder = Bounder::new(&problem);
        let state = NodeState::new(&problem);
        let mut scratch = Vec::new();
        let bound = bounder.optimistic_bound(&problem, &state, &mut scratch);
        assert!(bounder.relaxation_count() > 1);
        assert!(bound < 19.0, "bound {bound} should beat the capacity-only 19");
        // true optimum is a + c = 11
        assert!(bound >= 11.0 - 1e-9);
    }

    #[test]
    fn test_branching_order_follows_the_tightest_multiplier() {
        // by raw weight a comes first; priced by salary b is the better buy
        let mut model = Model::new("order", Sense::Maximize);
        let a = model.add_variable(10.0);
        let b = model.add_variable(9.0);
        let c = model.add_variable(1.0);
        let d = model.add_variable(3.0);
        model.add_constraint(LinearConstraint::count(
            "pick",
            [a, b, c],
            ConstraintBounds::equal(2.0),
        ));
        model.add_constraint(LinearConstraint::new(
            "budget",
            vec![(a, 10.0), (b, 2.0), (c, 0.5)],
            ConstraintBounds::at_most(10.5),
        ));
        model.fix(d, false);
        let problem = SearchProblem::new(&model);
        let bounder = Bounder::new(&problem);
        let mut state = NodeState::new(&problem);
        state.assign(&problem, 3, false);
        let mut scratch = Vec::new();

        // at multiplier 1 the weights become 0, 7 and 0.5
        let order = bounder.branching_order(&problem, &state, &mut scratch);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_multipliers_are_sorted_quantiles() {
        let mut model = Model::new("ratios", Sense::Maximize);
        let a = model.add_variable(4.0);
        let b = model.add_variable(1.0);
        model.add_constraint(LinearConstraint::new(
            "budget",
            vec![(a, 2.0), (b, 1.0)],
            ConstraintBounds::at_most(2.0),
        ));
        let problem = SearchProblem::new(&model);
        assert_eq!(candidate_multipliers(&problem, 0), vec![1.0, 2.0]);
    }
}
