//! Grouped knapsack relaxation.
//!
//! Keeps the innermost equality rows of the capacity family, which pick an
//! exact number of variables from disjoint groups, together with one budget
//! row, and drops every other constraint. Budget coefficients are scaled to
//! integer cells and rounded down, so a dynamic program over cells solves the
//! relaxation exactly and never undercuts the true optimum.
//!
//! The program also yields the variables that attain its value. When those
//! variables satisfy the whole model, the node needs no further branching.

use super::bounder::count_shared;
use super::problem::{NodeState, SearchProblem, FEASIBILITY_TOLERANCE};

/// Most cells a budget row is split into.
const MAX_CELLS: f64 = 1024.0;

/// Largest magnitude an `f64` holds as an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Outcome of the knapsack relaxation at one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Relaxed {
    /// No completion satisfies the kept rows.
    Infeasible,
    /// Upper bound on any completion. `attained` is set when the variables
    /// left in [`KnapsackScratch::chosen`] reach it.
    Bound { value: f64, attained: bool },
}

/// A budget row expressed in whole cells.
#[derive(Debug)]
struct CellBudget {
    /// `None` for the program without a budget.
    row: Option<usize>,
    cell: f64,
    costs: Vec<usize>,
}

impl CellBudget {
    fn new(problem: &SearchProblem, row: usize) -> Self {
        let r = &problem.rows[row];
        let coefficients = r.terms.iter().map(|&(_, a)| a).chain([r.upper]);
        let cell = integer_gcd(coefficients)
            .unwrap_or(1.0)
            .max(r.upper / MAX_CELLS);

        let mut costs = vec![0; problem.variable_count()];
        for &(j, a) in &r.terms {
            costs[j] = (a / cell + 1e-9).floor() as usize;
        }
        Self {
            row: Some(row),
            cell,
            costs,
        }
    }

    fn unlimited(variable_count: usize) -> Self {
        Self {
            row: None,
            cell: 1.0,
            costs: vec![0; variable_count],
        }
    }

    fn capacity(&self, problem: &SearchProblem, state: &NodeState) -> usize {
        match self.row {
            Some(r) => {
                let slack = (problem.rows[r].upper - state.activity[r]).max(0.0);
                (slack / self.cell + FEASIBILITY_TOLERANCE).floor() as usize
            }
            None => 0,
        }
    }
}

/// One processed group, kept for the traceback.
#[derive(Debug, Clone, Copy)]
struct Stage {
    need: usize,
    first_item: usize,
    item_count: usize,
    first_flag: usize,
}

/// Buffers reused across nodes.
#[derive(Debug, Default)]
pub(crate) struct KnapsackScratch {
    /// Best value by cells used, after the stages processed so far.
    best: Vec<f64>,
    /// Best value by picks made within the current group and cells used.
    layers: Vec<f64>,
    /// Free `(variable, cost)` pairs, stage after stage.
    items: Vec<(usize, usize)>,
    /// Per item, pick count and cell: whether taking the item improved it.
    flags: Vec<bool>,
    stages: Vec<Stage>,
    selection: Vec<usize>,
    /// Variables attaining the last reported bound.
    pub(crate) chosen: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct GroupKnapsack {
    /// Disjoint equality rows.
    groups: Vec<usize>,
    /// Variables outside every group.
    loose: Vec<usize>,
    budgets: Vec<CellBudget>,
}

impl GroupKnapsack {
    pub(crate) fn new(problem: &SearchProblem, family: &[usize]) -> Self {
        let n = problem.variable_count();
        let groups = innermost_equalities(problem, family);

        let mut grouped = vec![false; n];
        for &g in &groups {
            for &(j, _) in &problem.rows[g].terms {
                grouped[j] = true;
            }
        }
        let loose = (0..n).filter(|&j| !grouped[j]).collect();

        let mut budgets: Vec<CellBudget> = problem
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_budget())
            .map(|(r, _)| CellBudget::new(problem, r))
            .collect();
        if budgets.is_empty() {
            budgets.push(CellBudget::unlimited(n));
        }

        Self {
            groups,
            loose,
            budgets,
        }
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Tightens `bound` with one program per budget row.
    pub(crate) fn refine(
        &self,
        problem: &SearchProblem,
        state: &NodeState,
        bound: f64,
        scratch: &mut KnapsackScratch,
    ) -> Relaxed {
        let mut value = bound;
        let mut attained = false;
        for budget in &self.budgets {
            let relaxed = self.solve(budget, problem, state, scratch);
            if relaxed == f64::NEG_INFINITY {
                return Relaxed::Infeasible;
            }
            if relaxed <= value {
                value = relaxed;
                attained = true;
                std::mem::swap(&mut scratch.selection, &mut scratch.chosen);
            }
        }
        Relaxed::Bound { value, attained }
    }

    /// Runs the program for one budget and leaves the attaining variables in
    /// `scratch.selection`.
    fn solve(
        &self,
        budget: &CellBudget,
        problem: &SearchProblem,
        state: &NodeState,
        scratch: &mut KnapsackScratch,
    ) -> f64 {
        let capacity = budget.capacity(problem, state);
        let width = capacity + 1;

        scratch.best.clear();
        scratch.best.resize(width, 0.0);
        scratch.items.clear();
        scratch.flags.clear();
        scratch.stages.clear();
        scratch.selection.clear();

        for &g in &self.groups {
            let row = &problem.rows[g];
            let remaining = (row.upper - state.activity[g] + 1e-9).floor();
            if remaining <= 0.0 {
                continue;
            }
            let need = remaining as usize;

            let first_item = scratch.items.len();
            scratch.items.extend(
                row.terms
                    .iter()
                    .filter(|&&(j, _)| state.is_free(j))
                    .map(|&(j, _)| (j, budget.costs[j])),
            );
            let item_count = scratch.items.len() - first_item;
            if item_count < need {
                return f64::NEG_INFINITY;
            }

            let span = (need + 1) * width;
            scratch.layers.clear();
            scratch.layers.extend_from_slice(&scratch.best);
            scratch.layers.resize(span, f64::NEG_INFINITY);
            let first_flag = scratch.flags.len();
            scratch.flags.resize(first_flag + item_count * span, false);

            for i in 0..item_count {
                let (j, cost) = scratch.items[first_item + i];
                if cost > capacity {
                    continue;
                }
                let weight = problem.weights[j];
                let flags = first_flag + i * span;
                // descending so each layer reads the one below before the item
                for k in (1..=need).rev() {
                    for x in (cost..=capacity).rev() {
                        let candidate = scratch.layers[(k - 1) * width + x - cost] + weight;
                        if candidate > scratch.layers[k * width + x] {
                            scratch.layers[k * width + x] = candidate;
                            scratch.flags[flags + k * width + x] = true;
                        }
                    }
                }
            }

            scratch.best.clear();
            scratch
                .best
                .extend_from_slice(&scratch.layers[need * width..span]);
            if scratch.best[capacity] == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
            scratch.stages.push(Stage {
                need,
                first_item,
                item_count,
                first_flag,
            });
        }

        let first_loose = scratch.items.len();
        scratch.items.extend(
            self.loose
                .iter()
                .filter(|&&j| state.is_free(j) && problem.weights[j] > 0.0)
                .map(|&j| (j, budget.costs[j])),
        );
        let loose_count = scratch.items.len() - first_loose;
        let loose_flags = scratch.flags.len();
        scratch.flags.resize(loose_flags + loose_count * width, false);

        for i in 0..loose_count {
            let (j, cost) = scratch.items[first_loose + i];
            if cost > capacity {
                continue;
            }
            let weight = problem.weights[j];
            for x in (cost..=capacity).rev() {
                let candidate = scratch.best[x - cost] + weight;
                if candidate > scratch.best[x] {
                    scratch.best[x] = candidate;
                    scratch.flags[loose_flags + i * width + x] = true;
                }
            }
        }

        let value = state.objective + scratch.best[capacity];

        let mut x = capacity;
        for i in (0..loose_count).rev() {
            let (j, cost) = scratch.items[first_loose + i];
            if scratch.flags[loose_flags + i * width + x] {
                scratch.selection.push(j);
                x -= cost;
            }
        }
        for stage in scratch.stages.iter().rev() {
            let span = (stage.need + 1) * width;
            let mut k = stage.need;
            for i in (0..stage.item_count).rev() {
                if k == 0 {
                    break;
                }
                let (j, cost) = scratch.items[stage.first_item + i];
                if scratch.flags[stage.first_flag + i * span + k * width + x] {
                    scratch.selection.push(j);
                    k -= 1;
                    x -= cost;
                }
            }
        }
        value
    }
}

/// Equality rows of the family that contain no other equality row of two or
/// more variables. Rows over the same variables keep only the first.
///
/// Single-variable equalities are left to branching so they do not displace
/// the group around them.
fn innermost_equalities(problem: &SearchProblem, family: &[usize]) -> Vec<usize> {
    let candidates: Vec<(usize, Vec<usize>)> = family
        .iter()
        .filter(|&&r| problem.rows[r].is_equality() && problem.rows[r].terms.len() > 1)
        .map(|&r| (r, problem.rows[r].terms.iter().map(|&(j, _)| j).collect()))
        .collect();

    candidates
        .iter()
        .enumerate()
        .filter(|&(i, (_, support))| {
            candidates.iter().enumerate().all(|(k, (_, other))| {
                if k == i || count_shared(support, other) == 0 {
                    return true;
                }
                match other.len().cmp(&support.len()) {
                    std::cmp::Ordering::Less => false,
                    std::cmp::Ordering::Equal => k > i,
                    std::cmp::Ordering::Greater => true,
                }
            })
        })
        .map(|(_, &(r, _))| r)
        .collect()
}

/// Greatest common divisor of values that are all whole numbers.
fn integer_gcd(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut divisor: u64 = 0;
    for value in values {
        let value = value.abs();
        if value.fract() != 0.0 || value > MAX_EXACT_INTEGER {
            return None;
        }
        let (mut a, mut b) = (divisor, value as u64);
        while b != 0 {
            (a, b) = (b, a % b);
        }
        divisor = a;
    }
    (divisor > 0).then_some(divisor as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch_and_bound::bounder::laminar_family;
    use crate::model::{ConstraintBounds, LinearConstraint, Model, Sense, VarId};

    fn knapsack(model: &Model) -> (SearchProblem, GroupKnapsack) {
        let problem = SearchProblem::new(model);
        let family = laminar_family(&problem);
        let knapsack = GroupKnapsack::new(&problem, &family);
        (problem, knapsack)
    }

    /// Two groups of two plus one optional variable, salary capped at 10.
    fn grouped_model() -> Model {
        let mut model = Model::new("grouped", Sense::Maximize);
        let weights = [9.0, 4.0, 8.0, 5.0, 3.0];
        let salaries = [8.0, 2.0, 6.0, 3.0, 2.0];
        let vars: Vec<VarId> = weights.iter().map(|&w| model.add_variable(w)).collect();
        model.add_constraint(LinearConstraint::count(
            "left",
            [vars[0], vars[1]],
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "right",
            [vars[2], vars[3]],
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::new(
            "salary",
            vars.iter().copied().zip(salaries).collect(),
            ConstraintBounds::at_most(10.0),
        ));
        model
    }

    #[test]
    fn test_integer_gcd() {
        assert_eq!(integer_gcd([4000.0, 2600.0, 50000.0]), Some(200.0));
        assert_eq!(integer_gcd([1.5, 3.0]), None);
        assert_eq!(integer_gcd([0.0]), None);
    }

    #[test]
    fn test_salary_cells() {
        let mut model = Model::new("cells", Sense::Maximize);
        let a = model.add_variable(1.0);
        let b = model.add_variable(1.0);
        model.add_constraint(LinearConstraint::new(
            "salary",
            vec![(a, 4500.0), (b, 3000.0)],
            ConstraintBounds::at_most(50_000.0),
        ));
        let problem = SearchProblem::new(&model);
        let budget = CellBudget::new(&problem, 0);
        // 500 divides everything and keeps the row within the cell limit
        assert_eq!(budget.cell, 500.0);
        assert_eq!(budget.costs, vec![9, 6]);
        assert_eq!(budget.capacity(&problem, &NodeState::new(&problem)), 100);

        let mut wide = Model::new("wide", Sense::Maximize);
        let c = wide.add_variable(1.0);
        wide.add_constraint(LinearConstraint::new(
            "salary",
            vec![(c, 3.0)],
            ConstraintBounds::at_most(1_000_000.0),
        ));
        let problem = SearchProblem::new(&wide);
        let budget = CellBudget::new(&problem, 0);
        assert!(budget.capacity(&problem, &NodeState::new(&problem)) <= 1025);
        assert_eq!(budget.costs, vec![0]);
    }

    #[test]
    fn test_groups_and_loose_variables() {
        let (_, knapsack) = knapsack(&grouped_model());
        assert_eq!(knapsack.groups, vec![0, 1]);
        assert_eq!(knapsack.loose, vec![4]);
        assert_eq!(knapsack.budgets.len(), 1);
    }

    #[test]
    fn test_outer_and_single_variable_equalities_are_not_groups() {
        let mut model = Model::new("nested", Sense::Maximize);
        let vars: Vec<VarId> = (0..4).map(|_| model.add_variable(1.0)).collect();
        model.add_constraint(LinearConstraint::count(
            "all",
            vars.iter().copied(),
            ConstraintBounds::equal(2.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "pair",
            [vars[0], vars[1]],
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "pair_again",
            [vars[0], vars[1]],
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "lock",
            [vars[2]],
            ConstraintBounds::equal(1.0),
        ));
        let (_, knapsack) = knapsack(&model);
        assert_eq!(knapsack.groups, vec![1]);
        assert_eq!(knapsack.loose, vec![2, 3]);
        // no budget row: a single program without one
        assert_eq!(knapsack.budgets.len(), 1);
        assert_eq!(knapsack.budgets[0].row, None);
    }

    #[test]
    fn test_bound_is_the_relaxed_optimum() {
        let (problem, knapsack) = knapsack(&grouped_model());
        let state = NodeState::new(&problem);
        let mut scratch = KnapsackScratch::default();

        // 4 + 8 costs 8, leaving room for the loose 3
        let relaxed = knapsack.refine(&problem, &state, f64::INFINITY, &mut scratch);
        assert_eq!(
            relaxed,
            Relaxed::Bound {
                value: 15.0,
                attained: true
            }
        );
        let mut chosen = scratch.chosen.clone();
        chosen.sort();
        assert_eq!(chosen, vec![1, 2, 4]);
    }

    #[test]
    fn test_looser_bound_is_kept_but_not_attained() {
        let (problem, knapsack) = knapsack(&grouped_model());
        let state = NodeState::new(&problem);
        let mut scratch = KnapsackScratch::default();
        let relaxed = knapsack.refine(&problem, &state, 12.0, &mut scratch);
        assert_eq!(
            relaxed,
            Relaxed::Bound {
                value: 12.0,
                attained: false
            }
        );
    }

    #[test]
    fn test_assigned_variables_shrink_groups_and_budget() {
        let (problem, knapsack) = knapsack(&grouped_model());
        let mut state = NodeState::new(&problem);
        let mut scratch = KnapsackScratch::default();

        // 9 on the left leaves 2 salary: only the loose 3 fits, right is stuck
        state.assign(&problem, 0, true);
        assert_eq!(
            knapsack.refine(&problem, &state, f64::INFINITY, &mut scratch),
            Relaxed::Infeasible
        );

        state.unassign(&problem, 0);
        state.assign(&problem, 2, false);
        state.assign(&problem, 3, true);
        let relaxed = knapsack.refine(&problem, &state, f64::INFINITY, &mut scratch);
        // 5 already in; 9 costs 8 against 7 left, so 4 + 3
        assert_eq!(
            relaxed,
            Relaxed::Bound {
                value: 12.0,
                attained: true
            }
        );
    }

    #[test]
    fn test_group_without_enough_free_variables_is_infeasible() {
        let (problem, knapsack) = knapsack(&grouped_model());
        let mut state = NodeState::new(&problem);
        let mut scratch = KnapsackScratch::default();
        state.assign(&problem, 0, false);
        state.assign(&problem, 1, false);
        assert_eq!(
            knapsack.refine(&problem, &state, f64::INFINITY, &mut scratch),
            Relaxed::Infeasible
        );
    }
}
