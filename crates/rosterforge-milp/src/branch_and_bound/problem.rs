//! Search-ready form of a model and the incremental node state.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::model::{Model, Sense};

/// Slack allowed when comparing constraint activity against its bounds.
pub(crate) const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// A constraint with merged terms and infinite sides for missing bounds.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) lower: f64,
    pub(crate) upper: f64,
    pub(crate) terms: Vec<(usize, f64)>,
}

impl Row {
    /// Returns true if every coefficient is exactly 1.
    pub(crate) fn is_unit(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(|&(_, a)| a == 1.0)
    }

    /// Returns true if no coefficient is negative.
    pub(crate) fn is_non_negative(&self) -> bool {
        self.terms.iter().all(|&(_, a)| a >= 0.0)
    }

    /// A capped sum of non-negative weights that is not a plain count.
    pub(crate) fn is_budget(&self) -> bool {
        self.upper.is_finite()
            && self.is_non_negative()
            && !self.is_unit()
            && !self.terms.is_empty()
    }

    pub(crate) fn is_equality(&self) -> bool {
        self.lower == self.upper
    }
}

/// The model rewritten for maximization with row and column access.
#[derive(Debug)]
pub(crate) struct SearchProblem {
    /// Objective coefficients, negated for minimization models.
    pub(crate) weights: Vec<f64>,
    pub(crate) rows: Vec<Row>,
    /// Per variable: `(row, coefficient)` for every row it appears in.
    pub(crate) columns: Vec<SmallVec<[(usize, f64); 8]>>,
    pub(crate) fixed: Vec<Option<bool>>,
}

impl SearchProblem {
    pub(crate) fn new(model: &Model) -> Self {
        let n = model.variable_count();
        let weights = match model.sense() {
            Sense::Maximize => model.objective().to_vec(),
            Sense::Minimize => model.objective().iter().map(|c| -c).collect(),
        };

        let mut rows = Vec::with_capacity(model.constraint_count());
        let mut columns = vec![SmallVec::new(); n];
        for constraint in model.constraints() {
            // Repeated variables are merged so each column entry is unique.
            let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
            for &(var, coef) in constraint.terms() {
                *merged.entry(var.index()).or_insert(0.0) += coef;
            }
            let terms: Vec<(usize, f64)> = merged.into_iter().filter(|&(_, a)| a != 0.0).collect();

            let row_index = rows.len();
            for &(var, coef) in &terms {
                columns[var].push((row_index, coef));
            }

            let bounds = constraint.bounds();
            rows.push(Row {
                lower: bounds.lower().unwrap_or(f64::NEG_INFINITY),
                upper: bounds.upper().unwrap_or(f64::INFINITY),
                terms,
            });
        }

        let fixed = (0..n)
            .map(|i| model.fixed_value(crate::VarId::new(i)))
            .collect();

        Self {
            weights,
            rows,
            columns,
            fixed,
        }
    }

    #[inline]
    pub(crate) fn variable_count(&self) -> usize {
        self.weights.len()
    }
}

/// Partial assignment with per-row activity ranges.
///
/// `activity` sums the coefficients of variables set to 1. `free_min` and
/// `free_max` hold the smallest and largest amount the still-unassigned
/// variables can add, so a row stays satisfiable exactly when
/// `activity + free_max >= lower` and `activity + free_min <= upper`.
#[derive(Debug, Clone)]
pub(crate) struct NodeState {
    pub(crate) assignment: Vec<Option<bool>>,
    pub(crate) activity: Vec<f64>,
    free_min: Vec<f64>,
    free_max: Vec<f64>,
    /// Weight of the variables set to 1.
    pub(crate) objective: f64,
}

impl NodeState {
    pub(crate) fn new(problem: &SearchProblem) -> Self {
        let m = problem.rows.len();
        let mut free_min = vec![0.0; m];
        let mut free_max = vec![0.0; m];
        for (r, row) in problem.rows.iter().enumerate() {
            for &(_, a) in &row.terms {
                if a < 0.0 {
                    free_min[r] += a;
                } else {
                    free_max[r] += a;
                }
            }
        }
        Self {
            assignment: vec![None; problem.variable_count()],
            activity: vec![0.0; m],
            free_min,
            free_max,
            objective: 0.0,
        }
    }

    #[inline]
    pub(crate) fn is_free(&self, var: usize) -> bool {
        self.assignment[var].is_none()
    }

    pub(crate) fn assign(&mut self, problem: &SearchProblem, var: usize, value: bool) {
        debug_assert!(self.is_free(var));
        for &(r, a) in &problem.columns[var] {
            if a < 0.0 {
                self.free_min[r] -= a;
            } else {
                self.free_max[r] -= a;
            }
            if value {
                self.activity[r] += a;
            }
        }
        if value {
            self.objective += problem.weights[var];
        }
        self.assignment[var] = Some(value);
    }

    pub(crate) fn unassign(&mut self, problem: &SearchProblem, var: usize) {
        let Some(value) = self.assignment[var].take() else {
            return;
        };
        for &(r, a) in &problem.columns[var] {
            if a < 0.0 {
                self.free_min[r] += a;
            } else {
                self.free_max[r] += a;
            }
            if value {
                self.activity[r] -= a;
            }
        }
        if value {
            self.objective -= problem.weights[var];
        }
    }

    /// Returns true if the row can still be satisfied by the free variables.
    #[inline]
    pub(crate) fn row_satisfiable(&self, problem: &SearchProblem, row: usize) -> bool {
        let r = &problem.rows[row];
        self.activity[row] + self.free_max[row] >= r.lower - FEASIBILITY_TOLERANCE
            && self.activity[row] + self.free_min[row] <= r.upper + FEASIBILITY_TOLERANCE
    }

    /// Checks only the rows touched by `var`.
    pub(crate) fn column_satisfiable(&self, problem: &SearchProblem, var: usize) -> bool {
        problem.columns[var]
            .iter()
            .all(|&(r, _)| self.row_satisfiable(problem, r))
    }

    pub(crate) fn all_rows_satisfiable(&self, problem: &SearchProblem) -> bool {
        (0..problem.rows.len()).all(|r| self.row_satisfiable(problem, r))
    }

    /// Returns true if the variables set to 1, with every free variable at
    /// 0, already satisfy every row.
    pub(crate) fn rows_hold(&self, problem: &SearchProblem) -> bool {
        problem
            .rows
            .iter()
            .zip(&self.activity)
            .all(|(row, &activity)| {
                activity >= row.lower - FEASIBILITY_TOLERANCE
                    && activity <= row.upper + FEASIBILITY_TOLERANCE
            })
    }

    /// Collapses the assignment, treating unassigned variables as 0.
    pub(crate) fn values(&self) -> Vec<bool> {
        self.assignment.iter().map(|v| v.unwrap_or(false)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintBounds, LinearConstraint};

    fn problem() -> SearchProblem {
        let mut model = Model::new("p", Sense::Maximize);
        let a = model.add_variable(1.0);
        let b = model.add_variable(5.0);
        let c = model.add_variable(3.0);
        model.add_constraint(LinearConstraint::new(
            "mixed",
            vec![(a, 2.0), (b, -1.0), (a, 1.0), (c, 0.0)],
            ConstraintBounds::between(0.0, 2.0),
        ));
        model.fix(c, false);
        SearchProblem::new(&model)
    }

    #[test]
    fn test_duplicate_terms_merge_and_zeros_drop() {
        let p = problem();
        assert_eq!(p.rows[0].terms, vec![(0, 3.0), (1, -1.0)]);
        assert!(p.columns[2].is_empty());
        assert!(!p.rows[0].is_unit());
        assert!(!p.rows[0].is_non_negative());
    }

    #[test]
    fn test_row_kinds() {
        let mut model = Model::new("kinds", Sense::Maximize);
        let a = model.add_variable(1.0);
        let b = model.add_variable(1.0);
        model.add_constraint(LinearConstraint::new(
            "salary",
            vec![(a, 300.0), (b, 200.0)],
            ConstraintBounds::at_most(400.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "pick",
            [a, b],
            ConstraintBounds::equal(1.0),
        ));
        model.add_constraint(LinearConstraint::count(
            "floor",
            [a, b],
            ConstraintBounds::at_least(1.0),
        ));
        let p = SearchProblem::new(&model);
        assert!(p.rows[0].is_budget());
        assert!(!p.rows[1].is_budget());
        assert!(p.rows[1].is_equality());
        assert!(!p.rows[2].is_budget());
        assert!(!p.rows[2].is_equality());
    }

    #[test]
    fn test_minimize_negates_weights() {
        let mut model = Model::new("min", Sense::Minimize);
        model.add_variable(4.0);
        let p = SearchProblem::new(&model);
        assert_eq!(p.weights, vec![-4.0]);
    }

    #[test]
    fn test_assign_unassign_round_trip() {
        let p = problem();
        let mut state = NodeState::new(&p);
        assert!(state.all_rows_satisfiable(&p));

        state.assign(&p, 0, true);
        assert_eq!(state.activity[0], 3.0);
        // 3 - 1 = 2 is still reachable
        assert!(state.row_satisfiable(&p, 0));

        state.assign(&p, 1, false);
        assert!(!state.column_satisfiable(&p, 1));

        state.unassign(&p, 1);
        // 3 exceeds the upper side until b is set
        assert!(!state.rows_hold(&p));
        state.assign(&p, 1, true);
        assert!(state.rows_hold(&p));
        state.unassign(&p, 1);
        state.unassign(&p, 0);
        assert_eq!(state.activity[0], 0.0);
        assert_eq!(state.objective, 0.0);
        assert!(state.is_free(0));
        assert_eq!(state.values(), vec![false, false, false]);
    }
}
