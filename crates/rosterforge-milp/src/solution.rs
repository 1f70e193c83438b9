//! Solver results.

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// A proven optimal assignment.
    Optimal {
        /// One value per model variable, indexed by [`VarId::index`](crate::VarId::index).
        values: Vec<bool>,
        /// Objective value in the model's own sense.
        objective: f64,
    },

    /// No assignment satisfies the constraints.
    Infeasible,
}

impl Solution {
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, Solution::Optimal { .. })
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Solution::Infeasible)
    }

    /// Returns the objective value of an optimal solution.
    pub fn objective(&self) -> Option<f64> {
        match self {
            Solution::Optimal { objective, .. } => Some(*objective),
            Solution::Infeasible => None,
        }
    }

    /// Returns the value of a variable in an optimal solution.
    pub fn value(&self, var: crate::VarId) -> Option<bool> {
        match self {
            Solution::Optimal { values, .. } => values.get(var.index()).copied(),
            Solution::Infeasible => None,
        }
    }

    /// Returns the full assignment of an optimal solution.
    pub fn values(&self) -> Option<&[bool]> {
        match self {
            Solution::Optimal { values, .. } => Some(values),
            Solution::Infeasible => None,
        }
    }

    /// Iterates the variables set to 1. Empty for an infeasible solution.
    pub fn selected(&self) -> impl Iterator<Item = crate::VarId> + '_ {
        self.values()
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| crate::VarId::new(i))
    }
}
