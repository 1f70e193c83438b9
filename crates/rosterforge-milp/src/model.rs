//! Binary integer program representation.
//!
//! The model is plain data: an objective coefficient per variable, an
//! optional fixing per variable, and a list of constraints, each holding its
//! `(variable, coefficient)` terms. Nothing here knows about any particular
//! search strategy, so a model can be built, inspected, and checked against a
//! candidate assignment without a solver.

use std::fmt;

use crate::error::SolverError;

/// Identifier of a binary decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    /// Creates a variable id from its index.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the variable index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Maximize,
    Minimize,
}

/// Lower and upper limits on a constraint's activity.
///
/// A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintBounds {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl ConstraintBounds {
    /// `activity == value`
    pub fn equal(value: f64) -> Self {
        Self {
            lower: Some(value),
            upper: Some(value),
        }
    }

    /// `activity <= value`
    pub fn at_most(value: f64) -> Self {
        Self {
            lower: None,
            upper: Some(value),
        }
    }

    /// `activity >= value`
    pub fn at_least(value: f64) -> Self {
        Self {
            lower: Some(value),
            upper: None,
        }
    }

    /// `lower <= activity <= upper`
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    #[inline]
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Returns true if `activity` lies within the bounds, up to `tolerance`.
    pub fn contains(&self, activity: f64, tolerance: f64) -> bool {
        self.lower.is_none_or(|lo| activity >= lo - tolerance)
            && self.upper.is_none_or(|hi| activity <= hi + tolerance)
    }
}

impl fmt::Display for ConstraintBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "= {lo}"),
            (Some(lo), Some(hi)) => write!(f, "in [{lo}, {hi}]"),
            (Some(lo), None) => write!(f, ">= {lo}"),
            (None, Some(hi)) => write!(f, "<= {hi}"),
            (None, None) => write!(f, "free"),
        }
    }
}

/// A named linear constraint over binary variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    name: String,
    terms: Vec<(VarId, f64)>,
    bounds: ConstraintBounds,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, terms: Vec<(VarId, f64)>, bounds: ConstraintBounds) -> Self {
        Self {
            name: name.into(),
            terms,
            bounds,
        }
    }

    /// Builds a constraint where every listed variable has coefficient 1.
    pub fn count(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = VarId>,
        bounds: ConstraintBounds,
    ) -> Self {
        Self::new(name, vars.into_iter().map(|v| (v, 1.0)).collect(), bounds)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn bounds(&self) -> ConstraintBounds {
        self.bounds
    }

    /// Evaluates `Σ coefficient · value` for the assignment.
    pub fn activity(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| values.get(var.index()).copied().unwrap_or(false))
            .map(|(_, coef)| coef)
            .sum()
    }
}

/// A binary integer program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    name: String,
    sense: Sense,
    objective: Vec<f64>,
    fixed: Vec<Option<bool>>,
    constraints: Vec<LinearConstraint>,
}

impl Model {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: name.into(),
            sense,
            ..Self::default()
        }
    }

    /// Adds a binary variable with the given objective coefficient.
    pub fn add_variable(&mut self, objective: f64) -> VarId {
        let id = VarId::new(self.objective.len());
        self.objective.push(objective);
        self.fixed.push(None);
        id
    }

    /// Fixes a variable to 0 or 1. A later call overrides an earlier one.
    pub fn fix(&mut self, var: VarId, value: bool) {
        if let Some(slot) = self.fixed.get_mut(var.index()) {
            *slot = Some(value);
        }
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Returns the fixing of a variable, if any.
    pub fn fixed_value(&self, var: VarId) -> Option<bool> {
        self.fixed.get(var.index()).copied().flatten()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    #[inline]
    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of variables fixed to a value.
    pub fn fixed_count(&self) -> usize {
        self.fixed.iter().filter(|f| f.is_some()).count()
    }

    /// Checks that every term references a known variable and every number
    /// is finite.
    pub fn validate(&self) -> Result<(), SolverError> {
        if let Some(index) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(SolverError::InvalidModel(format!(
                "objective coefficient of {} is not finite",
                VarId::new(index)
            )));
        }

        let n = self.variable_count();
        for constraint in &self.constraints {
            for &(var, coef) in constraint.terms() {
                if var.index() >= n {
                    return Err(SolverError::InvalidModel(format!(
                        "constraint '{}' references unknown variable {var}",
                        constraint.name()
                    )));
                }
                if !coef.is_finite() {
                    return Err(SolverError::InvalidModel(format!(
                        "constraint '{}' has a non-finite coefficient on {var}",
                        constraint.name()
                    )));
                }
            }

            let bounds = constraint.bounds();
            let finite = |b: Option<f64>| b.is_none_or(f64::is_finite);
            if !finite(bounds.lower()) || !finite(bounds.upper()) {
                return Err(SolverError::InvalidModel(format!(
                    "constraint '{}' has a non-finite bound",
                    constraint.name()
                )));
            }
            if let (Some(lo), Some(hi)) = (bounds.lower(), bounds.upper()) {
                if lo > hi {
                    return Err(SolverError::InvalidModel(format!(
                        "constraint '{}' has lower bound {lo} above upper bound {hi}",
                        constraint.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evaluates the objective for a full assignment.
    pub fn evaluate(&self, values: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, &on)| on)
            .map(|(c, _)| c)
            .sum()
    }

    /// Returns true if the assignment honors every fixing and constraint.
    pub fn is_satisfied_by(&self, values: &[bool], tolerance: f64) -> bool {
        if values.len() != self.variable_count() {
            return false;
        }
        let fixings_hold = self
            .fixed
            .iter()
            .zip(values)
            .all(|(fixed, &value)| fixed.is_none_or(|f| f == value));
        fixings_hold
            && self
                .constraints
                .iter()
                .all(|c| c.bounds().contains(c.activity(values), tolerance))
    }
}
