use crate::lexer::Span;
use twophase_solver::{CanonicalProblem, ConstraintOp, OptimizationType};

/// A parsed problem: one objective line and any number of constraints, in
/// source order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub objective: ObjectiveLine,
    pub constraints: Vec<ConstraintLine>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveLine {
    /// 1-based line number in the source.
    pub number: usize,
    pub direction: OptimizationType,
    pub terms: Vec<Term>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintLine {
    pub number: usize,
    pub terms: Vec<Term>,
    pub comparator: ConstraintOp,
    pub rhs: f64,
}

/// A signed coefficient, optionally attached to a variable. A term with no
/// variable is a bare number.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub variable: Option<String>,
    pub span: Span,
}

impl Term {
    pub fn is_constant(&self) -> bool {
        self.variable.is_none()
    }
}

/// Sum of coefficients per variable, aligned to `variables`. Bare numbers
/// are ignored.
fn row(terms: &[Term], variables: &[String]) -> Vec<f64> {
    let mut row = vec![0.0; variables.len()];
    for term in terms {
        let Some(name) = &term.variable else { continue };
        if let Some(j) = variables.iter().position(|v| v == name) {
            row[j] += term.coefficient;
        }
    }
    row
}

impl ObjectiveLine {
    pub fn coefficients(&self, variables: &[String]) -> Vec<f64> {
        row(&self.terms, variables)
    }
}

impl ConstraintLine {
    pub fn coefficients(&self, variables: &[String]) -> Vec<f64> {
        row(&self.terms, variables)
    }
}

impl Program {
    /// Distinct variable names, objective first, then constraints in order.
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let terms = self
            .objective
            .terms
            .iter()
            .chain(self.constraints.iter().flat_map(|c| &c.terms));
        for term in terms {
            if let Some(name) = &term.variable {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Lower to the dense form the solver consumes. Coefficients of a
    /// variable repeated within one line are summed.
    pub fn to_problem(&self) -> CanonicalProblem {
        let variables = self.variables();
        let mut problem = CanonicalProblem::new(variables.clone());
        problem.set_objective(
            self.objective.coefficients(&variables),
            self.objective.direction,
        );
        for constraint in &self.constraints {
            problem.add_constraint(
                constraint.coefficients(&variables),
                constraint.comparator,
                constraint.rhs,
            );
        }
        problem
    }
}
