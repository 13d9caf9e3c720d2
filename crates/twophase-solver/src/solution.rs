use crate::tableau::Phase;

/// The value a variable takes in a basic solution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub variable: String,
    pub value: f64,
}

impl Assignment {
    pub fn new(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            value,
        }
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.variable, self.value)
    }
}

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal objective value, in the direction the problem was stated
    #[cfg_attr(
        feature = "serde",
        serde(rename = "value", default, skip_serializing_if = "Option::is_none")
    )]
    pub objective_value: Option<f64>,
    /// Optimal values for each original variable
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub assignment: Vec<Assignment>,
    /// Basic feasible point found at the end of phase one
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub initial_vertex: Vec<Assignment>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The constraints admit no point
    Infeasible,
    /// The objective grows without limit
    Unbounded,
    /// The iteration cap was hit in the given phase
    CycleDetected(Phase),
}

impl Solution {
    pub fn optimal(value: f64, assignment: Vec<Assignment>, initial_vertex: Vec<Assignment>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            assignment,
            initial_vertex,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            objective_value: None,
            assignment: Vec::new(),
            initial_vertex: Vec::new(),
        }
    }

    pub fn unbounded(initial_vertex: Vec<Assignment>) -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            objective_value: None,
            assignment: Vec::new(),
            initial_vertex,
        }
    }

    pub fn cycle_detected(phase: Phase, initial_vertex: Vec<Assignment>) -> Self {
        Self {
            status: SolutionStatus::CycleDetected(phase),
            objective_value: None,
            assignment: Vec::new(),
            initial_vertex,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value assigned to `variable`, if the solve was optimal and it exists.
    pub fn value_of(&self, variable: &str) -> Option<f64> {
        self.assignment
            .iter()
            .find(|a| a.variable == variable)
            .map(|a| a.value)
    }
}

/// Render assignments the way result summaries list them: `x = 2, y = 6`.
pub fn format_assignments(assignments: &[Assignment]) -> String {
    assignments
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
