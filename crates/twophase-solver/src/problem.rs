use crate::error::SolveError;

/// A linear program in the canonical shape the tableau builder expects.
///
/// Every coefficient vector is aligned to `variables`, which keeps the order
/// in which each name was first seen.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProblem {
    /// Distinct decision variable names
    pub variables: Vec<String>,
    /// Objective function
    pub objective: Objective,
    /// Constraints, in input order
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to maximize or minimize
    pub direction: OptimizationType,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    Max,
    Min,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    /// Parse one of the three accepted comparator spellings.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "=",
        }
    }

    /// The comparator obtained by multiplying both sides by -1.
    pub fn flipped(self) -> Self {
        match self {
            Self::Le => Self::Ge,
            Self::Ge => Self::Le,
            Self::Eq => Self::Eq,
        }
    }
}

impl std::fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl CanonicalProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                direction: OptimizationType::Max,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, direction: OptimizationType) {
        self.objective = Objective { coefficients, direction };
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint { coefficients, op, rhs });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn comparisons(&self) -> Vec<ConstraintOp> {
        self.constraints.iter().map(|c| c.op).collect()
    }

    /// Check that every row is aligned to the variable list.
    ///
    /// Row 0 is the objective, constraint `i` is row `i + 1`.
    pub fn validate(&self) -> Result<(), SolveError> {
        let expected = self.num_variables();
        let rows = std::iter::once(&self.objective.coefficients)
            .chain(self.constraints.iter().map(|c| &c.coefficients));
        for (row, coefficients) in rows.enumerate() {
            if coefficients.len() != expected {
                return Err(SolveError::DimensionMismatch {
                    row,
                    expected,
                    found: coefficients.len(),
                });
            }
        }
        Ok(())
    }

    /// Row-major coefficient matrix with the objective at index 0.
    ///
    /// The objective row has no RHS entry; constraint rows end with theirs.
    pub fn coefficient_matrix(&self) -> Vec<Vec<f64>> {
        let mut matrix = Vec::with_capacity(self.num_constraints() + 1);
        matrix.push(self.objective.coefficients.clone());
        for c in &self.constraints {
            let mut row = c.coefficients.clone();
            row.push(c.rhs);
            matrix.push(row);
        }
        matrix
    }

    /// The same constraints with the objective direction and signs reversed.
    ///
    /// `min c.x` and `max -c.x` share their optimal point; their values differ in sign.
    pub fn negated(&self) -> Self {
        let direction = match self.objective.direction {
            OptimizationType::Max => OptimizationType::Min,
            OptimizationType::Min => OptimizationType::Max,
        };
        let mut negated = self.clone();
        negated.objective = Objective {
            coefficients: self.objective.coefficients.iter().map(|c| -c).collect(),
            direction,
        };
        negated
    }
}
