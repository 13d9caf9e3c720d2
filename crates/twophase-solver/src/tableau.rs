use std::ops::Range;

use crate::problem::ConstraintOp;
use crate::solution::Assignment;

/// Label of the cost variable column in phase one.
pub const COST_LABEL: &str = "-z";
/// Label of the right-hand side column.
pub const RHS_LABEL: &str = "RHS";

pub fn slack_label(index: usize) -> String {
    format!("s{}", index)
}

pub fn artificial_label(index: usize) -> String {
    format!("a{}", index)
}

/// Which half of the two-phase method a tableau belongs to.
///
/// A phase one tableau carries the original objective as an extra trailing
/// row that is never pivoted on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::One => f.write_str("Phase One"),
            Phase::Two => f.write_str("Phase Two"),
        }
    }
}

/// A cell chosen for the next elimination step.
///
/// `row` is `None` when no constraint row passes the ratio test, i.e. the
/// column is an unbounded ray.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotPosition {
    pub column: usize,
    pub row: Option<usize>,
}

/// Ordered column labels, one per tableau column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRegistry {
    labels: Vec<String>,
}

impl VariableRegistry {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn push(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// A new registry with the labels in `range` removed.
    pub fn without(&self, range: Range<usize>) -> Self {
        Self {
            labels: self
                .labels
                .iter()
                .enumerate()
                .filter(|(i, _)| !range.contains(i))
                .map(|(_, l)| l.clone())
                .collect(),
        }
    }
}

/// Simplex tableau: row 0 is the working objective, the last column is the RHS.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    phase: Phase,
    registry: VariableRegistry,
    rows: Vec<Vec<f64>>,
}

impl Tableau {
    pub fn new(phase: Phase, registry: VariableRegistry, rows: Vec<Vec<f64>>) -> Self {
        Self { phase, registry, rows }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.registry.len()
    }

    pub fn rhs_column(&self) -> usize {
        self.width() - 1
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.rhs_column()]
    }

    /// Rows that take part in ratio tests: everything below the objective,
    /// minus the saved original objective in phase one.
    pub fn constraint_rows(&self) -> Range<usize> {
        let end = match self.phase {
            Phase::One => self.rows.len().saturating_sub(1),
            Phase::Two => self.rows.len(),
        };
        1..end.max(1)
    }

    /// Decision columns of the objective row: everything but the cost
    /// variable and the RHS.
    pub fn objective_columns(&self) -> Range<usize> {
        1..self.rhs_column().max(1)
    }

    /// Every row has exactly one entry per label.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.registry.len())
    }

    pub(crate) fn into_parts(self) -> (Phase, VariableRegistry, Vec<Vec<f64>>) {
        (self.phase, self.registry, self.rows)
    }

    /// Whether some objective coefficient is strictly positive, i.e. the
    /// current basis can still be improved.
    pub fn is_improvable(&self, tolerance: f64) -> bool {
        self.objective_columns().any(|j| self.rows[0][j] > tolerance)
    }
}

/// Number of constraints that receive a slack column.
pub fn count_non_equality(comparisons: &[ConstraintOp]) -> usize {
    comparisons.iter().filter(|op| **op != ConstraintOp::Eq).count()
}

/// End-of-phase-one test: the auxiliary optimum is zero and nothing in the
/// objective row can still improve it.
pub fn is_feasible(tableau: &Tableau, epsilon: f64, tolerance: f64) -> bool {
    !tableau.is_improvable(tolerance) && tableau.rhs(0).abs() <= epsilon
}

/// First objective column with a positive coefficient whose constraint
/// entries are all non-positive. Such a column can grow without limit.
pub fn unbounded_column(tableau: &Tableau, tolerance: f64) -> Option<usize> {
    let objective = tableau.row(0);
    tableau.objective_columns().find(|&j| {
        objective[j] > tolerance
            && tableau
                .constraint_rows()
                .all(|i| tableau.row(i)[j] <= tolerance)
    })
}

pub fn is_unbounded(tableau: &Tableau, tolerance: f64) -> bool {
    unbounded_column(tableau, tolerance).is_some()
}

/// Read the value of each named variable off the tableau.
///
/// A variable is basic when exactly one row (objective included, saved
/// original objective excluded) has a nonzero entry in its column, that row
/// is a constraint and the entry is positive; its value is that row's RHS
/// over the entry. Every other variable sits at zero.
///
/// Each row is claimed by at most one variable, in the order given. Two
/// columns can look basic for the same row when the optimum is not unique.
pub fn extract(tableau: &Tableau, variables: &[String], tolerance: f64) -> Vec<Assignment> {
    let rows = 0..tableau.constraint_rows().end;
    let mut claimed = vec![false; tableau.height()];
    variables
        .iter()
        .map(|name| {
            let value = tableau
                .registry()
                .position(name)
                .and_then(|column| {
                    let mut nonzero = rows
                        .clone()
                        .filter(|&i| tableau.row(i)[column].abs() > tolerance);
                    match (nonzero.next(), nonzero.next()) {
                        (Some(row), None)
                            if row > 0 && !claimed[row] && tableau.row(row)[column] > 0.0 =>
                        {
                            claimed[row] = true;
                            Some(tableau.rhs(row) / tableau.row(row)[column] + 0.0)
                        }
                        _ => None,
                    }
                })
                .unwrap_or(0.0);
            Assignment::new(name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(list: &[&str]) -> VariableRegistry {
        VariableRegistry::new(list.iter().map(|s| s.to_string()).collect())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_non_equality() {
        let ops = [ConstraintOp::Le, ConstraintOp::Eq, ConstraintOp::Ge, ConstraintOp::Eq];
        assert_eq!(count_non_equality(&ops), 2);
        assert_eq!(count_non_equality(&[]), 0);
    }

    #[test]
    fn test_constraint_rows_skip_saved_objective() {
        let registry = labels(&["-z", "x", "RHS"]);
        let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 4.0], vec![1.0, 3.0, 0.0]];
        let one = Tableau::new(Phase::One, registry.clone(), rows.clone());
        let two = Tableau::new(Phase::Two, registry, rows);
        assert_eq!(one.constraint_rows(), 1..2);
        assert_eq!(two.constraint_rows(), 1..3);
    }

    #[test]
    fn test_feasibility_uses_epsilon() {
        let registry = labels(&["-z", "x", "RHS"]);
        let drifted = Tableau::new(
            Phase::One,
            registry.clone(),
            vec![vec![1.0, -1.0, 1e-13], vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 0.0]],
        );
        assert!(is_feasible(&drifted, 1e-11, 1e-9));

        let residual = Tableau::new(
            Phase::One,
            registry.clone(),
            vec![vec![1.0, -1.0, 3.0], vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 0.0]],
        );
        assert!(!is_feasible(&residual, 1e-11, 1e-9));

        let improvable = Tableau::new(
            Phase::One,
            registry,
            vec![vec![1.0, 2.0, 0.0], vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 0.0]],
        );
        assert!(!is_feasible(&improvable, 1e-11, 1e-9));
    }

    #[test]
    fn test_unbounded_column() {
        let registry = labels(&["-z", "x", "s0", "RHS"]);
        let tableau = Tableau::new(
            Phase::Two,
            registry,
            vec![vec![1.0, 0.0, 1.0, -1.0], vec![0.0, 1.0, -1.0, 1.0]],
        );
        assert_eq!(unbounded_column(&tableau, 1e-9), Some(2));
        assert!(is_unbounded(&tableau, 1e-9));
    }

    #[test]
    fn test_unbounded_ignores_saved_objective_row() {
        let registry = labels(&["-z", "x", "RHS"]);
        let tableau = Tableau::new(
            Phase::One,
            registry,
            vec![vec![1.0, 1.0, 0.0], vec![0.0, -1.0, 2.0], vec![1.0, 5.0, 0.0]],
        );
        assert_eq!(unbounded_column(&tableau, 1e-9), Some(1));
    }

    #[test]
    fn test_extract_basic_and_nonbasic() {
        // x basic in row 2 with a non-normalized entry, y non-basic
        let registry = labels(&["-z", "x", "y", "s0", "RHS"]);
        let tableau = Tableau::new(
            Phase::Two,
            registry,
            vec![
                vec![1.0, 0.0, -2.0, -1.0, -12.0],
                vec![0.0, 0.0, 1.0, 1.0, 4.0],
                vec![0.0, 3.0, 1.0, 0.0, 6.0],
            ],
        );
        let values = extract(&tableau, &names(&["x", "y"]), 1e-9);
        assert_eq!(values[0].variable, "x");
        assert!((values[0].value - 2.0).abs() < 1e-12, "x = {}", values[0].value);
        assert_eq!(values[1].variable, "y");
        assert_eq!(values[1].value, 0.0);
    }

    #[test]
    fn test_extract_ignores_objective_only_column() {
        let registry = labels(&["-z", "x", "RHS"]);
        let tableau = Tableau::new(Phase::Two, registry, vec![vec![1.0, 4.0, 0.0]]);
        let values = extract(&tableau, &names(&["x"]), 1e-9);
        assert_eq!(values[0].value, 0.0);
    }

    #[test]
    fn test_extract_one_variable_per_row() {
        // max x + y; x + y <= 5 leaves both columns looking basic in row 1
        let registry = labels(&["-z", "x", "y", "s0", "RHS"]);
        let tableau = Tableau::new(
            Phase::Two,
            registry,
            vec![vec![1.0, 0.0, 0.0, -1.0, -5.0], vec![0.0, 1.0, 1.0, 1.0, 5.0]],
        );
        let values = extract(&tableau, &names(&["x", "y"]), 1e-9);
        assert_eq!(values[0].value, 5.0);
        assert_eq!(values[1].value, 0.0);
    }

    #[test]
    fn test_registry_without_range() {
        let registry = labels(&["-z", "x", "s0", "a0", "a1", "RHS"]);
        assert_eq!(registry.without(3..5), labels(&["-z", "x", "s0", "RHS"]));
        assert_eq!(registry.position("a1"), Some(4));
        assert_eq!(registry.position("y"), None);
    }
}
