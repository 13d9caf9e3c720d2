use tracing::debug;

use crate::pivot::pivot;
use crate::problem::ConstraintOp;
use crate::tableau::{count_non_equality, Phase, Tableau};

/// Whether `column` is the basic column of `row`: its only nonzero among the
/// objective and constraint rows sits in `row` and is positive.
fn is_basic_in(tableau: &Tableau, column: usize, row: usize, tolerance: f64) -> bool {
    let mut nonzero = (0..tableau.constraint_rows().end)
        .filter(|&i| tableau.row(i)[column].abs() > tolerance);
    matches!((nonzero.next(), nonzero.next()), (Some(r), None) if r == row)
        && tableau.row(row)[column] > tolerance
}

/// Pivot every artificial still basic at the end of phase one out of the
/// basis, so that each constraint row keeps a basic column once the
/// artificial columns are dropped.
///
/// A feasible phase one leaves such artificials at zero level. Each one is
/// replaced by the leftmost decision or slack column with a nonzero entry in
/// its row; the row is negated first when that entry is negative, which is
/// exact because its RHS is zero. A row with no such entry is a linear
/// combination of the others and is removed.
pub fn drive_out_artificials(
    tableau: &Tableau,
    decision_variables: usize,
    comparisons: &[ConstraintOp],
    tolerance: f64,
) -> Tableau {
    let splice_start = decision_variables + count_non_equality(comparisons) + 1;
    let structural = 1..splice_start.min(tableau.rhs_column());
    let mut current = tableau.clone();
    let mut redundant = Vec::new();

    for row in tableau.constraint_rows() {
        if structural
            .clone()
            .any(|j| is_basic_in(&current, j, row, tolerance))
        {
            continue;
        }
        let entering = structural
            .clone()
            .find(|&j| current.row(row)[j].abs() > tolerance);
        let Some(column) = entering else {
            debug!(row, "dropping redundant constraint row");
            redundant.push(row);
            continue;
        };

        debug!(
            row,
            entering = %current.registry().labels()[column],
            "driving artificial out of the basis"
        );
        if current.row(row)[column] < 0.0 {
            let (phase, registry, mut rows) = current.into_parts();
            for value in rows[row].iter_mut() {
                *value = -*value + 0.0;
            }
            current = Tableau::new(phase, registry, rows);
        }
        current = pivot(&current, row, column);
    }

    if redundant.is_empty() {
        return current;
    }
    let (phase, registry, rows) = current.into_parts();
    let rows = rows
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !redundant.contains(i))
        .map(|(_, row)| row)
        .collect();
    Tableau::new(phase, registry, rows)
}

/// Turn an optimal phase one tableau into the starting tableau of phase two.
///
/// The artificial columns (one per constraint, right after the slacks) are
/// dropped, and the saved original objective replaces the auxiliary one.
pub fn to_phase_two(tableau: &Tableau, decision_variables: usize, comparisons: &[ConstraintOp]) -> Tableau {
    let splice_start = decision_variables + count_non_equality(comparisons) + 1;
    // Every column between the slacks and the RHS is artificial; counting
    // columns rather than rows stays correct after redundant rows are removed
    let artificials = tableau.rhs_column().saturating_sub(splice_start);
    let artificial_columns = splice_start..splice_start + artificials;

    let registry = tableau.registry().without(artificial_columns.clone());
    let mut rows: Vec<Vec<f64>> = tableau
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(j, _)| !artificial_columns.contains(j))
                .map(|(_, &v)| v)
                .collect()
        })
        .collect();

    if let Some(original) = rows.pop() {
        match rows.first_mut() {
            Some(objective) => *objective = original,
            None => rows.push(original),
        }
    }

    debug!(
        removed = artificials,
        width = registry.len(),
        "dropped artificial columns"
    );

    Tableau::new(Phase::Two, registry, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::VariableRegistry;

    fn registry(list: &[&str]) -> VariableRegistry {
        VariableRegistry::new(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_strips_artificials_and_restores_objective() {
        // max x; x >= 1, after the phase one pivot
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "s0", "a0", "RHS"]),
            vec![
                vec![1.0, 0.0, 0.0, -1.0, 0.0],
                vec![0.0, 1.0, -1.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0, -1.0, -1.0],
            ],
        );
        let phase_two = to_phase_two(&phase_one, 1, &[ConstraintOp::Ge]);

        assert_eq!(phase_two.phase(), Phase::Two);
        assert_eq!(phase_two.registry().labels(), &["-z", "x", "s0", "RHS"]);
        assert_eq!(
            phase_two.rows(),
            &[vec![1.0, 0.0, 1.0, -1.0], vec![0.0, 1.0, -1.0, 1.0]]
        );
        assert!(phase_two.is_rectangular());
    }

    #[test]
    fn test_equality_rows_have_no_slack() {
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "y", "s0", "a0", "a1", "RHS"]),
            vec![
                vec![1.0, 0.0, 0.0, 0.0, -1.0, -1.0, 0.0],
                vec![0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 2.0],
                vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
                vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -3.0],
            ],
        );
        let phase_two = to_phase_two(&phase_one, 2, &[ConstraintOp::Eq, ConstraintOp::Le]);

        assert_eq!(phase_two.registry().labels(), &["-z", "x", "y", "s0", "RHS"]);
        assert_eq!(phase_two.row(0), &[1.0, 2.0, 1.0, 0.0, -3.0]);
        assert_eq!(phase_two.height(), 3);
    }

    #[test]
    fn test_no_constraints() {
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "RHS"]),
            vec![vec![1.0, 0.0, 0.0], vec![1.0, 1.0, 0.0]],
        );
        let phase_two = to_phase_two(&phase_one, 1, &[]);
        assert_eq!(phase_two.rows(), &[vec![1.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_drive_out_zero_level_artificial() {
        // max 4x; 4x + 4y <= 3; 3x + 4y >= 3, at the end of phase one with a1
        // still basic in row 2
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "y", "s0", "s1", "a0", "a1", "RHS"]),
            vec![
                vec![1.0, -1.0, 0.0, -1.0, -1.0, -2.0, 0.0, 0.0],
                vec![0.0, 4.0, 4.0, 1.0, 0.0, 1.0, 0.0, 3.0],
                vec![0.0, -1.0, 0.0, -1.0, -1.0, -1.0, 1.0, 0.0],
                vec![1.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ],
        );
        let comparisons = [ConstraintOp::Le, ConstraintOp::Ge];
        let driven = drive_out_artificials(&phase_one, 2, &comparisons, 1e-9);

        assert_eq!(
            driven.rows(),
            &[
                vec![1.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0, 0.0],
                vec![0.0, 0.0, 4.0, -3.0, -4.0, -3.0, 4.0, 3.0],
                vec![0.0, 1.0, 0.0, 1.0, 1.0, 1.0, -1.0, 0.0],
                vec![1.0, 0.0, 0.0, -4.0, -4.0, -4.0, 4.0, 0.0],
            ]
        );

        let phase_two = to_phase_two(&driven, 2, &comparisons);
        assert_eq!(phase_two.registry().labels(), &["-z", "x", "y", "s0", "s1", "RHS"]);
        assert_eq!(phase_two.row(0), &[1.0, 0.0, 0.0, -4.0, -4.0, 0.0]);
        assert_eq!(phase_two.height(), 3);
    }

    #[test]
    fn test_drive_out_removes_redundant_row() {
        // max x; x + y = 2 twice, after one phase one pivot
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "y", "a0", "a1", "RHS"]),
            vec![
                vec![1.0, 0.0, 0.0, -2.0, 0.0, 0.0],
                vec![0.0, 1.0, 1.0, 1.0, 0.0, 2.0],
                vec![0.0, 0.0, 0.0, -1.0, 1.0, 0.0],
                vec![1.0, 0.0, -1.0, -1.0, 0.0, -2.0],
            ],
        );
        let comparisons = [ConstraintOp::Eq, ConstraintOp::Eq];
        let driven = drive_out_artificials(&phase_one, 2, &comparisons, 1e-9);
        assert_eq!(driven.height(), 3);

        let phase_two = to_phase_two(&driven, 2, &comparisons);
        assert_eq!(phase_two.registry().labels(), &["-z", "x", "y", "RHS"]);
        assert_eq!(
            phase_two.rows(),
            &[vec![1.0, 0.0, -1.0, -2.0], vec![0.0, 1.0, 1.0, 2.0]]
        );
    }

    #[test]
    fn test_drive_out_leaves_clean_basis_alone() {
        let phase_one = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "s0", "a0", "RHS"]),
            vec![
                vec![1.0, 0.0, 0.0, -1.0, 0.0],
                vec![0.0, 1.0, -1.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0, -1.0, -1.0],
            ],
        );
        let driven = drive_out_artificials(&phase_one, 1, &[ConstraintOp::Ge], 1e-9);
        assert_eq!(driven, phase_one);
    }
}
