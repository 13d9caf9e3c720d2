//! Pivot selection and elimination.
//!
//! Entering column: Dantzig's rule (largest objective coefficient), ties to
//! the leftmost column. Leaving row: minimum ratio test, ties to the topmost
//! row. Taking the first index on ties is Bland's tie-break.

use crate::tableau::{PivotPosition, Tableau};

/// Leftmost column holding the largest objective coefficient, skipping the
/// cost variable and the RHS. `None` only when there are no such columns.
pub fn entering_column(tableau: &Tableau) -> Option<usize> {
    let objective = tableau.row(0);
    let mut best: Option<usize> = None;
    for j in tableau.objective_columns() {
        match best {
            Some(b) if objective[j] <= objective[b] => {}
            _ => best = Some(j),
        }
    }
    best
}

/// Topmost constraint row with the smallest nonnegative `RHS / entry` among
/// entries above `tolerance`.
pub fn leaving_row(tableau: &Tableau, column: usize, tolerance: f64) -> Option<usize> {
    let mut min_ratio = f64::INFINITY;
    let mut min_row = None;
    for i in tableau.constraint_rows() {
        let entry = tableau.row(i)[column];
        if entry > tolerance {
            let ratio = tableau.rhs(i) / entry;
            // Drift can leave a degenerate RHS a hair below zero
            if ratio >= -tolerance && ratio < min_ratio {
                min_ratio = ratio;
                min_row = Some(i);
            }
        }
    }
    min_row
}

pub fn select_pivot(tableau: &Tableau, tolerance: f64) -> Option<PivotPosition> {
    let column = entering_column(tableau)?;
    Some(PivotPosition {
        column,
        row: leaving_row(tableau, column, tolerance),
    })
}

/// Eliminate `column` from every row except `row`, returning the new tableau.
///
/// The pivot row itself is not scaled, so basic columns are multiples of unit
/// vectors rather than unit vectors. The saved objective row of phase one is
/// eliminated like any other.
pub fn pivot(tableau: &Tableau, row: usize, column: usize) -> Tableau {
    let (phase, registry, mut rows) = tableau.clone().into_parts();
    let pivot_row = rows[row].clone();
    let pivot_value = pivot_row[column];

    for (i, current) in rows.iter_mut().enumerate() {
        if i == row {
            continue;
        }
        let factor = current[column] / pivot_value;
        if factor == 0.0 {
            continue;
        }
        for (value, &p) in current.iter_mut().zip(&pivot_row) {
            *value -= factor * p;
        }
        current[column] = 0.0;
    }

    let next = Tableau::new(phase, registry, rows);
    debug_assert!(next.is_rectangular(), "pivot produced a ragged tableau");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::{Phase, VariableRegistry};

    fn registry(list: &[&str]) -> VariableRegistry {
        VariableRegistry::new(list.iter().map(|s| s.to_string()).collect())
    }

    fn textbook_phase_two() -> Tableau {
        // max 3x + 5y; x <= 4; 2y <= 12; 3x + 2y <= 18
        Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "y", "s0", "s1", "s2", "RHS"]),
            vec![
                vec![1.0, 3.0, 5.0, 0.0, 0.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 4.0],
                vec![0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 12.0],
                vec![0.0, 3.0, 2.0, 0.0, 0.0, 1.0, 18.0],
            ],
        )
    }

    #[test]
    fn test_select_pivot_dantzig() {
        let position = select_pivot(&textbook_phase_two(), 1e-9).unwrap();
        assert_eq!(position, PivotPosition { column: 2, row: Some(2) });
    }

    #[test]
    fn test_entering_ties_go_left() {
        let tableau = Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "y", "RHS"]),
            vec![vec![1.0, 2.0, 2.0, 0.0], vec![0.0, 1.0, 1.0, 4.0]],
        );
        assert_eq!(entering_column(&tableau), Some(1));
    }

    #[test]
    fn test_leaving_ties_go_up() {
        let tableau = Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "RHS"]),
            vec![
                vec![1.0, 1.0, 0.0],
                vec![0.0, 2.0, 4.0],
                vec![0.0, 1.0, 2.0],
                vec![0.0, 1.0, 2.0],
            ],
        );
        assert_eq!(leaving_row(&tableau, 1, 1e-9), Some(1));
    }

    #[test]
    fn test_leaving_skips_nonpositive_entries() {
        let tableau = Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "RHS"]),
            vec![
                vec![1.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, -3.0, 2.0],
            ],
        );
        assert_eq!(
            select_pivot(&tableau, 1e-9),
            Some(PivotPosition { column: 1, row: None })
        );
    }

    #[test]
    fn test_phase_one_never_leaves_on_saved_objective() {
        let tableau = Tableau::new(
            Phase::One,
            registry(&["-z", "x", "RHS"]),
            vec![
                vec![1.0, 1.0, 3.0],
                vec![0.0, 1.0, 3.0],
                vec![1.0, 5.0, 0.0],
            ],
        );
        assert_eq!(leaving_row(&tableau, 1, 1e-9), Some(1));
    }

    #[test]
    fn test_pivot_eliminates_column() {
        let before = textbook_phase_two();
        let after = pivot(&before, 2, 2);

        assert_eq!(after.row(0), &[1.0, 3.0, 0.0, 0.0, -2.5, 0.0, -30.0]);
        // Pivot row is left unscaled
        assert_eq!(after.row(2), before.row(2));
        assert_eq!(after.row(3), &[0.0, 3.0, 0.0, 0.0, -1.0, 1.0, 6.0]);
        assert!(after.is_rectangular());
        // Input is not mutated
        assert_eq!(before, textbook_phase_two());
    }
}
