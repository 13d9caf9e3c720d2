use tracing::{debug, warn};

use crate::observer::{TableauObserver, TableauSnapshot};
use crate::pivot::{pivot, select_pivot};
use crate::tableau::{unbounded_column, PivotPosition, Tableau};

/// How one phase of the simplex iteration ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverOutcome {
    /// No objective coefficient is strictly positive any more.
    Optimal { tableau: Tableau, iterations: usize },
    /// `column` can grow without bound.
    Unbounded { column: usize, iterations: usize },
    /// The pivot cap was reached before convergence.
    CycleDetected { iterations: usize },
}

/// Limits for one run of the driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverLimits {
    pub max_iterations: usize,
    pub tolerance: f64,
}

/// Pivot until optimal, unbounded, or out of iterations.
///
/// Each accepted pivot is shown to `observer` as `Tableau {n}`, counting from
/// `first_caption`, together with the pivot the following step would take.
pub fn run(
    tableau: &Tableau,
    limits: DriverLimits,
    first_caption: usize,
    observer: &mut dyn TableauObserver,
) -> DriverOutcome {
    let mut current = tableau.clone();
    let mut iterations = 0;

    loop {
        if !current.is_improvable(limits.tolerance) {
            return DriverOutcome::Optimal {
                tableau: current,
                iterations,
            };
        }

        if let Some(column) = unbounded_column(&current, limits.tolerance) {
            debug!(
                column = %current.registry().labels()[column],
                iterations,
                "objective unbounded"
            );
            return DriverOutcome::Unbounded { column, iterations };
        }

        if iterations >= limits.max_iterations {
            warn!(
                iterations,
                phase = current.phase().number(),
                "iteration cap reached, assuming a cycle"
            );
            return DriverOutcome::CycleDetected { iterations };
        }

        let Some(position) = select_pivot(&current, limits.tolerance) else {
            return DriverOutcome::Optimal {
                tableau: current,
                iterations,
            };
        };
        let Some(row) = position.row else {
            // Every positive column had a usable row a moment ago
            return DriverOutcome::Optimal {
                tableau: current,
                iterations,
            };
        };

        debug!(
            phase = current.phase().number(),
            entering = %current.registry().labels()[position.column],
            row,
            ratio = current.rhs(row) / current.row(row)[position.column],
            "pivot"
        );

        current = pivot(&current, row, position.column);
        iterations += 1;

        if observer.is_enabled() {
            let preview = next_pivot(&current, limits.tolerance);
            observer.snapshot(TableauSnapshot::capture(
                format!("Tableau {}", first_caption + iterations - 1),
                &current,
                preview,
            ));
        }
    }
}

/// The pivot the driver would take next on `tableau`, for display.
pub fn next_pivot(tableau: &Tableau, tolerance: f64) -> Option<PivotPosition> {
    if tableau.is_improvable(tolerance) {
        select_pivot(tableau, tolerance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NoDisplay, Recorder};
    use crate::tableau::{Phase, VariableRegistry};

    fn registry(list: &[&str]) -> VariableRegistry {
        VariableRegistry::new(list.iter().map(|s| s.to_string()).collect())
    }

    fn limits() -> DriverLimits {
        DriverLimits {
            max_iterations: 100,
            tolerance: 1e-9,
        }
    }

    fn textbook_phase_two() -> Tableau {
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
    fn test_runs_to_optimum() {
        match run(&textbook_phase_two(), limits(), 0, &mut NoDisplay) {
            DriverOutcome::Optimal { tableau, iterations } => {
                assert_eq!(iterations, 2);
                assert!((tableau.rhs(0) + 36.0).abs() < 1e-9, "rhs = {}", tableau.rhs(0));
            }
            other => panic!("expected optimum, got {:?}", other),
        }
    }

    #[test]
    fn test_reports_each_pivot() {
        let mut recorder = Recorder::new();
        run(&textbook_phase_two(), limits(), 0, &mut recorder);

        assert_eq!(recorder.captions(Phase::Two), vec!["Tableau 0", "Tableau 1"]);
        assert!(recorder.snapshots[0].pivot.is_some());
        // Nothing left to pivot on after the optimum
        assert_eq!(recorder.snapshots[1].pivot, None);
    }

    #[test]
    fn test_detects_unbounded_ray() {
        let tableau = Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "s0", "RHS"]),
            vec![vec![1.0, 0.0, 1.0, -1.0], vec![0.0, 1.0, -1.0, 1.0]],
        );
        assert_eq!(
            run(&tableau, limits(), 0, &mut NoDisplay),
            DriverOutcome::Unbounded {
                column: 2,
                iterations: 0
            }
        );
    }

    #[test]
    fn test_iteration_cap() {
        let capped = DriverLimits {
            max_iterations: 1,
            tolerance: 1e-9,
        };
        assert_eq!(
            run(&textbook_phase_two(), capped, 0, &mut NoDisplay),
            DriverOutcome::CycleDetected { iterations: 1 }
        );
    }

    #[test]
    fn test_already_optimal_is_returned_unchanged() {
        let tableau = Tableau::new(
            Phase::Two,
            registry(&["-z", "x", "RHS"]),
            vec![vec![1.0, -1.0, -3.0], vec![0.0, 1.0, 3.0]],
        );
        match run(&tableau, limits(), 0, &mut NoDisplay) {
            DriverOutcome::Optimal { tableau: result, iterations } => {
                assert_eq!(iterations, 0);
                assert_eq!(result, tableau);
            }
            other => panic!("expected optimum, got {:?}", other),
        }
    }
}
