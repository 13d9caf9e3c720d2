use tracing::{debug, info};

use crate::driver::{self, DriverLimits, DriverOutcome};
use crate::error::SolveError;
use crate::observer::{NoDisplay, TableauObserver, TableauSnapshot};
use crate::phase_one;
use crate::problem::{CanonicalProblem, OptimizationType};
use crate::solution::{format_assignments, Assignment, Solution};
use crate::tableau::{extract, is_feasible, Phase, Tableau};
use crate::transition::{drive_out_artificials, to_phase_two};

/// Two-phase tableau simplex solver
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before assuming a cycle
    max_iterations: usize,
    /// Zero threshold for objective coefficients and pivot entries
    tolerance: f64,
    /// How close to zero the phase one optimum must be
    feasibility_tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            feasibility_tolerance: 1e-11,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = tol;
        self
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &CanonicalProblem) -> Result<Solution, SolveError> {
        self.solve_with(problem, &mut NoDisplay)
    }

    /// Solve, showing every intermediate tableau to `observer`.
    pub fn solve_with(
        &self,
        problem: &CanonicalProblem,
        observer: &mut dyn TableauObserver,
    ) -> Result<Solution, SolveError> {
        problem.validate()?;

        let limits = DriverLimits {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        };
        let direction = problem.objective.direction;

        // The engine only maximizes
        let working = match direction {
            OptimizationType::Max => problem.clone(),
            OptimizationType::Min => problem.negated(),
        };

        // Phase 1: find a basic feasible solution
        let augmented = phase_one::augment(&working);
        self.show(observer, "Initial Tableau", &augmented, false);
        let priced = phase_one::price_out(&augmented);
        self.show(observer, "Tableau 0", &priced, true);

        let tableau = match driver::run(&priced, limits, 1, observer) {
            DriverOutcome::Optimal { tableau, iterations } => {
                debug!(iterations, "phase one converged");
                tableau
            }
            DriverOutcome::Unbounded { .. } => {
                // The auxiliary objective is bounded by zero; only drift lands here
                info!("phase one found no feasible basis");
                observer.summary("The problem is infeasible.");
                return Ok(Solution::infeasible());
            }
            DriverOutcome::CycleDetected { .. } => {
                return Ok(Solution::cycle_detected(Phase::One, Vec::new()));
            }
        };

        if !is_feasible(&tableau, self.feasibility_tolerance, self.tolerance) {
            info!(residual = -tableau.rhs(0), "problem is infeasible");
            observer.summary("The problem is infeasible.");
            return Ok(Solution::infeasible());
        }

        let tableau = drive_out_artificials(
            &tableau,
            problem.num_variables(),
            &problem.comparisons(),
            self.tolerance,
        );
        let initial_vertex = extract(&tableau, &problem.variables, self.tolerance);
        observer.summary(&format!(
            "The problem is feasible. The initial vertex calculated is: {}",
            format_assignments(&initial_vertex)
        ));

        // Phase 2: optimize the original objective
        let tableau = to_phase_two(&tableau, problem.num_variables(), &problem.comparisons());
        self.show(observer, "Initial Tableau", &tableau, true);

        let tableau = match driver::run(&tableau, limits, 0, observer) {
            DriverOutcome::Optimal { tableau, iterations } => {
                debug!(iterations, "phase two converged");
                tableau
            }
            DriverOutcome::Unbounded { .. } => {
                info!("problem is unbounded");
                observer.summary("The problem is unbounded and no optimal solution exists.");
                return Ok(Solution::unbounded(initial_vertex));
            }
            DriverOutcome::CycleDetected { .. } => {
                return Ok(Solution::cycle_detected(Phase::Two, initial_vertex));
            }
        };

        let solution = self.extract_solution(&tableau, problem, initial_vertex);
        if let Some(value) = solution.objective_value {
            info!(value, "optimal solution found");
            let extreme = match direction {
                OptimizationType::Max => "maximum",
                OptimizationType::Min => "minimum",
            };
            observer.summary(&format!(
                "The {} value of {} can be achieved with: {}",
                extreme,
                value,
                format_assignments(&solution.assignment)
            ));
        }
        Ok(solution)
    }

    fn extract_solution(
        &self,
        tableau: &Tableau,
        problem: &CanonicalProblem,
        initial_vertex: Vec<Assignment>,
    ) -> Solution {
        // The objective row's RHS holds minus the value of the maximized objective
        let maximized = -tableau.rhs(0);
        let value = match problem.objective.direction {
            OptimizationType::Max => maximized,
            OptimizationType::Min => -maximized,
        };
        let assignment = extract(tableau, &problem.variables, self.tolerance);
        // Avoid reporting -0
        Solution::optimal(value + 0.0, assignment, initial_vertex)
    }

    fn show(
        &self,
        observer: &mut dyn TableauObserver,
        caption: &str,
        tableau: &Tableau,
        with_pivot: bool,
    ) {
        if !observer.is_enabled() {
            return;
        }
        let pivot = if with_pivot {
            driver::next_pivot(tableau, self.tolerance)
        } else {
            None
        };
        observer.snapshot(TableauSnapshot::capture(caption, tableau, pivot));
    }
}
