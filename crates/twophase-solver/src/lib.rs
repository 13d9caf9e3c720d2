mod driver;
mod error;
mod observer;
mod phase_one;
mod pivot;
mod problem;
mod simplex;
mod solution;
mod tableau;
mod transition;

pub use driver::{next_pivot, run, DriverLimits, DriverOutcome};
pub use error::SolveError;
pub use observer::{NoDisplay, Recorder, TableauObserver, TableauSnapshot};
pub use phase_one::{augment, build_phase_one, price_out};
pub use pivot::{entering_column, leaving_row, pivot, select_pivot};
pub use problem::{CanonicalProblem, Constraint, ConstraintOp, Objective, OptimizationType};
pub use simplex::Solver;
pub use solution::{format_assignments, Assignment, Solution, SolutionStatus};
pub use tableau::{
    artificial_label, count_non_equality, extract, is_feasible, is_unbounded, slack_label,
    unbounded_column, Phase, PivotPosition, Tableau, VariableRegistry, COST_LABEL, RHS_LABEL,
};
pub use transition::{drive_out_artificials, to_phase_two};
