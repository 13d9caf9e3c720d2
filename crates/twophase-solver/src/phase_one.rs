use tracing::debug;

use crate::problem::{CanonicalProblem, ConstraintOp};
use crate::tableau::{
    artificial_label, count_non_equality, slack_label, Phase, Tableau, VariableRegistry,
    COST_LABEL, RHS_LABEL,
};

/// Build the auxiliary tableau and price the artificial variables out of its
/// objective row.
///
/// `problem` is read as a maximization: callers negate a minimization's
/// objective first.
pub fn build_phase_one(problem: &CanonicalProblem) -> Tableau {
    price_out(&augment(problem))
}

/// Lay out the auxiliary problem before pricing out.
///
/// Columns: cost variable, decision variables, one slack per inequality, one
/// artificial per constraint, RHS. Row 0 is the auxiliary objective
/// (`-1` under each artificial), then one row per constraint, then the
/// original objective saved as an inert trailing row.
pub fn augment(problem: &CanonicalProblem) -> Tableau {
    let n_vars = problem.num_variables();
    let n_constraints = problem.num_constraints();
    let comparisons = problem.comparisons();
    let n_slack = count_non_equality(&comparisons);

    let slack_start = 1 + n_vars;
    let artificial_start = slack_start + n_slack;
    let width = artificial_start + n_constraints + 1;
    let rhs_col = width - 1;

    let mut registry = VariableRegistry::new(Vec::with_capacity(width));
    registry.push(COST_LABEL);
    for name in &problem.variables {
        registry.push(name.as_str());
    }
    for k in 0..n_slack {
        registry.push(slack_label(k));
    }
    for k in 0..n_constraints {
        registry.push(artificial_label(k));
    }
    registry.push(RHS_LABEL);

    let mut rows = Vec::with_capacity(n_constraints + 2);

    let mut objective = vec![0.0; width];
    objective[0] = 1.0;
    objective[artificial_start..rhs_col].fill(-1.0);
    rows.push(objective);

    let mut slack_idx = slack_start;
    for (i, c) in problem.constraints.iter().enumerate() {
        let mut row = vec![0.0; width];

        // Artificials start at the RHS, so it must be nonnegative
        let flip = c.rhs < 0.0;
        let sign = if flip { -1.0 } else { 1.0 };
        let op = if flip { c.op.flipped() } else { c.op };

        for (j, &coef) in c.coefficients.iter().take(n_vars).enumerate() {
            row[1 + j] = sign * coef;
        }
        match op {
            ConstraintOp::Le => {
                row[slack_idx] = 1.0;
                slack_idx += 1;
            }
            ConstraintOp::Ge => {
                row[slack_idx] = -1.0;
                slack_idx += 1;
            }
            ConstraintOp::Eq => {}
        }
        row[artificial_start + i] = 1.0;
        row[rhs_col] = sign * c.rhs;
        rows.push(row);
    }

    let mut original = vec![0.0; width];
    original[0] = 1.0;
    for (j, &coef) in problem.objective.coefficients.iter().take(n_vars).enumerate() {
        original[1 + j] = coef;
    }
    rows.push(original);

    debug!(
        variables = n_vars,
        slack = n_slack,
        artificial = n_constraints,
        "built auxiliary tableau"
    );

    Tableau::new(Phase::One, registry, rows)
}

/// Add every constraint row to the auxiliary objective so each artificial
/// column reads zero there.
pub fn price_out(tableau: &Tableau) -> Tableau {
    let (phase, registry, mut rows) = tableau.clone().into_parts();
    let constraints = tableau.constraint_rows();
    for col in 0..registry.len() {
        let total: f64 = constraints.clone().map(|i| rows[i][col]).sum();
        rows[0][col] += total;
    }
    Tableau::new(phase, registry, rows)
}
