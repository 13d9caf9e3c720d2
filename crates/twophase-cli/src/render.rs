use twophase_solver::{CanonicalProblem, TableauObserver, TableauSnapshot};

/// Compact number formatting: integers without a fraction, others to four
/// places with trailing zeros dropped.
pub fn number(value: f64) -> String {
    let value = value + 0.0;
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() + 0.0);
    }
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Lay out a snapshot as an aligned text table. The pivot cell is bracketed
/// and the saved objective row of phase one is marked.
pub fn render_snapshot(snapshot: &TableauSnapshot) -> String {
    let cells: Vec<Vec<String>> = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, &v)| match snapshot.pivot {
                    Some(p) if p.column == c && p.row == Some(r) => format!("[{}]", number(v)),
                    _ => number(v),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = snapshot
        .labels
        .iter()
        .enumerate()
        .map(|(c, label)| {
            cells
                .iter()
                .filter_map(|row| row.get(c))
                .map(String::len)
                .chain(std::iter::once(label.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("{} - {}\n", snapshot.phase, snapshot.caption);
    let header: Vec<String> = snapshot
        .labels
        .iter()
        .zip(&widths)
        .map(|(label, w)| format!("{:>w$}", label, w = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    for (r, row) in cells.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:>w$}", cell, w = *w))
            .collect();
        out.push_str(&line.join("  "));
        if snapshot.is_saved_objective_row(r) {
            out.push_str("  (objective)");
        }
        out.push('\n');
    }
    out
}

fn linear_form(coefficients: &[f64], variables: &[String]) -> String {
    let mut text = String::new();
    for (c, name) in coefficients.iter().zip(variables) {
        if *c == 0.0 {
            continue;
        }
        if text.is_empty() {
            if *c < 0.0 {
                text.push('-');
            }
        } else {
            text.push_str(if *c < 0.0 { " - " } else { " + " });
        }
        let magnitude = c.abs();
        if magnitude != 1.0 {
            text.push_str(&number(magnitude));
        }
        text.push_str(name);
    }
    if text.is_empty() {
        text.push('0');
    }
    text
}

/// The problem written back in input syntax, one line per row.
pub fn render_problem(problem: &CanonicalProblem) -> String {
    let direction = match problem.objective.direction {
        twophase_solver::OptimizationType::Max => "max",
        twophase_solver::OptimizationType::Min => "min",
    };
    let mut out = format!(
        "{} {}\n",
        direction,
        linear_form(&problem.objective.coefficients, &problem.variables)
    );
    for constraint in &problem.constraints {
        out.push_str(&format!(
            "{} {} {}\n",
            linear_form(&constraint.coefficients, &problem.variables),
            constraint.op,
            number(constraint.rhs)
        ));
    }
    out
}

/// Prints tableaus as they are produced (when `steps` is set) and every
/// summary line.
pub struct TextRenderer {
    pub steps: bool,
}

impl TableauObserver for TextRenderer {
    fn snapshot(&mut self, snapshot: TableauSnapshot) {
        println!("{}", render_snapshot(&snapshot));
    }

    fn summary(&mut self, text: &str) {
        println!("{}", text);
        if self.steps {
            println!();
        }
    }

    fn is_enabled(&self) -> bool {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twophase_solver::{build_phase_one, ConstraintOp, OptimizationType, Phase, PivotPosition};

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(36.0), "36");
        assert_eq!(number(-0.0), "0");
        assert_eq!(number(2.5), "2.5");
        assert_eq!(number(1.0 / 3.0), "0.3333");
        assert_eq!(number(-4.0), "-4");
    }

    fn problem() -> CanonicalProblem {
        let mut problem = CanonicalProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, -1.0], OptimizationType::Max);
        problem.add_constraint(vec![1.0, 2.0], ConstraintOp::Le, 4.0);
        problem
    }

    #[test]
    fn test_render_problem() {
        assert_eq!(render_problem(&problem()), "max 3x - y\nx + 2y <= 4\n");
    }

    #[test]
    fn test_render_snapshot_marks_pivot() {
        let tableau = build_phase_one(&problem());
        let pivot = PivotPosition {
            column: 1,
            row: Some(1),
        };
        let snapshot = TableauSnapshot::capture("Tableau 0", &tableau, Some(pivot));
        let text = render_snapshot(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(snapshot.phase, Phase::One);
        assert_eq!(lines[0], "Phase One - Tableau 0");
        assert!(lines[1].trim_start().starts_with("-z"));
        assert!(lines[1].ends_with("RHS"));
        assert!(lines[3].contains("[1]"));
        assert!(lines[4].ends_with("(objective)"));
    }
}
