use crate::ast::*;
use crate::lexer::{scan_line, ScannedLine};
use thiserror::Error;
use tracing::debug;
use twophase_solver::{CanonicalProblem, ConstraintOp, OptimizationType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Put 'max' or 'min' on the line holding the objective")]
    MissingObjectiveKeyword,
    #[error("Line {line}: only one line may contain 'max' or 'min'")]
    DuplicateObjective { line: usize },
    #[error("Line {line}: variables must be on the left hand side of each constraint")]
    VariablesMustPrecedeComparator { line: usize },
    #[error("Line {line}: comparator must be one of <=, >= or =, found '{found}'")]
    InvalidComparator { line: usize, found: String },
    #[error("Line {line}: '{name}' is reserved; names cannot be 's' or 'a' followed by digits")]
    ReservedVariableName { name: String, line: usize },
    #[error("Line {line}: invalid number '{text}'")]
    InvalidNumber { line: usize, text: String },
    #[error("Line {line}: constraint has no right-hand side")]
    MissingRightHandSide { line: usize },
}

impl ParseError {
    /// The 1-based source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingObjectiveKeyword => None,
            Self::DuplicateObjective { line }
            | Self::VariablesMustPrecedeComparator { line }
            | Self::InvalidComparator { line, .. }
            | Self::ReservedVariableName { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::MissingRightHandSide { line } => Some(*line),
        }
    }
}

/// First occurrence of `max` or `min`, whichever comes first.
fn find_keyword(text: &str) -> Option<(usize, OptimizationType)> {
    let max = text.find("max").map(|i| (i, OptimizationType::Max));
    let min = text.find("min").map(|i| (i, OptimizationType::Min));
    match (max, min) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

pub struct Parser<'a> {
    source: &'a str,
    objective: Option<ObjectiveLine>,
    constraints: Vec<ConstraintLine>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            objective: None,
            constraints: Vec::new(),
        }
    }

    /// Parse problem text into a [`Program`].
    pub fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source).parse_program()
    }

    /// Parse problem text straight into the solver's input form.
    pub fn parse_problem(source: &str) -> Result<CanonicalProblem, ParseError> {
        Ok(Self::parse(source)?.to_problem())
    }

    fn parse_program(mut self) -> Result<Program, ParseError> {
        if find_keyword(self.source).is_none() {
            return Err(ParseError::MissingObjectiveKeyword);
        }

        let mut offset = 0;
        for (i, text) in self.source.split('\n').enumerate() {
            let number = i + 1;
            if !text.trim().is_empty() {
                self.parse_line(text, number, offset)?;
            }
            offset += text.len() + 1;
        }

        let objective = self.objective.ok_or(ParseError::MissingObjectiveKeyword)?;
        let program = Program {
            objective,
            constraints: self.constraints,
        };
        debug!(
            variables = program.variables().len(),
            constraints = program.constraints.len(),
            "parsed problem"
        );
        Ok(program)
    }

    fn parse_line(&mut self, text: &str, number: usize, offset: usize) -> Result<(), ParseError> {
        match find_keyword(text) {
            Some((at, direction)) => {
                let repeated = find_keyword(&text[at + 3..]).is_some();
                if self.objective.is_some() || repeated {
                    return Err(ParseError::DuplicateObjective { line: number });
                }
                // Blank out the keyword so term spans still index the source.
                let mut stripped = String::with_capacity(text.len());
                stripped.push_str(&text[..at]);
                stripped.push_str("   ");
                stripped.push_str(&text[at + 3..]);

                let scanned = scan_line(&stripped, number, offset)?;
                self.objective = Some(self.objective_line(scanned, number, direction));
            }
            None => {
                let scanned = scan_line(text, number, offset)?;
                let constraint = self.constraint_line(scanned, number)?;
                self.constraints.push(constraint);
            }
        }
        Ok(())
    }

    fn objective_line(
        &self,
        scanned: ScannedLine,
        number: usize,
        direction: OptimizationType,
    ) -> ObjectiveLine {
        if scanned.terms.iter().any(Term::is_constant) {
            debug!(line = number, "ignoring constant term in objective");
        }
        ObjectiveLine {
            number,
            direction,
            terms: scanned.terms,
        }
    }

    fn constraint_line(
        &self,
        scanned: ScannedLine,
        number: usize,
    ) -> Result<ConstraintLine, ParseError> {
        let comparator = ConstraintOp::from_symbol(&scanned.comparator).ok_or_else(|| {
            ParseError::InvalidComparator {
                line: number,
                found: scanned.comparator.clone(),
            }
        })?;

        let right = scanned.right_terms();
        if right.is_empty() {
            return Err(ParseError::MissingRightHandSide { line: number });
        }

        // Constants on the left move across with their sign flipped
        let moved: f64 = scanned
            .left_terms()
            .iter()
            .filter(|t| t.is_constant())
            .map(|t| t.coefficient)
            .sum();
        if moved != 0.0 {
            debug!(line = number, constant = moved, "moving constant to the right-hand side");
        }
        let rhs = right.iter().map(|t| t.coefficient).sum::<f64>() - moved;

        let ScannedLine {
            mut terms, left, ..
        } = scanned;
        terms.truncate(left);
        terms.retain(|t| !t.is_constant());

        Ok(ConstraintLine {
            number,
            terms,
            comparator,
            rhs,
        })
    }
}
