use crate::ast::Term;
use crate::parser::ParseError;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Terms and comparator read from one line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine {
    pub terms: Vec<Term>,
    pub comparator: String,
    /// Number of terms read before the comparator.
    pub left: usize,
}

impl ScannedLine {
    pub fn left_terms(&self) -> &[Term] {
        &self.terms[..self.left]
    }

    pub fn right_terms(&self) -> &[Term] {
        &self.terms[self.left..]
    }
}

/// The term being accumulated.
#[derive(Default)]
struct Pending {
    negative: bool,
    coefficient: String,
    name: String,
    span: Option<Span>,
}

impl Pending {
    fn touch(&mut self, pos: usize, c: char) {
        let here = Span::new(pos, pos + c.len_utf8());
        self.span = Some(self.span.map_or(here, |s| s.merge(here)));
    }

    fn is_empty(&self) -> bool {
        self.coefficient.is_empty() && self.name.is_empty()
    }

    fn finish(&mut self, line: usize) -> Result<Term, ParseError> {
        let pending = std::mem::take(self);
        let magnitude = if pending.coefficient.is_empty() {
            1.0
        } else {
            pending
                .coefficient
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    line,
                    text: pending.coefficient.clone(),
                })?
        };
        let coefficient = if pending.negative { -magnitude } else { magnitude };

        let variable = if pending.name.is_empty() {
            None
        } else if is_reserved(&pending.name) {
            return Err(ParseError::ReservedVariableName {
                name: pending.name,
                line,
            });
        } else {
            Some(pending.name)
        };

        Ok(Term {
            coefficient,
            variable,
            span: pending.span.unwrap_or(Span::new(0, 0)),
        })
    }
}

/// `s` or `a` followed only by digits: the names given to slack and
/// artificial columns.
pub fn is_reserved(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some('s' | 'a') => {
            let rest = chars.as_str();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn is_comparator_char(c: char) -> bool {
    matches!(c, '<' | '=' | '>')
}

/// Scan one line of input into signed terms and a comparator.
///
/// Digits start a coefficient only until a name has started, so `x1` is one
/// name. A term ends at whitespace, a sign or a comparator character once it
/// has a name, and at the end of the line. A bare number ends at a sign or a
/// comparator character but not at whitespace, so `3 x` is `3x`. `offset` is
/// the line's byte offset in the whole source, used for spans; `line` is its
/// 1-based number.
pub fn scan_line(text: &str, line: usize, offset: usize) -> Result<ScannedLine, ParseError> {
    let mut terms = Vec::new();
    let mut comparator = String::new();
    let mut left = None;
    let mut pending = Pending::default();

    for (i, c) in text.char_indices() {
        let pos = offset + i;
        let sign_or_comparator = c == '+' || c == '-' || is_comparator_char(c);
        let ends_name = !pending.name.is_empty() && (sign_or_comparator || c.is_whitespace());
        let ends_number =
            pending.name.is_empty() && !pending.coefficient.is_empty() && sign_or_comparator;
        if ends_name || ends_number {
            terms.push(pending.finish(line)?);
        }

        match c {
            c if is_comparator_char(c) => {
                if pending.negative && pending.is_empty() {
                    return Err(ParseError::InvalidNumber {
                        line,
                        text: "-".to_string(),
                    });
                }
                if left.is_none() {
                    left = Some(terms.len());
                }
                comparator.push(c);
            }
            c if (c.is_ascii_digit() && pending.name.is_empty()) || c == '.' => {
                pending.coefficient.push(c);
                pending.touch(pos, c);
            }
            '-' => {
                pending.negative = true;
                pending.touch(pos, c);
            }
            '+' => {}
            c if c.is_whitespace() => {}
            c => {
                if !comparator.is_empty() {
                    return Err(ParseError::VariablesMustPrecedeComparator { line });
                }
                pending.name.push(c);
                pending.touch(pos, c);
            }
        }
    }

    if !pending.is_empty() {
        terms.push(pending.finish(line)?);
    }

    let left = left.unwrap_or(terms.len());
    Ok(ScannedLine {
        terms,
        comparator,
        left,
    })
}
