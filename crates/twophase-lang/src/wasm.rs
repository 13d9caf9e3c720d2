//! WASM bindings for the problem language
//!
//! Exposes parsing, validation and solving to JavaScript. Values cross the
//! boundary as plain JS objects built with `serde_wasm_bindgen`.

use wasm_bindgen::prelude::*;

use crate::parser::{ParseError, Parser};
use twophase_solver::{Recorder, Solution, Solver, TableauSnapshot};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse source text and return the AST
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&program)
}

/// Parse source text and return the dense problem handed to the solver
#[wasm_bindgen]
pub fn parse_problem(source: &str) -> Result<JsValue, JsValue> {
    let problem = Parser::parse_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&problem)
}

#[derive(serde::Serialize)]
struct Diagnostic {
    start: usize,
    end: usize,
    line: Option<usize>,
    severity: String,
    message: String,
}

fn line_bounds(source: &str, line: usize) -> (usize, usize) {
    let mut start = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line {
            return (start, start + text.len());
        }
        start += text.len() + 1;
    }
    (0, source.len())
}

fn diagnostic(source: &str, error: &ParseError) -> Diagnostic {
    let (start, end) = match error.line() {
        Some(line) => line_bounds(source, line),
        None => (0, source.len()),
    };
    Diagnostic {
        start,
        end,
        line: error.line(),
        severity: "error".to_string(),
        message: error.to_string(),
    }
}

/// Validate source text and return diagnostics; empty when it parses
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    let diagnostics: Vec<Diagnostic> = match Parser::parse(source) {
        Ok(_) => Vec::new(),
        Err(e) => vec![diagnostic(source, &e)],
    };
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize)]
struct SolveResult {
    solution: Solution,
    summaries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tableaux: Vec<TableauSnapshot>,
}

/// Parse and solve. With `steps`, every intermediate tableau is returned too.
#[wasm_bindgen]
pub fn solve(source: &str, steps: bool) -> Result<JsValue, JsValue> {
    let problem = Parser::parse_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut recorder = Recorder::new();
    let solution = Solver::new()
        .solve_with(&problem, &mut recorder)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let result = SolveResult {
        solution,
        summaries: recorder.summaries,
        tableaux: if steps { recorder.snapshots } else { Vec::new() },
    };
    to_js(&result)
}
