pub mod ast;
pub mod lexer;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::*;
pub use lexer::{is_reserved, scan_line, ScannedLine, Span};
pub use parser::{ParseError, Parser};
