//! Tree-walking interpreter for the Larch expression language.
//!
//! Source text flows strictly forward through three stages: the [`lexer`]
//! turns it into a lazy token stream, the [`parser`] builds a single
//! [`ast::Program`], and the [`evaluator`] walks that tree within a scoped
//! [`environment::Environment`] to produce one [`evaluator::Value`]. Runtime
//! failures are language values (`ERROR: ...`), never Rust errors; only a
//! malformed program surfaces as a [`parser::ParseError`].

pub mod ast;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;

use environment::Environment;
use evaluator::Value;
use lexer::Lexer;
use parser::{ParseError, Parser};

/// Runs a source string through the whole pipeline against `env`.
pub fn interpret(source: &str, env: &mut Environment) -> Result<Value, ParseError> {
    let program = Parser::new(Lexer::new(source)).parse_program()?;
    Ok(evaluator::eval(&program, env))
}
