//! Evaluates single infix arithmetic expressions such as `3 + (5 + 1)`,
//! `sqrt(100)` or `5+3=2+6`.
//!
//! Parsing and evaluation happen in one pass of the shunting-yard algorithm:
//! no syntax tree is built. Every call owns its own stacks, so repeated or
//! concurrent evaluations never share state.
//!
//! ```
//! use calculator::{evaluate, Value};
//!
//! assert_eq!(evaluate("2^2^3"), Ok(Value::Number(256.0)));
//! assert_eq!(evaluate("2=2"), Ok(Value::Boolean(true)));
//! ```

#[macro_use]
mod util;

pub mod eval;
pub mod format;
pub mod funcs;
pub mod lexer;
pub mod parser;

use log::debug;

pub use crate::eval::{Config, ErrorKind, EvalError, Value};
pub use crate::format::format_number;

/// Evaluates `line` with the default configuration.
pub fn evaluate(line: &str) -> Result<Value, EvalError> {
    evaluate_with(line, &Config::default())
}

pub fn evaluate_with(line: &str, config: &Config) -> Result<Value, EvalError> {
    let lexer = lexer::tokenize(line);
    let result = parser::parse(lexer, &funcs::BUILTINS, config);

    match &result {
        Ok(value) => debug!("{:?} = {}", line, value),
        Err(err) if !config.quiet => debug!("{:?} failed: {}", line, err),
        Err(_) => (),
    }

    result
}
