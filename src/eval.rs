use crate::format::format_number;
use crate::lexer::Op;
use std::fmt;
use thiserror::Error;

/// Scale used to strip floating-point noise from final results.
const ROUNDING_SCALE: f64 = 1e15;

/// Largest scaled magnitude at which rounding still changes anything.
const ROUNDING_LIMIT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "Number({:?})", x),
            Value::Boolean(x) => write!(f, "Boolean({:?})", x),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(x) => f.write_str(&format_number(*x)),
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[error("Syntax error")]
    Syntax,

    #[error("Missing parenthesis")]
    OpenParenthesis,

    #[error("Extra parenthesis")]
    CloseParenthesis,

    #[error("Unknown character")]
    Unrecognized,

    #[error("Empty expression")]
    NoInput,

    #[error("Unknown function")]
    UndefinedFunction,

    #[error("Missing function arguments")]
    FunctionArguments,

    #[error("Unknown constant")]
    UndefinedConstant,
}

impl ErrorKind {
    /// Process exit code reported by the command line tool.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::Syntax => 1,
            ErrorKind::OpenParenthesis => 2,
            ErrorKind::CloseParenthesis => 3,
            ErrorKind::Unrecognized => 4,
            ErrorKind::NoInput => 5,
            ErrorKind::UndefinedFunction => 6,
            ErrorKind::FunctionArguments => 7,
            ErrorKind::UndefinedConstant => 8,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind}{}", column_suffix(.column))]
pub struct EvalError {
    #[source]
    pub kind: ErrorKind,
    pub column: Option<usize>,
}

fn column_suffix(column: &Option<usize>) -> String {
    match column {
        Some(column) => format!(" at column {}", column),
        None => String::new(),
    }
}

impl EvalError {
    pub fn new(kind: ErrorKind, column: Option<usize>) -> Self {
        EvalError { kind, column }
    }

    pub fn at(kind: ErrorKind, column: usize) -> Self {
        Self::new(kind, Some(column))
    }
}

impl From<ErrorKind> for EvalError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, None)
    }
}

/// Settings for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Suppress diagnostics for failed evaluations.
    pub quiet: bool,
    /// Relative tolerance of `=`.
    pub epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quiet: false,
            epsilon: 1e-10,
        }
    }
}

pub fn parse_number(text: &str) -> Result<f64, ErrorKind> {
    match text.parse() {
        Ok(x) => Ok(x),
        Err(_) => raise!(ErrorKind::Syntax),
    }
}

pub fn evaluate_binop(op: Op, x: f64, y: f64) -> Result<f64, ErrorKind> {
    let out = match op {
        Op::Pow => x.powf(y),
        Op::Mul => x * y,
        Op::Div => x / y,
        Op::Mod => x % y,
        Op::Add => x + y,
        Op::Sub => x - y,
        _ => raise!(ErrorKind::Syntax),
    };

    Ok(out)
}

pub fn evaluate_monop(op: Op, x: f64) -> Result<f64, ErrorKind> {
    let out = match op {
        Op::Add => x,
        Op::Sub => -x,
        Op::Fact => libm::tgamma(x + 1.0),
        _ => raise!(ErrorKind::Syntax),
    };

    Ok(out)
}

pub fn compare_values(x: f64, y: f64, epsilon: f64) -> bool {
    let scale = x.abs().max(y.abs()).max(1.0);
    (x - y).abs() <= epsilon * scale
}

/// Folds one link of an equality chain: an equal pair carries its left
/// operand forward, an unequal one carries 0.
pub fn evaluate_equality(x: f64, y: f64, epsilon: f64) -> (f64, bool) {
    if compare_values(x, y, epsilon) {
        (x, true)
    } else {
        (0.0, false)
    }
}

pub fn round_result(x: f64) -> f64 {
    let scaled = x * ROUNDING_SCALE;

    if scaled.abs() < ROUNDING_LIMIT {
        scaled.round() / ROUNDING_SCALE
    } else {
        x
    }
}
