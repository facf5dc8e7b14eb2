use crate::eval::{self, Config, ErrorKind, EvalError, Value};
use crate::funcs::Builtins;
pub use crate::lexer::Op;
use crate::lexer::{Lexer, Span, Token};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Entry of the operator table. Lower precedence numbers bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub op: Op,
    pub precedence: u8,
    pub arity: Arity,
    pub assoc: Assoc,
}

const FACTORIAL: Operator = Operator::new(Op::Fact, 1, Arity::Unary, Assoc::Left);
const POWER: Operator = Operator::new(Op::Pow, 2, Arity::Binary, Assoc::Right);
const PLUS: Operator = Operator::new(Op::Add, 3, Arity::Unary, Assoc::Right);
const NEGATE: Operator = Operator::new(Op::Sub, 3, Arity::Unary, Assoc::Right);
const MULTIPLY: Operator = Operator::new(Op::Mul, 4, Arity::Binary, Assoc::Left);
const DIVIDE: Operator = Operator::new(Op::Div, 4, Arity::Binary, Assoc::Left);
const MODULUS: Operator = Operator::new(Op::Mod, 4, Arity::Binary, Assoc::Left);
const ADD: Operator = Operator::new(Op::Add, 5, Arity::Binary, Assoc::Left);
const SUBTRACT: Operator = Operator::new(Op::Sub, 5, Arity::Binary, Assoc::Left);
const EQUAL: Operator = Operator::new(Op::Eq, 6, Arity::Binary, Assoc::Left);

impl Operator {
    const fn new(op: Op, precedence: u8, arity: Arity, assoc: Assoc) -> Self {
        Operator {
            op,
            precedence,
            arity,
            assoc,
        }
    }

    pub fn lookup(op: Op, arity: Arity) -> Option<&'static Operator> {
        let found = match (op, arity) {
            (Op::Fact, Arity::Unary) => &FACTORIAL,
            (Op::Pow, Arity::Binary) => &POWER,
            (Op::Add, Arity::Unary) => &PLUS,
            (Op::Sub, Arity::Unary) => &NEGATE,
            (Op::Mul, Arity::Binary) => &MULTIPLY,
            (Op::Div, Arity::Binary) => &DIVIDE,
            (Op::Mod, Arity::Binary) => &MODULUS,
            (Op::Add, Arity::Binary) => &ADD,
            (Op::Sub, Arity::Binary) => &SUBTRACT,
            (Op::Eq, Arity::Binary) => &EQUAL,
            _ => return None,
        };

        Some(found)
    }

    /// Whether `top`, already on the stack, has to be applied before `self`
    /// is pushed.
    fn yields_to(&self, top: &Operator) -> bool {
        match self.arity {
            Arity::Unary => false,
            Arity::Binary => {
                self.precedence > top.precedence
                    || (self.precedence == top.precedence && self.assoc == Assoc::Left)
            }
        }
    }
}

/// Decides the arity of `op` from the token before it.
pub fn arity_of(op: Op, previous: Option<&Token>) -> Arity {
    match (op, previous) {
        (Op::Fact, _) => Arity::Unary,
        (_, None) | (_, Some(Token::LeftParen)) => Arity::Unary,
        (_, Some(Token::Operator(prev))) if *prev != Op::Fact => Arity::Unary,
        _ => Arity::Binary,
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Operator(&'static Operator),
    /// Open parenthesis and its column.
    Paren(usize),
}

/// A function waiting for its parenthesis group to close.
#[derive(Debug)]
struct Call {
    name: String,
    depth: usize,
    base: usize,
}

pub struct Parser<'a> {
    lexer: Lexer,
    builtins: &'a Builtins,
    config: &'a Config,
    operands: Vec<f64>,
    operators: Vec<Pending>,
    functions: Vec<Call>,
    depth: usize,
    previous: Option<Token>,
    comparison: Option<bool>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer, builtins: &'a Builtins, config: &'a Config) -> Self {
        Parser {
            lexer,
            builtins,
            config,
            operands: vec![],
            operators: vec![],
            functions: vec![],
            depth: 0,
            previous: None,
            comparison: None,
        }
    }

    pub fn run(mut self) -> Result<Value, EvalError> {
        trace!("parsing {} tokens", self.lexer.len());

        loop {
            let span = self.lexer.span();
            let token = self.lexer.next();

            if token == Token::End {
                return self.finish(span);
            }

            trace!("token '{}' at column {}", token.name(), span.column());

            if let Err(kind) = self.step(&token, span) {
                raise!(kind, span.column());
            }

            self.previous = Some(token);
        }
    }

    fn step(&mut self, token: &Token, span: Span) -> Result<(), ErrorKind> {
        match token {
            Token::Number(text) => self.push_number(text),
            Token::Ident(name) => self.push_ident(name),
            Token::Operator(op) => {
                let arity = arity_of(*op, self.previous.as_ref());

                match Operator::lookup(*op, arity) {
                    Some(operator) => self.push_operator(operator),
                    None => raise!(ErrorKind::Syntax),
                }
            }
            Token::LeftParen => {
                // "(2)(2)"
                if self.previous == Some(Token::RightParen) {
                    self.push_multiplication()?;
                }

                self.operators.push(Pending::Paren(span.column()));
                self.depth += 1;
                Ok(())
            }
            Token::RightParen => self.close_paren(),
            Token::Unknown(_) | Token::End => raise!(ErrorKind::Unrecognized),
        }
    }

    fn push_number(&mut self, text: &str) -> Result<(), ErrorKind> {
        match self.previous {
            Some(Token::Number(_)) | Some(Token::Ident(_)) | Some(Token::RightParen) => {
                raise!(ErrorKind::Syntax)
            }
            _ => (),
        }

        let x = eval::parse_number(text)?;
        self.operands.push(x);

        // "2(2)" or "2a"
        if self.is_juxtaposed() {
            self.push_multiplication()?;
        }

        Ok(())
    }

    fn push_ident(&mut self, name: &str) -> Result<(), ErrorKind> {
        // "(2)pi" or "(2)sqrt(4)"
        if self.previous == Some(Token::RightParen) {
            self.push_multiplication()?;
        }

        if let Some(x) = self.builtins.constant(name) {
            self.operands.push(x);

            // "pi(2)" or "pi e"
            if self.is_juxtaposed() {
                self.push_multiplication()?;
            }

            return Ok(());
        }

        match self.lexer.peek() {
            Token::LeftParen => (),
            // "a2": the number that follows is rejected by `push_number`
            Token::Number(_) => return Ok(()),
            _ => raise!(ErrorKind::UndefinedConstant),
        }

        self.functions.push(Call {
            name: name.to_string(),
            depth: self.depth + 1,
            base: self.operands.len(),
        });

        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), ErrorKind> {
        if self.depth == 0 {
            raise!(ErrorKind::CloseParenthesis);
        }

        loop {
            match self.operators.pop() {
                Some(Pending::Paren(_)) => break,
                Some(Pending::Operator(operator)) => self.apply(operator)?,
                None => raise!(ErrorKind::CloseParenthesis),
            }
        }

        let owned = match self.functions.last() {
            Some(call) => call.depth == self.depth,
            None => false,
        };

        self.depth -= 1;

        if owned {
            if let Some(call) = self.functions.pop() {
                self.apply_function(&call)?;
            }
        }

        Ok(())
    }

    fn finish(mut self, end: Span) -> Result<Value, EvalError> {
        if self.depth > 0 {
            let column = self.operators.iter().find_map(|pending| match pending {
                Pending::Paren(column) => Some(*column),
                Pending::Operator(_) => None,
            });

            return Err(EvalError::new(ErrorKind::OpenParenthesis, column));
        }

        while let Some(pending) = self.operators.pop() {
            if let Pending::Operator(operator) = pending {
                if let Err(kind) = self.apply(operator) {
                    raise!(kind, end.column());
                }
            }
        }

        let x = match self.operands.as_slice() {
            [] => raise!(ErrorKind::NoInput),
            [x] => *x,
            _ => raise!(ErrorKind::Syntax),
        };

        let value = match self.comparison {
            Some(equal) => Value::Boolean(equal),
            None => Value::Number(eval::round_result(x)),
        };

        Ok(value)
    }

    fn is_juxtaposed(&self) -> bool {
        match self.lexer.peek() {
            Token::LeftParen | Token::Ident(_) => true,
            _ => false,
        }
    }

    fn push_operator(&mut self, operator: &'static Operator) -> Result<(), ErrorKind> {
        while let Some(&Pending::Operator(top)) = self.operators.last() {
            if !operator.yields_to(top) {
                break;
            }

            self.operators.pop();
            self.apply(top)?;
        }

        self.operators.push(Pending::Operator(operator));
        Ok(())
    }

    fn push_multiplication(&mut self) -> Result<(), ErrorKind> {
        self.push_operator(&MULTIPLY)
    }

    fn pop(&mut self) -> Result<f64, ErrorKind> {
        match self.operands.pop() {
            Some(x) => Ok(x),
            None => raise!(ErrorKind::Syntax),
        }
    }

    fn apply(&mut self, operator: &Operator) -> Result<(), ErrorKind> {
        self.comparison = None;

        let out = match operator.arity {
            Arity::Unary => {
                let x = self.pop()?;
                eval::evaluate_monop(operator.op, x)?
            }
            Arity::Binary => {
                let y = self.pop()?;
                let x = self.pop()?;

                if operator.op == Op::Eq {
                    let (out, equal) = eval::evaluate_equality(x, y, self.config.epsilon);
                    self.comparison = Some(equal);
                    out
                } else {
                    eval::evaluate_binop(operator.op, x, y)?
                }
            }
        };

        trace!("applied '{}' -> {}", operator.op.symbol(), out);
        self.operands.push(out);
        Ok(())
    }

    fn apply_function(&mut self, call: &Call) -> Result<(), ErrorKind> {
        if self.operands.len() <= call.base {
            raise!(ErrorKind::FunctionArguments);
        }

        let fun = match self.builtins.function(&call.name) {
            Some(f) => f,
            None => raise!(ErrorKind::UndefinedFunction),
        };

        let x = self.pop()?;
        let out = fun(x);

        trace!("applied {}({}) -> {}", call.name, x, out);
        self.comparison = None;
        self.operands.push(out);
        Ok(())
    }
}

pub fn parse(lexer: Lexer, builtins: &Builtins, config: &Config) -> Result<Value, EvalError> {
    Parser::new(lexer, builtins, config).run()
}
