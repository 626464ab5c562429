//! Recursive descent formula parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression := term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := '+' factor | '-' factor
//!             | ( '(' expression ')' | number | name [factor] ) ['^' factor]
//! ```
//!
//! A `name` is a run of ASCII letters and `[`/`]`. Names in the function set
//! take the following factor as their argument; any other name is a variable
//! resolved at evaluation time.
//!
//! Both the parser's recursion and the depth of the produced tree are capped
//! at [`MAX_DEPTH`], so evaluating a parsed formula never runs out of stack.

use super::ast::{BinaryOp, Expression, Function};
use super::error::ParseError;

/// Deepest nesting a formula may have, counted both in nested factors and in
/// levels of the resulting tree
pub const MAX_DEPTH: usize = 256;

/// Parse formula text into an expression tree
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(text);
    let (expr, _) = parser.parse_expression()?;

    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(expr),
        Some(found) => Err(ParseError::Unexpected { found, position: parser.pos }),
    }
}

/// A parsed subtree and its depth
type Node = (Expression, usize);

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    nesting: usize,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '[' || c == ']'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0, nesting: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Consume `expected` (after any whitespace) if it is next
    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Build a node one level above a subtree of `depth`, failing past [`MAX_DEPTH`]
    fn wrap(&self, depth: usize, position: usize, build: impl FnOnce() -> Expression) -> Result<Node, ParseError> {
        let depth = depth + 1;
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { position });
        }
        Ok((build(), depth))
    }

    fn binary(&self, op: BinaryOp, left: Node, right: Node, position: usize) -> Result<Node, ParseError> {
        let depth = left.1.max(right.1);
        self.wrap(depth, position, || Expression::binary(op, left.0, right.0))
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_term()?;
        loop {
            self.skip_whitespace();
            let position = self.pos;
            let op = if self.eat('+') {
                BinaryOp::Add
            } else if self.eat('-') {
                BinaryOp::Sub
            } else {
                return Ok(node);
            };
            let rhs = self.parse_term()?;
            node = self.binary(op, node, rhs, position)?;
        }
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_factor()?;
        loop {
            self.skip_whitespace();
            let position = self.pos;
            let op = if self.eat('*') {
                BinaryOp::Mul
            } else if self.eat('/') {
                BinaryOp::Div
            } else {
                return Ok(node);
            };
            let rhs = self.parse_factor()?;
            node = self.binary(op, node, rhs, position)?;
        }
    }

    fn parse_factor(&mut self) -> Result<Node, ParseError> {
        self.skip_whitespace();
        if self.nesting >= MAX_DEPTH {
            return Err(ParseError::TooDeep { position: self.pos });
        }
        self.nesting += 1;
        let result = self.parse_nested_factor();
        self.nesting -= 1;
        result
    }

    fn parse_nested_factor(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        if self.eat('+') {
            return self.parse_factor();
        }
        if self.eat('-') {
            // Covers the whole factor, so `-2^2` is `-(2^2)`
            let (inner, depth) = self.parse_factor()?;
            return self.wrap(depth, start, || Expression::UnaryMinus(Box::new(inner)));
        }

        let base = match self.peek() {
            Some('(') => {
                self.bump();
                let inner = self.parse_expression()?;
                if !self.eat(')') {
                    return Err(ParseError::UnclosedParen { opened_at: start });
                }
                inner
            }
            Some(c) if is_number_char(c) => {
                let digits = self.take_while(is_number_char);
                let number = if digits.matches('.').count() > 1 {
                    None
                } else {
                    digits.parse::<f64>().ok()
                };
                match number {
                    Some(value) => (Expression::Constant(value), 1),
                    None => {
                        return Err(ParseError::InvalidNumber {
                            text: digits.to_string(),
                            position: start,
                        })
                    }
                }
            }
            Some(c) if is_name_char(c) => {
                let name = self.take_while(is_name_char);
                match Function::from_name(name) {
                    Some(func) => {
                        let (arg, depth) = self.parse_factor()?;
                        self.wrap(depth, start, || Expression::Call(func, Box::new(arg)))?
                    }
                    None => (Expression::Variable(name.to_string()), 1),
                }
            }
            Some(found) => return Err(ParseError::Unexpected { found, position: start }),
            None => return Err(ParseError::UnexpectedEnd { position: start }),
        };

        self.skip_whitespace();
        let position = self.pos;
        if self.eat('^') {
            let exponent = self.parse_factor()?;
            return self.binary(BinaryOp::Pow, base, exponent, position);
        }
        Ok(base)
    }
}
