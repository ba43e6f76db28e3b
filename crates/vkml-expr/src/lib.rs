//! A small arithmetic expression evaluator for VKML attribute values.
//!
//! Numeric attributes in a VKML document may be plain literals (`"256"`) or
//! formulas over named constants (`"2*width"`, `"min(width, height)/2"`).
//! The [`Evaluator`] holds the constant table: built-ins are reseeded by
//! [`Evaluator::reset`], user constants come from `<Constant>` elements via
//! [`Evaluator::define`]. Evaluation is a single recursive-descent pass over
//! the text; no AST is retained.
//!
//! Operator precedence, loosest to tightest: `+ -`, `* / %`, unary `-`,
//! `^` (right-associative).

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown constant '{0}'")]
    UnknownConstant(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("trailing input after expression: '{0}'")]
    TrailingInput(String),
}

pub type Result<T> = std::result::Result<T, ExprError>;

/// Evaluator for arithmetic attribute expressions.
///
/// One instance per compiler; [`reset`](Evaluator::reset) must run at the
/// start of every document parse so constants never leak between documents.
#[derive(Debug)]
pub struct Evaluator {
    constants: HashMap<String, f64>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        let mut eval = Self {
            constants: HashMap::new(),
        };
        eval.reset();
        eval
    }

    /// Clear user constants and reseed the built-ins.
    pub fn reset(&mut self) {
        self.constants.clear();
        self.constants.insert("pi".to_string(), std::f64::consts::PI);
        self.constants
            .insert("tau".to_string(), std::f64::consts::TAU);
        self.constants.insert("e".to_string(), std::f64::consts::E);
    }

    /// Define or overwrite a named constant.
    pub fn define(&mut self, name: &str, value: f64) {
        log::trace!("define constant {name} = {value}");
        self.constants.insert(name.to_string(), value);
    }

    /// Look up a constant by name.
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Parse and evaluate an expression against the current constant table.
    pub fn evaluate(&self, text: &str) -> Result<f64> {
        let mut parser = Parser {
            input: text,
            chars: text.char_indices().peekable(),
            constants: &self.constants,
        };
        let value = parser.expression()?;
        parser.skip_whitespace();
        if let Some((offset, _)) = parser.chars.peek().copied() {
            return Err(ExprError::TrailingInput(text[offset..].to_string()));
        }
        Ok(value)
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    constants: &'a HashMap<String, f64>,
}

impl Parser<'_> {
    fn expression(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('+') => {
                    self.advance();
                    value += self.term()?;
                }
                Some('-') => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('*') => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.advance();
                    value /= self.unary()?;
                }
                Some('%') => {
                    self.advance();
                    value %= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64> {
        self.skip_whitespace();
        if self.peek_char() == Some('-') {
            self.advance();
            // Binds looser than '^', so -2^2 is -(2^2).
            return Ok(-self.unary()?);
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.primary()?;
        self.skip_whitespace();
        if self.peek_char() == Some('^') {
            self.advance();
            // Right-associative: 2^3^2 == 2^(3^2).
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(ExprError::UnexpectedEnd),
            Some('(') => {
                self.advance();
                let value = self.expression()?;
                self.expect(')')?;
                Ok(value)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.identifier(),
            Some(ch) => {
                let offset = self.offset();
                Err(ExprError::UnexpectedChar { ch, offset })
            }
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.offset();
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }
        // Exponent suffix, only when it is actually followed by digits;
        // a bare trailing 'e' belongs to the next token.
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let mut sign = lookahead.clone();
            let after_sign = match sign.next() {
                Some((_, '+')) | Some((_, '-')) => sign.peek().map(|(_, ch)| *ch),
                other => other.map(|(_, ch)| ch),
            };
            if after_sign.is_some_and(|ch| ch.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.advance();
                }
                while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        let end = self.offset();
        let text = &self.input[start..end];
        text.parse::<f64>()
            .map_err(|_| ExprError::InvalidNumber(text.to_string()))
    }

    fn identifier(&mut self) -> Result<f64> {
        let start = self.offset();
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.offset();
        let name = &self.input[start..end];

        self.skip_whitespace();
        if self.peek_char() == Some('(') {
            self.advance();
            let args = self.arguments()?;
            return apply(name, &args);
        }

        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| ExprError::UnknownConstant(name.to_string()))
    }

    fn arguments(&mut self) -> Result<Vec<f64>> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(')') {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.advance();
                }
                Some(')') => {
                    self.advance();
                    return Ok(args);
                }
                Some(ch) => {
                    let offset = self.offset();
                    return Err(ExprError::UnexpectedChar { ch, offset });
                }
                None => return Err(ExprError::UnexpectedEnd),
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => {
                let offset = self.offset();
                Err(ExprError::UnexpectedChar { ch, offset })
            }
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|ch| ch.is_whitespace()) {
            self.advance();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        self.chars.next();
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(offset, _)| *offset)
            .unwrap_or(self.input.len())
    }
}

fn apply(name: &str, args: &[f64]) -> Result<f64> {
    let arity = |expected: usize| -> Result<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ExprError::WrongArity {
                name: name.to_string(),
                expected,
                got: args.len(),
            })
        }
    };

    match name {
        "abs" => arity(1).map(|_| args[0].abs()),
        "floor" => arity(1).map(|_| args[0].floor()),
        "ceil" => arity(1).map(|_| args[0].ceil()),
        "round" => arity(1).map(|_| args[0].round()),
        "trunc" => arity(1).map(|_| args[0].trunc()),
        "sqrt" => arity(1).map(|_| args[0].sqrt()),
        "sin" => arity(1).map(|_| args[0].sin()),
        "cos" => arity(1).map(|_| args[0].cos()),
        "tan" => arity(1).map(|_| args[0].tan()),
        "asin" => arity(1).map(|_| args[0].asin()),
        "acos" => arity(1).map(|_| args[0].acos()),
        "atan" => arity(1).map(|_| args[0].atan()),
        "atan2" => arity(2).map(|_| args[0].atan2(args[1])),
        "pow" => arity(2).map(|_| args[0].powf(args[1])),
        "min" => arity(2).map(|_| args[0].min(args[1])),
        "max" => arity(2).map(|_| args[0].max(args[1])),
        "clamp" => arity(3).map(|_| args[0].max(args[1]).min(args[2])),
        "mix" => arity(3).map(|_| args[0] + (args[1] - args[0]) * args[2]),
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        Evaluator::new().evaluate(text).unwrap()
    }

    #[test]
    fn literals() {
        assert_eq!(eval("0"), 0.0);
        assert_eq!(eval("42"), 42.0);
        assert_eq!(eval("3.5"), 3.5);
        assert_eq!(eval(".25"), 0.25);
        assert_eq!(eval("1e3"), 1000.0);
        assert_eq!(eval("2.5e-1"), 0.25);
        assert_eq!(eval("  7  "), 7.0);
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("16/4/2"), 2.0);
        assert_eq!(eval("7%4"), 3.0);
        assert_eq!(eval("-2*3"), -6.0);
        assert_eq!(eval("2^10"), 1024.0);
        // Right-associative exponentiation.
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("-2^2"), -4.0);
    }

    #[test]
    fn functions() {
        assert_eq!(eval("min(3, 7)"), 3.0);
        assert_eq!(eval("max(3, 7)"), 7.0);
        assert_eq!(eval("clamp(12, 0, 10)"), 10.0);
        assert_eq!(eval("mix(0, 10, 0.5)"), 5.0);
        assert_eq!(eval("abs(-9)"), 9.0);
        assert_eq!(eval("sqrt(64)"), 8.0);
        assert_eq!(eval("floor(1.9) + ceil(0.1)"), 2.0);
        assert_eq!(eval("pow(2, 8)"), 256.0);
    }

    #[test]
    fn builtin_constants() {
        assert!((eval("cos(pi)") + 1.0).abs() < 1e-12);
        assert!((eval("tau") - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn user_constants() {
        let mut eval = Evaluator::new();
        eval.define("width", 10.0);
        assert_eq!(eval.evaluate("2*width").unwrap(), 20.0);
        eval.define("height", 4.0);
        assert_eq!(eval.evaluate("width*height").unwrap(), 40.0);
        // Redefinition overwrites.
        eval.define("width", 3.0);
        assert_eq!(eval.evaluate("2*width").unwrap(), 6.0);
    }

    #[test]
    fn reset_clears_user_constants() {
        let mut eval = Evaluator::new();
        eval.define("width", 10.0);
        eval.reset();
        assert_eq!(
            eval.evaluate("width"),
            Err(ExprError::UnknownConstant("width".to_string()))
        );
        // Built-ins survive a reset.
        assert!(eval.evaluate("pi").is_ok());
    }

    #[test]
    fn undefined_identifier() {
        assert_eq!(
            Evaluator::new().evaluate("x"),
            Err(ExprError::UnknownConstant("x".to_string()))
        );
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            Evaluator::new().evaluate("frob(1)"),
            Err(ExprError::UnknownFunction("frob".to_string()))
        );
    }

    #[test]
    fn wrong_arity() {
        assert_eq!(
            Evaluator::new().evaluate("min(1)"),
            Err(ExprError::WrongArity {
                name: "min".to_string(),
                expected: 2,
                got: 1,
            })
        );
    }

    #[test]
    fn malformed_input() {
        let eval = Evaluator::new();
        assert!(eval.evaluate("").is_err());
        assert!(eval.evaluate("1 +").is_err());
        assert!(eval.evaluate("(1").is_err());
        assert!(eval.evaluate("1 2").is_err());
        assert!(eval.evaluate("#").is_err());
        assert_eq!(
            eval.evaluate("3 junk"),
            Err(ExprError::TrailingInput("junk".to_string()))
        );
    }

    #[test]
    fn exponent_vs_identifier() {
        let eval = Evaluator::new();
        // A trailing 'e' is neither an exponent nor implicit multiplication.
        assert!(eval.evaluate("2e").is_err());
        assert_eq!(eval.evaluate("2*e").unwrap(), 2.0 * std::f64::consts::E);
    }
}
