//! Recursive descent parser for HealthKit unit strings
//!
//! Grammar, HealthKit flavoured:
//!
//! ```text
//! expr    := product [ "/" product ]      everything after the first '/' divides
//! product := factor { ("*" | "·") factor }
//! factor  := ( "(" expr ")" | atom ) [ "^" ["-"] digits ]
//! atom    := [prefix] symbol [ "<" molar-mass ">" ]
//! ```

use super::catalog::{self, Atom, AMOUNT, MASS};
use super::{Dimensions, UnitExpr};

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

/// Parses a unit string into a normalized expression
pub(super) fn parse(input: &str) -> Result<UnitExpr, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("unit expression is empty".to_string());
    }
    let mut parser = Parser {
        input: trimmed,
        chars: trimmed.chars().collect(),
        pos: 0,
    };
    let term = parser
        .expr()
        .map_err(|e| if e.contains(trimmed) { e } else { format!("{e} in '{trimmed}'") })?;
    if parser.pos != parser.chars.len() {
        return Err(format!(
            "unexpected '{}' at position {} in '{}'",
            parser.chars[parser.pos], parser.pos, parser.input
        ));
    }
    Ok(UnitExpr {
        expression: trimmed.to_string(),
        factor: term.factor,
        dims: term.dims,
        offset: term.offset,
    })
}

/// Intermediate result; `offset` survives only for a lone temperature atom
#[derive(Debug, Clone, Copy)]
struct Term {
    factor: f64,
    dims: Dimensions,
    offset: Option<f64>,
}

impl Term {
    fn from_atom(atom: Atom) -> Self {
        Self {
            factor: atom.factor,
            dims: atom.dims,
            offset: (atom.offset != 0.0).then_some(atom.offset),
        }
    }

    fn mul(self, other: Term) -> Result<Term, String> {
        Term::combine(
            self.factor * other.factor,
            self.dims.product_with(&other.dims),
        )
    }

    fn div(self, other: Term) -> Result<Term, String> {
        Term::combine(
            self.factor / other.factor,
            self.dims.quotient_with(&other.dims),
        )
    }

    fn pow(self, exp: i8) -> Result<Term, String> {
        if exp == 1 {
            return Ok(self);
        }
        Term::combine(self.factor.powi(i32::from(exp)), self.dims.scale(exp))
    }

    fn combine(factor: f64, dims: Option<Dimensions>) -> Result<Term, String> {
        let dims = dims.ok_or("unit exponent out of range")?;
        if !(factor.is_finite() && factor != 0.0) {
            return Err("unit scale out of range".to_string());
        }
        Ok(Term {
            factor,
            dims,
            offset: None,
        })
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<Term, String> {
        let numerator = self.product()?;
        if self.peek() == Some('/') {
            self.pos += 1;
            let denominator = self.product()?;
            if self.peek() == Some('/') {
                // a second '/' still belongs to the denominator
                let mut rest = denominator;
                while self.peek() == Some('/') {
                    self.pos += 1;
                    rest = rest.mul(self.product()?)?;
                }
                return numerator.div(rest);
            }
            return numerator.div(denominator);
        }
        Ok(numerator)
    }

    fn product(&mut self) -> Result<Term, String> {
        let mut term = self.factor()?;
        while matches!(self.peek(), Some('*') | Some('·')) {
            self.pos += 1;
            term = term.mul(self.factor()?)?;
        }
        Ok(term)
    }

    fn factor(&mut self) -> Result<Term, String> {
        let base = match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(format!("unbalanced parenthesis in '{}'", self.input));
                }
                self.pos += 1;
                inner
            }
            Some(_) => self.atom()?,
            None => return Err(format!("missing unit after operator in '{}'", self.input)),
        };
        if self.peek() == Some('^') {
            self.pos += 1;
            let exp = self.exponent()?;
            return base.pow(exp);
        }
        Ok(base)
    }

    fn exponent(&mut self) -> Result<i8, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.parse::<i32>() {
            Ok(0) => Err(format!("zero exponent in '{}'", self.input)),
            Ok(exp) if exp.abs() <= 9 => Ok(exp as i8),
            Ok(exp) => Err(format!("exponent {exp} out of range in '{}'", self.input)),
            Err(_) => Err(format!("malformed exponent in '{}'", self.input)),
        }
    }

    fn atom(&mut self) -> Result<Term, String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !matches!(c, '*' | '·' | '/' | '(' | ')' | '^' | '<'))
        {
            self.pos += 1;
        }
        let symbol: String = self.chars[start..self.pos].iter().collect();
        if symbol.is_empty() {
            return Err(format!("missing unit at position {start} in '{}'", self.input));
        }

        if self.peek() == Some('<') {
            return self.molar(&symbol);
        }

        // HealthKit writes exponents explicitly; a trailing digit is an error
        if symbol.chars().last().is_some_and(|c| c.is_ascii_digit()) {
            return Err(format!(
                "unknown unit '{symbol}' in '{}' (use '^' for exponents)",
                self.input
            ));
        }

        catalog::resolve_symbol(&symbol)
            .map(Term::from_atom)
            .ok_or_else(|| format!("unknown unit '{symbol}' in '{}'", self.input))
    }

    /// `mol<molar mass>` is treated as a mass so it converts against grams
    fn molar(&mut self, symbol: &str) -> Result<Term, String> {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '>') {
            self.pos += 1;
        }
        if self.peek() != Some('>') {
            return Err(format!("unterminated molar mass in '{}'", self.input));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;

        let molar_mass: f64 = text
            .trim()
            .parse()
            .map_err(|_| format!("malformed molar mass '{text}' in '{}'", self.input))?;
        if !(molar_mass.is_finite() && molar_mass > 0.0) {
            return Err(format!("molar mass must be positive in '{}'", self.input));
        }

        let mol = catalog::resolve_symbol(symbol)
            .filter(|a| a.dims == Dimensions::single(AMOUNT))
            .ok_or_else(|| format!("molar mass annotation on non-mole unit '{symbol}'"))?;

        // grams per mole, expressed in kilograms
        Ok(Term {
            factor: mol.factor * molar_mass * 1e-3,
            dims: Dimensions::single(MASS),
            offset: None,
        })
    }
}
