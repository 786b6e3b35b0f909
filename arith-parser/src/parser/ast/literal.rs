use crate::{
    parser::{
        error::{kind, Error},
        token::Name,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A number literal. Integers and numbers with a fractional part are both represented here as
/// `f64`. Number literals are never negative.
///
/// Any run of digits is tokenized as a number, but a literal that rounds to infinity as `f64`
/// (a few hundred digits) is rejected with [`NumberTooLarge`](kind::NumberTooLarge), so every
/// parsed number is finite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The value of the number literal.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        if !matches!(token.kind, TokenKind::Int | TokenKind::Float) {
            return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Int, TokenKind::Float],
                found: token.kind,
            }));
        }

        if token.lexeme.ends_with('.') {
            return Err(Error::new(vec![token.span], kind::TrailingDecimalPoint));
        }

        // the lexeme is made of ascii digits with at most one inner `.`, so the only way to fail
        // is to overflow into infinity
        match token.lexeme.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self {
                value,
                span: token.span,
            }),
            _ => Err(Error::new(vec![token.span], kind::NumberTooLarge)),
        }
    }
}

impl std::fmt::Display for LitNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol literal, used to represent variables. A symbol's name is a nonempty sequence of
/// ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Name>()?;
        Ok(Self {
            name: token.lexeme,
            span: token.span,
        })
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value.
///
/// A literal is any value that is written directly into the source code, such as the number
/// `1` or the variable `x`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A number literal.
    Number(LitNum),

    /// A symbol / identifier literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.current_token().map(|token| token.kind) {
            Some(TokenKind::Name) => input.try_parse::<LitSym>().map(Literal::Symbol),
            _ => input.try_parse::<LitNum>().map(Literal::Number),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number(num) => num.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
