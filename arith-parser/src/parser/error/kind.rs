use ariadne::Fmt;
use arith_attrs::ErrorKind;
use arith_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of file",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    help = format!("separate {} with `+` or `*`", "expressions".fg(EXPR)),
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// An operator outside of the grammar was used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unsupported operator `{}`", symbol),
    labels = ["this operator is not supported"],
    help = format!("only addition `{}` and multiplication `{}` are supported", "+".fg(EXPR), "*".fg(EXPR)),
)]
pub struct UnsupportedOperator {
    /// The operator symbol that was found.
    pub symbol: String,
}

/// A number ended with a decimal point that had no digits after it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing digits after decimal point",
    labels = ["this number"],
    help = format!("write the number as `{}` or `{}`", "1".fg(EXPR), "1.0".fg(EXPR)),
)]
pub struct TrailingDecimalPoint;

/// A number literal was too large to be represented.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "number is too large",
    labels = ["this number cannot be represented"],
)]
pub struct NumberTooLarge;

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;
