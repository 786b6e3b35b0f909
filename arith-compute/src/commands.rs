//! Text-in, text-out entry points over the [`symbolic`](crate::symbolic) module.
//!
//! Each command parses its input, runs one transformation and returns the display form of the
//! result. Anything that cannot be parsed is returned as an [`InvalidInput`], which can render
//! itself as a report against the offending text.

use ariadne::Fmt;
use arith_attrs::ErrorKind;
use arith_error::{Error, ErrorKind, EXPR};
use log::{debug, log_enabled, Level};
use std::fmt;
use crate::symbolic::{Environment, Expression, Variable};

/// The name given to the differentiation variable was not a valid variable name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid variable name `{}`", name),
    labels = ["this name"],
    help = format!("variable names are made of one or more {}", "ASCII letters".fg(EXPR)),
)]
pub struct InvalidVariableName {
    /// The name that was given.
    pub name: String,
}

/// Input to one of the commands that could not be used.
#[derive(Debug)]
pub enum InvalidInput {
    /// The expression text could not be parsed.
    Expression(Error),

    /// The variable name is not a valid variable name.
    Variable(Error),
}

impl InvalidInput {
    /// Returns the underlying error.
    pub fn error(&self) -> &Error {
        match self {
            Self::Expression(err) | Self::Variable(err) => err,
        }
    }

    /// Report the error to stderr, highlighting whichever of `expr` or `variable` was invalid.
    pub fn report_to_stderr(&self, expr: &str, variable: &str) -> std::io::Result<()> {
        match self {
            Self::Expression(err) => err.report_to_stderr("expression", expr),
            Self::Variable(err) => err.report_to_stderr("variable", variable),
        }
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Expression(err) => write!(f, "invalid expression: {:?}", err.kind),
            Self::Variable(err) => write!(f, "invalid variable: {:?}", err.kind),
        }
    }
}

/// Checks that `variable` is a usable variable name, reporting it as [`InvalidInput::Variable`]
/// if not.
pub fn parse_variable(variable: &str) -> Result<Variable, InvalidInput> {
    Variable::new(variable).map_err(|_| {
        InvalidInput::Variable(Error::new(
            vec![0..variable.len()],
            InvalidVariableName { name: variable.to_string() },
        ))
    })
}

/// Differentiates the expression in `text` with respect to `variable`, returning the display
/// form of the (unsimplified) derivative.
pub fn differentiate(text: &str, variable: &str) -> Result<String, InvalidInput> {
    let expr = Expression::parse(text).map_err(InvalidInput::Expression)?;
    parse_variable(variable)?;
    debug!("differentiating {} by {}", expr, variable);
    Ok(expr.differentiate(variable).to_string())
}

/// Simplifies the expression in `text` under `env`, returning the display form of the result.
pub fn simplify(text: &str, env: &Environment) -> Result<String, InvalidInput> {
    let expr = Expression::parse(text).map_err(InvalidInput::Expression)?;
    if log_enabled!(Level::Debug) {
        let mut bindings = env.iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>();
        bindings.sort();
        debug!("simplifying {} with [{}]", expr, bindings.join(", "));
    }
    Ok(expr.simplify(env).to_string())
}

#[cfg(test)]
mod tests {
    use arith_parser::parser::error::kind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x_is_two() -> Environment {
        Environment::new().with("x", 2.0).unwrap()
    }

    #[test]
    fn invalid_variable_spans_whole_name() {
        let err = differentiate("x", "x2").unwrap_err();
        assert!(matches!(err, InvalidInput::Variable(_)));
        assert_eq!(err.error().spans, vec![0..2]);
        assert_eq!(
            err.error().downcast_ref::<InvalidVariableName>(),
            Some(&InvalidVariableName { name: "x2".to_string() }),
        );
    }

    #[test]
    fn expression_checked_before_variable() {
        let err = differentiate("3 x", "3").unwrap_err();
        assert!(matches!(err, InvalidInput::Expression(_)));
    }

    #[test]
    fn report_mentions_name() {
        let err = differentiate("x", "xy2").unwrap_err();
        let rendered = err.error().report_to_vec("variable", "xy2").unwrap();
        let text = String::from_utf8_lossy(&rendered);
        assert!(text.contains("invalid variable name"));
    }

    #[test]
    fn differentiate_number() {
        assert_eq!(differentiate("1", "x").unwrap(), "0.0");
        assert_eq!(differentiate("2.5", "y").unwrap(), "0.0");
    }

    #[test]
    fn differentiate_variable() {
        assert_eq!(differentiate("x", "x").unwrap(), "1.0");
        assert_eq!(differentiate("x", "y").unwrap(), "0.0");
    }

    #[test]
    fn differentiate_sum() {
        assert_eq!(differentiate("1 + x", "x").unwrap(), "(0.0 + 1.0)");
    }

    #[test]
    fn differentiate_product() {
        assert_eq!(differentiate("x * 1", "x").unwrap(), "((1.0 * 1.0) + (x * 0.0))");
        assert_eq!(differentiate("x * y", "x").unwrap(), "((1.0 * y) + (x * 0.0))");
    }

    #[test]
    fn differentiate_nested() {
        assert_eq!(
            differentiate("(1 + x) * (x * 1)", "x").unwrap(),
            "(((0.0 + 1.0) * (x * 1.0)) + ((1.0 + x) * ((1.0 * 1.0) + (x * 0.0))))",
        );
        assert_eq!(
            differentiate("(1 + x) * (x * 1)", "y").unwrap(),
            "(((0.0 + 0.0) * (x * 1.0)) + ((1.0 + x) * ((0.0 * 1.0) + (x * 0.0))))",
        );
    }

    #[test]
    fn differentiate_rejects_adjacent_factors() {
        let err = differentiate("3 x", "x").unwrap_err();
        assert!(matches!(err, InvalidInput::Expression(_)));
        assert!(err.error().is::<kind::ExpectedEof>());
    }

    #[test]
    fn differentiate_rejects_bad_variable() {
        for name in ["3", "", "x y", "x1", "-"] {
            let err = differentiate("x", name).unwrap_err();
            assert!(matches!(err, InvalidInput::Variable(_)), "accepted {name:?}");
        }
    }

    #[test]
    fn simplify_without_bindings() {
        let env = Environment::new();
        assert_eq!(simplify("1 + 2", &env).unwrap(), "3.0");
        assert_eq!(simplify("x * 1", &env).unwrap(), "(x * 1.0)");
    }

    #[test]
    fn simplify_with_bindings() {
        assert_eq!(simplify("(1.0 + x) * (x * 1.0)", &x_is_two()).unwrap(), "6.0");
        assert_eq!(simplify("x * y", &x_is_two()).unwrap(), "(2.0 * y)");
    }

    #[test]
    fn simplify_after_differentiate() {
        let derivative = differentiate("(1 + x) * (x * 1)", "x").unwrap();
        assert_eq!(simplify(&derivative, &x_is_two()).unwrap(), "5.0");
    }

    #[test]
    fn simplify_with_negative_zero_binding() {
        let env = Environment::new().with("x", -0.0).unwrap();
        let once = simplify("x * 5", &env).unwrap();
        assert_eq!(once, "0.0");
        assert_eq!(simplify(&once, &env).unwrap(), "0.0");
    }

    #[test]
    fn simplify_is_idempotent() {
        let env = x_is_two().with("y", 3.0).unwrap();
        for text in ["x * y + z", "(1 + x) * (x * 1)", "z * (y + 1)"] {
            let once = simplify(text, &env).unwrap();
            assert_eq!(simplify(&once, &env).unwrap(), once);
        }
    }

    #[test]
    fn simplify_rejects_invalid_expressions() {
        for text in ["3 x", "", "(x", "x)", "()", "x - 1", "1."] {
            let err = simplify(text, &Environment::new()).unwrap_err();
            assert!(matches!(err, InvalidInput::Expression(_)), "accepted {text:?}");
        }
    }
}
