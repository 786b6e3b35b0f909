use log::trace;
use super::expr::{Expression, Number, Operation, Operator};

/// Returns `1` if the given variable is the one to differentiate by, and `0` otherwise.
fn variable_rule(name: &str, with: &str) -> Expression {
    if name == with {
        Expression::Number(Number::ONE)
    } else {
        Expression::Number(Number::ZERO)
    }
}

/// Sum rule: `(f + g)' = f' + g'`.
fn sum_rule(lhs: &Expression, rhs: &Expression, with: &str) -> Expression {
    derivative(lhs, with) + derivative(rhs, with)
}

/// Product rule: `(f * g)' = f' * g + f * g'`.
fn product_rule(lhs: &Expression, rhs: &Expression, with: &str) -> Expression {
    derivative(lhs, with) * rhs.clone() + lhs.clone() * derivative(rhs, with)
}

/// Produces the derivative of the given expression with respect to the variable named `with`.
///
/// The result is not simplified. Every number and every variable other than `with` becomes an
/// explicit `0`, and the product rule always produces both of its terms, so the derivative of
/// `x * 1` is `((1.0 * 1.0) + (x * 0.0))`. Use [`simplify`](super::simplify()) to fold the
/// result.
///
/// `with` does not need to be a valid variable name; a name that cannot appear in an expression
/// simply differentiates everything to zero.
pub fn derivative(f: &Expression, with: &str) -> Expression {
    let result = match f {
        Expression::Number(_) => Expression::Number(Number::ZERO),
        Expression::Variable(var) => variable_rule(var.name(), with),
        Expression::Operation(Operation { op: Operator::Add, lhs, rhs }) => sum_rule(lhs, rhs, with),
        Expression::Operation(Operation { op: Operator::Mul, lhs, rhs }) => product_rule(lhs, rhs, with),
    };
    trace!("d/d{} {} = {}", with, f, result);
    result
}
