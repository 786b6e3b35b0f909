use log::trace;
use super::{env::Environment, expr::{Expression, Operation}};

/// Simplifies the given expression under the given environment.
///
/// Variables bound in `env` are replaced by their values, and every operation whose operands
/// simplify to numbers is folded into a single number, using ordinary floating-point addition
/// and multiplication. Nothing else is rewritten: there are no algebraic identities, so `x * 1`
/// and `x + 0` are left alone when `x` is unbound.
///
/// Simplifying an already simplified expression under the same environment returns it
/// unchanged.
pub fn simplify(expr: &Expression, env: &Environment) -> Expression {
    match expr {
        Expression::Number(_) => expr.clone(),
        Expression::Variable(var) => env.get(var.name())
            .map_or_else(|| expr.clone(), Expression::Number),
        Expression::Operation(Operation { op, lhs, rhs }) => {
            let (lhs, rhs) = (simplify(lhs, env), simplify(rhs, env));
            match (&lhs, &rhs) {
                (Expression::Number(l), Expression::Number(r)) => {
                    let folded = op.fold(*l, *r);
                    trace!("folded {} {} {} = {}", l, op, r, folded);
                    Expression::Number(folded)
                },
                _ => Expression::operation(*op, lhs, rhs),
            }
        },
    }
}
