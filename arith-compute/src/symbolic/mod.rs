//! Symbolic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`Expression`] nodes. It's similar to
//! the [`arith_parser::parser::ast::Expr`] nodes produced by [`arith_parser`], with the main
//! difference being that [`Expression`] nodes carry no span information or parentheses; the
//! structure of the tree alone decides the order of operations.
//!
//! ```
//! use arith_compute::symbolic::Expression;
//!
//! let expr = Expression::parse("x * (y + 1)").unwrap();
//! assert_eq!(expr.to_string(), "(x * (y + 1.0))");
//! ```
//!
//! # Differentiation and simplification
//!
//! [`derivative()`] produces the derivative of an expression with respect to a variable, using
//! the sum and product rules. It does not clean up the result: `d/dx (x * 1)` is
//! `((1.0 * 1.0) + (x * 0.0))`, not `1.0`.
//!
//! [`simplify()`] substitutes the variables bound in an [`Environment`] and folds every
//! operation whose operands are both numbers. It applies no other identity, so `x * 1` stays as
//! it is when `x` is unbound.
//!
//! The two are meant to be composed:
//!
//! ```
//! use arith_compute::symbolic::{derivative, simplify, Environment, Expression};
//!
//! let expr = Expression::parse("x * x").unwrap();
//! let env = Environment::new().with("x", 3.0).unwrap();
//! assert_eq!(simplify(&derivative(&expr, "x"), &env).to_string(), "6.0");
//! ```

pub mod derivative;
pub mod env;
pub mod expr;
pub mod simplify;

pub use derivative::derivative;
pub use env::Environment;
pub use expr::{Expression, ModelError, Number, Operation, Operator, Variable};
pub use simplify::simplify;
