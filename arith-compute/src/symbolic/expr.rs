//! The expression tree that differentiation and simplification operate on.
//!
//! The [`Expr`](arith_parser::parser::ast::Expr) type from `arith_parser` keeps the spans and
//! parentheses of the source text, which is what diagnostics need. This module defines a
//! separate [`Expression`] that keeps only the structure: a number, a variable, or an operation
//! on two owned children. Converting an AST into an [`Expression`] drops the spans and
//! parentheses.
//!
//! # Invariants
//!
//! Every node is checked when it is built:
//!
//! - a [`Number`] is finite and never negative, and zero is always `+0.0`;
//! - a [`Variable`] name is one or more ASCII letters;
//! - an [`Operator`] is either addition or multiplication.
//!
//! The smart constructors [`Number::new`], [`Variable::new`] and `Operator::try_from` return a
//! [`ModelError`] instead of building a node that breaks these rules.
//!
//! # Equality
//!
//! [`PartialEq`], [`Eq`] and [`Hash`] are structural: two trees are equal if they have the same
//! shape, the same operators and the same leaves. No commutative or associative normalization
//! is done, so `x * 1` and `1 * x` are different trees.

use arith_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    error::Error,
    token::op::BinOpKind,
    Parser,
};
use std::{
    borrow::Borrow,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Mul},
    str::FromStr,
};
use super::{derivative::derivative, env::Environment, simplify::simplify};
use thiserror::Error as ThisError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An attempt to build a node that violates the invariants of the expression model.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("number must not be negative, found {0}")]
    NegativeNumber(f64),

    #[error("number must be finite, found {0}")]
    NonFiniteNumber(f64),

    #[error("invalid variable name `{0}`: expected one or more ASCII letters")]
    InvalidVariableName(String),

    #[error("unknown operator `{0}`: expected `+` or `*`")]
    UnknownOperator(char),
}

/// A nonnegative number, such as `2` or `0.5`.
///
/// [`Number::new`] only accepts finite values, so every number it builds can be written as a
/// literal. [`Add`] and [`Mul`] follow floating-point arithmetic instead: overflow produces
/// infinity and `0 * inf` produces NaN, neither of which is negative. Such results display as
/// `inf` and `NaN`, which the parser reads back as variable names, not numbers.
///
/// `-0.0` is stored as `+0.0`, so a zero never displays with a sign.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Number(f64);

impl Number {
    /// The number `0`.
    pub const ZERO: Number = Number(0.0);

    /// The number `1`.
    pub const ONE: Number = Number(1.0);

    /// Creates a new number. Fails if the value is negative, infinite or NaN.
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if value < 0.0 {
            Err(ModelError::NegativeNumber(value))
        } else if !value.is_finite() {
            Err(ModelError::NonFiniteNumber(value))
        } else {
            Ok(Self::unsigned(value))
        }
    }

    /// Wraps a value known not to be negative, turning `-0.0` into `+0.0`.
    fn unsigned(value: f64) -> Self {
        Self(value + 0.0)
    }

    /// Returns the value of the number.
    pub fn value(self) -> f64 {
        self.0
    }

    /// The bit pattern used for equality and hashing. All NaNs share one pattern, which keeps
    /// [`Eq`] reflexive and [`Hash`] consistent with it.
    fn canonical_bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl TryFrom<f64> for Number {
    type Error = ModelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Number> for f64 {
    fn from(number: Number) -> Self {
        number.0
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Self::Output {
        Number::unsigned(self.0 + rhs.0)
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Self::Output {
        Number::unsigned(self.0 * rhs.0)
    }
}

/// Numbers are always written with a fractional part (`1` is written as `1.0`) and never in
/// exponent notation, so the output can be read back by the parser.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Returns true if the given name is a valid variable name.
pub fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// A variable, such as `x` or `rate`. Names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Variable(String);

impl Variable {
    /// Creates a new variable. Fails if the name is not one or more ASCII letters.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if is_variable_name(&name) {
            Ok(Self(name))
        } else {
            Err(ModelError::InvalidVariableName(name))
        }
    }

    /// Returns the name of the variable.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Variable {
    type Error = ModelError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<Variable> for String {
    fn from(variable: Variable) -> Self {
        variable.0
    }
}

impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The operator of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Addition, written `+`.
    Add,

    /// Multiplication, written `*`.
    Mul,
}

impl Operator {
    /// Returns the symbol used to write the operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Mul => '*',
        }
    }

    /// Applies the operator to two numbers.
    pub fn fold(self, lhs: Number, rhs: Number) -> Number {
        match self {
            Self::Add => lhs + rhs,
            Self::Mul => lhs * rhs,
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = ModelError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '+' => Ok(Self::Add),
            '*' => Ok(Self::Mul),
            _ => Err(ModelError::UnknownOperator(symbol)),
        }
    }
}

impl From<BinOpKind> for Operator {
    fn from(kind: BinOpKind) -> Self {
        match kind {
            BinOpKind::Add => Self::Add,
            BinOpKind::Mul => Self::Mul,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An operation on two expressions. The order of the operands is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operation {
    /// The operator.
    pub op: Operator,

    /// The left-hand side of the operation.
    pub lhs: Box<Expression>,

    /// The right-hand side of the operation.
    pub rhs: Box<Expression>,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(op: Operator, lhs: Expression, rhs: Expression) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op, self.rhs)
    }
}

/// An arithmetic expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// A nonnegative number.
    Number(Number),

    /// A variable.
    Variable(Variable),

    /// An addition or multiplication of two expressions.
    Operation(Operation),
}

impl Expression {
    /// Creates a number expression. Fails if the value is negative.
    pub fn number(value: f64) -> Result<Self, ModelError> {
        Number::new(value).map(Self::Number)
    }

    /// Creates a variable expression. Fails if the name is not one or more ASCII letters.
    pub fn variable(name: impl Into<String>) -> Result<Self, ModelError> {
        Variable::new(name).map(Self::Variable)
    }

    /// Creates an operation expression.
    pub fn operation(op: Operator, lhs: Expression, rhs: Expression) -> Self {
        Self::Operation(Operation::new(op, lhs, rhs))
    }

    /// Parses an expression from text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Parser::new(text).try_parse_full::<AstExpr>().map(Self::from)
    }

    /// Returns the names of the variables that appear in the expression.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Self::Number(_) => (),
                Self::Variable(var) => {
                    names.insert(var.name());
                },
                Self::Operation(operation) => {
                    stack.push(&operation.rhs);
                    stack.push(&operation.lhs);
                },
            }
        }
        names
    }

    /// Returns the derivative of the expression with respect to the given variable. See
    /// [`derivative`].
    pub fn differentiate(&self, variable: &str) -> Expression {
        derivative(self, variable)
    }

    /// Returns the expression simplified under the given environment. See [`simplify`].
    pub fn simplify(&self, env: &Environment) -> Expression {
        simplify(self, env)
    }
}

impl From<Number> for Expression {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<Operation> for Expression {
    fn from(operation: Operation) -> Self {
        Self::Operation(operation)
    }
}

/// Lowers a parsed AST into an [`Expression`], dropping spans and parentheses.
///
/// The tokenizer only produces finite number literals made of digits and symbol names made of
/// ASCII letters, so every node satisfies the model invariants without being checked again.
impl From<AstExpr> for Expression {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Number(num)) => Self::Number(Number(num.value)),
            AstExpr::Literal(Literal::Symbol(sym)) => Self::Variable(Variable(sym.name)),
            AstExpr::Paren(paren) => paren.into_innermost().into(),
            AstExpr::Binary(binary) => Self::operation(
                binary.op.kind.into(),
                (*binary.lhs).into(),
                (*binary.rhs).into(),
            ),
        }
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Builds `lhs + rhs` as a tree. Nothing is folded, even if both sides are numbers; use
/// [`simplify`] for that.
impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Self) -> Self::Output {
        Self::operation(Operator::Add, self, rhs)
    }
}

/// Builds `lhs * rhs` as a tree. Nothing is folded, even if both sides are numbers; use
/// [`simplify`] for that.
impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::operation(Operator::Mul, self, rhs)
    }
}

/// Expressions are written fully parenthesized, with one space around each operator, such as
/// `((1.0 + x) * y)`. The output can be read back by the parser.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => number.fmt(f),
            Self::Variable(variable) => variable.fmt(f),
            Self::Operation(operation) => operation.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::collections::{hash_map::DefaultHasher, HashSet};
    use super::*;

    fn num(value: f64) -> Expression {
        Expression::number(value).unwrap()
    }

    fn var(name: &str) -> Expression {
        Expression::variable(name).unwrap()
    }

    fn hash_of(expr: &Expression) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    /// `(1 + x) * (x * 1)`
    fn product_of_sums() -> Expression {
        (num(1.0) + var("x")) * (var("x") * num(1.0))
    }

    #[test]
    fn display_number() {
        assert_eq!(num(1.0).to_string(), "1.0");
        assert_eq!(num(0.0).to_string(), "0.0");
        assert_eq!(num(2.5).to_string(), "2.5");
        assert_eq!(num(0.1).to_string(), "0.1");
        assert_eq!(num(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(num(1e-7).to_string(), "0.0000001");
    }

    #[test]
    fn display_variable() {
        assert_eq!(var("x").to_string(), "x");
        assert_eq!(var("Rate").to_string(), "Rate");
    }

    #[test]
    fn display_operations() {
        assert_eq!((num(1.0) + var("x")).to_string(), "(1.0 + x)");
        assert_eq!((var("x") * num(1.0)).to_string(), "(x * 1.0)");
        assert_eq!(product_of_sums().to_string(), "((1.0 + x) * (x * 1.0))");
    }

    #[test]
    fn construction_rejects_negative_numbers() {
        assert_eq!(Number::new(-1.0), Err(ModelError::NegativeNumber(-1.0)));
        assert!(Expression::number(-0.5).is_err());
        assert!(Number::new(0.0).is_ok());
    }

    #[test]
    fn construction_rejects_non_finite_numbers() {
        assert_eq!(Number::new(f64::INFINITY), Err(ModelError::NonFiniteNumber(f64::INFINITY)));
        assert!(matches!(Number::new(f64::NAN), Err(ModelError::NonFiniteNumber(v)) if v.is_nan()));
        assert!(Expression::number(f64::MAX).is_ok());
    }

    #[test]
    fn construction_rejects_bad_names() {
        for name in ["", "x1", "x_y", "x y", "é", "3"] {
            assert_eq!(
                Variable::new(name),
                Err(ModelError::InvalidVariableName(name.to_string())),
            );
        }
        assert!(Variable::new("xYz").is_ok());
    }

    #[test]
    fn construction_rejects_unknown_operators() {
        assert_eq!(Operator::try_from('+'), Ok(Operator::Add));
        assert_eq!(Operator::try_from('*'), Ok(Operator::Mul));
        assert_eq!(Operator::try_from('-'), Err(ModelError::UnknownOperator('-')));
        assert_eq!(Operator::try_from('/'), Err(ModelError::UnknownOperator('/')));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(num(1.0), num(1.0));
        assert_eq!(var("x"), var("x"));
        assert_ne!(var("x"), var("X"));
        assert_eq!(product_of_sums(), product_of_sums());
        assert_eq!(hash_of(&product_of_sums()), hash_of(&product_of_sums()));
    }

    #[test]
    fn equality_does_not_commute() {
        assert_ne!(var("x") * num(1.0), num(1.0) * var("x"));
        assert_ne!(var("x") + var("y"), var("y") + var("x"));
        assert_ne!(var("x") + num(1.0), var("x") * num(1.0));
    }

    #[test]
    fn equality_does_not_associate() {
        let left = (var("a") + var("b")) + var("c");
        let right = var("a") + (var("b") + var("c"));
        assert_ne!(left, right);
    }

    #[test]
    fn negative_zero_is_unsigned() {
        let zero = Number::new(0.0).unwrap();
        let neg_zero = Number::new(-0.0).unwrap();
        assert_eq!(zero, neg_zero);
        assert_eq!(hash_of(&zero.into()), hash_of(&neg_zero.into()));
        assert_eq!(neg_zero.value().to_bits(), 0.0f64.to_bits());
        assert_eq!(neg_zero.to_string(), "0.0");
    }

    #[test]
    fn arithmetic_keeps_zero_unsigned() {
        let neg_zero = Number(-0.0);
        let five = Number::new(5.0).unwrap();
        assert_eq!((neg_zero * five).to_string(), "0.0");
        assert_eq!((neg_zero + neg_zero).to_string(), "0.0");
    }

    #[test]
    fn nan_is_equal_to_itself() {
        let max = Number::new(f64::MAX).unwrap();
        let nan = Number::ZERO * (max * max);
        assert!(nan.value().is_nan());
        assert_eq!(nan, nan);
    }

    #[test]
    fn overflow_displays_as_name() {
        let max = Number::new(f64::MAX).unwrap();
        let inf = max * max;
        assert_eq!(inf.to_string(), "inf");
        assert_eq!((Number::ZERO * inf).to_string(), "NaN");

        // neither is a number literal, so reading them back yields variables
        assert_eq!(Expression::parse("inf").unwrap(), var("inf"));
        assert_eq!(Expression::parse("NaN").unwrap(), var("NaN"));
    }

    #[test]
    fn hash_set_dedups_equal_trees() {
        let set = [product_of_sums(), product_of_sums(), var("x") * num(1.0)]
            .into_iter()
            .collect::<HashSet<_>>();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn parse_number() {
        assert_eq!(Expression::parse("1").unwrap(), num(1.0));
        assert_eq!(Expression::parse("1.0").unwrap(), num(1.0));
    }

    #[test]
    fn parse_variable() {
        assert_eq!(Expression::parse("x").unwrap(), var("x"));
    }

    #[test]
    fn parse_operations() {
        assert_eq!(Expression::parse("1 + x").unwrap(), num(1.0) + var("x"));
        assert_eq!(Expression::parse("x * 1").unwrap(), var("x") * num(1.0));
        assert_eq!(Expression::parse("(1 + x) * (x * 1)").unwrap(), product_of_sums());
    }

    #[test]
    fn parse_drops_redundant_parens() {
        assert_eq!(Expression::parse("((x))").unwrap(), var("x"));
        assert_eq!(Expression::parse("(1) + (x)").unwrap(), num(1.0) + var("x"));
    }

    #[test]
    fn parse_respects_precedence() {
        assert_eq!(
            Expression::parse("a + b * c").unwrap(),
            var("a") + var("b") * var("c"),
        );
        assert_eq!(
            Expression::parse("a * b + c").unwrap(),
            var("a") * var("b") + var("c"),
        );
        assert_eq!(
            Expression::parse("a + b + c").unwrap(),
            (var("a") + var("b")) + var("c"),
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for text in ["3 x", "", "(x", "x)", "x +", "x - 1", "()", "1."] {
            assert!(Expression::parse(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn from_str() {
        let expr: Expression = "x * y".parse().unwrap();
        assert_eq!(expr, var("x") * var("y"));
    }

    #[test]
    fn display_round_trips() {
        let trees = [
            num(0.0),
            num(-0.0),
            num(3.75),
            num(1e20),
            num(f64::MAX),
            num(f64::MIN_POSITIVE),
            num(5e-324),
            var("x"),
            product_of_sums(),
            (var("a") + var("b")) + var("c"),
            var("a") + (var("b") + var("c")),
            var("a") * (var("b") * (var("c") + num(0.001))),
        ];

        for tree in trees {
            let reparsed = Expression::parse(&tree.to_string()).unwrap();
            assert_eq!(reparsed, tree);
        }
    }

    #[test]
    fn variables() {
        let expr = Expression::parse("(y + x) * (x * 2 + b)").unwrap();
        assert_eq!(expr.variables().into_iter().collect::<Vec<_>>(), vec!["b", "x", "y"]);
        assert!(num(1.0).variables().is_empty());
    }

    #[test]
    fn fold_numbers() {
        let two = Number::new(2.0).unwrap();
        let three = Number::new(3.0).unwrap();
        assert_eq!(Operator::Add.fold(two, three), Number::new(5.0).unwrap());
        assert_eq!(Operator::Mul.fold(two, three), Number::new(6.0).unwrap());
    }
}
