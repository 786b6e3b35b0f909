//! Symbolic manipulation of arithmetic expressions built from nonnegative numbers, variables,
//! addition and multiplication.
//!
//! The [`symbolic`] module holds the expression model and the two transformations on it,
//! differentiation and simplification. The [`commands`] module wraps them into text-in,
//! text-out entry points suitable for a front end.

pub mod commands;
pub mod symbolic;
