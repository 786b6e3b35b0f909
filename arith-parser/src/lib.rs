//! Tokenizer and parser for arithmetic expressions built from nonnegative numbers, variables,
//! addition and multiplication.
//!
//! ```
//! use arith_parser::parser::{ast::Expr, Parser};
//!
//! let mut parser = Parser::new("(1 + x) * y");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.to_string(), "(1 + x) * y");
//! ```

pub mod parser;
pub mod tokenizer;
