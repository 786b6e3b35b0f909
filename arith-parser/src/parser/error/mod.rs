pub mod kind;

pub use arith_error::{Error, ErrorKind};
