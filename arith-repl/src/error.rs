use arith_compute::{commands::InvalidInput, symbolic::ModelError};
use arith_parser::parser::error::Error as ParseError;
use crate::command::CommandError;
use std::io;

/// Utility enum to package errors that can occur while running a line of input.
#[derive(Debug)]
pub enum Error {
    /// The line was an expression that could not be parsed.
    Parse(ParseError),

    /// The variable of a `!d/d` command is not a valid variable name.
    InvalidInput(InvalidInput),

    /// A `!simplify` binding has an invalid name or value.
    Binding(ModelError),

    /// The line was not a valid command.
    Command(CommandError),

    /// A command was run before any expression was entered.
    NoExpression,
}

impl Error {
    /// Report this error to stderr, highlighting `line`, the line of input that caused it.
    pub fn report_to_stderr(&self, line: &str) -> io::Result<()> {
        match self {
            Self::Parse(err) => err.report_to_stderr("input", line),
            Self::InvalidInput(err) => {
                let variable = line.strip_prefix("!d/d").unwrap_or_default();
                err.report_to_stderr(line, variable)
            },
            Self::Binding(err) => {
                eprintln!("error: {}", err);
                Ok(())
            },
            Self::Command(err) => {
                eprintln!("error: {}", err);
                Ok(())
            },
            Self::NoExpression => {
                eprintln!("error: no expression to work on; enter an expression first");
                Ok(())
            },
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<InvalidInput> for Error {
    fn from(err: InvalidInput) -> Self {
        Self::InvalidInput(err)
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Binding(err)
    }
}

impl From<CommandError> for Error {
    fn from(err: CommandError) -> Self {
        Self::Command(err)
    }
}
