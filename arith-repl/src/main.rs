//! Interactive front end for differentiating and simplifying expressions.
//!
//! Type an expression to make it the current expression, e.g. `(1 + x) * x`. Then:
//!
//! - `!d/dx` differentiates the current expression by `x` and makes the result current.
//! - `!simplify x=2 y=0.5` simplifies the current expression with the given bindings.
//!
//! When stdin is not a terminal, each line of stdin is run in order.

mod command;
mod error;

use arith_compute::{commands, symbolic::{Environment, Expression}};
use command::Command;
use error::Error;
use log::{debug, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, BufRead, IsTerminal};

/// The state kept between lines of input.
#[derive(Debug, Default)]
struct Session {
    /// The current expression, which commands operate on.
    current: Option<Expression>,
}

impl Session {
    /// Returns the current expression, or an error if none was entered yet.
    fn current(&self) -> Result<&Expression, Error> {
        self.current.as_ref().ok_or(Error::NoExpression)
    }

    /// Runs a single line of input, returning the text to print.
    fn run(&mut self, line: &str) -> Result<String, Error> {
        match Command::parse(line)? {
            Command::Expression(text) => {
                let expr = Expression::parse(text)?;
                let output = expr.to_string();
                self.current = Some(expr);
                Ok(output)
            },
            Command::Differentiate(variable) => {
                let variable = commands::parse_variable(variable)?;
                let derivative = self.current()?.differentiate(variable.name());
                let output = derivative.to_string();
                self.current = Some(derivative);
                Ok(output)
            },
            Command::Simplify(bindings) => {
                let env = Environment::from_bindings(bindings)?;
                let simplified = self.current()?.simplify(&env);

                let unbound = simplified.variables();
                if !unbound.is_empty() {
                    info!("unbound variables: {}", unbound.into_iter().collect::<Vec<_>>().join(", "));
                }

                Ok(simplified.to_string())
            },
        }
    }

    /// Runs a line of input and prints the result or the error.
    fn read_eval(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match self.run(line) {
            Ok(output) => println!("{}", output),
            Err(err) => {
                debug!("failed to run `{}`: {:?}", line, err);
                if let Err(io_err) = err.report_to_stderr(line) {
                    eprintln!("{}", io_err);
                }
            },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let mut session = Session::default();

    if !io::stdin().is_terminal() {
        // batch mode: one line of input per command
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => session.read_eval(&line),
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
        return;
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return;
        },
    };

    fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        session.read_eval(&input);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl, &mut session) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn differentiate_then_simplify() {
        let mut session = Session::default();
        assert_eq!(session.run("x * 1").unwrap(), "(x * 1.0)");
        assert_eq!(session.run("!d/dx").unwrap(), "((1.0 * 1.0) + (x * 0.0))");
        assert_eq!(session.run("!simplify x=2").unwrap(), "1.0");

        // simplify leaves the current expression alone
        assert_eq!(session.run("!simplify").unwrap(), "((1.0 * 1.0) + (x * 0.0))");
    }

    #[test]
    fn simplify_partial() {
        let mut session = Session::default();
        session.run("x * y").unwrap();
        assert_eq!(session.run("!simplify x=2").unwrap(), "(2.0 * y)");
        assert_eq!(session.run("!simplify").unwrap(), "(x * y)");
    }

    #[test]
    fn errors_keep_session() {
        let mut session = Session::default();
        assert!(matches!(session.run("!d/dx"), Err(Error::NoExpression)));
        assert!(matches!(session.run("3 x"), Err(Error::Parse(_))));

        session.run("x").unwrap();
        assert!(matches!(session.run("!d/d3"), Err(Error::InvalidInput(_))));
        assert!(matches!(session.run("!simplify x=-1"), Err(Error::Binding(_))));
        assert!(matches!(session.run("!simplify 3=1"), Err(Error::Binding(_))));
        assert!(matches!(session.run("!oops"), Err(Error::Command(_))));
        assert_eq!(session.run("!simplify").unwrap(), "x");
    }

    #[test]
    fn simplify_negative_zero() {
        let mut session = Session::default();
        session.run("x * 5").unwrap();
        assert_eq!(session.run("!simplify x=-0").unwrap(), "0.0");
    }

    #[test]
    fn simplify_overflow() {
        let big = format!("1{}", "0".repeat(308));
        let mut session = Session::default();
        session.run(&format!("{} * {}", big, big)).unwrap();
        assert_eq!(session.run("!simplify").unwrap(), "inf");

        session.run(&format!("0 * ({} * {})", big, big)).unwrap();
        assert_eq!(session.run("!simplify").unwrap(), "NaN");
    }

    #[test]
    fn differentiate_replaces_current() {
        let mut session = Session::default();
        session.run("x * x").unwrap();
        session.run("!d/dx").unwrap();
        assert_eq!(session.run("!simplify x=3").unwrap(), "6.0");
    }
}
