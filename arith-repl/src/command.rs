use std::fmt;

/// A line of input to the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    /// An expression that becomes the current expression.
    Expression(&'a str),

    /// `!d/d<name>`: differentiate the current expression by `name`.
    Differentiate(&'a str),

    /// `!simplify name=value ...`: simplify the current expression under the given bindings.
    Simplify(Vec<(&'a str, f64)>),
}

/// A line starting with `!` that is not a known command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The command name is not recognized.
    Unknown(String),

    /// A `!simplify` binding is not of the form `name=value`.
    MalformedBinding(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(
                f,
                "unknown command `!{}`; expected `!d/d<variable>` or `!simplify name=value ...`",
                name,
            ),
            Self::MalformedBinding(binding) => write!(
                f,
                "malformed binding `{}`; expected `name=value`, such as `x=2`",
                binding,
            ),
        }
    }
}

/// Parses a single `name=value` binding. The name is validated later, when it is bound.
fn parse_binding(binding: &str) -> Result<(&str, f64), CommandError> {
    binding.split_once('=')
        .and_then(|(name, value)| Some((name, value.parse().ok()?)))
        .ok_or_else(|| CommandError::MalformedBinding(binding.to_string()))
}

impl<'a> Command<'a> {
    /// Parses a nonempty, trimmed line of input.
    pub fn parse(line: &'a str) -> Result<Self, CommandError> {
        let Some(command) = line.strip_prefix('!') else {
            return Ok(Self::Expression(line));
        };

        if let Some(variable) = command.strip_prefix("d/d") {
            return Ok(Self::Differentiate(variable));
        }

        let mut words = command.split_whitespace();
        match words.next() {
            Some("simplify") => words.map(parse_binding)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Simplify),
            _ => Err(CommandError::Unknown(command.to_string())),
        }
    }
}
