use std::collections::{hash_map, HashMap};
use super::expr::{ModelError, Number, Variable};

/// A set of variable bindings used to [`simplify`](super::simplify()) an expression.
///
/// Both parts of a binding are checked when it is added: the name must be a valid variable name,
/// and the value must be a valid [`Number`]. Binding a name again replaces its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<Variable, Number>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment from the given bindings. Fails on the first binding with an
    /// invalid name or value.
    pub fn from_bindings<I, K>(bindings: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut env = Self::new();
        for (name, value) in bindings {
            env.bind(name, value)?;
        }
        Ok(env)
    }

    /// Binds `name` to `value`, returning the value it was previously bound to, if any.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) -> Result<Option<Number>, ModelError> {
        let variable = Variable::new(name)?;
        let number = Number::new(value)?;
        Ok(self.bindings.insert(variable, number))
    }

    /// Binds `name` to `value`, returning the environment. Useful to build an environment in a
    /// single expression.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Result<Self, ModelError> {
        self.bind(name, value)?;
        Ok(self)
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<Number> {
        self.bindings.get(name).copied()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns an iterator over the bindings, in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, Variable, Number> {
        self.bindings.iter()
    }
}
