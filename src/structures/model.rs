//! Models, as returned by a solver, and the structures used to read them.
//!
//! A [Model] is an ordered list of bindings from a variable name to the *printed* value of the variable.
//! Values are printed as the solver's pretty-printer would print them, so a negative integer `-n` is printed `(- n)`.
//! Reading printed values back into integers is the business of the [canonicaliser](crate::sampler::canonical).

use num_bigint::BigInt;
use num_traits::Signed;

/// The value of a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Int(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "true"),
            Self::Bool(false) => write!(f, "false"),
            Self::Int(n) if n.is_negative() => write!(f, "(- {})", n.abs()),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Bindings of variable names to printed values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    bindings: Vec<(String, String)>,
}

impl Model {
    /// Appends a binding, without checking for an existing binding of the name.
    pub fn push(&mut self, name: impl Into<String>, value: impl std::fmt::Display) {
        self.bindings.push((name.into(), value.to_string()));
    }

    /// Binds `name` to `value`, replacing any existing binding of `name`.
    pub fn bind(&mut self, name: impl Into<String>, value: impl std::fmt::Display) {
        let name = name.into();
        let value = value.to_string();
        match self.bindings.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in &self.bindings {
            write!(f, "{name}:{value};")?;
        }
        Ok(())
    }
}

/// A transient assumption that the named variable takes the given value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    pub value: BigInt,
}

/// A fixed order on the visible variables of a formula.
///
/// Names are sorted lexicographically, so the order depends only on the set of names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarOrder {
    names: Vec<String>,
}

impl VarOrder {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut names = names.into_iter().collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        VarOrder { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
