//! Definition of the variable module
//!
//! A `Value` is the state of a single random variable and an `Assignment` is the state of every
//! variable in a `Network` at one point of the Markov chain.

use crate::util::{GibbsError, Result};

use indexmap::IndexMap;

use std::fmt;
use std::iter::FromIterator;


/// The value held by a random variable.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {

    /// A discrete label, e.g. `"True"`
    Label(String),

    /// A real number. Binary variables hold `1.0` or `0.0`.
    Real(f64)
}

impl Value {

    /// Get the real value, if this is a `Value::Real`
    pub fn as_real(&self) -> Option<f64> {
        match *self {
            Value::Real(x) => Some(x),
            Value::Label(_) => None
        }
    }

    /// Get the label, if this is a `Value::Label`
    pub fn as_label(&self) -> Option<&str> {
        match *self {
            Value::Label(ref s) => Some(s.as_str()),
            Value::Real(_) => None
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match *self {
            Value::Label(_) => "label",
            Value::Real(_) => "real"
        }
    }
}

impl fmt::Display for Value {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Label(ref s) => write!(f, "{}", s),
            Value::Real(x) => write!(f, "{}", x)
        }
    }

}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Label(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Label(s)
    }
}


/// An `Assignment` maps variable names to their `Value`s. Insertion order is preserved, so an
/// `Assignment` built by a sweep lists variables in the network's registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: IndexMap<String, Value>
}

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Get the value assigned to `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Assign `value` to `name`, returning the previous value if there was one.
    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value> {
        self.values.insert(String::from(name), value.into())
    }

    /// Check whether `name` has a value
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The assigned variable names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A copy of this `Assignment` with `name` set to `value`. The receiver is left untouched.
    pub fn with<V: Into<Value>>(&self, name: &str, value: V) -> Self {
        let mut other = self.clone();
        other.set(name, value);
        other
    }

    /// Get the real value assigned to `name`.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if `name` is not assigned
    /// * `GibbsError::TypeMismatch` if `name` holds a label
    pub fn real(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(&Value::Real(x)) => Ok(x),
            Some(v) => Err(mismatch(name, "real", v)),
            None => Err(GibbsError::MissingValue(String::from(name)))
        }
    }

    /// Get the label assigned to `name`.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if `name` is not assigned
    /// * `GibbsError::TypeMismatch` if `name` holds a real
    pub fn label(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(&Value::Label(ref s)) => Ok(s.as_str()),
            Some(v) => Err(mismatch(name, "label", v)),
            None => Err(GibbsError::MissingValue(String::from(name)))
        }
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> GibbsError {
    GibbsError::TypeMismatch { name: String::from(name), expected, found: found.kind() }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut a = Assignment::new();
        a.extend(iter);
        a
    }

}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Assignment {

    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.values.insert(k.into(), v.into());
        }
    }

}
