//! Parameters of a `Distribution`, resolved against the current `Assignment` on every evaluation.

use crate::util::Result;
use crate::variable::Assignment;

use std::fmt;
use std::sync::Arc;

/// A function of the whole assignment, e.g. a regression mean
pub type DerivedFn = dyn Fn(&Assignment) -> Result<f64> + Send + Sync;

#[derive(Clone)]
pub enum Param {

    /// A constant
    Literal(f64),

    /// The current value of another variable
    Variable(String),

    /// Computed from the full assignment
    Derived(Arc<DerivedFn>)
}

impl Param {

    /// Construct a `Param::Derived` from a closure
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Assignment) -> Result<f64> + Send + Sync + 'static,
    {
        Param::Derived(Arc::new(f))
    }

    /// Resolve the parameter against `assignment`.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if a referenced variable has no value
    /// * any error returned by a derived function
    pub fn resolve(&self, assignment: &Assignment) -> Result<f64> {
        match *self {
            Param::Literal(x) => Ok(x),
            Param::Variable(ref name) => assignment.real(name),
            Param::Derived(ref f) => f(assignment)
        }
    }
}

impl fmt::Debug for Param {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Param::Literal(x) => write!(f, "Literal({})", x),
            Param::Variable(ref name) => write!(f, "Variable({:?})", name),
            Param::Derived(_) => write!(f, "Derived(..)")
        }
    }

}

impl From<f64> for Param {
    fn from(x: f64) -> Self {
        Param::Literal(x)
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::Variable(String::from(name))
    }
}

impl From<String> for Param {
    fn from(name: String) -> Self {
        Param::Variable(name)
    }
}
