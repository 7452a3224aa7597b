//! Defines the `Error` type for the gibbsnet library, along with small numeric helpers shared by
//! the samplers.

use itertools::Itertools;
use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, GibbsError>;

#[derive(Debug, Error)]
pub enum GibbsError {

    /// A node with the same name was already registered in the `Network`
    #[error("node `{0}` already exists in the network")]
    DuplicateNode(String),

    /// An edge referenced a node that was never registered
    #[error("cannot add an edge involving unknown node `{0}`")]
    UnknownNode(String),

    /// A query, observation or starting value referenced a variable that is not in the network
    #[error("variable `{0}` is not in the network")]
    UnknownVariable(String),

    /// A discrete node has no conditional probability row for the realized parent values
    #[error("node `{node}` has no conditional probabilities for parent values ({})", .parents.iter().join(", "))]
    UndefinedConditional { node: String, parents: Vec<String> },

    /// A required value or parameter is absent from the assignment
    #[error("could not find a value for `{0}` in the assignment")]
    MissingValue(String),

    /// A continuous node was asked to resample without a previous value
    #[error("no previous sample found for node `{0}`")]
    NoPriorSample(String),

    /// A discrete node holds a value outside its domain
    #[error("`{value}` is not a possible value of node `{node}`")]
    UnknownValue { node: String, value: String },

    /// A value held the wrong variant (a label where a real was required, or vice versa)
    #[error("variable `{name}` holds a {found} value where a {expected} value was required")]
    TypeMismatch { name: String, expected: &'static str, found: &'static str },

    /// A conditional probability table that can never be evaluated correctly
    #[error("malformed conditional probabilities for node `{node}`: {reason}")]
    MalformedConditional { node: String, reason: String },

    /// Proposal variance that is not finite and strictly positive
    #[error("invalid candidate variance {variance} for node `{node}`")]
    InvalidProposal { node: String, variance: f64 },

    /// Every candidate value of a node was given zero weight
    #[error("every candidate value of node `{0}` has zero probability")]
    ZeroWeight(String),

    /// A marginal was requested for a node without a finite domain
    #[error("node `{0}` is not discrete")]
    NotDiscrete(String),

    /// The warm start never produced a value inside the node's support
    #[error("could not draw an initial value for node `{0}` inside its support")]
    Initialization(String),

    /// Exporting a sample table to an array failed
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

}


/// Normalize a vector of non-negative weights so that it sums to one.
///
/// # Errors
/// * `GibbsError::ZeroWeight` if the weights do not have a positive, finite sum. The error names
///   `node`, the variable the weights were computed for.
pub fn normalize(node: &str, weights: &[f64]) -> Result<Vec<f64>> {
    let total: f64 = weights.iter().sum();

    if !(total.is_finite() && total > 0.0) {
        return Err(GibbsError::ZeroWeight(String::from(node)));
    }

    Ok(weights.iter().map(|w| w / total).collect())
}


/// Turn log-weights into relative weights, shifting by the maximum so the largest weight is one.
pub fn exp_shifted(log_weights: &[f64]) -> Vec<f64> {
    let max = log_weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if max == f64::NEG_INFINITY || max.is_nan() {
        return vec![0.0; log_weights.len()];
    }

    log_weights.iter().map(|lw| (lw - max).exp()).collect()
}
