//! Defines the `Node`s of a `Network` and how each one is resampled from its Markov blanket.
//!
//! A `DiscreteNode` is resampled exactly from its full conditional (Koller & Friedman 12.3.3),
//! a `BinaryNode` likewise but from its `Distribution`'s log-likelihoods, and a `ContinuousNode`
//! by a single Metropolis step.

use crate::distribution::Distribution;
use crate::util::{exp_shifted, normalize, GibbsError, Result};
use crate::variable::{Assignment, Value};
use super::Network;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution as _;
use rand::Rng;

use std::collections::{HashMap, HashSet};


/// The domain of a `BinaryNode`, in the order its candidates are weighed
const BINARY_DOMAIN: [f64; 2] = [1.0, 0.0];


/// A random variable in a `Network`
#[derive(Clone, Debug)]
pub enum Node {

    /// A variable over a finite set of labels with a conditional probability table
    Discrete(DiscreteNode),

    /// A real-valued variable updated by Metropolis steps
    Continuous(ContinuousNode),

    /// A `{1, 0}` variable whose likelihood comes from a `Distribution`
    Binary(BinaryNode)
}


#[derive(Clone, Debug)]
pub struct DiscreteNode {
    name: String,

    possible_vals: Vec<String>,

    /// Parent labels, in parent-registration order, to weights aligned with `possible_vals`
    conditional_probs: HashMap<Vec<String>, Vec<f64>>,

    parents: Vec<String>,
    children: Vec<String>
}


#[derive(Clone, Debug)]
pub struct ContinuousNode {
    name: String,
    distribution: Distribution,

    /// The variance of the Gaussian proposal
    candidate_var: f64,

    parents: Vec<String>,
    children: Vec<String>
}


#[derive(Clone, Debug)]
pub struct BinaryNode {
    name: String,
    distribution: Distribution,
    parents: Vec<String>,
    children: Vec<String>
}


impl DiscreteNode {

    /// Construct a new `DiscreteNode`.
    ///
    /// # Args
    /// * `name`: the name of the variable
    /// * `possible_vals`: the labels the variable may take, in order
    /// * `conditional_probs`: pairs of (parent labels, weights). Parent labels are listed in the
    ///   order the parent edges will be added; weights are aligned with `possible_vals` and need
    ///   not sum to one.
    ///
    /// # Errors
    /// * `GibbsError::MalformedConditional` if the domain is empty or has repeated labels, if a
    ///   weight vector does not have one entry per possible value, or if a weight is negative or
    ///   not finite
    pub fn new<I, K, S>(name: &str, possible_vals: &[&str], conditional_probs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<f64>)>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let malformed = |reason: String| GibbsError::MalformedConditional {
            node: String::from(name),
            reason
        };

        if possible_vals.is_empty() {
            return Err(malformed(String::from("no possible values")));
        }

        let distinct: HashSet<&str> = possible_vals.iter().cloned().collect();
        if distinct.len() != possible_vals.len() {
            return Err(malformed(String::from("repeated possible values")));
        }

        let mut table = HashMap::new();
        for (parents, probs) in conditional_probs {
            let parents: Vec<String> = parents.into_iter().map(Into::into).collect();

            if probs.len() != possible_vals.len() {
                return Err(malformed(format!(
                    "{} probabilities given for parent values {:?}, expected {}",
                    probs.len(), parents, possible_vals.len()
                )));
            }

            if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(malformed(format!("invalid probability for parent values {:?}", parents)));
            }

            table.insert(parents, probs);
        }

        Ok(DiscreteNode {
            name: String::from(name),
            possible_vals: possible_vals.iter().map(|s| String::from(*s)).collect(),
            conditional_probs: table,
            parents: Vec::new(),
            children: Vec::new()
        })
    }


    /// Construct a `DiscreteNode` without parents, with prior weights `probs`
    pub fn root(name: &str, possible_vals: &[&str], probs: Vec<f64>) -> Result<Self> {
        DiscreteNode::new(name, possible_vals, vec![(Vec::<String>::new(), probs)])
    }


    pub fn possible_vals(&self) -> &[String] {
        &self.possible_vals
    }


    /// Get the weights for the given parent labels, if the table has them
    pub fn conditional(&self, parents: &[&str]) -> Option<&[f64]> {
        let key: Vec<String> = parents.iter().map(|s| String::from(*s)).collect();
        self.conditional_probs.get(&key).map(|v| v.as_slice())
    }


    /// The table entry for this node's value given its parents' values in `assignment`.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if this node or a parent is not assigned
    /// * `GibbsError::TypeMismatch` if one of them holds a real
    /// * `GibbsError::UnknownValue` if this node holds a label outside `possible_vals`
    /// * `GibbsError::UndefinedConditional` if the table has no row for the parent labels
    pub fn local_probability(&self, assignment: &Assignment) -> Result<f64> {
        let my_val = assignment.label(&self.name)?;
        let idx = self.possible_vals.iter().position(|v| v == my_val).ok_or_else(|| {
            GibbsError::UnknownValue { node: self.name.clone(), value: String::from(my_val) }
        })?;

        let parent_vals = self.parents
            .iter()
            .map(|p| assignment.label(p).map(String::from))
            .collect::<Result<Vec<String>>>()?;

        match self.conditional_probs.get(&parent_vals) {
            Some(probs) => Ok(probs[idx]),
            None => Err(GibbsError::UndefinedConditional { node: self.name.clone(), parents: parent_vals })
        }
    }


    /// The log of the unnormalized full conditional of this node: for each possible value, the
    /// log of its own table entry plus the log-likelihood each child assigns to its own value.
    pub fn blanket_log_weights(&self, network: &Network, assignment: &Assignment) -> Result<Vec<f64>> {
        let mut log_weights = Vec::with_capacity(self.possible_vals.len());

        for val in self.possible_vals.iter() {
            let hypothetical = assignment.with(&self.name, val.as_str());

            let mut lw = self.local_probability(&hypothetical)?.ln();
            for child in self.children.iter() {
                lw += network.get(child)?.log_likelihood(&hypothetical)?;
            }

            log_weights.push(lw);
        }

        Ok(log_weights)
    }


    /// The full conditional of this node up to a constant, scaled so the largest weight is one.
    /// Children far in the tail of every candidate do not underflow the weights to zero.
    pub fn blanket_weights(&self, network: &Network, assignment: &Assignment) -> Result<Vec<f64>> {
        Ok(exp_shifted(&self.blanket_log_weights(network, assignment)?))
    }


    /// Draw a new value for this node from its full conditional given `assignment`
    pub fn resample<R: Rng>(&self, network: &Network, assignment: &Assignment, rng: &mut R) -> Result<Value> {
        let weights = self.blanket_weights(network, assignment)?;
        let idx = categorical(&self.name, &weights, rng)?;

        Ok(Value::Label(self.possible_vals[idx].clone()))
    }
}


impl ContinuousNode {

    /// Construct a new `ContinuousNode`.
    ///
    /// # Errors
    /// * `GibbsError::InvalidProposal` if `candidate_var` is not finite and strictly positive
    pub fn new(name: &str, distribution: Distribution, candidate_var: f64) -> Result<Self> {
        if !(candidate_var.is_finite() && candidate_var > 0.0) {
            return Err(GibbsError::InvalidProposal { node: String::from(name), variance: candidate_var });
        }

        Ok(ContinuousNode {
            name: String::from(name),
            distribution,
            candidate_var,
            parents: Vec::new(),
            children: Vec::new()
        })
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn candidate_var(&self) -> f64 {
        self.candidate_var
    }


    /// One Metropolis step: propose a candidate around the current value and accept it with
    /// probability `min(1, L(candidate) / L(current))`, where `L` is the likelihood of this node
    /// and all of its children.
    ///
    /// # Errors
    /// * `GibbsError::NoPriorSample` if this node has no value in `assignment`
    /// * any error from evaluating the likelihoods
    pub fn resample<R: Rng>(&self, network: &Network, assignment: &Assignment, rng: &mut R) -> Result<Value> {
        let previous = match assignment.get(&self.name) {
            Some(&Value::Real(x)) => x,
            Some(other) => {
                return Err(GibbsError::TypeMismatch {
                    name: self.name.clone(),
                    expected: "real",
                    found: other.kind()
                });
            },
            None => return Err(GibbsError::NoPriorSample(self.name.clone()))
        };

        let current_ll = blanket_log_likelihood(&self.name, &self.distribution, &self.children, network, assignment)?;

        let candidate = self.distribution.propose(previous, self.candidate_var, rng);
        let candidate_assignment = assignment.with(&self.name, candidate);
        let candidate_ll = blanket_log_likelihood(
            &self.name, &self.distribution, &self.children, network, &candidate_assignment
        )?;

        let u: f64 = rng.random();
        if u.ln() < candidate_ll - current_ll {
            Ok(Value::Real(candidate))
        } else {
            Ok(Value::Real(previous))
        }
    }
}


impl BinaryNode {

    pub fn new(name: &str, distribution: Distribution) -> Self {
        BinaryNode {
            name: String::from(name),
            distribution,
            parents: Vec::new(),
            children: Vec::new()
        }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }


    /// Draw a new value in `{1, 0}` for this node. Each candidate is weighed by the exponent of
    /// the summed log-likelihood of this node and its children.
    pub fn resample<R: Rng>(&self, network: &Network, assignment: &Assignment, rng: &mut R) -> Result<Value> {
        let log_weights = BINARY_DOMAIN
            .iter()
            .map(|&val| {
                let hypothetical = assignment.with(&self.name, val);
                blanket_log_likelihood(&self.name, &self.distribution, &self.children, network, &hypothetical)
            })
            .collect::<Result<Vec<f64>>>()?;

        let idx = categorical(&self.name, &exp_shifted(&log_weights), rng)?;

        Ok(Value::Real(BINARY_DOMAIN[idx]))
    }
}


impl Node {

    /// Get the name of the `Node`
    pub fn name(&self) -> &str {
        match *self {
            Node::Discrete(ref n) => &n.name,
            Node::Continuous(ref n) => &n.name,
            Node::Binary(ref n) => &n.name
        }
    }

    /// The parents of this `Node`, in the order their edges were added
    pub fn parents(&self) -> &[String] {
        match *self {
            Node::Discrete(ref n) => &n.parents,
            Node::Continuous(ref n) => &n.parents,
            Node::Binary(ref n) => &n.parents
        }
    }

    /// The children of this `Node`, in the order their edges were added
    pub fn children(&self) -> &[String] {
        match *self {
            Node::Discrete(ref n) => &n.children,
            Node::Continuous(ref n) => &n.children,
            Node::Binary(ref n) => &n.children
        }
    }

    /// The finite set of values this `Node` may take, or `None` for a continuous node
    pub fn domain(&self) -> Option<Vec<Value>> {
        match *self {
            Node::Discrete(ref n) => {
                Some(n.possible_vals.iter().map(|v| Value::Label(v.clone())).collect())
            },
            Node::Binary(_) => Some(BINARY_DOMAIN.iter().map(|&v| Value::Real(v)).collect()),
            Node::Continuous(_) => None
        }
    }

    /// The `Distribution` of a continuous or binary node
    pub fn distribution(&self) -> Option<&Distribution> {
        match *self {
            Node::Discrete(_) => None,
            Node::Continuous(ref n) => Some(&n.distribution),
            Node::Binary(ref n) => Some(&n.distribution)
        }
    }


    /// The likelihood of this node's value given its parents' values
    pub fn likelihood(&self, assignment: &Assignment) -> Result<f64> {
        match *self {
            Node::Discrete(ref n) => n.local_probability(assignment),
            _ => self.log_likelihood(assignment).map(f64::exp)
        }
    }

    /// The log-likelihood of this node's value given its parents' values
    pub fn log_likelihood(&self, assignment: &Assignment) -> Result<f64> {
        match *self {
            Node::Discrete(ref n) => n.local_probability(assignment).map(f64::ln),
            Node::Continuous(ref n) => n.distribution.log_likelihood(&n.name, assignment),
            Node::Binary(ref n) => n.distribution.log_likelihood(&n.name, assignment)
        }
    }


    /// Draw a new value for this node given every other variable in `assignment`
    pub fn resample<R: Rng>(&self, network: &Network, assignment: &Assignment, rng: &mut R) -> Result<Value> {
        match *self {
            Node::Discrete(ref n) => n.resample(network, assignment, rng),
            Node::Continuous(ref n) => n.resample(network, assignment, rng),
            Node::Binary(ref n) => n.resample(network, assignment, rng)
        }
    }


    pub(crate) fn add_parent(&mut self, parent: &str) {
        match *self {
            Node::Discrete(ref mut n) => n.parents.push(String::from(parent)),
            Node::Continuous(ref mut n) => n.parents.push(String::from(parent)),
            Node::Binary(ref mut n) => n.parents.push(String::from(parent))
        }
    }

    pub(crate) fn add_child(&mut self, child: &str) {
        match *self {
            Node::Discrete(ref mut n) => n.children.push(String::from(child)),
            Node::Continuous(ref mut n) => n.children.push(String::from(child)),
            Node::Binary(ref mut n) => n.children.push(String::from(child))
        }
    }
}

impl From<DiscreteNode> for Node {
    fn from(n: DiscreteNode) -> Self {
        Node::Discrete(n)
    }
}

impl From<ContinuousNode> for Node {
    fn from(n: ContinuousNode) -> Self {
        Node::Continuous(n)
    }
}

impl From<BinaryNode> for Node {
    fn from(n: BinaryNode) -> Self {
        Node::Binary(n)
    }
}


/// Log-likelihood of `name` under `distribution` plus the log-likelihood of each child
fn blanket_log_likelihood(
    name: &str,
    distribution: &Distribution,
    children: &[String],
    network: &Network,
    assignment: &Assignment,
) -> Result<f64> {
    let mut ll = distribution.log_likelihood(name, assignment)?;

    for child in children.iter() {
        ll += network.get(child)?.log_likelihood(assignment)?;
    }

    Ok(ll)
}


/// Normalize `weights` and draw an index from the categorical distribution they define
fn categorical<R: Rng>(name: &str, weights: &[f64], rng: &mut R) -> Result<usize> {
    let probs = normalize(name, weights)?;
    let dist = WeightedIndex::new(&probs).map_err(|_| GibbsError::ZeroWeight(String::from(name)))?;

    Ok(dist.sample(rng))
}
