//! Defines the `Chain`: the state of one Markov chain over a `Network`.

use crate::distribution::Distribution;
use crate::model::{Network, Node};
use crate::table::SampleTable;
use crate::util::{GibbsError, Result};
use crate::variable::{Assignment, Value};
use super::Sampler;

use log::debug;
use rand::Rng;

/// Upper bound on proposal draws while looking for an in-support starting value
const MAX_WARM_START_DRAWS: usize = 100_000;

/// Binary nodes have no candidate variance of their own
const BINARY_WARM_START_VARIANCE: f64 = 1.0;


/// A single Markov chain. Each call to `sample` runs one sweep of the `Network`, replacing the
/// current assignment with a fresh one.
pub struct Chain<'a, R: Rng> {

    network: &'a Network,

    /// Values held fixed on every sweep
    observed: Assignment,

    /// The assignment produced by the latest sweep
    state: Assignment,

    rng: R

}

impl<'a, R: Rng> Chain<'a, R> {

    /// Start a chain at `initial`. Observed variables are held at their values in `observed`.
    pub fn new(network: &'a Network, observed: Assignment, initial: Assignment, rng: R) -> Self {
        Chain { network, observed, state: initial, rng }
    }

    /// The current state of the chain
    pub fn state(&self) -> &Assignment {
        &self.state
    }

    /// Advance the chain by one sweep
    pub fn step(&mut self) -> Result<()> {
        self.state = self.network.run_sweep(&self.state, &self.observed, &mut self.rng)?;
        Ok(())
    }


    /// Run `n` sweeps, discarding their results
    pub fn burn_in(&mut self, n: usize) -> Result<()> {
        for i in 0..n {
            self.step()?;
            progress("burn-in", i, n);
        }
        Ok(())
    }


    /// Run `n` sweeps, recording each resulting assignment as a row of a `SampleTable` whose
    /// columns are the network's variables.
    pub fn record(&mut self, n: usize) -> Result<SampleTable> {
        let mut table = SampleTable::with_capacity(self.network.node_names(), n);

        for i in 0..n {
            self.step()?;
            table.push(&self.state)?;
            progress("sampling", i, n);
        }

        Ok(table)
    }
}

impl<'a, R: Rng> Sampler for Chain<'a, R> {

    fn sample(&mut self) -> Result<Assignment> {
        self.step()?;
        Ok(self.state.clone())
    }

}


/// Log progress at every fifth of a run of `total` sweeps
fn progress(phase: &str, i: usize, total: usize) {
    let fifth = (total / 5).max(1);

    if (i + 1) % fifth == 0 {
        debug!("{}: {}% done", phase, (i + 1) * 100 / total);
    }
}


/// Find a starting value for a node by repeatedly applying its proposal rule, starting at 0.0,
/// until the value lands inside the distribution's support.
///
/// # Errors
/// * `GibbsError::Initialization` if no in-support value is found
pub fn warm_start<R: Rng>(name: &str, distribution: &Distribution, variance: f64, rng: &mut R) -> Result<f64> {
    let mut value = 0.0;

    for _ in 0..MAX_WARM_START_DRAWS {
        if distribution.in_support(value) {
            return Ok(value);
        }
        value = distribution.propose(value, variance, rng);
    }

    Err(GibbsError::Initialization(String::from(name)))
}


/// A starting value for `node`: a uniform draw over the domain of a discrete node, otherwise
/// the `warm_start` of its `Distribution`.
pub fn initial_value<R: Rng>(node: &Node, rng: &mut R) -> Result<Value> {
    match *node {
        Node::Discrete(ref n) => {
            let vals = n.possible_vals();
            Ok(Value::Label(vals[rng.random_range(0..vals.len())].clone()))
        },
        Node::Continuous(ref n) => {
            warm_start(node.name(), n.distribution(), n.candidate_var(), rng).map(Value::Real)
        },
        Node::Binary(ref n) => {
            warm_start(node.name(), n.distribution(), BINARY_WARM_START_VARIANCE, rng).map(Value::Real)
        }
    }
}
