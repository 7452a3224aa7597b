//! Approximate posterior inference over Bayesian networks by Gibbs sampling.
//!
//! Networks mix three kinds of node: discrete nodes with labelled domains and conditional
//! probability tables, continuous nodes following a parametric `Distribution` whose parameters may
//! depend on other variables, and binary nodes taking the values 1 and 0. Discrete queries are
//! answered by `GibbsSampler`; networks with continuous nodes are sampled by `MetropolisSampler`.

pub mod distribution;
pub mod model;
pub mod samplers;
pub mod table;
pub mod util;
pub mod variable;

pub use distribution::{Distribution, Param};
pub use model::{BinaryNode, ContinuousNode, DiscreteNode, Network, NetworkBuilder, Node};
pub use samplers::{Chain, GibbsSampler, MetropolisSampler, Sampler, SamplerConfig};
pub use table::{Marginal, SampleTable};
pub use util::{GibbsError, Result};
pub use variable::{Assignment, Value};
