//! Defines the graphical model: the `Node`s of a Bayesian network and the `Network` that holds
//! them and runs sweeps over them.

mod network;
mod node;

pub use self::network::{Network, NetworkBuilder};
pub use self::node::{BinaryNode, ContinuousNode, DiscreteNode, Node};
