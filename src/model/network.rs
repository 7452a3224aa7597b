//! Defines a `Network`, a Bayesian network whose nodes hold their own local conditional models.
//!
//! # Representation
//! Nodes are held in an arena keyed by name, in registration order. Edges are stored by name on
//! both endpoints, so the graph never owns a `Node` twice. The registration order is the sweep
//! order of the samplers.

use crate::util::{GibbsError, Result};
use crate::variable::Assignment;
use super::Node;

use indexmap::IndexMap;
use rand::Rng;

use std::collections::HashSet;


#[derive(Clone, Debug, Default)]
pub struct Network {

    /// The nodes of the `Network`, in registration order
    nodes: IndexMap<String, Node>

}

impl Network {

    /// Construct an empty `Network`
    pub fn new() -> Self {
        Network { nodes: IndexMap::new() }
    }


    /// Register a new `Node`.
    ///
    /// # Errors
    /// * `GibbsError::DuplicateNode` if a node with the same name is already registered
    pub fn add_node<N: Into<Node>>(&mut self, node: N) -> Result<()> {
        let node = node.into();

        if self.nodes.contains_key(node.name()) {
            return Err(GibbsError::DuplicateNode(String::from(node.name())));
        }

        self.nodes.insert(String::from(node.name()), node);
        Ok(())
    }


    /// Add the edge `parent -> child`. Acyclicity is not checked.
    ///
    /// # Errors
    /// * `GibbsError::UnknownNode` if either endpoint is not registered
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        for name in [parent, child] {
            if !self.nodes.contains_key(name) {
                return Err(GibbsError::UnknownNode(String::from(name)));
            }
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.add_child(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.add_parent(parent);
        }

        Ok(())
    }


    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Lookup a `Node` by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Lookup a `Node` by name, failing with `GibbsError::UnknownNode` if it is not registered
    pub fn get(&self, name: &str) -> Result<&Node> {
        self.nodes.get(name).ok_or_else(|| GibbsError::UnknownNode(String::from(name)))
    }

    /// The names of all nodes, in registration order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// All nodes, in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn parents(&self, name: &str) -> Result<&[String]> {
        self.get(name).map(|n| n.parents())
    }

    pub fn children(&self, name: &str) -> Result<&[String]> {
        self.get(name).map(|n| n.children())
    }


    /// The Markov blanket of `name`: its parents, its children, and its children's other parents,
    /// in registration order.
    pub fn markov_blanket(&self, name: &str) -> Result<Vec<&str>> {
        let node = self.get(name)?;

        let mut blanket: HashSet<&str> = node.parents().iter().map(|s| s.as_str()).collect();
        for child in node.children() {
            blanket.insert(child.as_str());
            blanket.extend(self.get(child)?.parents().iter().map(|s| s.as_str()));
        }
        blanket.remove(name);

        Ok(self.nodes.keys().map(|k| k.as_str()).filter(|k| blanket.contains(k)).collect())
    }


    /// The log-probability of a full assignment: the sum of every node's log-likelihood.
    pub fn log_joint(&self, assignment: &Assignment) -> Result<f64> {
        self.nodes.values()
                  .map(|n| n.log_likelihood(assignment))
                  .sum()
    }


    /// Run one sweep of the chain.
    ///
    /// Nodes are visited in registration order. An observed node is set to its observed value;
    /// every other node is resampled against the assignment as it stands at that point, so nodes
    /// visited earlier in this sweep contribute their new values.
    ///
    /// # Args
    /// * `assignment`: the state at the start of the sweep, holding a value for every node. It is
    ///   not modified.
    /// * `observed`: the evidence
    ///
    /// # Returns
    /// a new `Assignment` with the same variables as `assignment`
    ///
    /// # Errors
    /// * `GibbsError::NoPriorSample` if a node has no value in `assignment`
    /// * any error raised while resampling a node
    pub fn run_sweep<R: Rng>(&self, assignment: &Assignment, observed: &Assignment, rng: &mut R) -> Result<Assignment> {
        if let Some(name) = self.nodes.keys().find(|k| !assignment.contains(k.as_str())) {
            return Err(GibbsError::NoPriorSample(name.clone()));
        }

        let mut sampled = assignment.clone();

        for (name, node) in self.nodes.iter() {
            let value = match observed.get(name) {
                Some(v) => v.clone(),
                None => node.resample(self, &sampled, rng)?
            };

            sampled.set(name, value);
        }

        Ok(sampled)
    }
}


/// An implementation of the [builder pattern] for creating a `Network`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct NetworkBuilder {

    network: Network,

    /// The error state of the builder
    err: Option<GibbsError>

}

impl NetworkBuilder {

    /// Construct a new `NetworkBuilder` representing an empty `Network`
    pub fn new() -> Self {
        NetworkBuilder { network: Network::new(), err: None }
    }

    /// Add a node to the `Network`
    pub fn with_node<N: Into<Node>>(mut self, node: N) -> Self {
        if self.err.is_none() {
            self.err = self.network.add_node(node).err();
        }
        self
    }

    /// Add the edge `parent -> child`. Both nodes must already have been added.
    pub fn with_edge(mut self, parent: &str, child: &str) -> Self {
        if self.err.is_none() {
            self.err = self.network.add_edge(parent, child).err();
        }
        self
    }

    /// Complete building the network.
    ///
    /// # Returns
    /// the `Network`, or the first error generated during the building process
    pub fn build(self) -> Result<Network> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(self.network)
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        NetworkBuilder::new()
    }
}
