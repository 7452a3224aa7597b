//! Defines a Gibbs sampler for networks of discrete variables.
//!
//! Implementation of Koller & Friedman Algorithm 12.4, with marginals estimated as in 12.3.5.2:
//! the fraction of recorded sweeps holding each value.

use crate::model::Network;
use crate::table::{Marginal, SampleTable};
use crate::util::{GibbsError, Result};
use crate::variable::Assignment;
use super::chain::{initial_value, Chain};
use super::{check_names, SamplerConfig};

use log::info;
use rand::rngs::StdRng;
use rand::Rng;


/// Estimates marginal posteriors of discrete variables by Gibbs sampling.
///
/// The chain starts from a uniform draw over each unobserved variable's domain and every sweep
/// is recorded; there is no burn-in.
pub struct GibbsSampler<'a> {

    network: &'a Network,

    /// The number of sweeps to record
    n_samples: usize,

    rng: StdRng

}

impl<'a> GibbsSampler<'a> {

    pub fn new(network: &'a Network, n_samples: usize) -> Self {
        GibbsSampler::from_config(network, &SamplerConfig::default().with_samples(n_samples))
    }

    /// Construct a `GibbsSampler` from a `SamplerConfig`. The configured burn-in is not used.
    pub fn from_config(network: &'a Network, config: &SamplerConfig) -> Self {
        GibbsSampler { network, n_samples: config.n_samples, rng: config.rng() }
    }

    /// Reseed the sampler so that subsequent estimates are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SamplerConfig::default().with_seed(seed).rng();
        self
    }


    /// Estimate `P(q = v | observed)` for every query variable `q` and every value `v` in its
    /// domain.
    ///
    /// # Returns
    /// one `Marginal` per (query variable, value), grouped by query variable in the order given
    /// and by value in domain order
    ///
    /// # Errors
    /// * `GibbsError::UnknownVariable` if a query or observed variable is not in the network
    /// * `GibbsError::NotDiscrete` if a query variable has no finite domain
    /// * any error raised while sweeping
    pub fn estimate(&mut self, query: &[&str], observed: &Assignment) -> Result<Vec<Marginal>> {
        check_names(self.network, query.iter().cloned())?;

        let mut domains = Vec::with_capacity(query.len());
        for &name in query.iter() {
            let domain = self.network
                .get(name)?
                .domain()
                .ok_or_else(|| GibbsError::NotDiscrete(String::from(name)))?;
            domains.push((name, domain));
        }

        let table = self.estimate_table(observed)?;

        let mut marginals = Vec::new();
        for (name, domain) in domains {
            for value in domain {
                let probability = table.frequency(name, &value)?;
                marginals.push(Marginal { variable: String::from(name), value, probability });
            }
        }

        Ok(marginals)
    }


    /// Run the chain and return every recorded sweep.
    ///
    /// # Errors
    /// * `GibbsError::UnknownVariable` if an observed variable is not in the network
    pub fn estimate_table(&mut self, observed: &Assignment) -> Result<SampleTable> {
        check_names(self.network, observed.names())?;

        info!(
            "gibbs: recording {} sweeps over {} variables ({} observed)",
            self.n_samples, self.network.len(), observed.len()
        );

        let initial = self.initial_state(observed)?;
        let mut chain = Chain::new(self.network, observed.clone(), initial, &mut self.rng);
        let table = chain.record(self.n_samples)?;

        assert_eq!(table.shape(), (self.n_samples, self.network.len()));
        info!("gibbs: sampling completed");

        Ok(table)
    }


    /// Observed variables take their observed values; every other variable with a finite domain
    /// is drawn uniformly from it.
    fn initial_state(&mut self, observed: &Assignment) -> Result<Assignment> {
        let mut state = Assignment::new();

        for node in self.network.nodes() {
            let value = match (observed.get(node.name()), node.domain()) {
                (Some(v), _) => v.clone(),
                (None, Some(domain)) => domain[self.rng.random_range(0..domain.len())].clone(),
                (None, None) => initial_value(node, &mut self.rng)?
            };
            state.set(node.name(), value);
        }

        Ok(state)
    }
}
