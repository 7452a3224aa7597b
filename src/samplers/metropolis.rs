//! Defines a Metropolis-within-Gibbs sampler for networks of continuous, binary and discrete
//! variables.

use crate::model::Network;
use crate::table::SampleTable;
use crate::util::Result;
use crate::variable::Assignment;
use super::chain::{initial_value, Chain};
use super::{check_names, SamplerConfig};

use log::{info, trace};
use rand::rngs::StdRng;


/// Samples the posterior of a network given evidence. Continuous nodes take Metropolis steps,
/// binary and discrete nodes are drawn from their full conditionals.
///
/// The first `burn_in` sweeps are discarded and the following `n_samples` sweeps are returned.
pub struct MetropolisSampler<'a> {

    network: &'a Network,

    /// The number of sweeps to record
    n_samples: usize,

    /// The number of sweeps to discard first
    burn_in: usize,

    rng: StdRng

}

impl<'a> MetropolisSampler<'a> {

    pub fn new(network: &'a Network, n_samples: usize, burn_in: usize) -> Self {
        let config = SamplerConfig::default().with_samples(n_samples).with_burn_in(burn_in);
        MetropolisSampler::from_config(network, &config)
    }

    pub fn from_config(network: &'a Network, config: &SamplerConfig) -> Self {
        MetropolisSampler {
            network,
            n_samples: config.n_samples,
            burn_in: config.burn_in,
            rng: config.rng()
        }
    }

    /// Reseed the sampler so that subsequent estimates are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SamplerConfig::default().with_seed(seed).rng();
        self
    }


    /// Sample the posterior given `observed`.
    ///
    /// # Args
    /// * `observed`: the evidence, held fixed on every sweep
    /// * `starting`: optional starting values for unobserved variables. Variables given neither
    ///   an observation nor a starting value are warm-started from their `Distribution`.
    ///
    /// # Returns
    /// the `n_samples` sweeps recorded after burn-in, with one column per network variable
    ///
    /// # Errors
    /// * `GibbsError::UnknownVariable` if an observed or starting variable is not in the network
    /// * `GibbsError::Initialization` if a warm start never reaches its node's support
    /// * any error raised while sweeping
    pub fn estimate(&mut self, observed: &Assignment, starting: Option<&Assignment>) -> Result<SampleTable> {
        check_names(self.network, observed.names())?;
        if let Some(starting) = starting {
            check_names(self.network, starting.names())?;
        }

        info!(
            "metropolis: {} burn-in and {} recorded sweeps over {} variables ({} observed)",
            self.burn_in, self.n_samples, self.network.len(), observed.len()
        );

        let initial = self.initial_state(observed, starting)?;
        let mut chain = Chain::new(self.network, observed.clone(), initial, &mut self.rng);

        chain.burn_in(self.burn_in)?;
        info!("metropolis: burn-in finished");

        let table = chain.record(self.n_samples)?;

        assert_eq!(table.shape(), (self.n_samples, self.network.len()));
        info!("metropolis: sampling completed");

        Ok(table)
    }


    fn initial_state(&mut self, observed: &Assignment, starting: Option<&Assignment>) -> Result<Assignment> {
        let mut state = Assignment::new();

        for node in self.network.nodes() {
            let name = node.name();

            let value = match observed.get(name).or_else(|| starting.and_then(|s| s.get(name))) {
                Some(v) => v.clone(),
                None => {
                    let v = initial_value(node, &mut self.rng)?;
                    trace!("metropolis: initial value {} = {}", name, v);
                    v
                }
            };
            state.set(name, value);
        }

        Ok(state)
    }
}
