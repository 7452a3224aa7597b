//! Defines the `Sampler` trait - an object that can draw successive samples from a `Network` -
//! and the two samplers built on it.

use crate::model::Network;
use crate::util::{GibbsError, Result};
use crate::variable::Assignment;

use rand::rngs::StdRng;
use rand::SeedableRng;

mod chain;
mod gibbs;
mod metropolis;

pub use self::chain::{initial_value, warm_start, Chain};
pub use self::gibbs::GibbsSampler;
pub use self::metropolis::MetropolisSampler;


pub trait Sampler {

    /// Draw the next sample from the associated `Network`.
    fn sample(&mut self) -> Result<Assignment>;

}


/// Run-length and seeding options shared by the samplers.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerConfig {

    /// The number of sweeps recorded
    pub n_samples: usize,

    /// The number of sweeps discarded before recording
    pub burn_in: usize,

    /// Seed for the random number generator. Seeded from the OS when `None`.
    pub seed: Option<u64>

}

impl Default for SamplerConfig {

    fn default() -> Self {
        SamplerConfig { n_samples: 10_000, burn_in: 0, seed: None }
    }

}

impl SamplerConfig {

    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng()
        }
    }
}


/// Fail with `GibbsError::UnknownVariable` on the first name that is not in `network`
fn check_names<'n, I: IntoIterator<Item = &'n str>>(network: &Network, names: I) -> Result<()> {
    for name in names {
        if !network.contains(name) {
            return Err(GibbsError::UnknownVariable(String::from(name)));
        }
    }
    Ok(())
}


#[cfg(test)]
/// End-to-end tests of the samplers. Discrete scenarios are checked against exact posteriors
/// computed by enumerating every joint assignment of the network; continuous scenarios against
/// conjugate closed forms.
mod tests {
    use super::*;
    use crate::distribution::{Distribution, Param};
    use crate::model::{BinaryNode, ContinuousNode, DiscreteNode, NetworkBuilder, Node};
    use crate::variable::Value;

    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// The burglary/earthquake alarm network of Russell & Norvig
    fn build_alarm_example() -> Network {
        NetworkBuilder::new()
            .with_node(DiscreteNode::root("B", &["True", "False"], vec![0.001, 1.0 - 0.001]).unwrap())
            .with_node(DiscreteNode::root("E", &["True", "False"], vec![0.002, 1.0 - 0.002]).unwrap())
            .with_node(DiscreteNode::new("A", &["True", "False"], vec![
                (vec!["True", "True"], vec![0.95, 1.0 - 0.95]),
                (vec!["True", "False"], vec![0.94, 1.0 - 0.94]),
                (vec!["False", "True"], vec![0.29, 1.0 - 0.29]),
                (vec!["False", "False"], vec![0.001, 1.0 - 0.001]),
            ]).unwrap())
            .with_node(DiscreteNode::new("J", &["True", "False"], vec![
                (vec!["True"], vec![0.90, 1.0 - 0.90]),
                (vec!["False"], vec![0.05, 1.0 - 0.05]),
            ]).unwrap())
            .with_node(DiscreteNode::new("M", &["True", "False"], vec![
                (vec!["True"], vec![0.70, 1.0 - 0.70]),
                (vec!["False"], vec![0.01, 1.0 - 0.01]),
            ]).unwrap())
            .with_edge("B", "A")
            .with_edge("E", "A")
            .with_edge("A", "J")
            .with_edge("A", "M")
            .build()
            .unwrap()
    }

    /// A network of cravings, fast food, employment, money and retirement
    fn build_retirement_example() -> Network {
        NetworkBuilder::new()
            .with_node(DiscreteNode::root("C", &["True", "False"], vec![0.10, 0.90]).unwrap())
            .with_node(DiscreteNode::new("F", &["True", "False"], vec![
                (vec!["True"], vec![0.75, 0.25]),
                (vec!["False"], vec![0.07, 0.93]),
            ]).unwrap())
            .with_node(DiscreteNode::root("J", &["True", "False"], vec![0.88, 0.12]).unwrap())
            .with_node(DiscreteNode::new("M", &["True", "False"], vec![
                (vec!["True", "True"], vec![0.75, 0.25]),
                (vec!["True", "False"], vec![0.02, 0.98]),
                (vec!["False", "True"], vec![0.96, 0.04]),
                (vec!["False", "False"], vec![0.07, 0.93]),
            ]).unwrap())
            .with_node(DiscreteNode::new("R", &["True", "False"], vec![
                (vec!["True"], vec![0.98, 0.02]),
                (vec!["False"], vec![0.01, 0.99]),
            ]).unwrap())
            .with_edge("C", "F")
            .with_edge("F", "M")
            .with_edge("J", "M")
            .with_edge("M", "R")
            .build()
            .unwrap()
    }

    /// Exact `P(query = value | observed)` by summing the joint over every assignment
    fn enumerate(net: &Network, query: &str, value: &Value, observed: &Assignment) -> f64 {
        let names = net.node_names();
        let domains: Vec<Vec<Value>> = net.nodes().map(|n: &Node| n.domain().unwrap()).collect();

        let mut numerator = 0.0;
        let mut evidence = 0.0;

        for values in domains.into_iter().multi_cartesian_product() {
            let a: Assignment = names.iter().cloned().zip(values).collect();

            if observed.iter().any(|(k, v)| a.get(k) != Some(v)) {
                continue;
            }

            let p = net.log_joint(&a).unwrap().exp();
            evidence += p;
            if a.get(query) == Some(value) {
                numerator += p;
            }
        }

        numerator / evidence
    }

    fn probability_of(marginals: &[crate::table::Marginal], variable: &str, value: &str) -> f64 {
        marginals
            .iter()
            .find(|m| m.variable == variable && m.value == Value::from(value))
            .map(|m| m.probability)
            .unwrap()
    }

    #[test]
    fn alarm_exact_value() {
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "True"), ("M", "True")].into_iter().collect();

        let exact = enumerate(&net, "B", &Value::from("True"), &observed);
        assert_abs_diff_eq!(exact, 0.284, epsilon = 0.001);
    }

    #[test]
    fn alarm_burglary() {
        init_logging();
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "True"), ("M", "True")].into_iter().collect();

        let mut sampler = GibbsSampler::new(&net, 10_000).with_seed(2024);
        let marginals = sampler.estimate(&["B"], &observed).unwrap();

        assert_eq!(marginals.len(), 2);
        assert_abs_diff_eq!(probability_of(&marginals, "B", "True"), 0.284, epsilon = 0.03);
        assert_abs_diff_eq!(
            probability_of(&marginals, "B", "True") + probability_of(&marginals, "B", "False"),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn alarm_several_queries() {
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "True"), ("M", "True")].into_iter().collect();

        let mut sampler = GibbsSampler::new(&net, 10_000).with_seed(7);
        let marginals = sampler.estimate(&["A", "E"], &observed).unwrap();

        for name in ["A", "E"] {
            let exact = enumerate(&net, name, &Value::from("True"), &observed);
            assert_abs_diff_eq!(probability_of(&marginals, name, "True"), exact, epsilon = 0.03);
        }
    }

    #[test]
    fn retirement_matches_enumeration() {
        let net = build_retirement_example();
        let mut sampler = GibbsSampler::new(&net, 20_000).with_seed(11);

        let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
            ("C", vec![("M", "True")]),
            ("J", vec![("C", "False"), ("R", "False")]),
            ("M", vec![("R", "True"), ("F", "True")]),
        ];

        for (query, evidence) in cases {
            let observed: Assignment = evidence.into_iter().collect();
            let marginals = sampler.estimate(&[query], &observed).unwrap();
            let exact = enumerate(&net, query, &Value::from("True"), &observed);

            assert_abs_diff_eq!(probability_of(&marginals, query, "True"), exact, epsilon = 0.03);
        }
    }

    #[test]
    fn repeated_estimates_agree() {
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "True")].into_iter().collect();
        let mut sampler = GibbsSampler::new(&net, 10_000).with_seed(5);

        let first = sampler.estimate(&["A"], &observed).unwrap();
        let second = sampler.estimate(&["A"], &observed).unwrap();

        assert_abs_diff_eq!(
            probability_of(&first, "A", "True"),
            probability_of(&second, "A", "True"),
            epsilon = 0.03
        );
    }

    #[test]
    fn observed_values_never_change() {
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "False"), ("A", "True")].into_iter().collect();

        for n in [1, 10, 250] {
            let table = GibbsSampler::new(&net, n).with_seed(n as u64).estimate_table(&observed).unwrap();

            assert_eq!(table.shape(), (n, net.len()));
            for row in table.rows() {
                assert_eq!(row.label("J").unwrap(), "False");
                assert_eq!(row.label("A").unwrap(), "True");
            }
        }
    }

    /// K picks both the mean of Y and the success probability of the binary X
    fn build_mixed_example() -> Network {
        let mean = Param::derived(|a| Ok(if a.label("K")? == "a" { 0.0 } else { 1.0 }));
        let p = Param::derived(|a| Ok(if a.label("K")? == "a" { 0.9 } else { 0.2 }));

        NetworkBuilder::new()
            .with_node(DiscreteNode::root("K", &["a", "b"], vec![0.5, 0.5]).unwrap())
            .with_node(BinaryNode::new("X", Distribution::bernoulli(p)))
            .with_node(ContinuousNode::new("Y", Distribution::normal(mean, 1.0), 1.0).unwrap())
            .with_edge("K", "X")
            .with_edge("K", "Y")
            .build()
            .unwrap()
    }

    #[test]
    fn discrete_parent_of_mixed_children() {
        let net = build_mixed_example();
        let mut sampler = GibbsSampler::new(&net, 20_000).with_seed(19);

        // Y = 0.8 alone: log-odds of b over a is 0.3
        let observed: Assignment = vec![("Y", 0.8)].into_iter().collect();
        let marginals = sampler.estimate(&["K", "X"], &observed).unwrap();

        let p_b = 1.0 / (1.0 + (-0.3f64).exp());
        let p_x = 0.9 * (1.0 - p_b) + 0.2 * p_b;
        assert_abs_diff_eq!(probability_of(&marginals, "K", "b"), p_b, epsilon = 0.03);

        let x_one = marginals
            .iter()
            .find(|m| m.variable == "X" && m.value == Value::Real(1.0))
            .map(|m| m.probability)
            .unwrap();
        assert_abs_diff_eq!(x_one, p_x, epsilon = 0.03);

        // adding X = 1 multiplies the odds by 0.2 / 0.9
        let observed = observed.with("X", 1.0);
        let marginals = sampler.estimate(&["K"], &observed).unwrap();

        let odds = (0.2 / 0.9) * 0.3f64.exp();
        assert_abs_diff_eq!(probability_of(&marginals, "K", "b"), odds / (1.0 + odds), epsilon = 0.03);
    }

    #[test]
    fn distant_observation_under_discrete_parent() {
        let net = build_mixed_example();
        let observed: Assignment = vec![("Y", 40.0)].into_iter().collect();

        let marginals = GibbsSampler::new(&net, 500).with_seed(4).estimate(&["K"], &observed).unwrap();
        assert_eq!(probability_of(&marginals, "K", "b"), 1.0);
    }

    #[test]
    fn normal_normal_posterior() {
        // M ~ N(0, 1), Y | M ~ N(M, 1), Y = 2 gives M | Y ~ N(1, 1/2)
        init_logging();
        let net = NetworkBuilder::new()
            .with_node(ContinuousNode::new("M", Distribution::normal(0.0, 1.0), 1.0).unwrap())
            .with_node(ContinuousNode::new("Y", Distribution::normal("M", 1.0), 1.0).unwrap())
            .with_edge("M", "Y")
            .build()
            .unwrap();
        let observed: Assignment = vec![("Y", 2.0)].into_iter().collect();

        let mut sampler = MetropolisSampler::new(&net, 20_000, 500).with_seed(31);
        let table = sampler.estimate(&observed, None).unwrap();

        assert_eq!(table.shape(), (20_000, 2));
        assert_abs_diff_eq!(table.mean("M").unwrap(), 1.0, epsilon = 0.05);
        assert_abs_diff_eq!(table.variance("M").unwrap(), 0.5, epsilon = 0.05);
        assert!(table.column("Y").unwrap().all(|v| *v == Value::Real(2.0)));
    }

    #[test]
    fn normal_mean_from_many_observations() {
        // conjugate update with known variance: precision 1/4 + n, mean sum(y) / (1/4 + n)
        let data = [1.2, 0.8, 1.5, 0.9, 1.1];
        let mut builder = NetworkBuilder::new()
            .with_node(ContinuousNode::new("M", Distribution::normal(0.0, 4.0), 0.25).unwrap());

        let mut observed = Assignment::new();
        for (i, y) in data.iter().enumerate() {
            let name = format!("Y{}", i + 1);
            builder = builder
                .with_node(ContinuousNode::new(&name, Distribution::normal("M", 1.0), 1.0).unwrap())
                .with_edge("M", &name);
            observed.set(&name, *y);
        }
        let net = builder.build().unwrap();

        let precision = 0.25 + data.len() as f64;
        let expected_mean = data.iter().sum::<f64>() / precision;

        let starting: Assignment = vec![("M", 0.0)].into_iter().collect();
        let table = MetropolisSampler::new(&net, 10_000, 500)
            .with_seed(8)
            .estimate(&observed, Some(&starting))
            .unwrap();

        assert_abs_diff_eq!(table.mean("M").unwrap(), expected_mean, epsilon = 0.05);
        assert_abs_diff_eq!(table.variance("M").unwrap(), 1.0 / precision, epsilon = 0.05);
    }

    #[test]
    fn beta_bernoulli_posterior() {
        // Beta(2, 2) prior with 14 successes in 20 trials gives Beta(16, 8), mean 2/3
        let mut builder = NetworkBuilder::new()
            .with_node(ContinuousNode::new("P", Distribution::beta(2.0, 2.0), 0.01).unwrap());

        let mut observed = Assignment::new();
        for i in 0..20 {
            let name = format!("OB{}", i + 1);
            builder = builder
                .with_node(BinaryNode::new(&name, Distribution::bernoulli("P")))
                .with_edge("P", &name);
            observed.set(&name, if i < 14 { 1.0 } else { 0.0 });
        }
        let net = builder.build().unwrap();

        let starting: Assignment = vec![("P", 0.5)].into_iter().collect();
        let table = MetropolisSampler::new(&net, 10_000, 500)
            .with_seed(12)
            .estimate(&observed, Some(&starting))
            .unwrap();

        assert_eq!(table.n_columns(), 21);
        assert_abs_diff_eq!(table.mean("P").unwrap(), 2.0 / 3.0, epsilon = 0.03);
        assert!(table.column("P").unwrap().all(|v| {
            let p = v.as_real().unwrap();
            p > 0.0 && p <= 1.0
        }));
    }

    #[test]
    fn unobserved_binary_node_in_mixed_network() {
        let net = NetworkBuilder::new()
            .with_node(ContinuousNode::new("P", Distribution::beta(3.0, 7.0), 0.01).unwrap())
            .with_node(BinaryNode::new("X", Distribution::bernoulli("P")))
            .with_edge("P", "X")
            .build()
            .unwrap();

        let starting: Assignment = vec![("P", 0.3)].into_iter().collect();
        let table = MetropolisSampler::new(&net, 20_000, 500)
            .with_seed(21)
            .estimate(&Assignment::new(), Some(&starting))
            .unwrap();

        // marginally X ~ Bernoulli(E[P]) = Bernoulli(0.3)
        assert_abs_diff_eq!(table.frequency("X", &Value::Real(1.0)).unwrap(), 0.3, epsilon = 0.03);
        assert_abs_diff_eq!(table.mean("P").unwrap(), 0.3, epsilon = 0.03);
    }

    #[test]
    fn sampler_trait_drives_chain() {
        let net = build_alarm_example();
        let observed: Assignment = vec![("J", "True")].into_iter().collect();
        let initial: Assignment = vec![
            ("B", "False"), ("E", "False"), ("A", "False"), ("J", "True"), ("M", "False")
        ].into_iter().collect();

        let mut chain = Chain::new(&net, observed, initial, StdRng::seed_from_u64(0));
        let sampler: &mut dyn Sampler = &mut chain;

        for _ in 0..50 {
            let a = sampler.sample().unwrap();
            assert_eq!(a.len(), 5);
            assert_eq!(a.label("J").unwrap(), "True");
        }
    }

    #[test]
    fn config_defaults() {
        let config = SamplerConfig::default();

        assert_eq!(config.n_samples, 10_000);
        assert_eq!(config.burn_in, 0);
        assert_eq!(config.seed, None);

        let config = config.with_samples(5).with_burn_in(2).with_seed(3);
        assert_eq!(config, SamplerConfig { n_samples: 5, burn_in: 2, seed: Some(3) });
    }

}
