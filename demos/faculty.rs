//! Estimates the mean and variance of faculty salaries from 23 observations, with a Normal prior
//! on the mean and an inverse-gamma prior on the variance.

use gibbsnet as g;

const N_SAMPLES: usize = 5000;
const BURN_IN: usize = 50;

const SALARIES: [f64; 23] = [
    6.39, 6.32, 6.25, 6.24, 6.21, 6.18, 6.17, 6.13, 6.00, 6.00, 5.97, 5.82,
    5.81, 5.71, 5.55, 5.50, 5.39, 5.37, 5.35, 5.30, 5.27, 4.94, 4.50
];

fn main() -> g::Result<()> {
    env_logger::init();

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let mut network = g::Network::new();
    network.add_node(g::ContinuousNode::new("M", g::Distribution::normal(5.0, 1.0 / 9.0), 0.2 * 0.2)?)?;
    network.add_node(g::ContinuousNode::new("V", g::Distribution::inverse_gamma(11.0, 2.5), 0.15 * 0.15)?)?;

    let mut observed = g::Assignment::new();
    for (i, salary) in SALARIES.iter().enumerate() {
        let name = format!("Observation{}", i + 1);

        network.add_node(g::ContinuousNode::new(&name, g::Distribution::normal("M", "V"), 0.15 * 0.15)?)?;
        network.add_edge("M", &name)?;
        network.add_edge("V", &name)?;
        observed.set(&name, *salary);
    }

    /////////////////////////////////////////////////////
    // Step 2: Run the sampler
    let starting: g::Assignment = vec![("M", 5.0), ("V", 0.3)].into_iter().collect();
    let mut sampler = g::MetropolisSampler::new(&network, N_SAMPLES, BURN_IN);
    let table = sampler.estimate(&observed, Some(&starting))?;

    /////////////////////////////////////////////////////
    // Step 3: Summarize
    for name in ["M", "V"] {
        println!(
            "{}: posterior mean {:.4}, posterior variance {:.6}",
            name, table.mean(name)?, table.variance(name)?
        );
    }

    Ok(())
}
