//! Estimates the probability of a burglary given that both neighbours called, on the alarm
//! network of Russell & Norvig.

use gibbsnet as g;

fn main() -> g::Result<()> {
    env_logger::init();

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let network = g::NetworkBuilder::new()
        .with_node(g::DiscreteNode::root("B", &["True", "False"], vec![0.001, 0.999])?)
        .with_node(g::DiscreteNode::root("E", &["True", "False"], vec![0.002, 0.998])?)
        .with_node(g::DiscreteNode::new("A", &["True", "False"], vec![
            (vec!["True", "True"], vec![0.95, 0.05]),
            (vec!["True", "False"], vec![0.94, 0.06]),
            (vec!["False", "True"], vec![0.29, 0.71]),
            (vec!["False", "False"], vec![0.001, 0.999]),
        ])?)
        .with_node(g::DiscreteNode::new("J", &["True", "False"], vec![
            (vec!["True"], vec![0.90, 0.10]),
            (vec!["False"], vec![0.05, 0.95]),
        ])?)
        .with_node(g::DiscreteNode::new("M", &["True", "False"], vec![
            (vec!["True"], vec![0.70, 0.30]),
            (vec!["False"], vec![0.01, 0.99]),
        ])?)
        .with_edge("B", "A")
        .with_edge("E", "A")
        .with_edge("A", "J")
        .with_edge("A", "M")
        .build()?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let evidence: g::Assignment = vec![("J", "True"), ("M", "True")].into_iter().collect();

    /////////////////////////////////////////////////////
    // Step 3: Run the sampler
    let config = g::SamplerConfig::default().with_samples(10_000).with_seed(42);
    let mut sampler = g::GibbsSampler::from_config(&network, &config);

    println!("Given J = True, M = True:");
    for marginal in sampler.estimate(&["B", "E"], &evidence)? {
        println!("  {}", marginal);
    }

    Ok(())
}
