use feedforward::config::NetworkConfig;
use feedforward::training::{StopCondition, Trainer};
use feedforward::{Activator, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2 inputs, one hidden layer of 4 neurons, and 1 output
    let mut network = NetworkConfig::new(2)
        .layer(4, Activator::TanH)
        .layer(1, Activator::Sigmoid)
        .build()?;

    // Training data for XOR
    let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let targets = [[0.0], [1.0], [1.0], [0.0]];

    // Train the network
    let report = Trainer::new(inputs.len())
        .stop_condition(StopCondition::CostBelow {
            threshold: 0.001,
            max_epochs: 50_000,
        })
        .log_every(1000)
        .train(&mut network, &inputs, &targets)?;
    println!("Stopped after {} epochs, mean cost {:.6}", report.epochs, report.cost);

    // Test the network
    for (input, expected) in inputs.iter().zip(&targets) {
        let output = network.predict(input)?;
        println!(
            "Input: {:?}, Expected: {:?}, Got: {:.4}",
            input, expected[0], output[0]
        );
    }
    Ok(())
}
