// src/io/supply.rs

use crate::model::error::ReactorError;
use rand::thread_rng;
use rand_distr::{Bernoulli, Distribution};

/// Supply is available on every step.
pub fn generate_constant_availability(steps: usize) -> Vec<bool> {
    vec![true; steps]
}

/// Each step independently suffers an outage with the given probability.
///
/// # Arguments
/// * `steps` - Length of the simulation.
/// * `outage_probability` - Chance that the market has nothing to sell on a step.
pub fn generate_random_outages(
    steps: usize,
    outage_probability: f64,
) -> Result<Vec<bool>, ReactorError> {
    let outage = Bernoulli::new(outage_probability).map_err(|e| {
        ReactorError::InvalidConfig(format!(
            "outage probability {}: {}",
            outage_probability, e
        ))
    })?;

    let mut rng = thread_rng();
    Ok((0..steps).map(|_| !outage.sample(&mut rng)).collect())
}

/// Available except for one contiguous outage window of `length` steps
/// starting at step `start` (1-based).
///
/// This is the classic stress scenario: a supplier goes dark right around a
/// refuel.
pub fn generate_outage_window(steps: usize, start: usize, length: usize) -> Vec<bool> {
    (1..=steps)
        .map(|step| step < start || step >= start + length)
        .collect()
}
