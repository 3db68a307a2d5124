//! An epoch loop over fixed-size batches.

use crate::error::{NetworkError, Result, check_parallel};
use crate::neural_network::Network;

use log::info;
use std::time::Instant;

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Epochs(usize),
    /// Stops when the mean cost drops below the provided threshold, or after
    /// `max_epochs`, whichever comes first
    CostBelow { threshold: f64, max_epochs: usize },
}

impl StopCondition {
    fn max_epochs(&self) -> usize {
        match *self {
            StopCondition::Epochs(epochs) => epochs,
            StopCondition::CostBelow { max_epochs, .. } => max_epochs,
        }
    }

    fn should_stop(&self, epoch: usize, cost: f64) -> bool {
        match *self {
            StopCondition::Epochs(epochs) => epoch >= epochs,
            StopCondition::CostBelow {
                threshold,
                max_epochs,
            } => cost < threshold || epoch >= max_epochs,
        }
    }
}

/// Summary of a finished training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    pub cost: f64,
}

/// Runs gradient descent over a dataset, one pass per epoch.
///
/// Each epoch splits the examples into consecutive batches of `batch_size`
/// (the last batch may be shorter) and hands them to
/// [`Network::gradient_descend`].
#[derive(Clone, Debug)]
pub struct Trainer {
    batch_size: usize,
    stop_condition: StopCondition,
    log_every: usize,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// Defaults to 1000 epochs with no progress logging.
    pub fn new(batch_size: usize) -> Self {
        Trainer {
            batch_size,
            stop_condition: StopCondition::Epochs(1000),
            log_every: 0,
        }
    }

    /// Sets the condition to finish training.
    pub fn stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    /// Logs the mean cost every `epochs` epochs. Zero disables progress logs.
    pub fn log_every(mut self, epochs: usize) -> Self {
        self.log_every = epochs;
        self
    }

    pub fn train<I, T>(
        &self,
        network: &mut Network,
        inputs: &[I],
        targets: &[T],
    ) -> Result<TrainingReport>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        self.validate()?;
        check_parallel(inputs.len(), targets.len())?;

        let input_batches = batches(inputs, self.batch_size);
        let target_batches = batches(targets, self.batch_size);

        let start_time = Instant::now();
        let mut epoch = 0;
        let mut cost = network.mean_cost(inputs, targets)?;
        while !self.stop_condition.should_stop(epoch, cost) {
            network.gradient_descend(&input_batches, &target_batches)?;
            cost = network.mean_cost(inputs, targets)?;
            epoch += 1;
            if self.log_every > 0 && epoch % self.log_every == 0 {
                info!("Epoch {}: mean cost = {:.6}", epoch, cost);
            }
        }
        info!(
            "Trained {} epochs in {:.2?}, final mean cost = {:.6}",
            epoch,
            start_time.elapsed(),
            cost
        );
        Ok(TrainingReport {
            epochs: epoch,
            cost,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetworkError::invalid("batch size must be positive"));
        }
        if self.stop_condition.max_epochs() == 0 {
            return Err(NetworkError::invalid("training needs at least one epoch"));
        }
        Ok(())
    }
}

fn batches<E: AsRef<[f64]>>(examples: &[E], batch_size: usize) -> Vec<Vec<&[f64]>> {
    examples
        .chunks(batch_size)
        .map(|chunk| chunk.iter().map(AsRef::as_ref).collect())
        .collect()
}
