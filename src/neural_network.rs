use crate::activation::Activation;
use crate::error::{NetworkError, Result, check_len, check_parallel};
use crate::gradient::Gradient;
use crate::matrix::Matrix;

use log::debug;
use rand::distr::Distribution;
use rand::{Rng, rng};
use std::fmt;

/// The size and activation function of one layer.
pub struct LayerSpec {
    size: usize,
    activation: Box<dyn Activation>,
}

impl LayerSpec {
    pub fn new<A: Activation + 'static>(size: usize, activation: A) -> Self {
        LayerSpec::boxed(size, Box::new(activation))
    }

    pub fn boxed(size: usize, activation: Box<dyn Activation>) -> Self {
        LayerSpec { size, activation }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Debug for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSpec")
            .field("size", &self.size)
            .field("activation", &self.activation.name())
            .finish()
    }
}

/// Uniform samples from the open interval (-1, 1).
struct OpenUnitInterval;

impl Distribution<f64> for OpenUnitInterval {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let x: f64 = rng.random_range(-1.0..1.0);
            if x > -1.0 {
                return x;
            }
        }
    }
}

/// Activations and weighted sums of a single forward pass.
struct Pass {
    weighted_sums: Vec<Vec<f64>>,
    activations: Vec<Vec<f64>>,
}

/// A fully connected feedforward network.
///
/// Layer 0 is the input layer: it has no parameters, and its activation
/// function is never applied. Every later layer `k` owns a weight matrix of
/// shape `size(k) × size(k - 1)` and a bias vector of length `size(k)`.
pub struct Network {
    weights: Vec<Matrix>,                     // Layer -> Neuron -> Input
    biases: Vec<Vec<f64>>,                    // Layer -> Neuron
    activation_fns: Vec<Box<dyn Activation>>, // Layer
    layer_sizes: Vec<usize>,                  // Number of neurons in each layer
}

impl Network {
    /// Creates a network with parameters drawn uniformly from (-1, 1) using
    /// the thread-local generator.
    pub fn new(layers: Vec<LayerSpec>) -> Result<Self> {
        Network::with_rng(layers, &mut rng())
    }

    /// Creates a network with parameters drawn uniformly from (-1, 1) using
    /// `rng`.
    pub fn with_rng<R: Rng + ?Sized>(layers: Vec<LayerSpec>, rng: &mut R) -> Result<Self> {
        let (layer_sizes, activation_fns) = split_topology(layers)?;
        let between = OpenUnitInterval;

        let mut weights = Vec::with_capacity(layer_sizes.len());
        let mut biases = Vec::with_capacity(layer_sizes.len());
        weights.push(Matrix::default());
        biases.push(Vec::new());
        for pair in layer_sizes.windows(2) {
            let (num_inputs, num_outputs) = (pair[0], pair[1]);
            weights.push(Matrix::random(&between, num_outputs, num_inputs, rng));
            biases.push((0..num_outputs).map(|_| between.sample(rng)).collect());
        }

        let network = Network {
            weights,
            biases,
            activation_fns,
            layer_sizes,
        };
        debug!(
            "initialized network with layer sizes {:?} ({} parameters)",
            network.layer_sizes,
            network.num_parameters()
        );
        Ok(network)
    }

    /// Creates a network with known parameters.
    ///
    /// `weights` and `biases` hold one entry per layer, in the same layout
    /// that [`Network::weights`] and [`Network::biases`] return. Entry 0 must
    /// be empty.
    pub fn from_parameters(
        layers: Vec<LayerSpec>,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let (layer_sizes, activation_fns) = split_topology(layers)?;
        if weights.len() != layer_sizes.len() || biases.len() != layer_sizes.len() {
            return Err(NetworkError::invalid(format!(
                "expected parameters for {} layers, got {} weight matrices and {} bias vectors",
                layer_sizes.len(),
                weights.len(),
                biases.len()
            )));
        }
        for k in 0..layer_sizes.len() {
            let (rows, cols) = if k == 0 {
                (0, 0)
            } else {
                (layer_sizes[k], layer_sizes[k - 1])
            };
            if weights[k].shape() != (rows, cols) {
                return Err(NetworkError::invalid(format!(
                    "layer {} weights have shape {:?}, expected {:?}",
                    k,
                    weights[k].shape(),
                    (rows, cols)
                )));
            }
            if biases[k].len() != rows {
                return Err(NetworkError::invalid(format!(
                    "layer {} has {} biases, expected {}",
                    k,
                    biases[k].len(),
                    rows
                )));
            }
        }
        Ok(Network {
            weights,
            biases,
            activation_fns,
            layer_sizes,
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Returns the size of the input layer.
    pub fn input_len(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Returns the size of the output layer.
    pub fn output_len(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// The activation function assigned to layer `k`.
    pub fn activation(&self, k: usize) -> &dyn Activation {
        self.activation_fns[k].as_ref()
    }

    pub fn num_parameters(&self) -> usize {
        let weights: usize = self.weights.iter().map(Matrix::len).sum();
        let biases: usize = self.biases.iter().map(Vec::len).sum();
        weights + biases
    }

    /// Feeds `input` through the network, returning the activations of every
    /// layer. The first entry is `input` itself.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<Vec<f64>>> {
        check_len("input", self.input_len(), input.len())?;
        Ok(self.feed_forward(input).activations)
    }

    /// Feeds `input` through the network, returning the output layer.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut activations = self.forward(input)?;
        Ok(activations.pop().unwrap_or_default())
    }

    /// Sum of squared errors between the network's output and `target`.
    pub fn cost(&self, input: &[f64], target: &[f64]) -> Result<f64> {
        self.check_example(input, target)?;
        let pass = self.feed_forward(input);
        Ok(sum_squared_error(output_layer(&pass), target))
    }

    /// Mean of [`Network::cost`] over a set of examples.
    pub fn mean_cost<I, T>(&self, inputs: &[I], targets: &[T]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        self.check_batch(inputs, targets)?;
        let total: f64 = inputs
            .iter()
            .zip(targets)
            .map(|(input, target)| {
                let pass = self.feed_forward(input.as_ref());
                sum_squared_error(output_layer(&pass), target.as_ref())
            })
            .sum();
        Ok(total / inputs.len() as f64)
    }

    /// Gradient of [`Network::cost`] for a single example.
    pub fn gradient(&self, input: &[f64], target: &[f64]) -> Result<Gradient> {
        self.check_example(input, target)?;
        Ok(self.backpropagate(input, target))
    }

    /// Mean gradient over a batch of examples.
    pub fn mean_gradient<I, T>(&self, inputs: &[I], targets: &[T]) -> Result<Gradient>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        self.check_batch(inputs, targets)?;
        Ok(self.batch_gradient(inputs, targets))
    }

    /// Applies one gradient descent step per batch, in order.
    ///
    /// Each step subtracts the batch's mean gradient from the parameters as
    /// left by the previous step. Every batch is validated before the first
    /// step, so on error the parameters are unchanged.
    pub fn gradient_descend<I, T>(
        &mut self,
        input_batches: &[Vec<I>],
        target_batches: &[Vec<T>],
    ) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        check_parallel(input_batches.len(), target_batches.len())?;
        for (inputs, targets) in input_batches.iter().zip(target_batches) {
            self.check_batch(inputs, targets)?;
        }

        let num_batches = input_batches.len();
        for (n, (inputs, targets)) in input_batches.iter().zip(target_batches).enumerate() {
            let gradient = self.batch_gradient(inputs, targets);
            self.apply_gradient(&gradient);
            debug!(
                "batch {}/{}: {} examples, squared gradient norm {:.6}",
                n + 1,
                num_batches,
                inputs.len(),
                gradient.squared_norm()
            );
        }
        Ok(())
    }

    fn check_example(&self, input: &[f64], target: &[f64]) -> Result<()> {
        check_len("input", self.input_len(), input.len())?;
        check_len("target", self.output_len(), target.len())
    }

    fn check_batch<I, T>(&self, inputs: &[I], targets: &[T]) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        check_parallel(inputs.len(), targets.len())?;
        if inputs.is_empty() {
            return Err(NetworkError::EmptyBatch);
        }
        for (input, target) in inputs.iter().zip(targets) {
            self.check_example(input.as_ref(), target.as_ref())?;
        }
        Ok(())
    }

    fn feed_forward(&self, input: &[f64]) -> Pass {
        let mut weighted_sums = Vec::with_capacity(self.layer_sizes.len());
        let mut activations = Vec::with_capacity(self.layer_sizes.len());
        weighted_sums.push(Vec::new());
        activations.push(input.to_vec());

        for k in 1..self.layer_sizes.len() {
            let mut z = self.weights[k].mul_vec(&activations[k - 1]);
            for (z, b) in z.iter_mut().zip(&self.biases[k]) {
                *z += b;
            }
            let f = &self.activation_fns[k];
            let a = z.iter().map(|&z| f.evaluate(z)).collect();
            weighted_sums.push(z);
            activations.push(a);
        }
        Pass {
            weighted_sums,
            activations,
        }
    }

    fn backpropagate(&self, input: &[f64], target: &[f64]) -> Gradient {
        let pass = self.feed_forward(input);
        let mut gradient = Gradient::zeros(&self.weights, &self.biases);

        // dC/da for the current layer, starting from the output.
        let mut errors: Vec<f64> = output_layer(&pass)
            .iter()
            .zip(target)
            .map(|(a, t)| 2.0 * (a - t))
            .collect();

        for k in (1..self.layer_sizes.len()).rev() {
            let f = &self.activation_fns[k];
            let delta: Vec<f64> = errors
                .iter()
                .zip(&pass.weighted_sums[k])
                .map(|(e, &z)| e * f.derivative(z))
                .collect();
            gradient.nabla_w[k].set_outer(&delta, &pass.activations[k - 1]);
            errors = self.weights[k].transpose_mul_vec(&delta);
            gradient.nabla_b[k] = delta;
        }
        gradient
    }

    /// Sums the gradients of every example onto a zero seed and divides by
    /// the batch size. Assumes the batch has been checked.
    fn batch_gradient<I, T>(&self, inputs: &[I], targets: &[T]) -> Gradient
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        let mut sum = Gradient::zeros(&self.weights, &self.biases);
        for (input, target) in inputs.iter().zip(targets) {
            sum += &self.backpropagate(input.as_ref(), target.as_ref());
        }
        sum /= inputs.len() as f64;
        sum
    }

    fn apply_gradient(&mut self, gradient: &Gradient) {
        for (w, dw) in self.weights.iter_mut().zip(&gradient.nabla_w) {
            *w -= dw;
        }
        for (b, db) in self.biases.iter_mut().zip(&gradient.nabla_b) {
            for (x, dx) in b.iter_mut().zip(db) {
                *x -= *dx;
            }
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activations: Vec<&str> = self.activation_fns.iter().map(|a| a.name()).collect();
        f.debug_struct("Network")
            .field("layer_sizes", &self.layer_sizes)
            .field("activations", &activations)
            .finish_non_exhaustive()
    }
}

fn split_topology(layers: Vec<LayerSpec>) -> Result<(Vec<usize>, Vec<Box<dyn Activation>>)> {
    if layers.is_empty() {
        return Err(NetworkError::invalid("a network needs at least one layer"));
    }
    if let Some(k) = layers.iter().position(|layer| layer.size == 0) {
        return Err(NetworkError::invalid(format!("layer {} has no neurons", k)));
    }
    Ok(layers
        .into_iter()
        .map(|layer| (layer.size, layer.activation))
        .unzip())
}

fn output_layer(pass: &Pass) -> &[f64] {
    &pass.activations[pass.activations.len() - 1]
}

fn sum_squared_error(actual: &[f64], expected: &[f64]) -> f64 {
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (a - e) * (a - e))
        .sum()
}
