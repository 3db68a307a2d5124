//! Activation functions and their derivatives.

use crate::error::{NetworkError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

/// An [activation function](https://en.wikipedia.org/wiki/Activation_function)
/// paired with its derivative.
///
/// Both functions take the neuron's weighted sum `z`, not its output.
pub trait Activation: Send + Sync {
    /// Evaluates `f(z)`.
    fn evaluate(&self, z: f64) -> f64;

    /// Evaluates `f'(z)`. At points where `f` is not differentiable this
    /// returns a conventional subgradient.
    fn derivative(&self, z: f64) -> f64;

    /// Short name used when printing a network.
    fn name(&self) -> &str {
        "custom"
    }
}

/// The built-in activation functions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activator {
    /// Logistic sigmoid
    Sigmoid,
    /// Rectified Linear Unit
    ReLU,
    /// Leaky Rectified Linear Unit
    ///
    /// Scales negative inputs by a slope in `(0, 1)`.
    #[serde(rename = "leaky_relu")]
    LeakyReLU(LeakyReLU),
    /// Identity
    Linear,
    /// Hyperbolic tan function
    TanH,
    /// Smooth approximation of ReLU, `ln(1 + e^z)`
    SoftPlus,
}

impl Activator {
    /// Shorthand for `Activator::LeakyReLU(LeakyReLU::new(alpha)?)`.
    pub fn leaky_relu(alpha: f64) -> Result<Self> {
        LeakyReLU::new(alpha).map(Activator::LeakyReLU)
    }
}

impl Activation for Activator {
    fn evaluate(&self, z: f64) -> f64 {
        match self {
            Activator::Sigmoid => sigmoid(z),
            Activator::ReLU => z.max(0.0),
            Activator::LeakyReLU(leaky) => leaky.evaluate(z),
            Activator::Linear => z,
            Activator::TanH => 2.0 * sigmoid(2.0 * z) - 1.0,
            Activator::SoftPlus => softplus(z),
        }
    }

    fn derivative(&self, z: f64) -> f64 {
        match self {
            Activator::Sigmoid => sigmoid_prime(z),
            Activator::ReLU => {
                if z >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(leaky) => leaky.derivative(z),
            Activator::Linear => 1.0,
            Activator::TanH => 4.0 * sigmoid_prime(2.0 * z),
            Activator::SoftPlus => sigmoid(z),
        }
    }

    fn name(&self) -> &str {
        match self {
            Activator::Sigmoid => "sigmoid",
            Activator::ReLU => "relu",
            Activator::LeakyReLU(_) => "leaky_relu",
            Activator::Linear => "linear",
            Activator::TanH => "tanh",
            Activator::SoftPlus => "softplus",
        }
    }
}

/// Leaky ReLU with a validated negative slope.
///
/// Deserializes from a bare number and rejects slopes outside `(0, 1)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LeakyReLU {
    alpha: f64,
}

impl LeakyReLU {
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(NetworkError::invalid(format!(
                "leaky ReLU slope must lie in (0, 1), got {}",
                alpha
            )));
        }
        Ok(LeakyReLU { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl TryFrom<f64> for LeakyReLU {
    type Error = NetworkError;

    fn try_from(alpha: f64) -> Result<Self> {
        LeakyReLU::new(alpha)
    }
}

impl From<LeakyReLU> for f64 {
    fn from(leaky: LeakyReLU) -> f64 {
        leaky.alpha
    }
}

impl Activation for LeakyReLU {
    fn evaluate(&self, z: f64) -> f64 {
        z.max(self.alpha * z)
    }

    fn derivative(&self, z: f64) -> f64 {
        if z >= 0.0 { 1.0 } else { self.alpha }
    }

    fn name(&self) -> &str {
        "leaky_relu"
    }
}

/// A user-defined activation built from a function and its derivative.
pub struct FnActivation<F, D> {
    name: String,
    f: F,
    df: D,
}

impl<F, D> FnActivation<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F, df: D) -> Self {
        FnActivation {
            name: name.into(),
            f,
            df,
        }
    }
}

impl<F, D> Activation for FnActivation<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, z: f64) -> f64 {
        (self.f)(z)
    }

    fn derivative(&self, z: f64) -> f64 {
        (self.df)(z)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F, D> fmt::Debug for FnActivation<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnActivation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn sigmoid_prime(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

// ln(1 + e^z) without overflowing for large z.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}
