//! A small feedforward neural network engine.
//!
//! A [`Network`] is an ordered list of fully connected layers. It computes
//! every layer's activations, a sum-of-squares cost, gradients by
//! backpropagation, and applies plain batch gradient descent.
//!
//! ```
//! use feedforward::{Activator, LayerSpec, Matrix, Network};
//!
//! let network = Network::from_parameters(
//!     vec![LayerSpec::new(2, Activator::Linear), LayerSpec::new(1, Activator::Linear)],
//!     vec![Matrix::default(), Matrix::from_rows(vec![vec![1.0, 1.0]])?],
//!     vec![vec![], vec![0.0]],
//! )?;
//! assert_eq!(network.predict(&[1.0, 2.0])?, vec![3.0]);
//! assert_eq!(network.cost(&[1.0, 2.0], &[5.0])?, 4.0);
//!
//! let gradient = network.gradient(&[1.0, 2.0], &[5.0])?;
//! assert_eq!(gradient.nabla_b()[1], vec![-4.0]);
//! # Ok::<(), feedforward::NetworkError>(())
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod training;

mod gradient;
mod matrix;
mod neural_network;

pub use activation::{Activation, Activator, FnActivation, LeakyReLU};
pub use error::{NetworkError, Result};
pub use gradient::Gradient;
pub use matrix::Matrix;
pub use neural_network::{LayerSpec, Network};
