//! Cost gradients with respect to a network's parameters.

use crate::matrix::Matrix;

use std::ops::{AddAssign, DivAssign};

/// Partial derivatives of the cost, shaped exactly like the network's
/// weights and biases.
///
/// Entry `k` describes layer `k`; layer 0 has no parameters, so its entries
/// are always empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub(crate) nabla_w: Vec<Matrix>,
    pub(crate) nabla_b: Vec<Vec<f64>>,
}

impl Gradient {
    /// A gradient of zeros with the given parameter shapes.
    pub(crate) fn zeros(weights: &[Matrix], biases: &[Vec<f64>]) -> Self {
        Gradient {
            nabla_w: weights
                .iter()
                .map(|w| Matrix::zeros(w.rows(), w.cols()))
                .collect(),
            nabla_b: biases.iter().map(|b| vec![0.0; b.len()]).collect(),
        }
    }

    /// ∂Cost/∂weight, one matrix per layer.
    pub fn nabla_w(&self) -> &[Matrix] {
        &self.nabla_w
    }

    /// ∂Cost/∂bias, one vector per layer.
    pub fn nabla_b(&self) -> &[Vec<f64>] {
        &self.nabla_b
    }

    /// Sum of squares of every entry.
    pub fn squared_norm(&self) -> f64 {
        let w: f64 = self.nabla_w.iter().flat_map(Matrix::iter).map(|x| x * x).sum();
        let b: f64 = self.nabla_b.iter().flatten().map(|x| x * x).sum();
        w + b
    }
}

impl<'a> AddAssign<&'a Gradient> for Gradient {
    fn add_assign(&mut self, other: &Gradient) {
        for (l, r) in self.nabla_w.iter_mut().zip(&other.nabla_w) {
            *l += r;
        }
        for (l, r) in self.nabla_b.iter_mut().zip(&other.nabla_b) {
            for (x, y) in l.iter_mut().zip(r) {
                *x += *y;
            }
        }
    }
}

impl DivAssign<f64> for Gradient {
    fn div_assign(&mut self, divisor: f64) {
        for w in &mut self.nabla_w {
            *w /= divisor;
        }
        for x in self.nabla_b.iter_mut().flatten() {
            *x /= divisor;
        }
    }
}
