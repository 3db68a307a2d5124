use crate::error::{NetworkError, Result};

use rand::Rng;
use rand::distr::Distribution;
use std::ops::{AddAssign, DivAssign, Index, IndexMut, SubAssign};

/// A dense weight matrix indexed by `(neuron, input)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Fills a new matrix with independent samples from `distribution`.
    pub fn random<D, R>(distribution: &D, rows: usize, cols: usize, rng: &mut R) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        let data = (0..rows * cols).map(|_| distribution.sample(rng)).collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from one vector per neuron. Every row must have the
    /// same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().position(|row| row.len() != cols) {
            return Err(NetworkError::invalid(format!(
                "row {} has length {}, expected {}",
                ragged,
                rows[ragged].len(),
                cols
            )));
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Square matrix with ones on the diagonal.
    pub fn identity(size: usize) -> Self {
        let mut matrix = Matrix::zeros(size, size);
        for i in 0..size {
            matrix[(i, i)] = 1.0;
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The incoming weights of neuron `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    /// Computes `self · x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.cols);
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(x).map(|(w, v)| w * v).sum())
            .collect()
    }

    /// Computes `selfᵀ · y`.
    pub fn transpose_mul_vec(&self, y: &[f64]) -> Vec<f64> {
        debug_assert_eq!(y.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        for (i, &scale) in y.iter().enumerate() {
            for (o, w) in out.iter_mut().zip(self.row(i)) {
                *o += scale * w;
            }
        }
        out
    }

    /// Overwrites `self` with the outer product `a · bᵀ`.
    pub fn set_outer(&mut self, a: &[f64], b: &[f64]) {
        debug_assert_eq!(a.len(), self.rows);
        debug_assert_eq!(b.len(), self.cols);
        for (i, &ai) in a.iter().enumerate() {
            for (w, &bj) in self.row_mut(i).iter_mut().zip(b) {
                *w = ai * bj;
            }
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(col < self.cols, "column {} out of bounds", col);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(col < self.cols, "column {} out of bounds", col);
        &mut self.data[row * self.cols + col]
    }
}

impl<'a> AddAssign<&'a Matrix> for Matrix {
    fn add_assign(&mut self, other: &Matrix) {
        debug_assert_eq!(self.shape(), other.shape());
        for (l, r) in self.data.iter_mut().zip(other.data.iter()) {
            *l += *r;
        }
    }
}

impl<'a> SubAssign<&'a Matrix> for Matrix {
    fn sub_assign(&mut self, other: &Matrix) {
        debug_assert_eq!(self.shape(), other.shape());
        for (l, r) in self.data.iter_mut().zip(other.data.iter()) {
            *l -= *r;
        }
    }
}

impl DivAssign<f64> for Matrix {
    fn div_assign(&mut self, divisor: f64) {
        for x in &mut self.data {
            *x /= divisor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::distr::Uniform;
    use rand::rngs::StdRng;

    #[test]
    fn from_rows_is_row_major() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConfiguration(_)));
    }

    #[test]
    #[should_panic]
    fn column_index_is_bounds_checked() {
        let m = Matrix::zeros(2, 2);
        let _ = m[(0, 2)];
    }

    #[test]
    fn products() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.mul_vec(&[1.0, -1.0]), vec![-1.0, -1.0, -1.0]);
        assert_eq!(m.transpose_mul_vec(&[1.0, 0.0, 2.0]), vec![11.0, 14.0]);

        let mut outer = Matrix::zeros(2, 3);
        outer.set_outer(&[2.0, -1.0], &[1.0, 2.0, 3.0]);
        assert_eq!(outer.row(0), &[2.0, 4.0, 6.0]);
        assert_eq!(outer.row(1), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn arithmetic() {
        let mut m = Matrix::identity(2);
        m += &Matrix::identity(2);
        assert_eq!(m.row(0), &[2.0, 0.0]);
        m /= 2.0;
        assert_eq!(m, Matrix::identity(2));
        m -= &Matrix::identity(2);
        assert!(m.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn random_respects_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let between = Uniform::new(-1.0, 1.0).unwrap();
        let m = Matrix::random(&between, 4, 5, &mut rng);
        assert_eq!(m.shape(), (4, 5));
        assert!(m.iter().all(|&x| (-1.0..1.0).contains(&x)));
    }
}
