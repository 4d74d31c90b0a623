use std::fmt;

use crate::config::{self, GemmConfig};
use crate::cpu::{Algorithm, MultiplyStats};
use crate::error::Result;
use crate::gemm::multiply_views;
use crate::view::{MatrixView, MatrixViewMut};

/// An owned, densely packed row-major `f32` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix from row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "data length {} does not match shape [{}x{}]",
            data.len(),
            rows,
            cols
        );
        Matrix { data, rows, cols }
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Create a matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Matrix { data, rows, cols }
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

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.view().get(i, j)
    }

    pub fn view(&self) -> MatrixView<'_> {
        MatrixView::new_unchecked(&self.data, self.rows, self.cols, self.cols)
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut::new_unchecked(&mut self.data, self.rows, self.cols, self.cols)
    }

    /// Matrix product `self @ other` using the process-wide config.
    ///
    /// `self` is `[m, n]`, `other` is `[n, k]`, the result is `[m, k]`.
    pub fn matmul(&self, other: &Matrix, algorithm: Algorithm) -> Result<Matrix> {
        self.matmul_with_config(other, algorithm, &config::global())
            .map(|(product, _)| product)
    }

    /// Matrix product with an explicit config, also returning call statistics.
    pub fn matmul_with_config(
        &self,
        other: &Matrix,
        algorithm: Algorithm,
        config: &GemmConfig,
    ) -> Result<(Matrix, MultiplyStats)> {
        let mut out = Matrix::zeros(self.rows, other.cols);
        let stats = multiply_views(
            config,
            algorithm,
            &self.view(),
            &other.view(),
            &mut out.view_mut(),
        )?;
        Ok((out, stats))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}]", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GemmError;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_string(), "[2x3]");
    }

    #[test]
    #[should_panic]
    fn test_new_shape_mismatch_panics() {
        let _m = Matrix::new(vec![1.0, 2.0], 3, 1);
    }

    #[test]
    fn test_identity() {
        let id = Matrix::identity(3);
        assert_eq!(id.data(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = Matrix::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2);
        for alg in Algorithm::ALL {
            let c = a.matmul(&b, alg).unwrap();
            assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
        }
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0], 1, 3);
        let b = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert!(matches!(
            a.matmul(&b, Algorithm::Naive),
            Err(GemmError::ShapeMismatchMultiply { .. })
        ));
    }

    #[test]
    fn test_matmul_empty_operand() {
        let a = Matrix::zeros(0, 3);
        let b = Matrix::zeros(3, 2);
        assert!(matches!(
            a.matmul(&b, Algorithm::Strassen),
            Err(GemmError::InvalidDimension { .. })
        ));
    }
}
