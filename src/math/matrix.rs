use serde::{Serialize, Deserialize};
use std::ops::Add;

/// Dense row-major matrix used for weight matrices and weight-gradient samples.
///
/// Row `i` belongs to source unit `i`; column `j` to destination unit `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    /// Builds a matrix from row vectors. All rows must share one length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        debug_assert!(data.iter().all(|row| row.len() == cols), "ragged matrix rows");
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    /// Outer product `column ⊗ row`: `res[i][j] = column[i] * row[j]`.
    pub fn outer(column: &[f64], row: &[f64]) -> Matrix {
        Matrix::from_data(
            column.iter()
                .map(|c| row.iter().map(|r| c * r).collect())
                .collect()
        )
    }

    /// Matrix-vector product: `res[i] = Σ_j self[i][j] * v[j]`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "Matrix and vector are of incorrect sizes");
        self.data.iter().map(|row| dot(row, v)).collect()
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }
}

impl Add<&Matrix> for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: &Matrix) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }

        self
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Element-wise (Hadamard) product of two equal-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).collect()
}
