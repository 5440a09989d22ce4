//! Input preparation: synthetic training shapes, image decoding and flattening.

pub mod image;
pub mod shapes;

pub use shapes::Shape;

/// Flattens a row-major matrix into one vector, row after row.
pub fn flatten(matrix: &[Vec<f64>]) -> Vec<f64> {
    matrix.iter().flat_map(|row| row.iter().copied()).collect()
}
