//! Vector type for graph encodings.
//!
//! Every symbol, intermediate node representation and final encoding is a
//! dense real-valued vector of the same dimensionality.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A dense real-valued vector.
///
/// Unlike symbol vectors drawn by the vocabulary, vectors produced by
/// bundling are not unit-norm in general.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a new zero vector of given dimensionality.
    pub fn zeros(dimensions: usize) -> Self {
        Self {
            data: vec![0.0; dimensions],
        }
    }

    /// Create a vector from raw data.
    pub fn from_data(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Compute the L2 norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|&v| v * v).sum::<f64>().sqrt()
    }

    /// Return a unit-normalized copy.
    ///
    /// A vector whose norm is below `1e-10` normalizes to the zero vector.
    pub fn normalized(&self) -> Vector {
        let norm = self.norm();
        if norm < 1e-10 {
            return Vector::zeros(self.dimensions());
        }
        Vector::from_data(self.data.iter().map(|&v| v / norm).collect())
    }

    /// Elementwise in-place addition.
    pub fn add_assign(&mut self, other: &Vector) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "Dimension mismatch in add"
        );
        for (x, &y) in self.data.iter_mut().zip(other.data.iter()) {
            *x += y;
        }
    }

    /// Count non-zero elements.
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// True when every element is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_data(data)
    }
}
