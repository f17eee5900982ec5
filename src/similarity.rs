//! Similarity metrics for vector comparison.
//!
//! When compiled with the `simd` feature, dot products use SIMD-accelerated
//! kernels from `simsimd`.

use crate::vector::Vector;

/// Available similarity metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Cosine similarity (scale-invariant)
    Cosine,
    /// Dot product (raw inner product)
    Dot,
    /// Euclidean distance (converted to similarity)
    Euclidean,
}

/// Similarity computation for vectors.
pub struct Similarity;

impl Similarity {
    /// Compute similarity using the specified metric.
    pub fn compute(a: &Vector, b: &Vector, metric: Metric) -> f64 {
        match metric {
            Metric::Cosine => Self::cosine(a, b),
            Metric::Dot => Self::dot(a, b),
            Metric::Euclidean => 1.0 / (1.0 + Self::euclidean_distance(a, b)),
        }
    }

    /// Cosine similarity: dot(a, b) / (||a|| * ||b||)
    ///
    /// Returns 0 when either vector is (numerically) zero.
    pub fn cosine(a: &Vector, b: &Vector) -> f64 {
        let dot_ab = Self::dot(a, b);
        let norm_product = (Self::dot(a, a) * Self::dot(b, b)).sqrt();
        if norm_product < 1e-10 {
            return 0.0;
        }
        dot_ab / norm_product
    }

    /// Raw dot product.
    #[cfg(feature = "simd")]
    pub fn dot(a: &Vector, b: &Vector) -> f64 {
        use simsimd::SpatialSimilarity;
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in dot product"
        );
        f64::dot(a.data(), b.data()).unwrap_or(0.0)
    }

    #[cfg(not(feature = "simd"))]
    pub fn dot(a: &Vector, b: &Vector) -> f64 {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in dot product"
        );
        a.data()
            .iter()
            .zip(b.data().iter())
            .map(|(&x, &y)| x * y)
            .sum()
    }

    /// Raw Euclidean distance.
    pub fn euclidean_distance(a: &Vector, b: &Vector) -> f64 {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in euclidean"
        );
        a.data()
            .iter()
            .zip(b.data().iter())
            .map(|(&x, &y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}
