//! Text-derived symbol vectors.
//!
//! A [`TextEmbedder`] turns the textual form of an attribute value into a
//! vector. The built-in [`NgramEmbedder`] sums the deterministic random
//! vectors of a string's character trigrams, so values that share spelling
//! ("alanine", "alanyl") land close together while unrelated values stay
//! near-orthogonal.

use crate::error::Result;
use crate::vector::Vector;
use crate::vocabulary::random_symbol;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic: the same text always embeds to the
/// same vector.
pub trait TextEmbedder: Send + Sync {
    /// Strategy identifier, used in encoder signatures.
    fn id(&self) -> &str;

    /// Length of every embedding.
    fn dimensions(&self) -> usize;

    /// Embed one string.
    fn embed(&self, text: &str) -> Result<Vector>;
}

/// Character n-gram random-indexing embedder.
#[derive(Clone, Debug)]
pub struct NgramEmbedder {
    dimensions: usize,
    n: usize,
    seed: u64,
}

impl NgramEmbedder {
    /// Strategy identifier of the built-in embedder.
    pub const ID: &'static str = "ngram";

    /// Trigram embedder with seed 0.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            n: 3,
            seed: 0,
        }
    }

    /// Use n-grams of a different length (minimum 1).
    pub fn with_ngram(mut self, n: usize) -> Self {
        self.n = n.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The boundary-padded n-grams of `text`.
    fn grams(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = format!("<{}>", text.to_lowercase()).chars().collect();
        if chars.len() <= self.n {
            return vec![chars.into_iter().collect()];
        }
        chars
            .windows(self.n)
            .map(|w| w.iter().collect())
            .collect()
    }
}

impl TextEmbedder for NgramEmbedder {
    fn id(&self) -> &str {
        Self::ID
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut acc = Vector::zeros(self.dimensions);
        for gram in self.grams(text) {
            acc.add_assign(&random_symbol(self.seed, "ngram", &gram, self.dimensions));
        }
        Ok(acc.normalized())
    }
}
