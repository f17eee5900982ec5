//! Vocabulary: deterministic (attribute, value) → vector mapping.
//!
//! Every value of every attribute in a [`Schema`] gets exactly one vector,
//! assigned when the vocabulary is built and never changed afterwards.
//! Two strategies exist:
//!
//! - **random**: near-orthogonal bipolar vectors, seeded from a SHA-256
//!   hash of `(seed, attribute, value)` so the same inputs always give the
//!   same vector on every machine.
//! - **text**: each vector is the embedding of the value's textual form,
//!   produced by a [`TextEmbedder`].

use crate::embedding::TextEmbedder;
use crate::error::{GraphVsaError, Result};
use crate::schema::{Attribute, Schema};
use crate::vector::Vector;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

/// Strategy identifier for random vocabularies.
pub const RANDOM_STRATEGY: &str = "random";

/// Draw the deterministic random symbol for `(attribute, value)`.
///
/// Elements are `±1/√dimensions`, so every symbol has unit norm and two
/// distinct symbols have expected similarity zero.
pub fn random_symbol(seed: u64, attribute: &str, value: &str, dimensions: usize) -> Vector {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(attribute.as_bytes());
    // unit separator keeps ("ab", "c") and ("a", "bc") apart
    hasher.update([0x1f]);
    hasher.update(value.as_bytes());
    let hash = hasher.finalize();

    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&hash[0..8]);
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed_bytes));

    let magnitude = 1.0 / (dimensions as f64).sqrt();
    let data = (0..dimensions)
        .map(|_| {
            if rng.next_u32() & 1 == 0 {
                magnitude
            } else {
                -magnitude
            }
        })
        .collect();

    Vector::from_data(data)
}

/// The vectors owned by one attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    name: String,
    /// Values in declaration order
    values: Vec<String>,
    vectors: BTreeMap<String, Vector>,
}

impl SymbolTable {
    fn build<F>(attr: &Attribute, mut assign: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Vector>,
    {
        let mut vectors = BTreeMap::new();
        for value in &attr.values {
            vectors.insert(value.clone(), assign(value)?);
        }
        Ok(Self {
            name: attr.name.clone(),
            values: attr.values.clone(),
            vectors,
        })
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Vector of one value, if registered.
    pub fn get(&self, value: &str) -> Option<&Vector> {
        self.vectors.get(value)
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Immutable mapping from (attribute, value) to vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    dimensions: usize,
    strategy: String,
    tables: Vec<SymbolTable>,
}

impl Vocabulary {
    /// Assign every value a random near-orthogonal vector.
    pub fn random(schema: &Schema, dimensions: usize, seed: u64) -> Result<Self> {
        if dimensions == 0 {
            return Err(GraphVsaError::InvalidConfig(
                "dimensions must be positive".to_string(),
            ));
        }

        let tables = schema
            .attributes()
            .iter()
            .map(|attr| {
                SymbolTable::build(attr, |value| {
                    Ok(random_symbol(seed, &attr.name, value, dimensions))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let vocab = Self {
            dimensions,
            strategy: RANDOM_STRATEGY.to_string(),
            tables,
        };
        debug!(
            symbols = vocab.len(),
            dimensions, seed, "Built random vocabulary"
        );
        Ok(vocab)
    }

    /// Assign every value the embedding of its textual form.
    ///
    /// Every embedding must have `embedder.dimensions()` elements.
    pub fn from_text(schema: &Schema, embedder: &dyn TextEmbedder) -> Result<Self> {
        let dimensions = embedder.dimensions();
        if dimensions == 0 {
            return Err(GraphVsaError::InvalidConfig(format!(
                "text embedder `{}` reports zero dimensions",
                embedder.id()
            )));
        }

        let tables = schema
            .attributes()
            .iter()
            .map(|attr| {
                SymbolTable::build(attr, |value| {
                    let vec = embedder.embed(value)?;
                    if vec.dimensions() != dimensions {
                        return Err(GraphVsaError::DimensionMismatch {
                            expected: dimensions,
                            got: vec.dimensions(),
                        });
                    }
                    Ok(vec)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let vocab = Self {
            dimensions,
            strategy: embedder.id().to_string(),
            tables,
        };
        debug!(
            symbols = vocab.len(),
            dimensions,
            strategy = %vocab.strategy,
            "Built text vocabulary"
        );
        Ok(vocab)
    }

    /// Vector dimensionality shared by every symbol.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// `"random"` or the text embedder id.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Per-attribute tables in schema order.
    pub fn attributes(&self) -> &[SymbolTable] {
        &self.tables
    }

    /// Total number of symbols.
    pub fn len(&self) -> usize {
        self.tables.iter().map(SymbolTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector for a value of an attribute.
    ///
    /// Unregistered attributes and values are errors, never a zero vector.
    pub fn get_vector(&self, attribute: &str, value: &str) -> Result<&Vector> {
        let table = self
            .tables
            .iter()
            .find(|t| t.name == attribute)
            .ok_or_else(|| GraphVsaError::UnknownAttribute(attribute.to_string()))?;

        table.get(value).ok_or_else(|| GraphVsaError::UnknownSymbol {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
    }

    /// Serialize the populated vocabulary for external caching.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a vocabulary written by [`to_json`](Self::to_json).
    ///
    /// Every vector is checked against the recorded dimensionality.
    pub fn from_json(json: &str) -> Result<Self> {
        let vocab: Self = serde_json::from_str(json)?;
        for table in &vocab.tables {
            for vec in table.vectors.values() {
                if vec.dimensions() != vocab.dimensions {
                    return Err(GraphVsaError::DimensionMismatch {
                        expected: vocab.dimensions,
                        got: vec.dimensions(),
                    });
                }
            }
        }
        Ok(vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::NgramEmbedder;
    use crate::similarity::Similarity;

    fn schema() -> Schema {
        Schema::finalize(vec![
            Attribute::node_ids(3),
            Attribute::categorical("color", ["red", "blue"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_deterministic() {
        let v1 = Vocabulary::random(&schema(), 256, 42).unwrap();
        let v2 = Vocabulary::random(&schema(), 256, 42).unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_different_seeds() {
        let v1 = Vocabulary::random(&schema(), 256, 42).unwrap();
        let v2 = Vocabulary::random(&schema(), 256, 43).unwrap();
        assert_ne!(
            v1.get_vector("color", "red").unwrap(),
            v2.get_vector("color", "red").unwrap()
        );
    }

    #[test]
    fn test_distinct_node_ids() {
        let vocab = Vocabulary::random(&schema(), 256, 0).unwrap();
        let a = vocab.get_vector("node_id", "0").unwrap();
        let b = vocab.get_vector("node_id", "1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_symbols_unit_and_near_orthogonal() {
        let vocab = Vocabulary::random(&schema(), 2048, 0).unwrap();
        let red = vocab.get_vector("color", "red").unwrap();
        let blue = vocab.get_vector("color", "blue").unwrap();
        assert!((red.norm() - 1.0).abs() < 1e-12);
        assert!(Similarity::cosine(red, blue).abs() < 0.15);
    }

    #[test]
    fn test_size_attribute_populated() {
        let vocab = Vocabulary::random(&schema(), 64, 0).unwrap();
        assert!(vocab.get_vector("size", "number of nodes").is_ok());
        assert!(vocab.get_vector("size", "number of edges").is_ok());
        // 3 node ids + 2 colors + 2 sizes
        assert_eq!(vocab.len(), 7);
    }

    #[test]
    fn test_missing_symbol_is_error() {
        let vocab = Vocabulary::random(&schema(), 64, 0).unwrap();
        assert!(matches!(
            vocab.get_vector("color", "green"),
            Err(GraphVsaError::UnknownSymbol { attribute, value })
                if attribute == "color" && value == "green"
        ));
        assert!(matches!(
            vocab.get_vector("shape", "round"),
            Err(GraphVsaError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_text_vocabulary() {
        let embedder = NgramEmbedder::new(128);
        let vocab = Vocabulary::from_text(&schema(), &embedder).unwrap();
        assert_eq!(vocab.strategy(), "ngram");
        assert_eq!(vocab.dimensions(), 128);
        assert_eq!(
            vocab.get_vector("color", "red").unwrap(),
            &embedder.embed("red").unwrap()
        );
    }

    struct Ragged;

    impl TextEmbedder for Ragged {
        fn id(&self) -> &str {
            "ragged"
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn embed(&self, text: &str) -> Result<Vector> {
            Ok(Vector::zeros(if text == "blue" { 7 } else { 8 }))
        }
    }

    #[test]
    fn test_text_dimension_mismatch() {
        let err = Vocabulary::from_text(&schema(), &Ragged).unwrap_err();
        assert!(matches!(
            err,
            GraphVsaError::DimensionMismatch {
                expected: 8,
                got: 7
            }
        ));
    }

    #[test]
    fn test_json_is_byte_stable() {
        let a = Vocabulary::random(&schema(), 16, 5).unwrap().to_json().unwrap();
        let b = Vocabulary::random(&schema(), 16, 5).unwrap().to_json().unwrap();
        assert_eq!(a, b);

        let restored = Vocabulary::from_json(&a).unwrap();
        assert_eq!(restored.to_json().unwrap(), a);
    }

    #[test]
    fn test_json_roundtrip_keeps_lookups() {
        let vocab = Vocabulary::random(&schema(), 32, 5).unwrap();
        let restored = Vocabulary::from_json(&vocab.to_json().unwrap()).unwrap();
        assert_eq!(
            restored.get_vector("node_id", "2").unwrap(),
            vocab.get_vector("node_id", "2").unwrap()
        );
    }
}
