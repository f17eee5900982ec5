//! # graph-vsa: Graphs as Hypervectors
//!
//! graph-vsa encodes attributed graphs (molecules, proteins, hypergraphs)
//! into fixed-width vectors with Vector Symbolic Architecture operators, so
//! structure and attributes can be queried with vector algebra instead of
//! graph traversal.
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_vsa::{Attribute, AttributedGraph, EncoderConfig, GraphEncoder, VsaMethod};
//!
//! // node_id is mandatory; it bounds the largest graph the encoder accepts
//! let encoder = GraphEncoder::new(
//!     vec![
//!         Attribute::node_ids(32),
//!         Attribute::categorical("type", ["C", "O", "N", "H"]),
//!         Attribute::categorical("bond", ["single", "double"]),
//!     ],
//!     EncoderConfig::default()
//!         .with_method(VsaMethod::Hrr)
//!         .with_dim(1024)
//!         .with_levels(2),
//! )?;
//!
//! let co2 = AttributedGraph::from_json(r#"{
//!     "num_nodes": 3,
//!     "node_attributes": {"type": {"0": "O", "1": "C", "2": "O"}},
//!     "edge_attributes": {"bond": [[1, 0, "double"], [1, 2, "double"]]}
//! }"#)?;
//!
//! let vector = encoder.encode(&co2)?;
//! println!("{} -> {:?}", encoder.signature(), vector.as_single().map(|v| v.norm()));
//! # Ok::<(), graph_vsa::GraphVsaError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Bind**: associate two vectors; the result resembles neither
//! - **Bundle**: superpose vectors; the result resembles each of them
//! - **Vocabulary**: one fixed vector per (attribute, value)
//! - **Level**: one round of neighbour and attribute propagation
//! - **Signature**: a cache key describing an encoder configuration

pub mod embedding;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod primitives;
pub mod schema;
pub mod similarity;
pub mod vector;
pub mod vocabulary;

// Re-exports for convenience
pub use embedding::{NgramEmbedder, TextEmbedder};
pub use encoder::{EncoderConfig, Encoding, GraphEncoder, Propagation};
pub use error::{GraphVsaError, Result};
pub use graph::{AttributedGraph, Graph, Hypergraph, NodeId};
pub use primitives::{Operator, VsaMethod};
pub use schema::{Attribute, Schema};
pub use similarity::{Metric, Similarity};
pub use vector::Vector;
pub use vocabulary::Vocabulary;
