//! Error types for graph encoding.

use thiserror::Error;

/// Errors raised while configuring an encoder or encoding a graph.
#[derive(Error, Debug)]
pub enum GraphVsaError {
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The attribute schema has no `node_id` attribute
    #[error("Attribute node_id is missing")]
    MissingNodeId,

    /// A user-supplied attribute uses a name the encoder reserves
    #[error("Attribute name `{0}` is reserved")]
    ReservedAttribute(String),

    /// Two attributes share a name
    #[error("Duplicate attribute `{0}`")]
    DuplicateAttribute(String),

    /// Operator name is not one of hrr, map, vtb
    #[error("Unknown method {0}")]
    UnknownMethod(String),

    /// Vector strategy has no known text embedder
    #[error("Unknown vector strategy `{0}`")]
    UnknownVectorStrategy(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Attribute not present in the vocabulary
    #[error("Unknown attribute `{0}`")]
    UnknownAttribute(String),

    /// Attribute value never registered in the vocabulary
    #[error("No vector for value `{value}` of attribute `{attribute}`")]
    UnknownSymbol { attribute: String, value: String },

    /// Invalid vector dimensions
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Adjacency matrix is not square
    #[error("Adjacency matrix is not square: {rows} rows, row of length {cols}")]
    NonSquareAdjacency { rows: usize, cols: usize },

    /// Adjacency size disagrees with the reported node count
    #[error("Graph reports {reported} nodes but adjacency has {rows} rows")]
    NodeCountMismatch { reported: usize, rows: usize },

    /// Node index outside [0, num_nodes)
    #[error("Node {node} out of range for graph with {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    /// Pooling requested on a graph without nodes
    #[error("Cannot pool an empty graph")]
    EmptyGraph,
}

/// Result type alias for graph-vsa operations.
pub type Result<T> = std::result::Result<T, GraphVsaError>;
