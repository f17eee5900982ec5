//! Graph Encoder: attributed graphs to vectors.
//!
//! # Propagation
//!
//! Every node starts as its `node_id` symbol. One *level* rebuilds each node
//! from the previous level's vectors:
//!
//! ```text
//! new[i] = Σ_{j : A[i,j] ≠ 0}  bind(prev[i], prev[j])             neighbours
//!        + Σ_{attr}            bind(prev[i], vocab(attr, v_i))     node attributes
//!        + Σ_{attr, (i,j)}     bind(bind(prev[i], prev[j]),
//!                                   vocab(attr, v_ij))             edge attributes
//! ```
//!
//! and the unit-normalized `new` becomes `prev` for the next level. The last
//! level's vectors are returned as they are, without that final
//! normalization.
//!
//! Binding a fact to the node's current identity before bundling keeps the
//! facts of different nodes apart; normalizing between levels keeps repeated
//! bundling from inflating the magnitudes.
//!
//! # Pooling
//!
//! With `nodewise = false` the node vectors are bundled in node-id order and
//! the result is bundled once more with
//! `bind(vocab("size", "number of nodes"), r[N-1])`.

use crate::embedding::{NgramEmbedder, TextEmbedder};
use crate::error::{GraphVsaError, Result};
use crate::graph::{Graph, NodeId};
use crate::primitives::{Operator, VsaMethod};
use crate::schema::{Attribute, Schema, NODE_ID, NUMBER_OF_NODES, SIZE};
use crate::vector::Vector;
use crate::vocabulary::{Vocabulary, RANDOM_STRATEGY};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Encoder configuration.
///
/// Defaults: `hrr`, 512 dimensions, random vectors, one pooled vector per
/// graph, one level, seed 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Binding algebra
    pub method: VsaMethod,
    /// Vector dimensionality (random and built-in text strategies)
    pub dim: usize,
    /// `"random"` or a text embedder id
    pub vectors: String,
    /// One vector per node instead of one per graph
    pub nodewise: bool,
    /// Number of propagation rounds
    pub levels: usize,
    /// Seed for random vectors
    pub seed: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            method: VsaMethod::Hrr,
            dim: 512,
            vectors: RANDOM_STRATEGY.to_string(),
            nodewise: false,
            levels: 1,
            seed: 0,
        }
    }
}

impl EncoderConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_method(mut self, method: VsaMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn with_vectors(mut self, vectors: impl Into<String>) -> Self {
        self.vectors = vectors.into();
        self
    }

    pub fn with_nodewise(mut self, nodewise: bool) -> Self {
        self.nodewise = nodewise;
        self
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// The result of encoding one graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Encoding {
    /// One pooled vector for the whole graph
    Single(Vector),
    /// One vector per node, in node-id order
    Nodewise(Vec<Vector>),
}

impl Encoding {
    /// The pooled vector, if this is a single encoding.
    pub fn as_single(&self) -> Option<&Vector> {
        match self {
            Encoding::Single(v) => Some(v),
            Encoding::Nodewise(_) => None,
        }
    }

    /// The per-node vectors, if this is a nodewise encoding.
    pub fn as_nodes(&self) -> Option<&[Vector]> {
        match self {
            Encoding::Single(_) => None,
            Encoding::Nodewise(nodes) => Some(nodes),
        }
    }

    /// All vectors as rows (one row for a single encoding).
    pub fn into_rows(self) -> Vec<Vector> {
        match self {
            Encoding::Single(v) => vec![v],
            Encoding::Nodewise(nodes) => nodes,
        }
    }
}

/// Node vectors recorded during propagation.
#[derive(Clone, Debug, PartialEq)]
pub struct Propagation {
    /// `inputs[l]` are the vectors fed into level `l`; `inputs[0]` are the
    /// `node_id` symbols, later entries are unit-normalized.
    pub inputs: Vec<Vec<Vector>>,
    /// Un-normalized output of the last level.
    pub output: Vec<Vector>,
}

/// Everything a level reads from the graph, resolved against the vocabulary.
struct Plan<'a> {
    /// Non-zero adjacency columns per row, ascending
    neighbors: Vec<Vec<NodeId>>,
    /// Node attribute symbols per node, in schema order
    node_symbols: Vec<Vec<&'a Vector>>,
    /// `(j, symbol)` per node for edge keys `(i, j)`, in schema then key order
    edge_symbols: Vec<Vec<(NodeId, &'a Vector)>>,
    /// `node_id` symbols, the level-0 input
    identities: Vec<Vector>,
}

/// Encodes graphs with a fixed schema, vocabulary and operator.
///
/// The encoder is immutable once built and is `Send + Sync`; share it (for
/// example behind an `Arc`) to encode many graphs in parallel.
///
/// # Example
///
/// ```rust
/// use graph_vsa::{Attribute, AttributedGraph, EncoderConfig, GraphEncoder, VsaMethod};
///
/// let encoder = GraphEncoder::new(
///     vec![
///         Attribute::node_ids(16),
///         Attribute::categorical("type", ["C", "O", "N"]),
///     ],
///     EncoderConfig::default().with_method(VsaMethod::Map).with_dim(1024),
/// )?;
///
/// let mut mol = AttributedGraph::from_edges(2, &[(0, 1)])?;
/// mol.set_node_attribute("type", 0, "C")?;
/// mol.set_node_attribute("type", 1, "O")?;
///
/// let encoding = encoder.encode(&mol)?;
/// assert_eq!(encoding.as_single().unwrap().dimensions(), 1024);
/// # Ok::<(), graph_vsa::GraphVsaError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GraphEncoder {
    config: EncoderConfig,
    schema: Schema,
    vocabulary: Vocabulary,
    operator: Operator,
    signature: String,
}

impl GraphEncoder {
    /// Build an encoder using the random or built-in `"ngram"` strategy.
    pub fn new(attributes: Vec<Attribute>, config: EncoderConfig) -> Result<Self> {
        let strategy = config.vectors.clone();
        match strategy.as_str() {
            RANDOM_STRATEGY => {
                let (dim, seed) = (config.dim, config.seed);
                Self::build(attributes, config, dim, |schema| {
                    Vocabulary::random(schema, dim, seed)
                })
            }
            NgramEmbedder::ID => {
                let embedder = NgramEmbedder::new(config.dim).with_seed(config.seed);
                Self::with_embedder(attributes, config, &embedder)
            }
            other => Err(GraphVsaError::UnknownVectorStrategy(other.to_string())),
        }
    }

    /// Build an encoder whose symbols come from `embedder`.
    ///
    /// The embedder's id and dimensionality replace `config.vectors` and
    /// `config.dim`.
    pub fn with_embedder(
        attributes: Vec<Attribute>,
        mut config: EncoderConfig,
        embedder: &dyn TextEmbedder,
    ) -> Result<Self> {
        config.vectors = embedder.id().to_string();
        config.dim = embedder.dimensions();
        let dim = config.dim;
        Self::build(attributes, config, dim, |schema| {
            Vocabulary::from_text(schema, embedder)
        })
    }

    fn build<F>(
        attributes: Vec<Attribute>,
        config: EncoderConfig,
        dim: usize,
        make_vocabulary: F,
    ) -> Result<Self>
    where
        F: FnOnce(&Schema) -> Result<Vocabulary>,
    {
        info!("Initializing graph encoder");

        debug!("Checking existence of node id symbols");
        let schema = Schema::finalize(attributes)?;

        if config.levels == 0 {
            return Err(GraphVsaError::InvalidConfig(
                "levels must be positive".to_string(),
            ));
        }

        debug!(method = %config.method, "Using VSA");
        let operator = Operator::new(config.method, dim)?;

        debug!(strategy = %config.vectors, "Initializing symbol vectors");
        let vocabulary = make_vocabulary(&schema)?;
        if vocabulary.dimensions() != operator.dimensions() {
            return Err(GraphVsaError::DimensionMismatch {
                expected: operator.dimensions(),
                got: vocabulary.dimensions(),
            });
        }

        let signature = Self::make_signature(&schema, &config);
        info!(%signature, "Graph encoder initialized");

        Ok(Self {
            config,
            schema,
            vocabulary,
            operator,
            signature,
        })
    }

    /// `names_dim-or-strategy_method_mode_levels`, names sorted and joined by
    /// `*`. The synthetic `size` attribute is not part of the name list.
    fn make_signature(schema: &Schema, config: &EncoderConfig) -> String {
        let vectors = if config.vectors == RANDOM_STRATEGY {
            config.dim.to_string()
        } else {
            config.vectors.clone()
        };
        format!(
            "{}_{}_{}_{}_{}",
            schema.user_names().join("*"),
            vectors,
            config.method,
            if config.nodewise { "nodewise" } else { "single" },
            config.levels
        )
    }

    /// Fingerprint of this configuration, for cache keys.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// The finalized schema, `size` included.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The populated vocabulary.
    pub fn get_vectors(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Output vector length.
    pub fn dimensions(&self) -> usize {
        self.operator.dimensions()
    }

    /// Encode one graph.
    ///
    /// Fails on a malformed adjacency, on any attribute value or node id
    /// missing from the vocabulary, and when pooling a graph with no nodes.
    pub fn encode<G: Graph + ?Sized>(&self, graph: &G) -> Result<Encoding> {
        if !self.config.nodewise && graph.number_of_nodes() == 0 {
            return Err(GraphVsaError::EmptyGraph);
        }

        let nodes = self.run(graph, false)?.output;

        if self.config.nodewise {
            return Ok(Encoding::Nodewise(nodes));
        }
        self.pool(&nodes).map(Encoding::Single)
    }

    /// Run propagation and keep every level's input.
    pub fn propagate<G: Graph + ?Sized>(&self, graph: &G) -> Result<Propagation> {
        self.run(graph, true)
    }

    fn run<G: Graph + ?Sized>(&self, graph: &G, keep_inputs: bool) -> Result<Propagation> {
        let plan = self.plan(graph)?;
        let num_nodes = plan.identities.len();
        debug!(
            num_nodes,
            levels = self.config.levels,
            "Encoding graph"
        );

        let mut inputs = Vec::new();
        let mut prev = plan.identities.clone();
        let mut output = Vec::new();

        for level in 0..self.config.levels {
            output = self.level(&plan, &prev);
            trace!(level, "Level done");

            let next: Vec<Vector> = output.iter().map(Vector::normalized).collect();
            if keep_inputs {
                inputs.push(std::mem::replace(&mut prev, next));
            } else {
                prev = next;
            }
        }

        Ok(Propagation { inputs, output })
    }

    /// Read the graph once and resolve every symbol a level needs.
    fn plan<G: Graph + ?Sized>(&self, graph: &G) -> Result<Plan<'_>> {
        let num_nodes = graph.number_of_nodes();
        let adjacency = graph.adjacency_matrix();

        if adjacency.len() != num_nodes {
            return Err(GraphVsaError::NodeCountMismatch {
                reported: num_nodes,
                rows: adjacency.len(),
            });
        }
        if let Some(row) = adjacency.iter().find(|row| row.len() != num_nodes) {
            return Err(GraphVsaError::NonSquareAdjacency {
                rows: num_nodes,
                cols: row.len(),
            });
        }

        let neighbors: Vec<Vec<NodeId>> = adjacency
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &w)| w != 0.0)
                    .map(|(j, _)| j)
                    .collect::<Vec<NodeId>>()
            })
            .collect();

        let check = |node: NodeId| {
            if node >= num_nodes {
                Err(GraphVsaError::NodeOutOfRange { node, num_nodes })
            } else {
                Ok(())
            }
        };

        let mut node_symbols: Vec<Vec<&Vector>> = vec![Vec::new(); num_nodes];
        for attr in self.schema.attributes() {
            if attr.name == NODE_ID || attr.name == SIZE {
                continue;
            }
            for (node, value) in graph.node_attributes(&attr.name) {
                check(node)?;
                node_symbols[node].push(self.vocabulary.get_vector(&attr.name, &value)?);
            }
        }

        // Edge attributes are read for every schema attribute, keyed by
        // ordered pair, and only ever credited to the first node of the key.
        let mut edge_symbols: Vec<Vec<(NodeId, &Vector)>> = vec![Vec::new(); num_nodes];
        for attr in self.schema.attributes() {
            for ((i, j), value) in graph.edge_attributes(&attr.name) {
                check(i)?;
                check(j)?;
                edge_symbols[i].push((j, self.vocabulary.get_vector(&attr.name, &value)?));
            }
        }

        let identities = (0..num_nodes)
            .map(|i| {
                self.vocabulary
                    .get_vector(NODE_ID, &i.to_string())
                    .cloned()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Plan {
            neighbors,
            node_symbols,
            edge_symbols,
            identities,
        })
    }

    /// One propagation level. Nodes only read `prev`, so they are
    /// independent of each other.
    fn level(&self, plan: &Plan<'_>, prev: &[Vector]) -> Vec<Vector> {
        #[cfg(feature = "parallel")]
        let nodes: Vec<Vector> = (0..prev.len())
            .into_par_iter()
            .map(|i| self.update_node(plan, prev, i))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let nodes: Vec<Vector> = (0..prev.len())
            .map(|i| self.update_node(plan, prev, i))
            .collect();
        nodes
    }

    fn update_node(&self, plan: &Plan<'_>, prev: &[Vector], i: NodeId) -> Vector {
        let op = &self.operator;
        let mut acc = Vector::zeros(op.dimensions());

        for &j in &plan.neighbors[i] {
            op.bundle_into(&mut acc, &op.bind(&prev[i], &prev[j]));
        }
        for &symbol in &plan.node_symbols[i] {
            op.bundle_into(&mut acc, &op.bind(&prev[i], symbol));
        }
        for &(j, symbol) in &plan.edge_symbols[i] {
            op.bundle_into(&mut acc, &op.bind(&op.bind(&prev[i], &prev[j]), symbol));
        }

        acc
    }

    /// Bundle node vectors left to right, then add the size term.
    fn pool(&self, nodes: &[Vector]) -> Result<Vector> {
        let (last, _) = nodes.split_last().ok_or(GraphVsaError::EmptyGraph)?;

        let mut pooled = nodes[0].clone();
        for node in &nodes[1..] {
            self.operator.bundle_into(&mut pooled, node);
        }

        let size = self.vocabulary.get_vector(SIZE, NUMBER_OF_NODES)?;
        self.operator
            .bundle_into(&mut pooled, &self.operator.bind(size, last));

        Ok(pooled)
    }
}
