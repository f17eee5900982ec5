//! Graph containers consumed by the encoder.
//!
//! The encoder only needs what the [`Graph`] trait exposes: a node count, a
//! dense adjacency matrix, and named attribute maps. [`AttributedGraph`] is an
//! in-memory undirected implementation (molecules, proteins, generic graphs);
//! [`Hypergraph`] converts to one by clique expansion.
//!
//! Edge attributes are keyed by ordered pair `(u, v)` in the orientation the
//! edge was first added, while the adjacency matrix is symmetric. The encoder
//! relies on that distinction, so containers must not mirror edge attributes.

use crate::error::{GraphVsaError, Result};
use crate::schema::HYPEREDGE;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Graph node identifier (dense integers `0..num_nodes`).
pub type NodeId = usize;

/// What the encoder reads from a graph.
pub trait Graph {
    /// Number of nodes; ids are `0..number_of_nodes()`.
    fn number_of_nodes(&self) -> usize;

    /// Dense adjacency matrix; entry `(i, j)` non-zero when `i` links to `j`.
    fn adjacency_matrix(&self) -> Vec<Vec<f64>>;

    /// Values of one node attribute, by node.
    fn node_attributes(&self, name: &str) -> BTreeMap<NodeId, String>;

    /// Values of one edge attribute, by ordered node pair.
    fn edge_attributes(&self, name: &str) -> BTreeMap<(NodeId, NodeId), String>;
}

/// Textual form of a JSON attribute value.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Undirected graph with weighted edges and categorical attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributedGraph {
    num_nodes: usize,
    /// Edges in insertion order, orientation as first given
    edges: Vec<(NodeId, NodeId, f64)>,
    /// Unordered pair → index into `edges`
    edge_index: HashMap<(NodeId, NodeId), usize>,
    node_attrs: BTreeMap<String, BTreeMap<NodeId, String>>,
    edge_attrs: BTreeMap<String, BTreeMap<(NodeId, NodeId), String>>,
}

#[derive(Deserialize)]
struct GraphRecord {
    num_nodes: usize,
    #[serde(default)]
    edges: Vec<(NodeId, NodeId)>,
    #[serde(default)]
    node_attributes: BTreeMap<String, BTreeMap<NodeId, Value>>,
    #[serde(default)]
    edge_attributes: BTreeMap<String, Vec<(NodeId, NodeId, Value)>>,
}

impl AttributedGraph {
    /// Graph with `num_nodes` isolated nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            ..Default::default()
        }
    }

    /// Build from an unweighted edge list; the node count is given explicitly
    /// so trailing isolated nodes are kept.
    pub fn from_edges(num_nodes: usize, edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let mut graph = Self::new(num_nodes);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Parse the JSON interchange format:
    ///
    /// ```json
    /// {
    ///   "num_nodes": 3,
    ///   "edges": [[0, 1], [1, 2]],
    ///   "node_attributes": {"type": {"0": "C", "1": "O"}},
    ///   "edge_attributes": {"bond": [[0, 1, "double"]]}
    /// }
    /// ```
    ///
    /// Non-string attribute values are kept in their JSON textual form.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: GraphRecord = serde_json::from_str(json)?;
        let mut graph = Self::from_edges(record.num_nodes, &record.edges)?;

        for (name, values) in &record.node_attributes {
            for (&node, value) in values {
                graph.set_node_attribute(name, node, value_text(value))?;
            }
        }
        for (name, values) in &record.edge_attributes {
            for (u, v, value) in values {
                graph.set_edge_attribute(name, *u, *v, value_text(value))?;
            }
        }

        Ok(graph)
    }

    /// Add an edge of weight 1.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.add_weighted_edge(u, v, 1.0)
    }

    /// Add an edge, or update the weight of an existing one.
    ///
    /// Self-loops are allowed and appear on the adjacency diagonal.
    pub fn add_weighted_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        self.check_node(u)?;
        self.check_node(v)?;

        let key = (u.min(v), u.max(v));
        match self.edge_index.get(&key) {
            Some(&idx) => self.edges[idx].2 = weight,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push((u, v, weight));
            }
        }
        Ok(())
    }

    /// Set a node attribute value.
    pub fn set_node_attribute(
        &mut self,
        name: &str,
        node: NodeId,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_node(node)?;
        self.node_attrs
            .entry(name.to_string())
            .or_default()
            .insert(node, value.into());
        Ok(())
    }

    /// Set an edge attribute value, adding the edge if it does not exist.
    ///
    /// The value is stored under the edge's own orientation, so setting it on
    /// `(v, u)` for an edge first added as `(u, v)` still keys it `(u, v)`.
    pub fn set_edge_attribute(
        &mut self,
        name: &str,
        u: NodeId,
        v: NodeId,
        value: impl Into<String>,
    ) -> Result<()> {
        if !self.has_edge(u, v) {
            self.add_edge(u, v)?;
        }
        let key = self.edge_key(u, v);
        self.edge_attrs
            .entry(name.to_string())
            .or_default()
            .insert(key, value.into());
        Ok(())
    }

    /// Number of edges, self-loops included.
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order as `(u, v, weight)`.
    pub fn edges(&self) -> &[(NodeId, NodeId, f64)] {
        &self.edges
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_index.contains_key(&(u.min(v), u.max(v)))
    }

    /// Neighbours of a node in ascending order.
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .edges
            .iter()
            .filter_map(|&(u, v, _)| {
                if u == node {
                    Some(v)
                } else if v == node {
                    Some(u)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Degree of a node; a self-loop counts twice.
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges
            .iter()
            .map(|&(u, v, _)| (u == node) as usize + (v == node) as usize)
            .sum()
    }

    fn edge_key(&self, u: NodeId, v: NodeId) -> (NodeId, NodeId) {
        match self.edge_index.get(&(u.min(v), u.max(v))) {
            Some(&idx) => (self.edges[idx].0, self.edges[idx].1),
            None => (u, v),
        }
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node >= self.num_nodes {
            return Err(GraphVsaError::NodeOutOfRange {
                node,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }
}

impl Graph for AttributedGraph {
    fn number_of_nodes(&self) -> usize {
        self.num_nodes
    }

    fn adjacency_matrix(&self) -> Vec<Vec<f64>> {
        let mut matrix = vec![vec![0.0; self.num_nodes]; self.num_nodes];
        for &(u, v, w) in &self.edges {
            matrix[u][v] = w;
            matrix[v][u] = w;
        }
        matrix
    }

    fn node_attributes(&self, name: &str) -> BTreeMap<NodeId, String> {
        self.node_attrs.get(name).cloned().unwrap_or_default()
    }

    fn edge_attributes(&self, name: &str) -> BTreeMap<(NodeId, NodeId), String> {
        self.edge_attrs.get(name).cloned().unwrap_or_default()
    }
}

/// A hypergraph: nodes `0..num_nodes` and named hyperedges over them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hypergraph {
    num_nodes: usize,
    hyperedges: Vec<(String, Vec<NodeId>)>,
}

impl Hypergraph {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            hyperedges: Vec::new(),
        }
    }

    /// Parse `{"num_nodes": n, "<edge name>": [nodes...], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: BTreeMap<String, Value> = serde_json::from_str(json)?;

        let num_nodes = match record.get("num_nodes") {
            Some(v) => serde_json::from_value::<usize>(v.clone())?,
            None => {
                return Err(GraphVsaError::InvalidConfig(
                    "hypergraph record has no num_nodes".to_string(),
                ))
            }
        };

        let mut graph = Self::new(num_nodes);
        for (name, members) in record {
            if name == "num_nodes" {
                continue;
            }
            let members: Vec<NodeId> = serde_json::from_value(members)?;
            graph.add_hyperedge(name, members)?;
        }
        Ok(graph)
    }

    /// Add a named hyperedge over `members`.
    pub fn add_hyperedge(&mut self, name: impl Into<String>, members: Vec<NodeId>) -> Result<()> {
        if let Some(&node) = members.iter().find(|&&n| n >= self.num_nodes) {
            return Err(GraphVsaError::NodeOutOfRange {
                node,
                num_nodes: self.num_nodes,
            });
        }
        self.hyperedges.push((name.into(), members));
        Ok(())
    }

    pub fn number_of_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn number_of_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    pub fn hyperedges(&self) -> &[(String, Vec<NodeId>)] {
        &self.hyperedges
    }

    /// Number of hyperedges containing `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.hyperedges
            .iter()
            .filter(|(_, members)| members.contains(&node))
            .count()
    }

    /// Clique expansion: every pair of nodes sharing a hyperedge is linked,
    /// and the pair carries a [`HYPEREDGE`] edge attribute naming it.
    ///
    /// A pair shared by several hyperedges keeps the name of the first one.
    pub fn to_graph(&self) -> Result<AttributedGraph> {
        let mut graph = AttributedGraph::new(self.num_nodes);
        for (name, members) in &self.hyperedges {
            for (i, &u) in members.iter().enumerate() {
                for &v in &members[i + 1..] {
                    if u != v && !graph.has_edge(u, v) {
                        graph.set_edge_attribute(HYPEREDGE, u, v, name.clone())?;
                    }
                }
            }
        }
        Ok(graph)
    }
}
