//! Attribute schema: the named categorical dimensions an encoder knows.
//!
//! A caller supplies a list of [`Attribute`]s that must include `node_id`.
//! [`Schema::finalize`] validates that list and returns a new schema with the
//! synthetic `size` attribute appended; the caller's list is never touched.

use crate::error::{GraphVsaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the mandatory node identity attribute.
pub const NODE_ID: &str = "node_id";

/// Name of the synthetic graph size attribute.
pub const SIZE: &str = "size";

/// Edge attribute naming the hyperedge a clique-expanded pair came from.
pub const HYPEREDGE: &str = "hyperedge";

/// Value of [`SIZE`] keying the node-count symbol used in pooling.
pub const NUMBER_OF_NODES: &str = "number of nodes";

/// Value of [`SIZE`] keying the edge-count symbol.
pub const NUMBER_OF_EDGES: &str = "number of edges";

/// A named categorical attribute and its value domain.
///
/// Values are kept in their textual form; that form is both the lookup key
/// and the input to text-derived vector strategies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    /// Categorical attribute over the given values.
    pub fn categorical<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// The `node_id` attribute covering ids `0..max_nodes`.
    pub fn node_ids(max_nodes: usize) -> Self {
        Self::categorical(NODE_ID, 0..max_nodes)
    }

    fn size() -> Self {
        Self::categorical(SIZE, [NUMBER_OF_NODES, NUMBER_OF_EDGES])
    }
}

/// A validated attribute list, `size` included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
    /// Caller-supplied names, sorted
    user_names: Vec<String>,
}

impl Schema {
    /// Validate a caller-supplied attribute list and append `size`.
    ///
    /// Fails when `node_id` is absent, when a caller supplies `size`, or when
    /// two attributes share a name.
    pub fn finalize(attributes: Vec<Attribute>) -> Result<Self> {
        if !attributes.iter().any(|a| a.name == NODE_ID) {
            return Err(GraphVsaError::MissingNodeId);
        }

        let mut seen = HashSet::new();
        for attr in &attributes {
            if attr.name == SIZE {
                return Err(GraphVsaError::ReservedAttribute(SIZE.to_string()));
            }
            if !seen.insert(attr.name.as_str()) {
                return Err(GraphVsaError::DuplicateAttribute(attr.name.clone()));
            }
        }

        let mut user_names: Vec<String> = attributes.iter().map(|a| a.name.clone()).collect();
        user_names.sort();

        let mut attributes = attributes;
        attributes.push(Attribute::size());

        Ok(Self {
            attributes,
            user_names,
        })
    }

    /// All attributes in declaration order, `size` last.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Sorted names of the caller-supplied attributes (`size` excluded).
    pub fn user_names(&self) -> &[String] {
        &self.user_names
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Largest node id the schema can represent, plus one.
    pub fn max_nodes(&self) -> usize {
        self.get(NODE_ID).map(|a| a.values.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_appends_size() {
        let schema = Schema::finalize(vec![
            Attribute::node_ids(4),
            Attribute::categorical("color", ["red", "blue"]),
        ])
        .unwrap();

        let names: Vec<&str> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["node_id", "color", "size"]);
        assert_eq!(
            schema.get(SIZE).unwrap().values,
            vec!["number of nodes", "number of edges"]
        );
        assert_eq!(schema.user_names(), &["color", "node_id"]);
        assert_eq!(schema.max_nodes(), 4);
    }

    #[test]
    fn test_missing_node_id() {
        let err = Schema::finalize(vec![Attribute::categorical("color", ["red"])]).unwrap_err();
        assert!(matches!(err, GraphVsaError::MissingNodeId));
    }

    #[test]
    fn test_reserved_size() {
        let err = Schema::finalize(vec![
            Attribute::node_ids(2),
            Attribute::categorical("size", ["big"]),
        ])
        .unwrap_err();
        assert!(matches!(err, GraphVsaError::ReservedAttribute(_)));
    }

    #[test]
    fn test_duplicate_name() {
        let err = Schema::finalize(vec![
            Attribute::node_ids(2),
            Attribute::categorical("color", ["red"]),
            Attribute::categorical("color", ["blue"]),
        ])
        .unwrap_err();
        assert!(matches!(err, GraphVsaError::DuplicateAttribute(n) if n == "color"));
    }

    #[test]
    fn test_node_ids_are_textual() {
        assert_eq!(Attribute::node_ids(3).values, vec!["0", "1", "2"]);
    }
}
