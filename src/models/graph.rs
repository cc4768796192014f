//! Two-tier commit/path graph.
//!
//! Nodes live in one insertion-ordered table keyed by `NodeKey`. The key is
//! derived from the node variant, so a commit id and a path with the same
//! spelling never share a slot. Edges always run commit -> path and are
//! deduplicated by (commit, path) pair.

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NodeKey {
    Commit(String),
    Path(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Box,
    Ellipse,
}

impl NodeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Ellipse => "ellipse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    pub path: String,
    /// Diff annotations, one per contributing commit under `Accumulate`,
    /// at most one under `LastWriteWins`
    pub annotations: Vec<String>,
}

impl PathNode {
    pub fn label(&self) -> String {
        let mut label = self.path.clone();
        for annotation in &self.annotations {
            label.push('\n');
            label.push_str(annotation);
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GraphNode {
    Commit(CommitNode),
    Path(PathNode),
}

impl GraphNode {
    pub fn key(&self) -> NodeKey {
        match self {
            GraphNode::Commit(node) => NodeKey::Commit(node.id.clone()),
            GraphNode::Path(node) => NodeKey::Path(node.path.clone()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            GraphNode::Commit(node) => node.label.clone(),
            GraphNode::Path(node) => node.label(),
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            GraphNode::Commit(_) => NodeShape::Box,
            GraphNode::Path(_) => NodeShape::Ellipse,
        }
    }
}

/// "Commit touched path."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub commit: String,
    pub path: String,
}

impl GraphEdge {
    pub fn source(&self) -> NodeKey {
        NodeKey::Commit(self.commit.clone())
    }

    pub fn target(&self) -> NodeKey {
        NodeKey::Path(self.path.clone())
    }
}

/// What happens to a path node's annotation when another commit touches the
/// same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The annotation of the last processed commit replaces earlier ones.
    /// With newest-first history this leaves the oldest commit's diff.
    #[default]
    LastWriteWins,
    /// Every commit's annotation is kept, in processing order.
    Accumulate,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeKey, GraphNode>,
    edges: IndexSet<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or merge it into the node already stored under the same
    /// key. Commit labels are always replaced; path annotations follow `policy`.
    pub fn upsert_node(&mut self, node: GraphNode, policy: MergePolicy) {
        match self.nodes.entry(node.key()) {
            Entry::Occupied(mut slot) => match (slot.get_mut(), node) {
                (GraphNode::Path(existing), GraphNode::Path(incoming)) => match policy {
                    MergePolicy::LastWriteWins => existing.annotations = incoming.annotations,
                    MergePolicy::Accumulate => existing.annotations.extend(incoming.annotations),
                },
                (existing, incoming) => *existing = incoming,
            },
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    /// Add a commit -> path edge. Returns `false` for duplicates and for
    /// edges whose endpoints have not been registered; orphan edges are
    /// never stored.
    pub fn add_edge(&mut self, commit: &str, path: &str) -> bool {
        let commit_key = NodeKey::Commit(commit.to_string());
        let path_key = NodeKey::Path(path.to_string());
        if !self.nodes.contains_key(&commit_key) || !self.nodes.contains_key(&path_key) {
            tracing::debug!("Refusing edge {} -> {}: endpoint missing", commit, path);
            return false;
        }
        self.edges.insert(GraphEdge {
            commit: commit.to_string(),
            path: path.to_string(),
        })
    }

    #[cfg(test)]
    pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    #[cfg(test)]
    pub fn has_edge(&self, commit: &str, path: &str) -> bool {
        self.edges.contains(&GraphEdge {
            commit: commit.to_string(),
            path: path.to_string(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&GraphNode> = self.nodes.values().collect();
        let edges: Vec<&GraphEdge> = self.edges.iter().collect();
        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str) -> GraphNode {
        GraphNode::Commit(CommitNode {
            id: id.to_string(),
            label: id.to_string(),
        })
    }

    fn path(path: &str, annotation: &str) -> GraphNode {
        GraphNode::Path(PathNode {
            path: path.to_string(),
            annotations: vec![annotation.to_string()],
        })
    }

    #[test]
    fn test_same_string_different_kinds_do_not_collide() {
        let mut graph = Graph::new();
        graph.upsert_node(commit("README"), MergePolicy::default());
        graph.upsert_node(path("README", "+x"), MergePolicy::default());
        assert_eq!(graph.node_count(), 2);
        assert!(graph.add_edge("README", "README"));
    }

    #[test]
    fn test_duplicate_edge_is_noop() {
        let mut graph = Graph::new();
        graph.upsert_node(commit("c1"), MergePolicy::default());
        graph.upsert_node(path("a.txt", ""), MergePolicy::default());
        assert!(graph.add_edge("c1", "a.txt"));
        assert!(!graph.add_edge("c1", "a.txt"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_orphan_edge_rejected() {
        let mut graph = Graph::new();
        graph.upsert_node(path("a.txt", ""), MergePolicy::default());
        assert!(!graph.add_edge("missing", "a.txt"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_last_write_wins_replaces_annotation() {
        let mut graph = Graph::new();
        graph.upsert_node(path("p", "+y"), MergePolicy::LastWriteWins);
        graph.upsert_node(path("p", "+x"), MergePolicy::LastWriteWins);
        let label = graph.node(&NodeKey::Path("p".into())).map(GraphNode::label);
        assert_eq!(label.as_deref(), Some("p\n+x"));
    }

    #[test]
    fn test_accumulate_keeps_every_annotation() {
        let mut graph = Graph::new();
        graph.upsert_node(path("p", "+y"), MergePolicy::Accumulate);
        graph.upsert_node(path("p", "+x"), MergePolicy::Accumulate);
        let label = graph.node(&NodeKey::Path("p".into())).map(GraphNode::label);
        assert_eq!(label.as_deref(), Some("p\n+y\n+x"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut graph = Graph::new();
        graph.upsert_node(commit("c2"), MergePolicy::default());
        graph.upsert_node(commit("c1"), MergePolicy::default());
        graph.upsert_node(commit("c2"), MergePolicy::default());
        let keys: Vec<NodeKey> = graph.nodes().map(GraphNode::key).collect();
        assert_eq!(keys, vec![NodeKey::Commit("c2".into()), NodeKey::Commit("c1".into())]);
    }

    #[test]
    fn test_serializes_nodes_and_edges() {
        let mut graph = Graph::new();
        graph.upsert_node(commit("c1"), MergePolicy::default());
        graph.upsert_node(path("a.txt", "+x"), MergePolicy::default());
        graph.add_edge("c1", "a.txt");
        let json = serde_json::to_value(&graph).expect("serialize");
        assert_eq!(json["nodes"][0]["kind"], "commit");
        assert_eq!(json["nodes"][1]["path"], "a.txt");
        assert_eq!(json["edges"][0]["commit"], "c1");
    }
}
