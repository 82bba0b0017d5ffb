use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            group: None,
            x: None,
            y: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// The node/edge documents the site knows how to load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GraphDoc {
    Main,
    Folksonomy,
    Taxonoman,
}

impl GraphDoc {
    pub fn path(self) -> &'static str {
        match self {
            GraphDoc::Main => "vis/data.json",
            GraphDoc::Folksonomy => "vis/folksonomy.json",
            GraphDoc::Taxonoman => "vis/taxonoman.json",
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to load {}: {reason}", .doc.path())]
pub struct SourceError {
    pub doc: GraphDoc,
    pub reason: String,
}

impl SourceError {
    pub fn new(doc: GraphDoc, reason: impl Into<String>) -> Self {
        Self {
            doc,
            reason: reason.into(),
        }
    }
}

pub trait GraphSource {
    fn load(&self, doc: GraphDoc) -> Result<GraphData, SourceError>;
}

/// Serves documents from memory; handy for tests and for front-ends that
/// bundle their graphs.
#[derive(Debug, Clone, Default)]
pub struct StaticGraphSource {
    docs: BTreeMap<String, GraphData>,
}

impl StaticGraphSource {
    pub fn with(mut self, doc: GraphDoc, data: GraphData) -> Self {
        self.docs.insert(doc.path().to_string(), data);
        self
    }
}

impl GraphSource for StaticGraphSource {
    fn load(&self, doc: GraphDoc) -> Result<GraphData, SourceError> {
        self.docs
            .get(doc.path())
            .cloned()
            .ok_or_else(|| SourceError::new(doc, "not bundled"))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} already exists")]
    DuplicateNode(String),
}

/// The live dataset shown by the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    editable: bool,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Edges may name nodes that are not loaded yet; the renderer draws them
    /// once both ends exist.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Adds a whole document, or nothing if any of its node ids clash with
    /// the dataset or with each other.
    pub fn extend(&mut self, data: GraphData) -> Result<(), GraphError> {
        let mut seen = BTreeSet::new();
        for node in &data.nodes {
            if self.contains(&node.id) || !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        self.nodes.extend(data.nodes);
        self.edges.extend(data.edges);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.editable = false;
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }
}
