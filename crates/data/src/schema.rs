use serde::{Deserialize, Serialize};

pub use antfriend_core::{Edge, GameConfig, GraphData, GraphDoc, Node};

pub const GAME_CONFIG_FILE: &str = "banjo.json";

/// On-disk graph documents come either wrapped as `{"data": {...}}` or bare.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphFile {
    Enveloped { data: GraphData },
    Bare(BareGraph),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BareGraph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl From<GraphFile> for GraphData {
    fn from(file: GraphFile) -> Self {
        match file {
            GraphFile::Enveloped { data } => data,
            GraphFile::Bare(BareGraph { nodes, edges }) => GraphData { nodes, edges },
        }
    }
}
