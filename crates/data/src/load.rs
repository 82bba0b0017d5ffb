use crate::schema::{GameConfig, GraphData, GraphDoc, GraphFile, GAME_CONFIG_FILE};
use antfriend_core::{GraphSource, Site, SourceError};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `banjo.json` from `dir`, falling back to defaults when the file is
/// absent. The result is always validated.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(GAME_CONFIG_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        tracing::debug!(path = %path.display(), "no game config, using defaults");
        GameConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_graph(path: &Path) -> anyhow::Result<GraphData> {
    let file: GraphFile = load_json(path)?;
    Ok(file.into())
}

pub fn load_graph_doc(dir: &Path, doc: GraphDoc) -> anyhow::Result<GraphData> {
    load_graph(&dir.join(doc.path()))
}

/// Builds a site over the assets in `dir`.
pub fn load_site(dir: &Path, seed: u64) -> anyhow::Result<Site> {
    let config = load_game_config(dir)?;
    let source = AssetGraphSource::new(dir);
    let site = Site::new(config, seed, Box::new(source)).context("build site")?;
    Ok(site)
}

/// Graph documents read from an asset directory on every load, so edits on
/// disk show up on the next redraw.
#[derive(Debug, Clone)]
pub struct AssetGraphSource {
    root: PathBuf,
}

impl AssetGraphSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GraphSource for AssetGraphSource {
    fn load(&self, doc: GraphDoc) -> Result<GraphData, SourceError> {
        load_graph_doc(&self.root, doc).map_err(|err| SourceError::new(doc, format!("{err:#}")))
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
