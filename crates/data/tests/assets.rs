use antfriend_core::{Event, EventBus, GraphSource, MismatchReveal, Phase};
use antfriend_data::{
    load_game_config, load_graph_doc, load_site, AssetGraphSource, GameConfig, GraphDoc,
};
use std::fs;
use std::path::{Path, PathBuf};

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("antfriend-data-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

fn write(dir: &Path, file: &str, body: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent");
    }
    fs::write(path, body).expect("write");
}

#[test]
fn shipped_config_matches_defaults() {
    let config = load_game_config(&assets_root()).expect("load config");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = scratch_dir("missing");
    let config = load_game_config(&dir).expect("defaults");
    assert_eq!(config.deck_size, 24);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = scratch_dir("partial");
    write(
        &dir,
        "banjo.json",
        r#"{"deck_size": 12, "mismatch_reveal": "normalize"}"#,
    );
    let config = load_game_config(&dir).expect("partial");
    assert_eq!(config.deck_size, 12);
    assert_eq!(config.mismatch_reveal, MismatchReveal::Normalize);
    assert_eq!(config.match_delay_ms, 1000);
}

#[test]
fn odd_deck_is_rejected_with_file_context() {
    let dir = scratch_dir("odd");
    write(&dir, "banjo.json", r#"{"deck_size": 11}"#);
    let err = load_game_config(&dir).expect_err("odd deck");
    let message = format!("{err:#}");
    assert!(message.contains("banjo.json"), "{message}");
    assert!(message.contains("deck size 11"), "{message}");
}

#[test]
fn shipped_graphs_hold_the_action_nodes() {
    let main = load_graph_doc(&assets_root(), GraphDoc::Main).expect("main");
    let ids: Vec<&str> = main.nodes.iter().map(|node| node.id.as_str()).collect();
    for id in ["antfriend", "blog", "videos", "git", "git.this", "git.webbot", "X", "about1", "about2"] {
        assert!(ids.contains(&id), "missing {id}");
    }
    let taxonoman = load_graph_doc(&assets_root(), GraphDoc::Taxonoman).expect("taxonoman");
    assert!(taxonoman
        .nodes
        .iter()
        .any(|node| node.id == "taxonoman.leftfoot"));
    load_graph_doc(&assets_root(), GraphDoc::Folksonomy).expect("folksonomy");
}

#[test]
fn asset_source_reports_broken_documents() {
    let dir = scratch_dir("broken");
    write(&dir, "vis/data.json", "{ not json");
    let source = AssetGraphSource::new(&dir);
    let err = source.load(GraphDoc::Main).expect_err("broken");
    assert!(err.reason.contains("parse"), "{}", err.reason);
    let err = source.load(GraphDoc::Folksonomy).expect_err("missing");
    assert!(err.reason.contains("read"), "{}", err.reason);
}

#[test]
fn site_boots_from_shipped_assets() {
    let mut site = load_site(&assets_root(), 7).expect("site");
    let mut events = EventBus::default();
    site.boot(&mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::GraphLoaded { doc: GraphDoc::Main, .. })));
    assert_eq!(site.interpret("taxonoman", &mut events).as_deref(), Some("#########\n#  :P   #\n#########\n"));
    assert!(site.graphy().network().contains("taxonoman.rightfoot"));
    assert_eq!(site.snapshot().phase, Phase::Idle);
}

#[test]
fn taxonoman_joins_the_folksonomy_graph() {
    let mut site = load_site(&assets_root(), 7).expect("site");
    let mut events = EventBus::default();
    site.boot(&mut events);
    site.interpret("folksonomy", &mut events);
    events.drain().for_each(drop);

    site.interpret("taxonoman", &mut events);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::Alert { .. })));
    let graphy = site.graphy();
    assert!(graphy.network().contains("taxonoman.leftfoot"));
    assert!(graphy.network().contains("tagger"));
    assert!(graphy.is_dancing());
    assert_eq!(graphy.status(), "taxonoman loaded");

    site.interpret("taxonoman", &mut events);
    assert_eq!(site.graphy().status(), "must! ... destroy! ... taxonoman! ...");
    assert!(!site.graphy().network().contains("taxonoman.leftfoot"));
}
