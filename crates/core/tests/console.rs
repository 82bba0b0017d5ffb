use antfriend_core::{
    CameraOp, Edge, Event, EventBus, GameConfig, GraphData, GraphDoc, GraphInput, Node, Phase,
    Site, StaticGraphSource, DANCE_BANNER, HEAD_BOX, MAX_CATCH_UP_MS, TAXONOMAN_BOX,
    TOUR_INTERVAL_MS,
};

fn source() -> StaticGraphSource {
    let main = GraphData {
        nodes: ["antfriend", "blog", "git", "git.webbot", "X", "head", "folksonomy"]
            .into_iter()
            .map(Node::new)
            .collect(),
        edges: vec![Edge::new("antfriend", "X"), Edge::new("antfriend", "git")],
    };
    let folksonomy = GraphData {
        nodes: vec![Node::new("tag"), Node::new("thing")],
        edges: vec![Edge::new("tag", "thing")],
    };
    let taxonoman = GraphData {
        nodes: ["lefthand", "righthand", "taxonoman.leftfoot"]
            .into_iter()
            .map(Node::new)
            .collect(),
        edges: vec![Edge::new("X", "lefthand")],
    };
    StaticGraphSource::default()
        .with(GraphDoc::Main, main)
        .with(GraphDoc::Folksonomy, folksonomy)
        .with(GraphDoc::Taxonoman, taxonoman)
}

fn site() -> (Site, EventBus) {
    let mut site = Site::new(GameConfig::default(), 21, Box::new(source())).expect("site");
    let mut events = EventBus::default();
    site.boot(&mut events);
    events.drain().for_each(drop);
    (site, events)
}

fn navigations(events: &EventBus) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Navigate { url, new_context } => Some((url.clone(), *new_context)),
            _ => None,
        })
        .collect()
}

macro_rules! reply_case {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let (mut site, mut events) = site();
            assert_eq!(
                site.interpret($input, &mut events).as_deref(),
                Some($expected)
            );
        }
    };
}

reply_case!(reply_dance, "dance", DANCE_BANNER);
reply_case!(reply_folksonomy, "folksonomy", "folksonomy now!");
reply_case!(reply_draw, "draw", "redrawed now!");
reply_case!(reply_stop, "stop", "ok, i am done now");
reply_case!(reply_start, "start", "yeah, start me up");
reply_case!(reply_click, "click foo", "clicking foo");
reply_case!(reply_bare_click, "click", "clicking ");
reply_case!(reply_inspiration, "inspiration", "are you inspired now?");
reply_case!(reply_pagoda, "clansOfPagoda", "Play Clans Of Pagoda!");
reply_case!(reply_banjo, "banjo", "banjo!");
reply_case!(reply_card, "card", "banjo card");
reply_case!(reply_jartron, "jartron", "Jartron the explorer!");
reply_case!(reply_head, "head", HEAD_BOX);
reply_case!(reply_taxonoman, "taxonoman", TAXONOMAN_BOX);
reply_case!(reply_flip_deals, "flip 3", "dealing 24 cards");
reply_case!(reply_flip_garbage, "flip three", "not a card slot: \"three\"");
reply_case!(reply_flip_far, "flip 99", "slot 99 is outside the deck (0..24)");
reply_case!(reply_flip_bare, "flip", "flip needs an argument");

#[test]
fn unknown_input_yields_nothing() {
    let (mut site, mut events) = site();
    assert_eq!(site.interpret("nonexistentCommand", &mut events), None);
    assert_eq!(site.interpret("nonexistent command", &mut events), None);
    assert_eq!(site.interpret("", &mut events), None);
}

#[test]
fn help_is_generated_from_the_registry() {
    let (mut site, mut events) = site();
    let help = site.interpret("help", &mut events).expect("help");
    for command in site.registry().commands() {
        assert!(help.contains(command.name()), "missing {}", command.name());
    }
}

#[test]
fn navigation_commands_open_pages() {
    let (mut site, mut events) = site();
    site.interpret("inspiration", &mut events);
    site.interpret("banjo", &mut events);
    assert_eq!(
        navigations(&events),
        vec![
            ("https://youtu.be/VWU9sJ2879c".to_string(), true),
            ("/banjo".to_string(), false),
        ]
    );
}

#[test]
fn click_runs_node_actions() {
    let (mut site, mut events) = site();
    site.interpret("click blog", &mut events);
    assert_eq!(
        navigations(&events),
        vec![("https://antfriend.wordpress.com/".to_string(), true)]
    );
    site.interpret("click git.webbot", &mut events);
    assert!(site.graphy().network().contains("webbot.stop"));
}

#[test]
fn nodes_named_after_commands_run_them() {
    let (mut site, mut events) = site();
    site.graph_input(
        GraphInput::Click {
            nodes: vec!["head".to_string()],
        },
        &mut events,
    );
    let echoes: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Echo { text } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(echoes, vec!["head".to_string(), HEAD_BOX.to_string()]);
}

#[test]
fn folksonomy_node_swaps_in_the_editable_graph() {
    let (mut site, mut events) = site();
    site.interpret("click folksonomy", &mut events);
    let network = site.graphy().network();
    assert!(network.is_editable());
    assert!(network.contains("tag"));
    assert!(!network.contains("antfriend"));
}

#[test]
fn taxonoman_command_summons_a_dancer_and_stop_halts_it() {
    let (mut site, mut events) = site();
    site.interpret("taxonoman", &mut events);
    assert!(site.graphy().is_dancing());
    site.advance(1500, &mut events);
    site.interpret("stop", &mut events);
    assert!(!site.graphy().is_dancing());
    site.interpret("taxonoman", &mut events);
    assert!(!site.graphy().network().contains("taxonoman.leftfoot"));
}

#[test]
fn flipping_through_the_console_plays_banjo() {
    let (mut site, mut events) = site();
    site.interpret("flip 0", &mut events);
    site.advance(2400, &mut events);
    let reply = site.interpret("flip 5", &mut events).expect("reply");
    assert!(reply.starts_with("card 5 is a "));
    assert_eq!(site.snapshot().phase, Phase::OneUp(5));
    let shown: Vec<usize> = site
        .snapshot()
        .cards
        .iter()
        .filter(|card| card.rank.is_some())
        .map(|card| card.slot)
        .collect();
    assert_eq!(shown, vec![5]);
}

#[test]
fn missing_graph_document_alerts_without_failing_the_command() {
    let mut site = Site::new(
        GameConfig::default(),
        1,
        Box::new(StaticGraphSource::default()),
    )
    .expect("site");
    let mut events = EventBus::default();
    assert_eq!(
        site.interpret("draw", &mut events).as_deref(),
        Some("redrawed now!")
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::Alert { message } if message == "Something went wrong.")));
}

#[test]
fn long_gaps_replay_only_the_catch_up_window() {
    let (mut site, mut events) = site();
    site.interpret("start", &mut events);
    events.drain().for_each(drop);

    site.catch_up(10 * 60 * 1000, &mut events);
    let focuses = events
        .iter()
        .filter(|event| matches!(event, Event::Camera(CameraOp::Focus { .. })))
        .count();
    assert_eq!(focuses as u64, MAX_CATCH_UP_MS / TOUR_INTERVAL_MS);
    assert_eq!(site.banjo().now(), MAX_CATCH_UP_MS);

    site.catch_up(200, &mut events);
    assert_eq!(site.banjo().now(), MAX_CATCH_UP_MS + 200);
}
