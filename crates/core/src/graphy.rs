//! Controller for the node-graph toy. Rendering and physics live outside;
//! this keeps the dataset, the status line and the dancer/tour timers, and
//! emits [`CameraOp`]s for whoever draws the network.

use crate::{
    Edge, Event, EventBus, GraphData, GraphDoc, GraphSource, Network, Node, RngState, Scheduler,
    TimerId,
};
use serde::{Deserialize, Serialize};

pub const LOAD_FAILED: &str = "Something went wrong.";
pub const DANCE_INTERVAL_MS: u64 = 500;
pub const TOUR_INTERVAL_MS: u64 = 3000;
pub const TOUR_SCALE: f64 = 2.5;
pub const EASING: &str = "easeInOutQuart";

const DANCER_BASE: (f64, f64) = (-200.0, 1.0);
const TAXONOMAN_MARKER: &str = "taxonoman.leftfoot";
const WEBBOT_START: &str = "webbot.start";
const WEBBOT_STOP: &str = "webbot.stop";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CameraOp {
    Focus {
        node: String,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
        duration_ms: u64,
        easing: String,
    },
    MoveTo {
        offset_x: f64,
        offset_y: f64,
        scale: f64,
        duration_ms: u64,
        easing: String,
    },
    MoveNode {
        node: String,
        x: f64,
        y: f64,
    },
    Fit {
        duration_ms: u64,
        easing: String,
    },
}

/// What the renderer reports back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphInput {
    Click {
        #[serde(default)]
        nodes: Vec<String>,
    },
    DoubleClick {
        #[serde(default)]
        nodes: Vec<String>,
    },
    Select {
        #[serde(default)]
        nodes: Vec<String>,
    },
    Stabilized {
        #[serde(default)]
        iterations: u32,
    },
    AnimationFinished,
    Fit,
    Zoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphyTimer {
    Dance,
    Tour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    Redraw,
    Open(&'static str),
    WebbotChildren,
    Dance,
    Folksonomy,
    CopyLabel { from: &'static str, to: &'static str },
}

/// Single-click actions by node id.
pub fn node_action(id: &str) -> Option<NodeAction> {
    let action = match id {
        "antfriend" => NodeAction::Redraw,
        "blog" => NodeAction::Open("https://antfriend.wordpress.com/"),
        "videos" => NodeAction::Open("https://www.youtube.com/user/antfriend/videos"),
        "git" => NodeAction::Open("https://github.com/antfriend"),
        "git.this" => NodeAction::Open(
            "https://github.com/antfriend/antfriend.github.io/commit/c080924cc1a304041d4d3b1f06a29d151eea3088#diff-8a11d10fb3c3887836da60096ad16d9d",
        ),
        "git.webbot" => NodeAction::WebbotChildren,
        WEBBOT_START | WEBBOT_STOP => NodeAction::Open("https://antfriend.herokuapp.com/"),
        "X" => NodeAction::Dance,
        "folksonomy" => NodeAction::Folksonomy,
        "about1" => NodeAction::CopyLabel {
            from: "about2",
            to: "about1",
        },
        _ => return None,
    };
    Some(action)
}

/// Double-click actions by node id.
pub fn second_action(id: &str) -> Option<NodeAction> {
    match id {
        "git.webbot" => Some(NodeAction::Open("https://github.com/antfriend/webbot")),
        _ => None,
    }
}

/// Result of a node click the controller could not handle by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeReaction {
    Handled,
    Unhandled(String),
}

#[derive(Debug)]
pub struct Graphy {
    network: Network,
    scheduler: Scheduler<GraphyTimer>,
    rng: RngState,
    status: String,
    finish_message: String,
    selection: String,
    stabilization: String,
    focused: Option<String>,
    dancer: Option<TimerId>,
    dance_lean_left: bool,
    tour: Option<TimerId>,
}

impl Graphy {
    pub fn new(seed: u64) -> Self {
        Self {
            network: Network::new(),
            scheduler: Scheduler::new(),
            rng: RngState::from_seed(seed),
            status: String::new(),
            finish_message: String::new(),
            selection: String::new(),
            stabilization: String::new(),
            focused: None,
            dancer: None,
            dance_lean_left: true,
            tour: None,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    pub fn stabilization(&self) -> &str {
        &self.stabilization
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_dancing(&self) -> bool {
        self.dancer.is_some()
    }

    pub fn is_touring(&self) -> bool {
        self.tour.is_some()
    }

    /// Clears the network and loads the main document.
    pub fn draw(&mut self, source: &dyn GraphSource, events: &mut EventBus) {
        self.clear(events);
        self.load_into(GraphDoc::Main, source, events);
    }

    pub fn draw_folksonomy(&mut self, source: &dyn GraphSource, events: &mut EventBus) {
        self.stop();
        self.set_status("folksonomizing...", events);
        self.clear(events);
        if self.load_into(GraphDoc::Folksonomy, source, events) {
            self.network.set_editable(true);
        }
    }

    /// Adds the taxonoman figure and sets it dancing, or wipes it out with a
    /// redraw when it is already on the graph.
    pub fn taxonoman(&mut self, source: &dyn GraphSource, events: &mut EventBus) {
        if self.network.contains(TAXONOMAN_MARKER) {
            self.set_status("must! ... destroy! ... taxonoman! ...", events);
            self.draw(source, events);
            return;
        }
        self.set_status("Adding taxonoman ...", events);
        if self.load_into(GraphDoc::Taxonoman, source, events) {
            self.set_status("taxonoman loaded", events);
            self.dance(events);
        }
    }

    /// Toggles the dancer. Starting it halts the tour first.
    pub fn dance(&mut self, events: &mut EventBus) {
        if let Some(timer) = self.dancer.take() {
            self.scheduler.cancel(timer);
            tracing::debug!("dancer stopped");
            return;
        }
        self.stop();
        self.dance_moves(events);
        events.push(Event::Camera(CameraOp::Focus {
            node: "X".to_string(),
            scale: 2.0,
            offset_x: 3.0,
            offset_y: 3.0,
            duration_ms: 3000,
            easing: EASING.to_string(),
        }));
        self.dancer = Some(self.scheduler.every(DANCE_INTERVAL_MS, GraphyTimer::Dance));
        tracing::debug!("dancer started");
    }

    /// Halts both the tour and the dancer.
    pub fn stop(&mut self) {
        for timer in [self.tour.take(), self.dancer.take()].into_iter().flatten() {
            self.scheduler.cancel(timer);
        }
    }

    /// Toggles the random-focus tour.
    pub fn start(&mut self, events: &mut EventBus) {
        if let Some(timer) = self.tour.take() {
            self.scheduler.cancel(timer);
            return;
        }
        self.focus_random(events);
        self.tour = Some(self.scheduler.every(TOUR_INTERVAL_MS, GraphyTimer::Tour));
    }

    pub fn fit(&mut self, events: &mut EventBus) {
        self.set_status("Doing fit() Animation.", events);
        self.finish_message = "Animation finished.".to_string();
        events.push(Event::Camera(CameraOp::Fit {
            duration_ms: TOUR_INTERVAL_MS,
            easing: EASING.to_string(),
        }));
    }

    pub fn zoom(&mut self, events: &mut EventBus) {
        self.set_status("zooming ", events);
        self.finish_message = "Animating zoom.".to_string();
        events.push(Event::Camera(CameraOp::MoveTo {
            offset_x: 1.0,
            offset_y: 1.0,
            scale: 2.0,
            duration_ms: 1000,
            easing: EASING.to_string(),
        }));
    }

    /// Runs the single-click action for `id`. Ids with no action of their
    /// own come back as [`NodeReaction::Unhandled`] so the caller can try
    /// them as console commands.
    pub fn click(&mut self, id: &str, source: &dyn GraphSource, events: &mut EventBus) -> NodeReaction {
        let Some(action) = node_action(id) else {
            return NodeReaction::Unhandled(id.to_string());
        };
        self.run_action(action, source, events);
        NodeReaction::Handled
    }

    pub fn double_click(&mut self, id: &str, source: &dyn GraphSource, events: &mut EventBus) {
        if let Some(action) = second_action(id) {
            self.run_action(action, source, events);
        }
    }

    /// Applies a renderer event. Returns the clicked node id when it has no
    /// graph action of its own.
    pub fn input(
        &mut self,
        input: GraphInput,
        source: &dyn GraphSource,
        events: &mut EventBus,
    ) -> NodeReaction {
        match input {
            GraphInput::Click { nodes } => {
                self.set_status("clicked!", events);
                self.halt_tour();
                if let Some(id) = nodes.first() {
                    return self.click(id, source, events);
                }
            }
            GraphInput::DoubleClick { nodes } => {
                self.set_status("double clicked!", events);
                self.halt_tour();
                if let Some(id) = nodes.first() {
                    self.double_click(id, source, events);
                }
            }
            GraphInput::Select { nodes } => {
                self.selection = format!("Selection: {}", nodes.join(","));
                events.push(Event::Selection {
                    text: self.selection.clone(),
                });
            }
            GraphInput::Stabilized { iterations } => {
                self.stabilization = format!("Stabilization took {iterations} iterations.");
                events.push(Event::Stabilization {
                    text: self.stabilization.clone(),
                });
            }
            GraphInput::AnimationFinished => {
                let message = self.finish_message.clone();
                self.set_status(&message, events);
            }
            GraphInput::Fit => self.fit(events),
            GraphInput::Zoom => self.zoom(events),
        }
        NodeReaction::Handled
    }

    pub fn advance(&mut self, elapsed_ms: u64, events: &mut EventBus) {
        let deadline = self.scheduler.deadline(elapsed_ms);
        while let Some(timer) = self.scheduler.poll_until(deadline) {
            match timer {
                GraphyTimer::Dance => self.dance_moves(events),
                GraphyTimer::Tour => {
                    self.focus_random(events);
                    if let Some(node) = self.focused.clone() {
                        self.move_node(&node, 2.0, 2.0, events);
                    }
                }
            }
        }
        self.scheduler.settle(deadline);
    }

    fn run_action(&mut self, action: NodeAction, source: &dyn GraphSource, events: &mut EventBus) {
        match action {
            NodeAction::Redraw => self.draw(source, events),
            NodeAction::Open(url) => events.push(Event::Navigate {
                url: url.to_string(),
                new_context: true,
            }),
            NodeAction::WebbotChildren => self.add_webbot_children(source, events),
            NodeAction::Dance => self.dance(events),
            NodeAction::Folksonomy => self.draw_folksonomy(source, events),
            NodeAction::CopyLabel { from, to } => {
                let label = self.network.get(from).and_then(|node| node.label.clone());
                if let (Some(label), Some(node)) = (label, self.network.get_mut(to)) {
                    node.label = Some(label);
                }
            }
        }
    }

    fn add_webbot_children(&mut self, source: &dyn GraphSource, events: &mut EventBus) {
        if self.network.contains(WEBBOT_START) {
            self.double_click("git.webbot", source, events);
            return;
        }
        self.set_status("Adding git.webbot children...", events);
        let children = GraphData {
            nodes: vec![
                Node::new(WEBBOT_START).with_label("start").with_group("9"),
                Node::new(WEBBOT_STOP).with_label("stop").with_group("9"),
            ],
            edges: vec![
                Edge::new("git.webbot", WEBBOT_START),
                Edge::new("git.webbot", WEBBOT_STOP),
            ],
        };
        match self.network.extend(children) {
            Ok(()) => self.set_status("did it", events),
            Err(err) => {
                tracing::debug!(%err, "webbot children rejected");
                events.push(Event::Alert {
                    message: LOAD_FAILED.to_string(),
                });
            }
        }
    }

    fn dance_moves(&mut self, events: &mut EventBus) {
        let (x, y) = DANCER_BASE;
        if self.dance_lean_left {
            self.dance_lean_left = false;
            self.move_node("head", x - 200.0, y - 200.0, events);
            self.move_node("X", x - 200.0, y - 150.0, events);
            self.move_node("lefthand", x - 400.0, y - 200.0, events);
        } else {
            self.dance_lean_left = true;
            self.move_node("head", x - 150.0, y - 200.0, events);
            self.move_node("X", x - 150.0, y - 150.0, events);
            self.move_node("righthand", x, y - 200.0, events);
            self.finish_message = "Taxonoman is crushing it!".to_string();
        }
    }

    fn move_node(&mut self, id: &str, x: f64, y: f64, events: &mut EventBus) {
        let Some(node) = self.network.get_mut(id) else {
            return;
        };
        node.x = Some(x);
        node.y = Some(y);
        events.push(Event::Camera(CameraOp::MoveNode {
            node: id.to_string(),
            x,
            y,
        }));
    }

    fn focus_random(&mut self, events: &mut EventBus) {
        self.focused = None;
        if self.network.len() > 1 {
            let ids: Vec<String> = self.network.ids().map(str::to_string).collect();
            self.focused = self.rng.choose(&ids).cloned();
        }
        match self.focused.clone() {
            Some(node) => {
                self.set_status(&format!("Focusing on node: {node}"), events);
                self.finish_message = format!("Node: {node} in focus.");
                events.push(Event::Camera(CameraOp::Focus {
                    node,
                    scale: TOUR_SCALE,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    duration_ms: TOUR_INTERVAL_MS,
                    easing: EASING.to_string(),
                }));
            }
            None => {
                self.set_status("Focusing on NO node: ", events);
                self.finish_message = "Node NOT in focus.".to_string();
            }
        }
    }

    fn halt_tour(&mut self) {
        if let Some(timer) = self.tour.take() {
            self.scheduler.cancel(timer);
        }
    }

    fn clear(&mut self, events: &mut EventBus) {
        self.network.clear();
        events.push(Event::GraphCleared);
    }

    fn load_into(&mut self, doc: GraphDoc, source: &dyn GraphSource, events: &mut EventBus) -> bool {
        let loaded = source
            .load(doc)
            .map_err(|err| err.to_string())
            .and_then(|data| {
                let counts = (data.nodes.len(), data.edges.len());
                self.network
                    .extend(data)
                    .map(|()| counts)
                    .map_err(|err| err.to_string())
            });
        match loaded {
            Ok((nodes, edges)) => {
                tracing::debug!(doc = doc.path(), nodes, edges, "graph loaded");
                events.push(Event::GraphLoaded { doc, nodes, edges });
                true
            }
            Err(reason) => {
                tracing::warn!(doc = doc.path(), %reason, "graph load failed");
                events.push(Event::Alert {
                    message: LOAD_FAILED.to_string(),
                });
                false
            }
        }
    }

    fn set_status(&mut self, text: &str, events: &mut EventBus) {
        self.status = text.to_string();
        events.push(Event::Status {
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticGraphSource;

    fn source() -> StaticGraphSource {
        let main = GraphData {
            nodes: vec![
                Node::new("antfriend"),
                Node::new("git.webbot"),
                Node::new("X"),
                Node::new("about1").with_label("about"),
                Node::new("about2").with_label("more about"),
            ],
            edges: vec![Edge::new("antfriend", "X")],
        };
        let taxonoman = GraphData {
            nodes: vec![
                Node::new("head"),
                Node::new("lefthand"),
                Node::new("righthand"),
                Node::new(TAXONOMAN_MARKER),
            ],
            edges: vec![Edge::new("X", "head")],
        };
        StaticGraphSource::default()
            .with(GraphDoc::Main, main)
            .with(GraphDoc::Taxonoman, taxonoman)
    }

    fn drawn() -> (Graphy, StaticGraphSource, EventBus) {
        let source = source();
        let mut graphy = Graphy::new(5);
        let mut events = EventBus::default();
        graphy.draw(&source, &mut events);
        (graphy, source, events)
    }

    #[test]
    fn draw_replaces_the_network() {
        let (mut graphy, source, mut events) = drawn();
        assert_eq!(graphy.network().len(), 5);
        graphy.draw(&source, &mut events);
        assert_eq!(graphy.network().len(), 5);
    }

    #[test]
    fn missing_document_raises_the_generic_alert() {
        let (mut graphy, source, mut events) = drawn();
        events.drain().for_each(drop);
        graphy.draw_folksonomy(&source, &mut events);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Alert { message } if message == LOAD_FAILED
        )));
        assert!(!graphy.network().is_editable());
    }

    #[test]
    fn clashing_document_leaves_the_graph_as_it_was() {
        let source = source().with(
            GraphDoc::Main,
            GraphData {
                nodes: vec![Node::new("X"), Node::new("head")],
                edges: vec![],
            },
        );
        let mut graphy = Graphy::new(5);
        let mut events = EventBus::default();
        graphy.draw(&source, &mut events);
        events.drain().for_each(drop);

        graphy.taxonoman(&source, &mut events);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Alert { message } if message == LOAD_FAILED
        )));
        assert_eq!(graphy.network().ids().collect::<Vec<_>>(), vec!["X", "head"]);
        assert!(!graphy.is_dancing());

        graphy.taxonoman(&source, &mut events);
        assert_eq!(graphy.status(), "Adding taxonoman ...");
    }

    #[test]
    fn webbot_children_are_added_once() {
        let (mut graphy, source, mut events) = drawn();
        graphy.click("git.webbot", &source, &mut events);
        assert!(graphy.network().contains("webbot.start"));
        assert_eq!(graphy.status(), "did it");
        events.drain().for_each(drop);
        graphy.click("git.webbot", &source, &mut events);
        assert_eq!(graphy.network().len(), 7);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Navigate { url, .. } if url == "https://github.com/antfriend/webbot"
        )));
    }

    #[test]
    fn about_copies_its_sibling_label() {
        let (mut graphy, source, mut events) = drawn();
        graphy.click("about1", &source, &mut events);
        let label = graphy.network().get("about1").and_then(|node| node.label.clone());
        assert_eq!(label.as_deref(), Some("more about"));
    }

    #[test]
    fn unknown_nodes_are_handed_back() {
        let (mut graphy, source, mut events) = drawn();
        assert_eq!(
            graphy.click("head", &source, &mut events),
            NodeReaction::Unhandled("head".to_string())
        );
    }

    #[test]
    fn taxonoman_arrives_dancing_and_leaves_on_second_call() {
        let (mut graphy, source, mut events) = drawn();
        graphy.taxonoman(&source, &mut events);
        assert!(graphy.network().contains(TAXONOMAN_MARKER));
        assert!(graphy.is_dancing());
        graphy.taxonoman(&source, &mut events);
        assert!(!graphy.network().contains(TAXONOMAN_MARKER));
        assert_eq!(graphy.status(), "must! ... destroy! ... taxonoman! ...");
    }

    #[test]
    fn dancer_alternates_poses() {
        let (mut graphy, source, mut events) = drawn();
        graphy.taxonoman(&source, &mut events);
        let x_of = |graphy: &Graphy| graphy.network().get("X").and_then(|node| node.x);
        assert_eq!(x_of(&graphy), Some(-400.0));
        graphy.advance(DANCE_INTERVAL_MS, &mut events);
        assert_eq!(x_of(&graphy), Some(-350.0));
        graphy.advance(DANCE_INTERVAL_MS, &mut events);
        assert_eq!(x_of(&graphy), Some(-400.0));
        graphy.dance(&mut events);
        assert!(!graphy.is_dancing());
    }

    #[test]
    fn tour_toggles_and_click_halts_it() {
        let (mut graphy, source, mut events) = drawn();
        graphy.start(&mut events);
        assert!(graphy.is_touring());
        assert!(graphy.focused().is_some());
        assert!(graphy.status().starts_with("Focusing on node: "));
        graphy.input(GraphInput::Click { nodes: vec![] }, &source, &mut events);
        assert!(!graphy.is_touring());
        assert_eq!(graphy.status(), "clicked!");
    }

    #[test]
    fn tour_with_one_node_focuses_nothing() {
        let source = StaticGraphSource::default().with(
            GraphDoc::Main,
            GraphData {
                nodes: vec![Node::new("only")],
                edges: vec![],
            },
        );
        let mut graphy = Graphy::new(1);
        let mut events = EventBus::default();
        graphy.draw(&source, &mut events);
        graphy.start(&mut events);
        assert_eq!(graphy.focused(), None);
        graphy.input(GraphInput::AnimationFinished, &source, &mut events);
        assert_eq!(graphy.status(), "Node NOT in focus.");
    }

    #[test]
    fn renderer_reports_become_text() {
        let (mut graphy, source, mut events) = drawn();
        graphy.input(
            GraphInput::Select {
                nodes: vec!["a".into(), "b".into()],
            },
            &source,
            &mut events,
        );
        graphy.input(GraphInput::Stabilized { iterations: 42 }, &source, &mut events);
        assert_eq!(graphy.selection(), "Selection: a,b");
        assert_eq!(graphy.stabilization(), "Stabilization took 42 iterations.");
    }
}
