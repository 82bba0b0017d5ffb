use crate::{CameraOp, GraphDoc, Player, Rank};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    GameStarted { generation: u32, cards: usize },
    CardDealt { slot: usize },
    CardRevealed { slot: usize, rank: Rank },
    PairMatched { first: usize, second: usize, matches: usize },
    PairMismatched { first: usize, second: usize },
    PairRetired { first: usize, second: usize },
    PairConcealed { first: usize, second: usize },
    TurnChanged { player: Player },
    GameCompleted { generation: u32 },
    AttractLooked { x: i32, y: i32 },
    AttractSaid { phrase: String },
    AttractStopped { phrase: String },
    GraphLoaded { doc: GraphDoc, nodes: usize, edges: usize },
    GraphCleared,
    Camera(CameraOp),
    Status { text: String },
    Selection { text: String },
    Stabilization { text: String },
    Alert { message: String },
    Navigate { url: String, new_context: bool },
    Echo { text: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }
}
