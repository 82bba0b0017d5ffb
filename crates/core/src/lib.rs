//! Core site logic. Keep this crate free of IO and platform concerns.

pub mod attract;
pub mod cards;
pub mod commands;
pub mod config;
pub mod deck;
pub mod engine;
pub mod events;
pub mod graph;
pub mod graphy;
pub mod rng;
pub mod schedule;
pub mod site;
pub mod turn;

pub use attract::*;
pub use cards::*;
pub use commands::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use events::*;
pub use graph::*;
pub use graphy::*;
pub use rng::*;
pub use schedule::*;
pub use site::*;
pub use turn::*;
