use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    #[default]
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "player 1",
            Self::Two => "player 2",
        }
    }
}

/// Whose-turn indicator for the two-player table. With a single player the
/// indicator never moves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnTracker {
    players: u8,
    current: Player,
}

impl TurnTracker {
    pub fn new(players: u8) -> Self {
        Self {
            players,
            current: Player::One,
        }
    }

    pub fn current(&self) -> Player {
        self.current
    }

    pub fn is_two_player(&self) -> bool {
        self.players >= 2
    }

    /// Passes the turn; returns the new player when it actually changed.
    pub fn toggle(&mut self) -> Option<Player> {
        if !self.is_two_player() {
            return None;
        }
        self.current = self.current.other();
        Some(self.current)
    }

    pub fn reset(&mut self) {
        self.current = Player::One;
    }
}
