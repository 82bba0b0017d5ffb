use crate::{Position, RANK_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DECK_SIZE: usize = 24;
pub const MAX_DECK_SIZE: usize = RANK_COUNT as usize * 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("deck size {0} must be even and between 2 and 24")]
    DeckSize(usize),
    #[error("player count {0} must be 1 or 2")]
    Players(u8),
    #[error("table layout needs at least one column")]
    Columns,
    #[error("attract mode needs at least one phrase")]
    NoPhrases,
}

/// What happens to a mismatched pair once its delay elapses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReveal {
    #[default]
    FaceDown,
    Normalize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnDiscipline {
    /// A new first card may be chosen while the previous pair still resolves.
    #[default]
    Responsive,
    /// Selections are ignored until every scheduled resolution has fired.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableLayout {
    pub columns: usize,
    pub origin: Position,
    pub row_step: i32,
    pub column_step: i32,
    pub discard: Position,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            columns: 6,
            origin: Position::new(15, 70),
            row_step: 120,
            column_step: 100,
            discard: Position::new(100, -140),
        }
    }
}

impl TableLayout {
    pub fn position_for(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let row = (index / columns) as i32;
        let column = (index % columns) as i32;
        Position::new(
            self.origin.top + self.row_step * row,
            self.origin.left + self.column_step * column,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AttractConfig {
    pub tick_ms: u64,
    pub look_ticks: u32,
    pub eye_range: i32,
    pub phrases: Vec<String>,
    pub stop_phrase: String,
    pub stop_eye: (i32, i32),
}

impl Default for AttractConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            look_ticks: 3,
            eye_range: 9,
            phrases: [
                "banjo",
                "hello",
                "u play?",
                "banjo",
                "click cards",
                "banjo is a game some other whole family can enjoy",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            stop_phrase: "get a pair and a banjo to win".to_string(),
            stop_eye: (15, 7),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub deck_size: usize,
    pub players: u8,
    pub deal_interval_ms: u64,
    pub match_delay_ms: u64,
    pub mismatch_delay_ms: u64,
    pub mismatch_reveal: MismatchReveal,
    pub turn_discipline: TurnDiscipline,
    pub layout: TableLayout,
    pub attract: AttractConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: DEFAULT_DECK_SIZE,
            players: 1,
            deal_interval_ms: 100,
            match_delay_ms: 1000,
            mismatch_delay_ms: 800,
            mismatch_reveal: MismatchReveal::FaceDown,
            turn_discipline: TurnDiscipline::Responsive,
            layout: TableLayout::default(),
            attract: AttractConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deck_size < 2 || self.deck_size > MAX_DECK_SIZE || self.deck_size % 2 != 0 {
            return Err(ConfigError::DeckSize(self.deck_size));
        }
        if !(1..=2).contains(&self.players) {
            return Err(ConfigError::Players(self.players));
        }
        if self.layout.columns == 0 {
            return Err(ConfigError::Columns);
        }
        if self.attract.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        Ok(())
    }

    pub fn pair_count(&self) -> usize {
        self.deck_size / 2
    }

    pub fn two_player(mut self) -> Self {
        self.players = 2;
        self
    }
}
