use serde::{Deserialize, Serialize};
use std::fmt;

pub const RANK_COUNT: u8 = 12;

/// Face value of a banjo card. Encoded as a two-digit code (`"01"`..`"12"`)
/// and compared by its numeric value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub fn new(value: u8) -> Option<Self> {
        if (1..=RANK_COUNT).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn code(self) -> String {
        format!("{:02}", self.0)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        code.trim().parse::<u8>().ok().and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=RANK_COUNT).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub top: i32,
    pub left: i32,
}

impl Position {
    pub const fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    Stack,
    Table,
    Discard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub rank: Rank,
    #[serde(default)]
    pub face_up: bool,
    #[serde(default)]
    pub tilted: bool,
    #[serde(default)]
    pub matched: bool,
    pub origin: Position,
    #[serde(default)]
    pub location: Location,
}

impl Card {
    pub fn new(rank: Rank, origin: Position) -> Self {
        Self {
            rank,
            face_up: false,
            tilted: false,
            matched: false,
            origin,
            location: Location::Stack,
        }
    }

    pub fn reveal(&mut self) {
        self.face_up = true;
        self.tilted = true;
    }

    pub fn hide(&mut self) {
        self.face_up = false;
        self.tilted = false;
    }

    pub fn is_live(&self) -> bool {
        !self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_codes_compare_numerically() {
        let seven = Rank::from_code("07").expect("rank");
        assert_eq!(Some(seven), Rank::from_code("7"));
        assert_eq!(seven.code(), "07");
        assert_eq!(Rank::new(12).map(|rank| rank.to_string()), Some("12".to_string()));
    }

    #[test]
    fn rank_rejects_values_outside_alphabet() {
        assert_eq!(Rank::new(0), None);
        assert_eq!(Rank::new(13), None);
        assert_eq!(Rank::from_code("banjo"), None);
        assert_eq!(Rank::all().count(), RANK_COUNT as usize);
    }
}
