use crate::{AttractConfig, RngState};
use serde::{Deserialize, Serialize};

/// Idle "attract" animation shown while no game is running: an eye that
/// wanders and a speech bubble cycling through phrases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attract {
    pub active: bool,
    pub eye: (i32, i32),
    pub phrase: String,
    counter: u32,
    phrase_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttractChange {
    Looked(i32, i32),
    Said(String),
}

impl Attract {
    pub fn new(config: &AttractConfig) -> Self {
        Self {
            active: true,
            eye: (0, 0),
            phrase: config.phrases.first().cloned().unwrap_or_default(),
            counter: 0,
            phrase_index: 0,
        }
    }

    pub fn tick(&mut self, config: &AttractConfig, rng: &mut RngState) -> Option<AttractChange> {
        if !self.active {
            return None;
        }
        self.counter += 1;
        if self.counter > config.look_ticks {
            self.eye = (0, 0);
            self.advance_phrase(config);
            self.counter = 0;
            Some(AttractChange::Said(self.phrase.clone()))
        } else {
            let range = config.eye_range.abs();
            let y = rng.range_inclusive(-range, range);
            let x = rng.range_inclusive(-range, range);
            self.eye = (x, y);
            Some(AttractChange::Looked(x, y))
        }
    }

    pub fn stop(&mut self, config: &AttractConfig) {
        self.active = false;
        self.phrase = config.stop_phrase.clone();
        self.eye = config.stop_eye;
    }

    pub fn font_size_em(&self) -> f32 {
        phrase_font_size_em(&self.phrase)
    }

    fn advance_phrase(&mut self, config: &AttractConfig) {
        if config.phrases.is_empty() {
            return;
        }
        if self.phrase_index + 1 < config.phrases.len() {
            self.phrase_index += 1;
        } else {
            self.phrase_index = 0;
        }
        self.phrase = config.phrases[self.phrase_index].clone();
    }
}

/// Long phrases shrink so they still fit the bubble.
pub fn phrase_font_size_em(phrase: &str) -> f32 {
    let len = phrase.chars().count();
    if len <= 7 {
        return 6.0;
    }
    let shrink = (len - 7) as f32 / 2.0;
    (6.0 - shrink).max(1.0)
}
