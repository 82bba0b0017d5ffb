//! The banjo match engine: deal, flip two, keep the pair or flip it back.
//!
//! All visual resolution is deferred through the [`Scheduler`]; game state
//! that the player can act on (pending card, match count) changes
//! synchronously inside [`MatchGame::click`].

use crate::{
    Attract, AttractChange, ConfigError, Deck, Event, EventBus, GameConfig, Location,
    MismatchReveal, Rank, RngState, Scheduler, TimerId, TurnDiscipline, TurnTracker,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("slot {slot} is outside the deck (0..{len})")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("a game is already running")]
    AlreadyStarted,
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", content = "slot", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Dealt,
    OneUp(usize),
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    MoveToPlace { slot: usize, generation: u32 },
    Retire { first: usize, second: usize, generation: u32 },
    Conceal { first: usize, second: usize, generation: u32 },
    AttractTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyPending,
    Retired,
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Dealing { cards: usize },
    Ignored(IgnoreReason),
    FirstUp { slot: usize, rank: Rank },
    Matched { first: usize, second: usize, rank: Rank, complete: bool },
    Mismatched { first: usize, second: usize },
}

#[derive(Debug)]
pub struct MatchGame {
    config: GameConfig,
    deck: Deck,
    rng: RngState,
    scheduler: Scheduler<Transition>,
    turn: TurnTracker,
    attract: Attract,
    attract_timer: Option<TimerId>,
    started: bool,
    pending: Option<usize>,
    matches: usize,
    resolving: usize,
    generation: u32,
}

impl MatchGame {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let deck = Deck::paired(config.deck_size, &config.layout)?;
        let mut scheduler = Scheduler::new();
        let attract_timer = Some(scheduler.every(config.attract.tick_ms, Transition::AttractTick));
        Ok(Self {
            turn: TurnTracker::new(config.players),
            attract: Attract::new(&config.attract),
            rng: RngState::from_seed(seed),
            config,
            deck,
            scheduler,
            attract_timer,
            started: false,
            pending: None,
            matches: 0,
            resolving: 0,
            generation: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn turn(&self) -> &TurnTracker {
        &self.turn
    }

    pub fn attract(&self) -> &Attract {
        &self.attract
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Scheduled deal/match/mismatch work not yet applied.
    pub fn in_flight(&self) -> usize {
        let periodic = usize::from(self.attract_timer.is_some());
        self.scheduler.pending().saturating_sub(periodic)
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            return Phase::Idle;
        }
        if let Some(slot) = self.pending {
            return Phase::OneUp(slot);
        }
        if self.resolving > 0 {
            return Phase::Resolving;
        }
        Phase::Dealt
    }

    /// A click on any slot: deals a new game while idle, flips otherwise.
    pub fn click(&mut self, slot: usize, events: &mut EventBus) -> Result<Selection, GameError> {
        self.check_slot(slot)?;
        if !self.started {
            let cards = self.start_game(events)?;
            return Ok(Selection::Dealing { cards });
        }
        self.select_card(slot, events)
    }

    pub fn start_game(&mut self, events: &mut EventBus) -> Result<usize, GameError> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        self.stop_attract(events);
        self.deck.shuffle(&mut self.rng);
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.matches = 0;
        self.resolving = 0;
        self.turn.reset();
        let generation = self.generation;
        for slot in 0..self.deck.len() {
            let delay = slot as u64 * self.config.deal_interval_ms;
            self.scheduler
                .after(delay, Transition::MoveToPlace { slot, generation });
        }
        self.started = true;
        tracing::debug!(generation, cards = self.deck.len(), "banjo deal scheduled");
        events.push(Event::GameStarted {
            generation,
            cards: self.deck.len(),
        });
        Ok(self.deck.len())
    }

    pub fn select_card(&mut self, slot: usize, events: &mut EventBus) -> Result<Selection, GameError> {
        self.check_slot(slot)?;
        if self.pending == Some(slot) {
            return Ok(Selection::Ignored(IgnoreReason::AlreadyPending));
        }
        let Some(card) = self.deck.get_mut(slot) else {
            return Err(self.out_of_range(slot));
        };
        if card.matched {
            return Ok(Selection::Ignored(IgnoreReason::Retired));
        }
        if self.config.turn_discipline == TurnDiscipline::Strict && self.resolving > 0 {
            return Ok(Selection::Ignored(IgnoreReason::Resolving));
        }
        card.reveal();
        let rank = card.rank;
        events.push(Event::CardRevealed { slot, rank });

        let Some(first) = self.pending.take() else {
            self.pending = Some(slot);
            return Ok(Selection::FirstUp { slot, rank });
        };
        let generation = self.generation;
        self.resolving += 1;
        let first_rank = self.deck.rank_of(first).map(Rank::value);
        if first_rank == Some(rank.value()) {
            self.scheduler.after(
                self.config.match_delay_ms,
                Transition::Retire {
                    first,
                    second: slot,
                    generation,
                },
            );
            self.matches += 1;
            events.push(Event::PairMatched {
                first,
                second: slot,
                matches: self.matches,
            });
            let complete = self.matches >= self.config.pair_count();
            if complete {
                tracing::debug!(generation, "banjo board cleared");
                self.matches = 0;
                self.started = false;
                events.push(Event::GameCompleted { generation });
            }
            Ok(Selection::Matched {
                first,
                second: slot,
                rank,
                complete,
            })
        } else {
            self.scheduler.after(
                self.config.mismatch_delay_ms,
                Transition::Conceal {
                    first,
                    second: slot,
                    generation,
                },
            );
            events.push(Event::PairMismatched {
                first,
                second: slot,
            });
            Ok(Selection::Mismatched {
                first,
                second: slot,
            })
        }
    }

    /// Runs every transition that comes due within `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u64, events: &mut EventBus) {
        let deadline = self.scheduler.deadline(elapsed_ms);
        while let Some(transition) = self.scheduler.poll_until(deadline) {
            self.apply(transition, events);
        }
        self.scheduler.settle(deadline);
    }

    fn apply(&mut self, transition: Transition, events: &mut EventBus) {
        match transition {
            Transition::AttractTick => {
                match self.attract.tick(&self.config.attract, &mut self.rng) {
                    Some(AttractChange::Looked(x, y)) => events.push(Event::AttractLooked { x, y }),
                    Some(AttractChange::Said(phrase)) => events.push(Event::AttractSaid { phrase }),
                    None => {}
                }
            }
            Transition::MoveToPlace { slot, generation } => {
                if generation != self.generation {
                    return;
                }
                // A pair can be matched and retired before its deal timer fires.
                if let Some(card) = self.deck.get_mut(slot).filter(|card| !card.matched) {
                    card.location = Location::Table;
                    events.push(Event::CardDealt { slot });
                }
            }
            Transition::Retire {
                first,
                second,
                generation,
            } => {
                if generation != self.generation {
                    tracing::debug!(first, second, "dropping retire from an earlier deal");
                    return;
                }
                for slot in [first, second] {
                    if let Some(card) = self.deck.get_mut(slot) {
                        card.hide();
                        card.matched = true;
                        card.location = Location::Discard;
                    }
                }
                self.resolving = self.resolving.saturating_sub(1);
                events.push(Event::PairRetired { first, second });
            }
            Transition::Conceal {
                first,
                second,
                generation,
            } => {
                if generation != self.generation {
                    return;
                }
                let reveal = self.config.mismatch_reveal;
                for slot in [first, second] {
                    if let Some(card) = self.deck.get_mut(slot) {
                        match reveal {
                            MismatchReveal::FaceDown => card.hide(),
                            MismatchReveal::Normalize => card.tilted = false,
                        }
                    }
                }
                self.resolving = self.resolving.saturating_sub(1);
                events.push(Event::PairConcealed { first, second });
                if let Some(player) = self.turn.toggle() {
                    events.push(Event::TurnChanged { player });
                }
            }
        }
    }

    fn stop_attract(&mut self, events: &mut EventBus) {
        let Some(timer) = self.attract_timer.take() else {
            return;
        };
        self.scheduler.cancel(timer);
        self.attract.stop(&self.config.attract);
        events.push(Event::AttractStopped {
            phrase: self.attract.phrase.clone(),
        });
    }

    fn check_slot(&self, slot: usize) -> Result<(), GameError> {
        if slot < self.deck.len() {
            Ok(())
        } else {
            Err(self.out_of_range(slot))
        }
    }

    fn out_of_range(&self, slot: usize) -> GameError {
        GameError::SlotOutOfRange {
            slot,
            len: self.deck.len(),
        }
    }
}
