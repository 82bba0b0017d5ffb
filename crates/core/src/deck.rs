use crate::{Card, ConfigError, Location, Rank, RngState, TableLayout, MAX_DECK_SIZE};
use std::collections::BTreeMap;

/// Ordered card slots. Slot identity never changes; only the rank bound to
/// each slot is permuted on shuffle.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds `size` slots holding two copies of ranks `1..=size/2`, in order.
    pub fn paired(size: usize, layout: &TableLayout) -> Result<Self, ConfigError> {
        if size < 2 || size > MAX_DECK_SIZE || size % 2 != 0 {
            return Err(ConfigError::DeckSize(size));
        }
        let ranks: Vec<Rank> = Rank::all().take(size / 2).collect();
        let cards = ranks
            .iter()
            .chain(ranks.iter())
            .enumerate()
            .map(|(index, rank)| Card::new(*rank, layout.position_for(index)))
            .collect();
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Card> {
        self.cards.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Card> {
        self.cards.get_mut(slot)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn rank_of(&self, slot: usize) -> Option<Rank> {
        self.cards.get(slot).map(|card| card.rank)
    }

    /// Permutes ranks across every slot and returns all cards to the stack.
    pub fn shuffle(&mut self, rng: &mut RngState) {
        let mut ranks: Vec<Rank> = self.cards.iter().map(|card| card.rank).collect();
        rng.shuffle(&mut ranks);
        for (card, rank) in self.cards.iter_mut().zip(ranks) {
            card.rank = rank;
            card.hide();
            card.matched = false;
            card.location = Location::Stack;
        }
    }

    pub fn rank_counts(&self) -> BTreeMap<Rank, usize> {
        let mut counts = BTreeMap::new();
        for card in &self.cards {
            *counts.entry(card.rank).or_insert(0) += 1;
        }
        counts
    }

    pub fn retired_count(&self) -> usize {
        self.cards.iter().filter(|card| card.matched).count()
    }
}
