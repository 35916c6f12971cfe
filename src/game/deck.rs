use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Card, CardId, Language};
use super::vocabulary::{Vocabulary, WordPair};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeckError {
    #[error("a deck needs at least one pair")]
    EmptySelection,
    #[error("vocabulary has {available} pairs but the game needs {required}")]
    NotEnoughPairs { required: usize, available: usize },
}

/// The pairs picked for a session and the shuffled cards built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub pairs: Vec<WordPair>,
    pub cards: Vec<Card>,
}

pub fn build_deck<R: Rng + ?Sized>(
    vocabulary: &Vocabulary,
    pair_count: usize,
    rng: &mut R,
) -> Result<Deck, DeckError> {
    if pair_count == 0 {
        return Err(DeckError::EmptySelection);
    }
    if pair_count > vocabulary.len() {
        return Err(DeckError::NotEnoughPairs {
            required: pair_count,
            available: vocabulary.len(),
        });
    }

    let mut candidates = vocabulary.pairs.clone();
    candidates.shuffle(rng);
    candidates.truncate(pair_count);

    let mut cards = Vec::with_capacity(pair_count * 2);
    for (index, pair) in candidates.iter().enumerate() {
        let base = (index * 2) as CardId;
        cards.push(Card::new(base, pair.source.clone(), Language::Source));
        cards.push(Card::new(base + 1, pair.target.clone(), Language::Target));
    }
    cards.shuffle(rng);

    Ok(Deck {
        pairs: candidates,
        cards,
    })
}
