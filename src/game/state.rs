use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::config::GameConfig;
use super::vocabulary::WordPair;

/// Card identifier, unique within a session.
pub type CardId = u32;
/// Session generation; bumped on every restart.
pub type SessionId = u32;

const MAX_UNRESOLVED: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    FaceDown,
    FaceUp,
}

impl Default for CardFace {
    fn default() -> Self {
        CardFace::FaceDown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub content: String,
    #[serde(default)]
    pub face: CardFace,
    #[serde(default)]
    pub matched: bool,
    pub language: Language,
}

impl Card {
    pub fn new(id: CardId, content: impl Into<String>, language: Language) -> Self {
        Self {
            id,
            content: content.into(),
            face: CardFace::FaceDown,
            matched: false,
            language,
        }
    }

    pub fn is_face_up(&self) -> bool {
        self.face == CardFace::FaceUp
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Active,
    Won,
    Lost,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    TimeExpired,
    ScoreDepleted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GameOutcome {
    Won {
        score: u32,
        time_elapsed: u32,
    },
    Lost {
        reason: LossReason,
        score: u32,
        time_remaining: u32,
    },
}

/// Everything that happens to a session, in the order it happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted {
        session: SessionId,
        pair_count: usize,
    },
    CardFlipped {
        card_id: CardId,
        language: Language,
    },
    CardsMatched {
        first: CardId,
        second: CardId,
        match_number: u32,
        score: u32,
    },
    CardsMismatched {
        first: CardId,
        second: CardId,
        score: u32,
    },
    CardsHidden {
        first: CardId,
        second: CardId,
    },
    CheckReleased,
    TimerTicked {
        seconds_remaining: u32,
    },
    GameWon {
        score: u32,
        time_elapsed: u32,
    },
    GameLost {
        reason: LossReason,
        score: u32,
        time_remaining: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    TooManyUnresolved { count: usize },
    DuplicateCardId { card_id: CardId },
    UnpairedCards { expected: usize, actual: usize },
    MatchedFaceDown { card_id: CardId },
    MatchCountOutOfRange { matches_found: u32, pair_count: usize },
}

/// One play-through, from deck creation to a terminal phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub pairs: Vec<WordPair>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub flipped_unresolved: Vec<CardId>,
    pub matches_found: u32,
    pub score: u32,
    pub seconds_remaining: u32,
    pub time_limit_secs: u32,
    pub phase: GamePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}

impl Session {
    pub fn new(id: SessionId, pairs: Vec<WordPair>, cards: Vec<Card>, config: &GameConfig) -> Self {
        Self {
            id,
            pairs,
            cards,
            flipped_unresolved: Vec::new(),
            matches_found: 0,
            score: config.initial_score,
            seconds_remaining: config.time_limit_secs,
            time_limit_secs: config.time_limit_secs,
            phase: GamePhase::Active,
            outcome: None,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn is_checking(&self) -> bool {
        self.flipped_unresolved.len() >= MAX_UNRESOLVED
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn time_elapsed(&self) -> u32 {
        self.time_limit_secs.saturating_sub(self.seconds_remaining)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub fn declare_won(&mut self) -> GameEvent {
        let score = self.score;
        let time_elapsed = self.time_elapsed();
        self.finish(GamePhase::Won, GameOutcome::Won { score, time_elapsed });
        GameEvent::GameWon { score, time_elapsed }
    }

    pub fn declare_lost(&mut self, reason: LossReason) -> GameEvent {
        let score = self.score;
        let time_remaining = self.seconds_remaining;
        self.finish(
            GamePhase::Lost,
            GameOutcome::Lost {
                reason,
                score,
                time_remaining,
            },
        );
        GameEvent::GameLost {
            reason,
            score,
            time_remaining,
        }
    }

    fn finish(&mut self, phase: GamePhase, outcome: GameOutcome) {
        self.phase = phase;
        self.flipped_unresolved.clear();
        if !self.is_finished() {
            self.outcome = Some(outcome);
        }
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        if self.flipped_unresolved.len() > MAX_UNRESOLVED {
            return Err(IntegrityError::TooManyUnresolved {
                count: self.flipped_unresolved.len(),
            });
        }

        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.id) {
                return Err(IntegrityError::DuplicateCardId { card_id: card.id });
            }
            if card.matched && !card.is_face_up() {
                return Err(IntegrityError::MatchedFaceDown { card_id: card.id });
            }
        }

        if self.cards.len() != self.pair_count() * 2 {
            return Err(IntegrityError::UnpairedCards {
                expected: self.pair_count() * 2,
                actual: self.cards.len(),
            });
        }

        if self.matches_found as usize > self.pair_count() {
            return Err(IntegrityError::MatchCountOutOfRange {
                matches_found: self.matches_found,
                pair_count: self.pair_count(),
            });
        }

        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.id,
            cards: self.cards.clone(),
            matches_found: self.matches_found,
            total_pairs: self.pair_count(),
            score: self.score,
            seconds_remaining: self.seconds_remaining,
            phase: self.phase,
            checking: self.is_checking(),
            outcome: self.outcome.clone(),
        }
    }
}

/// What the presentation layer needs to draw the board and header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: SessionId,
    pub cards: Vec<Card>,
    pub matches_found: u32,
    pub total_pairs: usize,
    pub score: u32,
    pub seconds_remaining: u32,
    pub phase: GamePhase,
    pub checking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}
