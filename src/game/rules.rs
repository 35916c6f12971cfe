use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    config::GameConfig,
    state::{
        Card, CardFace, CardId, GameEvent, GamePhase, IntegrityError, Language, LossReason,
        Session,
    },
    vocabulary::WordPair,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum RuleError {
    #[error("game is already over")]
    GameFinished,
    #[error("two cards are still being checked")]
    ResolutionPending,
    #[error("card {card_id} does not exist")]
    CardNotFound { card_id: CardId },
    #[error("card {card_id} is already face up")]
    CardUnavailable { card_id: CardId },
    #[error("session failed integrity check: {error:?}")]
    IntegrityViolation { error: IntegrityError },
}

/// Applies flips, deferred resolution steps and timer ticks to a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: GameConfig,
}

impl RuleEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn ensure_active(session: &Session) -> Result<(), RuleError> {
        if session.phase != GamePhase::Active {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_integrity(session: &Session) -> Result<(), RuleError> {
        session
            .integrity_check()
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    /// True when the two cards are the two sides of one selected pair.
    ///
    /// Language tags must differ, so two source cards never match even if a
    /// vocabulary repeats a term across pairs.
    pub fn is_match(pairs: &[WordPair], first: &Card, second: &Card) -> bool {
        if first.language == second.language {
            return false;
        }
        let (source, target) = match first.language {
            Language::Source => (first, second),
            Language::Target => (second, first),
        };
        pairs
            .iter()
            .any(|pair| pair.source == source.content && pair.target == target.content)
    }

    pub fn handle_flip(
        &self,
        session: &mut Session,
        card_id: CardId,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_active(session)?;
        if session.is_checking() {
            return Err(RuleError::ResolutionPending);
        }
        Self::ensure_integrity(session)?;

        let card = session
            .card(card_id)
            .ok_or(RuleError::CardNotFound { card_id })?;
        if card.matched || card.is_face_up() || session.flipped_unresolved.contains(&card_id) {
            return Err(RuleError::CardUnavailable { card_id });
        }
        let language = card.language;

        if let Some(card) = session.card_mut(card_id) {
            card.face = CardFace::FaceUp;
        }
        session.flipped_unresolved.push(card_id);

        let mut events = vec![GameEvent::CardFlipped { card_id, language }];
        if session.is_checking() {
            let mut check_events = self.evaluate_pair(session);
            events.append(&mut check_events);
        }
        Ok(events)
    }

    fn evaluate_pair(&self, session: &mut Session) -> Vec<GameEvent> {
        let (first_id, second_id) = match session.flipped_unresolved.as_slice() {
            [first, second] => (*first, *second),
            _ => return Vec::new(),
        };
        let is_match = match (session.card(first_id), session.card(second_id)) {
            (Some(first), Some(second)) => Self::is_match(&session.pairs, first, second),
            _ => false,
        };

        let mut events = Vec::new();
        if is_match {
            for id in [first_id, second_id] {
                if let Some(card) = session.card_mut(id) {
                    card.matched = true;
                    card.face = CardFace::FaceUp;
                }
            }
            session.matches_found += 1;
            session.score = session.score.saturating_add(self.config.match_reward);
            events.push(GameEvent::CardsMatched {
                first: first_id,
                second: second_id,
                match_number: session.matches_found,
                score: session.score,
            });

            if session.matches_found as usize >= session.pair_count() {
                events.push(session.declare_won());
            }
        } else {
            session.score = session.score.saturating_sub(self.config.mismatch_penalty);
            events.push(GameEvent::CardsMismatched {
                first: first_id,
                second: second_id,
                score: session.score,
            });

            if session.score == 0 {
                events.push(session.declare_lost(LossReason::ScoreDepleted));
            }
        }
        events
    }

    /// Turns a mismatched pair face down again. Matched cards stay up.
    pub fn hide_cards(
        &self,
        session: &mut Session,
        first: CardId,
        second: CardId,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_active(session)?;
        for id in [first, second] {
            let card = session
                .card_mut(id)
                .ok_or(RuleError::CardNotFound { card_id: id })?;
            if !card.matched {
                card.face = CardFace::FaceDown;
            }
        }
        Ok(vec![GameEvent::CardsHidden { first, second }])
    }

    /// Ends the checking state so the next flip is accepted.
    pub fn release_check(&self, session: &mut Session) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_active(session)?;
        session.flipped_unresolved.clear();
        Ok(vec![GameEvent::CheckReleased])
    }

    pub fn tick(&self, session: &mut Session) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_active(session)?;
        session.seconds_remaining = session.seconds_remaining.saturating_sub(1);

        let mut events = vec![GameEvent::TimerTicked {
            seconds_remaining: session.seconds_remaining,
        }];
        if session.seconds_remaining == 0 {
            events.push(session.declare_lost(LossReason::TimeExpired));
        }
        Ok(events)
    }
}
