use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    config::{ConfigError, GameConfig},
    deck::{build_deck, DeckError},
    rules::{RuleEngine, RuleError},
    state::{CardId, GameEvent, Language, Session, SessionId, SessionSnapshot},
    vocabulary::{Vocabulary, VocabularyError},
};
use crate::sinks::{AnalyticsEvent, AnalyticsSink, NoopSink, SoundEffect, SoundSink};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TaskKind {
    Tick,
    HideCards { first: CardId, second: CardId },
    ReleaseCheck,
}

/// Deferred work the host must run after `delay_ms`, bound to one session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledTask {
    pub session: SessionId,
    pub delay_ms: u32,
    pub kind: TaskKind,
}

pub struct Sinks {
    pub sound: Box<dyn SoundSink>,
    pub analytics: Box<dyn AnalyticsSink>,
}

impl Sinks {
    pub fn new(sound: Box<dyn SoundSink>, analytics: Box<dyn AnalyticsSink>) -> Self {
        Self { sound, analytics }
    }

    pub fn noop() -> Self {
        Self::new(Box::new(NoopSink), Box::new(NoopSink))
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self::noop()
    }
}

/// Owns the current session and everything that drives it.
pub struct GameController {
    engine: RuleEngine,
    vocabulary: Vocabulary,
    rng: SmallRng,
    session: Session,
    sinks: Sinks,
    outbox: Vec<ScheduledTask>,
}

impl GameController {
    pub fn new(
        config: GameConfig,
        vocabulary: Vocabulary,
        mut rng: SmallRng,
        sinks: Sinks,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let deck = build_deck(&vocabulary, config.pair_count, &mut rng)?;
        let session = Session::new(1, deck.pairs, deck.cards, &config);

        let mut controller = Self {
            engine: RuleEngine::new(config),
            vocabulary,
            rng,
            session,
            sinks,
            outbox: Vec::new(),
        };
        controller.announce_start();
        Ok(controller)
    }

    pub fn from_entropy(
        config: GameConfig,
        vocabulary: Vocabulary,
        sinks: Sinks,
    ) -> Result<Self, SetupError> {
        Self::new(config, vocabulary, SmallRng::from_entropy(), sinks)
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Hands queued deferred work to the host scheduler.
    pub fn drain_tasks(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.outbox)
    }

    pub fn on_card_clicked(&mut self, card_id: CardId) -> Result<Vec<GameEvent>, RuleError> {
        match self.engine.handle_flip(&mut self.session, card_id) {
            Ok(events) => {
                self.dispatch(&events);
                Ok(events)
            }
            Err(error) => {
                log::debug!("flip of card {card_id} rejected: {error}");
                Err(error)
            }
        }
    }

    pub fn on_restart_requested(&mut self) -> Result<Vec<GameEvent>, SetupError> {
        self.track(AnalyticsEvent::NewGameClicked);
        self.restart()
    }

    /// Replaces the session with a freshly dealt one. Work scheduled for the
    /// old session is dropped when it fires.
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, SetupError> {
        let config = self.engine.config().clone();
        let deck = build_deck(&self.vocabulary, config.pair_count, &mut self.rng)?;
        let next_id = self.session.id.wrapping_add(1);
        self.session = Session::new(next_id, deck.pairs, deck.cards, &config);
        self.outbox.retain(|task| task.session == next_id);
        Ok(self.announce_start())
    }

    /// Runs a deferred task. Tasks from a replaced or finished session do nothing.
    pub fn fire(&mut self, task: ScheduledTask) -> Vec<GameEvent> {
        if task.session != self.session.id {
            log::debug!(
                "dropping {:?} for stale session {} (current {})",
                task.kind,
                task.session,
                self.session.id
            );
            return Vec::new();
        }

        let result = match task.kind {
            TaskKind::Tick => self.engine.tick(&mut self.session),
            TaskKind::HideCards { first, second } => {
                self.engine.hide_cards(&mut self.session, first, second)
            }
            TaskKind::ReleaseCheck => self.engine.release_check(&mut self.session),
        };

        match result {
            Ok(events) => {
                self.dispatch(&events);
                events
            }
            Err(error) => {
                log::debug!("deferred {:?} skipped: {error}", task.kind);
                Vec::new()
            }
        }
    }

    fn announce_start(&mut self) -> Vec<GameEvent> {
        log::info!(
            "session {} started with {} pairs",
            self.session.id,
            self.session.pair_count()
        );
        let events = vec![GameEvent::GameStarted {
            session: self.session.id,
            pair_count: self.session.pair_count(),
        }];
        self.dispatch(&events);
        events
    }

    fn schedule(&mut self, delay_ms: u32, kind: TaskKind) {
        if !self.session.is_active() {
            return;
        }
        self.outbox.push(ScheduledTask {
            session: self.session.id,
            delay_ms,
            kind,
        });
    }

    fn language_label(&self, language: Language) -> String {
        match language {
            Language::Source => self.vocabulary.source_language.clone(),
            Language::Target => self.vocabulary.target_language.clone(),
        }
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        let config = self.engine.config().clone();
        for event in events {
            match *event {
                GameEvent::GameStarted { .. } => {
                    self.track(AnalyticsEvent::GameStarted);
                    self.schedule(config.tick_interval_ms, TaskKind::Tick);
                }
                GameEvent::CardFlipped { card_id, language } => {
                    self.play(SoundEffect::Flip);
                    let card_type = self.language_label(language);
                    self.track(AnalyticsEvent::CardFlipped { card_id, card_type });
                }
                GameEvent::CardsMatched {
                    match_number,
                    score,
                    ..
                } => {
                    self.play(SoundEffect::Success);
                    self.track(AnalyticsEvent::CardsMatched {
                        match_number,
                        score,
                    });
                    self.schedule(config.resolve_delay_ms, TaskKind::ReleaseCheck);
                }
                GameEvent::CardsMismatched {
                    first,
                    second,
                    score,
                } => {
                    self.play(SoundEffect::Error);
                    self.track(AnalyticsEvent::IncorrectMatch {
                        current_score: score,
                    });
                    self.schedule(
                        config.mismatch_reveal_ms,
                        TaskKind::HideCards { first, second },
                    );
                    self.schedule(config.resolve_delay_ms, TaskKind::ReleaseCheck);
                }
                GameEvent::TimerTicked { .. } => {
                    self.schedule(config.tick_interval_ms, TaskKind::Tick);
                }
                GameEvent::GameWon {
                    score,
                    time_elapsed,
                } => {
                    log::info!("session {} won with {score} points", self.session.id);
                    self.play(SoundEffect::Celebration);
                    self.track(AnalyticsEvent::GameWon {
                        score,
                        time_elapsed,
                    });
                }
                GameEvent::GameLost {
                    reason,
                    score,
                    time_remaining,
                } => {
                    log::info!("session {} lost: {reason:?}", self.session.id);
                    self.track(AnalyticsEvent::GameOver {
                        score,
                        time_remaining,
                    });
                }
                GameEvent::CardsHidden { .. } | GameEvent::CheckReleased => {}
            }
        }
    }

    fn play(&self, sound: SoundEffect) {
        if let Err(error) = self.sinks.sound.play(sound) {
            log::warn!("sound {} failed: {error}", sound.as_str());
        }
    }

    fn track(&self, event: AnalyticsEvent) {
        if let Err(error) = self.sinks.analytics.track(&event) {
            log::warn!("analytics event {} failed: {error}", event.name());
        }
    }
}
