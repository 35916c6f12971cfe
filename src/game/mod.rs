//! Game core: deck building, the flip/match state machine, and the session controller.

pub mod config;
pub mod controller;
pub mod deck;
pub mod rules;
pub mod state;
pub mod vocabulary;

pub use config::{ConfigError, GameConfig};
pub use controller::{GameController, ScheduledTask, SetupError, Sinks, TaskKind};
pub use deck::{build_deck, Deck, DeckError};
pub use rules::{RuleEngine, RuleError};
pub use state::{
    Card,
    CardFace,
    CardId,
    GameEvent,
    GameOutcome,
    GamePhase,
    IntegrityError,
    Language,
    LossReason,
    Session,
    SessionId,
    SessionSnapshot,
};
pub use vocabulary::{Vocabulary, VocabularyError, WordPair};
