//! Side-effect sinks: sound playback and analytics reporting.
//!
//! Sinks are fire-and-forget. A failing sink is logged by the caller and
//! never changes game state.

pub mod js;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::game::CardId;

pub use js::{JsAnalyticsSink, JsSoundSink};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("sink callback failed: {0}")]
    Callback(String),
    #[error("could not encode payload: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    Flip,
    Success,
    Error,
    Celebration,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Flip => "flip",
            SoundEffect::Success => "success",
            SoundEffect::Error => "error",
            SoundEffect::Celebration => "celebration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    GameStarted,
    GameOver { score: u32, time_remaining: u32 },
    GameWon { score: u32, time_elapsed: u32 },
    CardFlipped { card_id: CardId, card_type: String },
    CardsMatched { match_number: u32, score: u32 },
    IncorrectMatch { current_score: u32 },
    NewGameClicked,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::GameStarted => "game_started",
            AnalyticsEvent::GameOver { .. } => "game_over",
            AnalyticsEvent::GameWon { .. } => "game_won",
            AnalyticsEvent::CardFlipped { .. } => "card_flipped",
            AnalyticsEvent::CardsMatched { .. } => "cards_matched",
            AnalyticsEvent::IncorrectMatch { .. } => "incorrect_match",
            AnalyticsEvent::NewGameClicked => "new_game_clicked",
        }
    }

    /// Flat property bag sent alongside the event name.
    pub fn properties(&self) -> Map<String, Value> {
        let value = match self {
            AnalyticsEvent::GameStarted | AnalyticsEvent::NewGameClicked => json!({}),
            AnalyticsEvent::GameOver {
                score,
                time_remaining,
            } => json!({ "score": score, "timeRemaining": time_remaining }),
            AnalyticsEvent::GameWon {
                score,
                time_elapsed,
            } => json!({ "score": score, "timeElapsed": time_elapsed }),
            AnalyticsEvent::CardFlipped { card_id, card_type } => {
                json!({ "cardId": card_id, "cardType": card_type })
            }
            AnalyticsEvent::CardsMatched {
                match_number,
                score,
            } => json!({ "matchNumber": match_number, "score": score }),
            AnalyticsEvent::IncorrectMatch { current_score } => {
                json!({ "currentScore": current_score })
            }
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

pub trait SoundSink {
    fn play(&self, sound: SoundEffect) -> Result<(), SinkError>;
}

pub trait AnalyticsSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SoundSink for NoopSink {
    fn play(&self, _sound: SoundEffect) -> Result<(), SinkError> {
        Ok(())
    }
}

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: &AnalyticsEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes analytics events to the log instead of a remote endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&self, sound: SoundEffect) -> Result<(), SinkError> {
        log::debug!("sound: {}", sound.as_str());
        Ok(())
    }
}

impl AnalyticsSink for LogSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        log::info!(
            "track event: {} {}",
            event.name(),
            Value::Object(event.properties())
        );
        Ok(())
    }
}

/// Keeps every call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sounds: Rc<RefCell<Vec<SoundEffect>>>,
    events: Rc<RefCell<Vec<AnalyticsEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sounds(&self) -> Vec<SoundEffect> {
        self.sounds.borrow().clone()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(AnalyticsEvent::name).collect()
    }
}

impl SoundSink for RecordingSink {
    fn play(&self, sound: SoundEffect) -> Result<(), SinkError> {
        self.sounds.borrow_mut().push(sound);
        Ok(())
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_use_camel_case_keys() {
        let event = AnalyticsEvent::GameOver {
            score: 40,
            time_remaining: 12,
        };
        assert_eq!(event.name(), "game_over");
        assert_eq!(
            Value::Object(event.properties()),
            json!({ "score": 40, "timeRemaining": 12 })
        );

        let flipped = AnalyticsEvent::CardFlipped {
            card_id: 3,
            card_type: "english".into(),
        };
        assert_eq!(
            Value::Object(flipped.properties()),
            json!({ "cardId": 3, "cardType": "english" })
        );
    }

    #[test]
    fn payloadless_events_have_empty_properties() {
        assert!(AnalyticsEvent::GameStarted.properties().is_empty());
        assert_eq!(AnalyticsEvent::NewGameClicked.name(), "new_game_clicked");
    }

    #[test]
    fn recording_sink_clones_share_history() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.play(SoundEffect::Flip).expect("play");
        sink.track(&AnalyticsEvent::GameStarted).expect("track");
        assert_eq!(handle.sounds(), vec![SoundEffect::Flip]);
        assert_eq!(handle.event_names(), vec!["game_started"]);
    }
}
