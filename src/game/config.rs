use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PAIR_COUNT: usize = 8;
const DEFAULT_INITIAL_SCORE: u32 = 100;
const DEFAULT_MATCH_REWARD: u32 = 100;
const DEFAULT_MISMATCH_PENALTY: u32 = 10;
const DEFAULT_TIME_LIMIT_SECS: u32 = 90;
const DEFAULT_TICK_INTERVAL_MS: u32 = 1_000;
const DEFAULT_MISMATCH_REVEAL_MS: u32 = 1_000;
const DEFAULT_RESOLVE_DELAY_MS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigError {
    #[error("pair_count must be at least 1")]
    NoPairs,
    #[error("time_limit_secs must be at least 1")]
    NoTime,
    #[error("initial_score must be at least 1")]
    NoScore,
    #[error("tick_interval_ms must be at least 1")]
    NoTickInterval,
    #[error("invalid config json: {message}")]
    Malformed { message: String },
}

/// Tunable rules for one play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub pair_count: usize,
    pub initial_score: u32,
    pub match_reward: u32,
    pub mismatch_penalty: u32,
    pub time_limit_secs: u32,
    pub tick_interval_ms: u32,
    /// How long a mismatched pair stays face up before it is hidden again.
    pub mismatch_reveal_ms: u32,
    /// How long the board stays locked after the second flip of a turn.
    pub resolve_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIR_COUNT,
            initial_score: DEFAULT_INITIAL_SCORE,
            match_reward: DEFAULT_MATCH_REWARD,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            mismatch_reveal_ms: DEFAULT_MISMATCH_REVEAL_MS,
            resolve_delay_ms: DEFAULT_RESOLVE_DELAY_MS,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|err| ConfigError::Malformed {
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::NoTime);
        }
        if self.initial_score == 0 {
            return Err(ConfigError::NoScore);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::NoTickInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "pair_count": 4, "time_limit_secs": 30 }"#)
            .expect("config should parse");
        assert_eq!(config.pair_count, 4);
        assert_eq!(config.time_limit_secs, 30);
        assert_eq!(config.initial_score, 100);
        assert_eq!(config.mismatch_penalty, 10);
    }

    #[test]
    fn zero_pairs_is_rejected() {
        let err = GameConfig::from_json(r#"{ "pair_count": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::NoPairs);
    }

    #[test]
    fn garbage_json_is_malformed() {
        let err = GameConfig::from_json("{ pair_count").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }
}
