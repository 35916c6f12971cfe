use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_WORD_PAIRS: &str = include_str!("../../data/word_pairs.json");

static BUILTIN: OnceCell<Vocabulary> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VocabularyError {
    #[error("vocabulary has no word pairs")]
    Empty,
    #[error("word pair {index} has a blank term")]
    BlankTerm { index: usize },
    #[error("invalid vocabulary json: {message}")]
    Malformed { message: String },
}

/// A source-language term and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    #[serde(alias = "spanish")]
    pub source: String,
    #[serde(alias = "english")]
    pub target: String,
}

impl WordPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

fn default_source_language() -> String {
    "spanish".into()
}

fn default_target_language() -> String {
    "english".into()
}

/// Read-only reference list the deck builder draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    pub pairs: Vec<WordPair>,
}

impl Vocabulary {
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        pairs: Vec<WordPair>,
    ) -> Result<Self, VocabularyError> {
        let vocabulary = Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            pairs,
        };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Accepts either the full object form or a bare array of pairs.
    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Full(Vocabulary),
            Bare(Vec<WordPair>),
        }

        let raw: Raw = serde_json::from_str(json).map_err(|err| VocabularyError::Malformed {
            message: err.to_string(),
        })?;
        let vocabulary = match raw {
            Raw::Full(vocabulary) => vocabulary,
            Raw::Bare(pairs) => Vocabulary {
                source_language: default_source_language(),
                target_language: default_target_language(),
                pairs,
            },
        };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// The vocabulary shipped with the crate, parsed on first use.
    pub fn builtin() -> Result<&'static Vocabulary, VocabularyError> {
        BUILTIN.get_or_try_init(|| Vocabulary::from_json(BUILTIN_WORD_PAIRS))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn validate(&self) -> Result<(), VocabularyError> {
        if self.pairs.is_empty() {
            return Err(VocabularyError::Empty);
        }
        if let Some(index) = self
            .pairs
            .iter()
            .position(|pair| pair.source.trim().is_empty() || pair.target.trim().is_empty())
        {
            return Err(VocabularyError::BlankTerm { index });
        }
        Ok(())
    }
}
