//! Codebook configuration
//!
//! Term-frequency thresholds plus the tokenizer settings used while
//! scanning the corpus. Field defaults follow the command-line defaults of
//! the bag-of-words toolkit.

use crate::tokenizer::TokenizerConfig;
use serde::{Deserialize, Serialize};
use xbow_core::{Error, Result};

/// Configuration of a text codebook build
///
/// Tokenizer settings are flattened, so a JSON config reads
/// `{"min_term_freq": 2, "word_ngram": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebookConfig {
    /// Minimum corpus frequency of a term
    #[serde(default = "default_min_term_freq")]
    pub min_term_freq: u32,

    /// Maximum corpus frequency of a term (0 = no limit)
    #[serde(default)]
    pub max_term_freq: u32,

    #[serde(flatten)]
    pub tokenizer: TokenizerConfig,
}

fn default_min_term_freq() -> u32 {
    1
}

impl CodebookConfig {
    pub fn new(min_term_freq: u32, max_term_freq: u32, tokenizer: TokenizerConfig) -> Self {
        Self {
            min_term_freq,
            max_term_freq,
            tokenizer,
        }
    }

    /// Parse a configuration from JSON, filling in defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Upper frequency bound with 0 meaning unbounded
    #[inline]
    pub fn effective_max_term_freq(&self) -> u32 {
        if self.max_term_freq == 0 {
            u32::MAX
        } else {
            self.max_term_freq
        }
    }

    #[inline]
    pub fn tokenizer(&self) -> &TokenizerConfig {
        &self.tokenizer
    }

    /// Reject settings that can never produce a meaningful codebook.
    ///
    /// Conflicting n-gram settings are not rejected here; the tokenizer
    /// reports them and degrades to unigrams.
    pub fn validate(&self) -> Result<()> {
        if self.min_term_freq == 0 {
            return Err(Error::InvalidConfig("min_term_freq must be at least 1".to_string()));
        }
        if self.tokenizer.word_ngram == 0 {
            return Err(Error::InvalidConfig("word_ngram must be at least 1".to_string()));
        }
        if self.max_term_freq != 0 && self.max_term_freq < self.min_term_freq {
            return Err(Error::InvalidConfig(format!(
                "max_term_freq ({}) is below min_term_freq ({})",
                self.max_term_freq, self.min_term_freq
            )));
        }
        Ok(())
    }
}

impl Default for CodebookConfig {
    fn default() -> Self {
        Self::new(default_min_term_freq(), 0, TokenizerConfig::default())
    }
}
