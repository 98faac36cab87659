//! Text codebooks
//!
//! A codebook is the fixed vocabulary used to turn token sequences into
//! count vectors. It is generated from the term frequencies of all text
//! columns of a corpus, or installed from a persisted model.
//!
//! ```text
//! rows ──> text columns ──> tokenize ──> TermFrequencyTable ──> threshold ──> Codebook
//! ```

use crate::config::CodebookConfig;
use crate::tokenizer::TokenizerConfig;
use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use xbow_core::{AttributeIndex, CellValue, Error, Result};

/// Corpus-wide term frequencies, kept in first-occurrence order
#[derive(Debug, Clone, Default)]
pub struct TermFrequencyTable {
    freqs: IndexMap<String, u32, RandomState>,
}

impl TermFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, term: &str) {
        match self.freqs.get_mut(term) {
            Some(freq) => *freq += 1,
            None => {
                self.freqs.insert(term.to_string(), 1);
            }
        }
    }

    pub fn add_all<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            self.add(term.as_ref());
        }
    }

    pub fn frequency(&self, term: &str) -> u32 {
        self.freqs.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    #[inline]
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// Total number of term occurrences
    pub fn total(&self) -> u64 {
        self.freqs.values().map(|&f| u64::from(f)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.freqs.iter().map(|(term, &freq)| (term.as_str(), freq))
    }

    /// Terms with `min <= frequency <= max`, in first-occurrence order
    pub fn threshold(&self, min: u32, max: u32) -> Vec<String> {
        self.freqs
            .iter()
            .filter(|(_, &freq)| freq >= min && freq <= max)
            .map(|(term, _)| term.clone())
            .collect()
    }
}

/// Fixed vocabulary plus the tokenizer settings it was built with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CodebookData", into = "CodebookData")]
pub struct Codebook {
    terms: Vec<String>,
    positions: HashMap<String, usize, RandomState>,
    tokenizer: TokenizerConfig,
}

/// Persisted form of a codebook; the position map is rebuilt on load
#[derive(Serialize, Deserialize)]
struct CodebookData {
    terms: Vec<String>,
    tokenizer: TokenizerConfig,
}

impl From<CodebookData> for Codebook {
    fn from(data: CodebookData) -> Self {
        Codebook::with_vocabulary(data.terms, data.tokenizer)
    }
}

impl From<Codebook> for CodebookData {
    fn from(codebook: Codebook) -> Self {
        CodebookData {
            terms: codebook.terms,
            tokenizer: codebook.tokenizer,
        }
    }
}

impl Codebook {
    /// Install an externally supplied vocabulary, e.g. from a saved model
    pub fn with_vocabulary(terms: Vec<String>, tokenizer: TokenizerConfig) -> Self {
        let mut positions = HashMap::with_capacity_and_hasher(terms.len(), RandomState::new());
        for (position, term) in terms.iter().enumerate() {
            // duplicates resolve to their first position
            positions.entry(term.clone()).or_insert(position);
        }
        Self {
            terms,
            positions,
            tokenizer,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Position of a term, i.e. its component in the count vector
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    pub fn tokenizer_config(&self) -> &TokenizerConfig {
        &self.tokenizer
    }

    pub fn stop_characters(&self) -> &str {
        &self.tokenizer.stop_characters
    }

    pub fn word_ngram(&self) -> usize {
        self.tokenizer.word_ngram
    }

    pub fn char_ngram(&self) -> usize {
        self.tokenizer.char_ngram
    }

    /// Tokenize unseen text exactly as the corpus was tokenized
    #[inline]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Generates text codebooks from a materialized corpus
#[derive(Debug, Clone)]
pub struct CodebookBuilder {
    config: CodebookConfig,
}

impl CodebookBuilder {
    pub fn new(config: CodebookConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodebookConfig {
        &self.config
    }

    /// Count every token of every symbolic column over all rows.
    ///
    /// A missing cell in a text column aborts the whole pass.
    pub fn term_frequencies<R>(&self, rows: &[R], index: &AttributeIndex) -> Result<TermFrequencyTable>
    where
        R: AsRef<[CellValue]>,
    {
        let tokenizer = self.config.tokenizer();
        let text_columns = index.text_indexes();
        let mut table = TermFrequencyTable::new();

        if text_columns.is_empty() {
            debug!("No symbolic columns in attribute index, codebook will be empty");
            return Ok(table);
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            for &column in text_columns {
                let cell = row.get(column).ok_or(Error::ColumnOutOfRange {
                    row: row_idx,
                    column,
                    width: row.len(),
                })?;
                let text = cell.as_text().ok_or(Error::MissingValue { row: row_idx, column })?;
                table.add_all(tokenizer.tokenize(&text));
            }
        }

        Ok(table)
    }

    /// Build the codebook: terms whose corpus frequency lies within
    /// `[min_term_freq, max_term_freq]`, in first-occurrence order.
    ///
    /// Label columns are never consulted.
    pub fn generate<R>(&self, rows: &[R], index: &AttributeIndex) -> Result<Codebook>
    where
        R: AsRef<[CellValue]>,
    {
        self.config.validate()?;

        let table = self.term_frequencies(rows, index)?;
        let terms = table.threshold(self.config.min_term_freq, self.config.effective_max_term_freq());

        debug!(
            "Generated text codebook: {} of {} distinct terms kept ({} occurrences, {} rows)",
            terms.len(),
            table.len(),
            table.total(),
            rows.len()
        );

        Ok(Codebook::with_vocabulary(terms, self.config.tokenizer().clone()))
    }
}

impl Default for CodebookBuilder {
    fn default() -> Self {
        Self::new(CodebookConfig::default())
    }
}
