//! # xbow Text
//!
//! Text layer of the xbow feature-vectorization front end.
//!
//! ## Overview
//!
//! Symbolic columns of a corpus are tokenized and counted; terms whose
//! corpus frequency falls into a configured range form a codebook. The
//! codebook keeps its tokenizer settings so unseen text is tokenized the
//! same way when it is later quantized into count vectors.
//!
//! ## Example
//!
//! ```rust
//! use xbow_core::{AttributeIndex, CellValue};
//! use xbow_text::{CodebookBuilder, CodebookConfig, TokenizerConfig};
//!
//! let rows = vec![
//!     vec![CellValue::text("a"), CellValue::text("cat dog")],
//!     vec![CellValue::text("b"), CellValue::text("cat cat")],
//!     vec![CellValue::text("c"), CellValue::text("dog")],
//! ];
//! let index = AttributeIndex::parse("n0").unwrap();
//!
//! let config = CodebookConfig::new(2, 0, TokenizerConfig::new("", 1, 0));
//! let codebook = CodebookBuilder::new(config).generate(&rows, &index).unwrap();
//! assert_eq!(codebook.terms(), &["CAT".to_string(), "DOG".to_string()]);
//! ```

pub mod codebook;
pub mod config;
pub mod tokenizer;

pub use codebook::{Codebook, CodebookBuilder, TermFrequencyTable};
pub use config::CodebookConfig;
pub use tokenizer::{tokenize, TokenizerConfig, DEFAULT_STOP_CHARACTERS};
