//! # xbow
//!
//! Feature-vectorization front end for heterogeneous, instance-based
//! tabular data.
//!
//! xbow classifies input columns into roles, tokenizes text cells and
//! builds term-frequency codebooks that a bag-of-words quantizer turns
//! into fixed-length count vectors.
//!
//! ## Quick Start
//!
//! ```rust
//! use xbow::prelude::*;
//!
//! // No role spec: name in column 0, numeric features, label last
//! let mut index = AttributeIndex::positional(4, false, true).unwrap();
//!
//! let rows = vec![
//!     vec![CellValue::text("u1"), CellValue::text("hello there"), CellValue::text("0.3"), CellValue::label("pos")],
//!     vec![CellValue::text("u2"), CellValue::text("hello again"), CellValue::text("0.9"), CellValue::label("neg")],
//! ];
//!
//! // Sniff the first row: column 1 turns out to be text
//! index.refine_from_row(&rows[0]).unwrap();
//! assert_eq!(index.text_indexes(), &[1]);
//!
//! let config = CodebookConfig { min_term_freq: 2, ..Default::default() };
//! let codebook = CodebookBuilder::new(config).generate(&rows, &index).unwrap();
//! assert_eq!(codebook.terms(), &["HELLO".to_string()]);
//! ```
//!
//! ## Crate Structure
//!
//! - [`xbow-core`](https://docs.rs/xbow-core) - Cell values, column declarations, attribute role index
//! - [`xbow-text`](https://docs.rs/xbow-text) - Tokenizer, codebook configuration, codebook builder
//!
//! ## Role Specs
//!
//! | tag        | role                                   |
//! |------------|----------------------------------------|
//! | `n`        | instance name                          |
//! | `t`        | time stamp                             |
//! | `c`, `l`   | label                                  |
//! | `r[k]`     | removed column(s)                      |
//! | `0[k]`     | symbolic (text) feature(s)             |
//! | `1`..`9[k]`| numeric feature(s), one codebook each  |

// Re-export core types
pub use xbow_core::{
    AttributeIndex, CellValue, ColumnDecl, Error, FeatureClass, ParseMode, Phase, Result, Role,
    Row, MAX_ATTRIBUTES, NUMERIC_CLASS, SYMBOLIC_CLASS,
};

// Re-export text layer
pub use xbow_text::{
    tokenize, Codebook, CodebookBuilder, CodebookConfig, TermFrequencyTable, TokenizerConfig,
    DEFAULT_STOP_CHARACTERS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttributeIndex, CellValue, ColumnDecl, Error, ParseMode, Result, Role, Row,
        Codebook, CodebookBuilder, CodebookConfig, TokenizerConfig,
    };
}
