//! # xbow Core
//!
//! Core library for the xbow feature-vectorization front end.
//!
//! This crate describes the shape of tabular instance data:
//!
//! - [`CellValue`] / [`Row`] - A single instance with heterogeneous cells
//! - [`ColumnDecl`] - A column declaration from a row schema header
//! - [`AttributeIndex`] - Role of every column (name, time, label, removed, feature class)
//!
//! ## Example
//!
//! ```rust
//! use xbow_core::{AttributeIndex, Role};
//!
//! // name, time stamp, two text columns, 40 numeric columns, one label
//! let index = AttributeIndex::parse("nt0[2]1[40]c").unwrap();
//! assert_eq!(index.num_attributes(), 45);
//! assert_eq!(index.text_indexes(), &[2, 3]);
//! assert_eq!(index.role_of(44), Some(Role::Label));
//! ```

pub mod attributes;
pub mod error;
pub mod row;

pub use attributes::{
    AttributeIndex, FeatureClass, ParseMode, Phase, Role, MAX_ATTRIBUTES, NUMERIC_CLASS, SYMBOLIC_CLASS,
};
pub use error::{Error, Result};
pub use row::{CellValue, ColumnDecl, Row};
