//! Attribute role index
//!
//! Assigns every column of an input instance exactly one role: name,
//! time stamp, label, removed, or one of the feature classes. Feature
//! classes are small integer ids; class 0 holds symbolic (text) features
//! and every other id a numeric feature group with its own codebook.
//!
//! An index is built once, either from an explicit role spec such as
//! `"nt0[2]1[40]c"` or from one of two heuristics. Only the positional
//! heuristic may later be refined by sniffing a representative row.

use crate::error::{Error, Result};
use crate::row::{CellValue, ColumnDecl};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Feature class id (`0`..=`9` in role specs)
pub type FeatureClass = u8;

/// Symbolic/text features
pub const SYMBOLIC_CLASS: FeatureClass = 0;

/// Default class for numeric features
pub const NUMERIC_CLASS: FeatureClass = 1;

/// Upper bound on the number of columns a role spec may describe
pub const MAX_ATTRIBUTES: usize = 1 << 20;

/// Semantic role of a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Name,
    Time,
    Label,
    Remove,
    Feature(FeatureClass),
}

impl Role {
    fn from_tag(tag: char) -> Option<Self> {
        match tag.to_ascii_lowercase() {
            'n' => Some(Role::Name),
            't' => Some(Role::Time),
            'c' | 'l' => Some(Role::Label),
            'r' => Some(Role::Remove),
            d if d.is_ascii_digit() => Some(Role::Feature(d as u8 - b'0')),
            _ => None,
        }
    }

    /// Only removal and feature tags take a `[k]` repeat suffix.
    fn accepts_repeat(self) -> bool {
        matches!(self, Role::Remove | Role::Feature(_))
    }
}

/// How the role-spec parser treats characters it does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseMode {
    /// Skip the character without consuming a column
    #[default]
    Lenient,
    /// Fail with [`Error::UnrecognizedRole`]
    Strict,
}

/// Lifecycle of an [`AttributeIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing assigned yet
    Unpopulated,
    /// Built from an explicit role spec, immutable
    Explicit,
    /// Built column by column from schema declarations
    Declared,
    /// Built from the row width alone, all features numeric
    Positional,
    /// Positional outcome after content sniffing
    Refined,
}

/// Maps every column index of an instance to its role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeIndex {
    phase: Phase,
    num_attributes: usize,
    num_features: usize,
    index_name: Option<usize>,
    index_time: Option<usize>,
    indexes_attribute_class: BTreeMap<FeatureClass, Vec<usize>>,
    indexes_labels: Vec<usize>,
    indexes_remove: Vec<usize>,
}

impl AttributeIndex {
    /// Create an empty index, to be populated by one of the heuristics
    pub fn new() -> Self {
        Self {
            phase: Phase::Unpopulated,
            num_attributes: 0,
            num_features: 0,
            index_name: None,
            index_time: None,
            indexes_attribute_class: BTreeMap::new(),
            indexes_labels: Vec::new(),
            indexes_remove: Vec::new(),
        }
    }

    /// Parse a role spec, skipping unknown characters.
    ///
    /// An empty spec yields an unpopulated index.
    pub fn parse(spec: &str) -> Result<Self> {
        Self::parse_with(spec, ParseMode::Lenient)
    }

    /// Parse a role spec with an explicit [`ParseMode`].
    ///
    /// Tags: `n` name, `t` time stamp, `c`/`l` label, `r` remove,
    /// digit `d` feature class `d`. `r` and digits may carry a `[k]`
    /// suffix applying the role to the next `k` columns.
    pub fn parse_with(spec: &str, mode: ParseMode) -> Result<Self> {
        let mut index = Self::new();
        if spec.is_empty() {
            return Ok(index);
        }

        let chars: Vec<char> = spec.chars().collect();
        let mut pos = 0;

        while pos < chars.len() {
            let tag = chars[pos];
            let Some(role) = Role::from_tag(tag) else {
                match mode {
                    ParseMode::Strict => {
                        return Err(Error::UnrecognizedRole { tag, position: pos });
                    }
                    ParseMode::Lenient => {
                        warn!("Skipping unrecognized role tag '{}' at position {}", tag, pos);
                        pos += 1;
                        continue;
                    }
                }
            };

            let (count, next) = if role.accepts_repeat() && chars.get(pos + 1) == Some(&'[') {
                parse_repeat(&chars, pos + 1, MAX_ATTRIBUTES - index.num_attributes)?
            } else {
                (1, pos + 1)
            };

            if index.num_attributes + count > MAX_ATTRIBUTES {
                return Err(Error::InvalidRepeatCount {
                    count: count.to_string(),
                    position: pos,
                });
            }
            for _ in 0..count {
                index.assign(role)?;
            }
            pos = next;
        }

        index.phase = Phase::Explicit;
        debug!(
            "Parsed role spec '{}': {} attributes, {} features",
            spec, index.num_attributes, index.num_features
        );
        Ok(index)
    }

    /// Build an index from row schema declarations
    pub fn from_declarations(decls: &[ColumnDecl], timestamped: bool) -> Result<Self> {
        let mut index = Self::new();
        for decl in decls {
            index.push_declaration(decl, timestamped)?;
        }
        Ok(index)
    }

    /// Classify the next declared column.
    ///
    /// The first column is the name, the second the time stamp if
    /// `timestamped`. Label-named columns with an enumerated domain become
    /// labels; other columns are symbolic if declared `string`, numeric
    /// otherwise.
    pub fn push_declaration(&mut self, decl: &ColumnDecl, timestamped: bool) -> Result<()> {
        match self.phase {
            Phase::Unpopulated | Phase::Declared => {}
            Phase::Explicit => {
                return Err(usage("push_declaration", "not allowed once a role spec is given"));
            }
            Phase::Positional | Phase::Refined => {
                return Err(usage("push_declaration", "index was already populated positionally"));
            }
        }

        let role = if self.num_attributes == 0 {
            Role::Name
        } else if self.num_attributes == 1 && timestamped {
            Role::Time
        } else if decl.is_label_named() && decl.has_enumerated_domain() {
            Role::Label
        } else if decl.is_string() {
            Role::Feature(SYMBOLIC_CLASS)
        } else {
            Role::Feature(NUMERIC_CLASS)
        };

        self.assign(role)?;
        self.phase = Phase::Declared;
        Ok(())
    }

    /// Build an index from the row width alone
    pub fn positional(width: usize, timestamped: bool, trailing_label: bool) -> Result<Self> {
        let mut index = Self::new();
        index.populate_positional(width, timestamped, trailing_label)?;
        Ok(index)
    }

    /// Column 0 is the name, column 1 the time stamp if `timestamped`, the
    /// last column a label if `trailing_label`; all other columns are
    /// numeric features.
    pub fn populate_positional(
        &mut self,
        width: usize,
        timestamped: bool,
        trailing_label: bool,
    ) -> Result<()> {
        match self.phase {
            Phase::Unpopulated => {}
            Phase::Explicit => {
                return Err(usage("populate_positional", "not allowed once a role spec is given"));
            }
            _ => {
                return Err(usage("populate_positional", "index is already populated"));
            }
        }

        let fixed = 1 + usize::from(timestamped) + usize::from(trailing_label);
        if width < fixed {
            return Err(Error::AttributeCountMismatch { expected: width, actual: fixed });
        }

        let mut index = Self::new();
        index.assign(Role::Name)?;
        if timestamped {
            index.assign(Role::Time)?;
        }
        for _ in fixed..width {
            index.assign(Role::Feature(NUMERIC_CLASS))?;
        }
        if trailing_label {
            index.assign(Role::Label)?;
        }

        if index.num_attributes != width {
            return Err(Error::AttributeCountMismatch {
                expected: width,
                actual: index.num_attributes,
            });
        }

        index.phase = Phase::Positional;
        *self = index;
        Ok(())
    }

    /// Split the numeric columns of a positional index into numeric and
    /// symbolic ones, based on a representative row.
    ///
    /// Columns whose value parses as a float stay numeric, all others move
    /// to [`SYMBOLIC_CLASS`]. Allowed once, and only while every feature is
    /// still numeric. On error the index is left untouched.
    pub fn refine_from_row(&mut self, row: &[CellValue]) -> Result<()> {
        match self.phase {
            Phase::Positional => {}
            Phase::Explicit => {
                return Err(usage("refine_from_row", "not allowed once a role spec is given"));
            }
            Phase::Refined => {
                return Err(usage("refine_from_row", "feature classes were already refined"));
            }
            Phase::Declared => {
                return Err(usage("refine_from_row", "declared columns are already typed"));
            }
            Phase::Unpopulated => {
                return Err(usage("refine_from_row", "index is not populated"));
            }
        }
        if self.indexes_attribute_class.keys().any(|&class| class != NUMERIC_CLASS) {
            return Err(usage("refine_from_row", "feature classes have already diverged"));
        }

        let mut numeric = Vec::new();
        let mut symbolic = Vec::new();
        for &column in self.feature_indexes(NUMERIC_CLASS) {
            let cell = row.get(column).ok_or(Error::ColumnOutOfRange {
                row: 0,
                column,
                width: row.len(),
            })?;
            if cell.is_missing() {
                return Err(Error::MissingValue { row: 0, column });
            }
            if cell.is_numeric() {
                numeric.push(column);
            } else {
                symbolic.push(column);
            }
        }

        debug!(
            "Refined feature classes: {} numeric, {} symbolic",
            numeric.len(),
            symbolic.len()
        );

        self.indexes_attribute_class.clear();
        if !symbolic.is_empty() {
            self.indexes_attribute_class.insert(SYMBOLIC_CLASS, symbolic);
        }
        if !numeric.is_empty() {
            self.indexes_attribute_class.insert(NUMERIC_CLASS, numeric);
        }
        self.phase = Phase::Refined;
        Ok(())
    }

    /// Give the next column the given role
    fn assign(&mut self, role: Role) -> Result<()> {
        let column = self.num_attributes;
        match role {
            Role::Name => {
                if let Some(first) = self.index_name {
                    return Err(Error::DuplicateRole { role: "name", first, second: column });
                }
                self.index_name = Some(column);
            }
            Role::Time => {
                if let Some(first) = self.index_time {
                    return Err(Error::DuplicateRole { role: "time", first, second: column });
                }
                self.index_time = Some(column);
            }
            Role::Label => self.indexes_labels.push(column),
            Role::Remove => self.indexes_remove.push(column),
            Role::Feature(class) => {
                self.indexes_attribute_class.entry(class).or_default().push(column);
                self.num_features += 1;
            }
        }
        self.num_attributes += 1;
        Ok(())
    }

    /// Check that every column has exactly one role
    pub fn validate(&self) -> Result<()> {
        let mut seen = vec![0usize; self.num_attributes];
        let assigned = self
            .index_name
            .iter()
            .chain(self.index_time.iter())
            .chain(self.indexes_labels.iter())
            .chain(self.indexes_remove.iter())
            .chain(self.indexes_attribute_class.values().flatten());

        for &column in assigned {
            match seen.get_mut(column) {
                Some(count) => *count += 1,
                None => {
                    return Err(Error::InvalidConfig(format!(
                        "column {} exceeds attribute count {}",
                        column, self.num_attributes
                    )));
                }
            }
        }

        if let Some(column) = seen.iter().position(|&count| count != 1) {
            return Err(Error::InvalidConfig(format!(
                "column {} has {} roles",
                column, seen[column]
            )));
        }

        let features: usize = self.indexes_attribute_class.values().map(Vec::len).sum();
        if features != self.num_features {
            return Err(Error::AttributeCountMismatch {
                expected: self.num_features,
                actual: features,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn is_specified(&self) -> bool {
        self.phase == Phase::Explicit
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn num_attributes(&self) -> usize {
        self.num_attributes
    }

    /// Feature-bearing columns, without name, time, labels and removed ones
    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    #[inline]
    pub fn index_name(&self) -> Option<usize> {
        self.index_name
    }

    #[inline]
    pub fn index_time(&self) -> Option<usize> {
        self.index_time
    }

    pub fn indexes_labels(&self) -> &[usize] {
        &self.indexes_labels
    }

    pub fn indexes_remove(&self) -> &[usize] {
        &self.indexes_remove
    }

    pub fn indexes_attribute_class(&self) -> &BTreeMap<FeatureClass, Vec<usize>> {
        &self.indexes_attribute_class
    }

    pub fn feature_indexes(&self, class: FeatureClass) -> &[usize] {
        self.indexes_attribute_class
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Columns holding symbolic (text) features
    pub fn text_indexes(&self) -> &[usize] {
        self.feature_indexes(SYMBOLIC_CLASS)
    }

    /// Number of bags produced downstream. The symbolic class always counts
    /// once, even when no text column exists.
    pub fn num_feature_classes(&self) -> usize {
        1 + self
            .indexes_attribute_class
            .keys()
            .filter(|&&class| class > SYMBOLIC_CLASS)
            .count()
    }

    pub fn role_of(&self, column: usize) -> Option<Role> {
        if self.index_name == Some(column) {
            return Some(Role::Name);
        }
        if self.index_time == Some(column) {
            return Some(Role::Time);
        }
        if self.indexes_labels.contains(&column) {
            return Some(Role::Label);
        }
        if self.indexes_remove.contains(&column) {
            return Some(Role::Remove);
        }
        self.indexes_attribute_class
            .iter()
            .find(|(_, columns)| columns.contains(&column))
            .map(|(&class, _)| Role::Feature(class))
    }
}

impl Default for AttributeIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `[k]` starting at the `[` at `open`; returns the count and the
/// position just after `]`.
/// Parse `[k]` starting at `open`; `k` may not exceed `remaining`
fn parse_repeat(chars: &[char], open: usize, remaining: usize) -> Result<(usize, usize)> {
    let close = chars[open + 1..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| open + 1 + offset)
        .ok_or(Error::UnterminatedGroup { position: open })?;

    let digits: String = chars[open + 1..close].iter().collect();
    let invalid = || Error::InvalidRepeatCount {
        count: digits.clone(),
        position: open + 1,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let count = digits.parse::<usize>().map_err(|_| invalid())?;
    if count > remaining {
        warn!("Repeat count {} exceeds the limit of {} attributes", count, MAX_ATTRIBUTES);
        return Err(invalid());
    }
    Ok((count, close + 1))
}

fn usage(operation: &'static str, reason: &str) -> Error {
    warn!("{}: {}", operation, reason);
    Error::Usage {
        operation,
        reason: reason.to_string(),
    }
}
