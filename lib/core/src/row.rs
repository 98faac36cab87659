use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single cell of an input instance
///
/// Serialized untagged: numbers, strings and `null` map to `Numeric`,
/// `Text` and `Missing`; a label is written as `{"label": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
    /// Class label (nominal or numeric target)
    Label(#[serde(with = "label_repr")] String),
    Missing,
}

mod label_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct LabelRef<'a> {
        label: &'a str,
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct LabelOwned {
        label: String,
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(label: &String, serializer: S) -> Result<S::Ok, S::Error> {
        LabelRef { label }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        LabelOwned::deserialize(deserializer).map(|l| l.label)
    }
}

/// One instance: a fixed-width sequence of cells
pub type Row = Vec<CellValue>;

impl CellValue {
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    pub fn label<S: Into<String>>(s: S) -> Self {
        CellValue::Label(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// String value of the cell, `None` for missing cells.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Text(s) | CellValue::Label(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Numeric(v) => Some(Cow::Owned(v.to_string())),
            CellValue::Missing => None,
        }
    }

    /// Whether the cell holds a value that fully parses as a float.
    pub fn is_numeric(&self) -> bool {
        match self {
            CellValue::Numeric(_) => true,
            CellValue::Text(s) | CellValue::Label(s) => s.trim().parse::<f64>().is_ok(),
            CellValue::Missing => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Numeric(v) => write!(f, "{}", v),
            CellValue::Text(s) | CellValue::Label(s) => f.write_str(s),
            CellValue::Missing => f.write_str("?"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Numeric(v)
    }
}

/// A column declaration from a row schema header
/// (`@attribute <name> <type>` in ARFF terms)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    pub name: String,
    /// Raw type token, e.g. `numeric`, `string` or `{yes,no}`
    pub type_token: String,
}

impl ColumnDecl {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, type_token: T) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
        }
    }

    /// Column named like a target (`class...` or `label...`)
    pub fn is_label_named(&self) -> bool {
        let name = self.name.trim().to_ascii_lowercase();
        name.starts_with("class") || name.starts_with("label")
    }

    /// Nominal type with an enumerated domain, e.g. `{pos,neg}`
    pub fn has_enumerated_domain(&self) -> bool {
        self.type_token.contains('{')
    }

    pub fn is_string(&self) -> bool {
        self.type_token.trim().eq_ignore_ascii_case("string")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sniffing() {
        assert!(CellValue::Numeric(1.5).is_numeric());
        assert!(CellValue::text("3.25").is_numeric());
        assert!(CellValue::text(" -1e3 ").is_numeric());
        assert!(!CellValue::text("hello").is_numeric());
        assert!(!CellValue::text("1.2.3").is_numeric());
        assert!(!CellValue::text("").is_numeric());
        assert!(!CellValue::Missing.is_numeric());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::text("a b").as_text().as_deref(), Some("a b"));
        assert_eq!(CellValue::label("pos").as_text().as_deref(), Some("pos"));
        assert_eq!(CellValue::Numeric(2.0).as_text().as_deref(), Some("2"));
        assert!(CellValue::Missing.as_text().is_none());
    }

    #[test]
    fn test_column_decl() {
        let label = ColumnDecl::new("Class", "{pos,neg}");
        assert!(label.is_label_named());
        assert!(label.has_enumerated_domain());

        let text = ColumnDecl::new("transcript", "STRING");
        assert!(text.is_string());
        assert!(!text.is_label_named());

        let num = ColumnDecl::new("f0", "numeric");
        assert!(!num.is_string());
        assert!(!num.has_enumerated_domain());
    }

    #[test]
    fn test_serde_untagged() {
        let row: Row = serde_json::from_str(r#"["id1", 0.5, null]"#).unwrap();
        assert_eq!(row[0], CellValue::text("id1"));
        assert_eq!(row[1], CellValue::Numeric(0.5));
        assert_eq!(row[2], CellValue::Missing);
    }

    #[test]
    fn test_serde_label_object() {
        let row: Row = serde_json::from_str(r#"["id1", {"label": "pos"}, "3"]"#).unwrap();
        assert_eq!(row[1], CellValue::label("pos"));
        assert_eq!(row[2], CellValue::text("3"));

        let row = vec![
            CellValue::text("a"),
            CellValue::label("neg"),
            CellValue::Numeric(2.0),
            CellValue::Missing,
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["a",{"label":"neg"},2.0,null]"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
