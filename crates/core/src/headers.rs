//! Header row and the name → position index built from it.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Addresses a column either by position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ColumnKey {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<&String> for ColumnKey {
    fn from(name: &String) -> Self {
        ColumnKey::Name(name.clone())
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Index(i) => write!(f, "{}", i),
            ColumnKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Column names in sheet order plus a lookup from name to column position.
///
/// Blank names stay in `names` (they still occupy a column) but are not
/// indexed. When a name repeats, the last column carrying it wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Headers {
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_position_lookup() {
        let headers = Headers::new(names(&["date", "amount", "memo"]));
        assert_eq!(headers.position("date"), Some(0));
        assert_eq!(headers.position("memo"), Some(2));
        assert_eq!(headers.position("missing"), None);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let headers = Headers::new(names(&["x", "y", "x"]));
        assert_eq!(headers.position("x"), Some(2));
        assert_eq!(headers.names().len(), 3);
    }

    #[test]
    fn test_blank_names_not_indexed() {
        let headers = Headers::new(names(&["a", "", "c"]));
        assert_eq!(headers.position(""), None);
        assert_eq!(headers.position("c"), Some(2));
    }

    #[test]
    fn test_serializes_as_name_list() {
        let headers = Headers::new(names(&["a", "b"]));
        let json = serde_json::to_value(&headers).unwrap();
        assert_eq!(json, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_column_key_conversions() {
        assert_eq!(ColumnKey::from(3), ColumnKey::Index(3));
        assert_eq!(ColumnKey::from("qty"), ColumnKey::Name("qty".into()));
        assert_eq!(ColumnKey::from(String::from("qty")).to_string(), "qty");
    }
}
