//! Format-preserving config document.
//!
//! Wraps a `toml_edit` document so that everything the settings engine does
//! not touch (comments, ordering, unknown sections and keys) is written back
//! exactly as it was read.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table, TableLike, Value};

use crate::schema::FieldPath;

/// A field write that would have to replace a non-table value on its way
/// to the target key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot write '{path}': '{segment}' is not a table")]
pub struct PathConflict {
    /// Full dotted path of the field being written.
    pub path: String,
    /// The segment that holds something other than a table.
    pub segment: String,
}

/// The persisted Sports2D configuration document.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    doc: DocumentMut,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the item at a field path, if every segment exists.
    pub fn get(&self, path: &FieldPath) -> Option<&Item> {
        let mut item = self.doc.as_item();
        for segment in path.segments() {
            item = item.get(segment)?;
        }
        item.get(path.key).filter(|item| !item.is_none())
    }

    /// Write a value at a field path.
    ///
    /// Missing section tables are created. When the key already holds a
    /// value, its surrounding whitespace and trailing comment are kept.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<(), PathConflict> {
        let conflict = |segment: &str| PathConflict {
            path: path.to_string(),
            segment: segment.to_string(),
        };

        let segments: Vec<&str> = path.segments().collect();
        let mut table: &mut dyn TableLike = self.doc.as_table_mut();
        for (index, segment) in segments.iter().copied().enumerate() {
            if !table.contains_key(segment) {
                let mut child = Table::new();
                // Intermediate tables only get a header if they gain keys
                child.set_implicit(index + 1 < segments.len());
                table.insert(segment, Item::Table(child));
            }
            table = table
                .get_mut(segment)
                .and_then(Item::as_table_like_mut)
                .ok_or_else(|| conflict(segment))?;
        }

        match table.get_mut(path.key) {
            Some(Item::Value(existing)) => {
                let decor = existing.decor().clone();
                *existing = value;
                *existing.decor_mut() = decor;
            }
            Some(Item::None) | None => {
                table.insert(path.key, Item::Value(value));
            }
            Some(_) => return Err(conflict(path.key)),
        }
        Ok(())
    }

    /// Borrow the underlying TOML document.
    pub fn as_toml(&self) -> &DocumentMut {
        &self.doc
    }
}

impl FromStr for ConfigDocument {
    type Err = toml_edit::TomlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { doc: s.parse()? })
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}

/// Two documents are equal when they render to the same text.
impl PartialEq for ConfigDocument {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(section: &'static str, key: &'static str) -> FieldPath {
        FieldPath { section, key }
    }

    #[test]
    fn get_walks_dotted_sections() {
        let doc: ConfigDocument = "[a]\nx = 1\n[a.b]\ny = 2\n".parse().unwrap();
        assert_eq!(doc.get(&path("a", "x")).and_then(Item::as_integer), Some(1));
        assert_eq!(doc.get(&path("a.b", "y")).and_then(Item::as_integer), Some(2));
        assert!(doc.get(&path("a.c", "y")).is_none());
        assert!(doc.get(&path("a", "missing")).is_none());
    }

    #[test]
    fn set_keeps_trailing_comment() {
        let mut doc: ConfigDocument = "[pose]\nmode = 'balanced' # pick one\nother = 1\n"
            .parse()
            .unwrap();
        doc.set(&path("pose", "mode"), Value::from("performance"))
            .unwrap();
        assert_eq!(
            doc.to_string(),
            "[pose]\nmode = \"performance\" # pick one\nother = 1\n"
        );
    }

    #[test]
    fn set_creates_missing_tables() {
        let mut doc = ConfigDocument::new();
        doc.set(&path("outer.inner", "order"), Value::from(4i64))
            .unwrap();

        let reparsed: ConfigDocument = doc.to_string().parse().unwrap();
        assert_eq!(
            reparsed
                .get(&path("outer.inner", "order"))
                .and_then(Item::as_integer),
            Some(4)
        );
        assert!(!doc.to_string().contains("[outer]\n"));
    }

    #[test]
    fn set_refuses_to_replace_non_table() {
        let mut doc: ConfigDocument = "pose = 3\n".parse().unwrap();
        let err = doc
            .set(&path("pose", "mode"), Value::from("balanced"))
            .unwrap_err();
        assert_eq!(err.segment, "pose");
        assert_eq!(doc.to_string(), "pose = 3\n");
    }

    #[test]
    fn equality_is_textual() {
        let a: ConfigDocument = "[a]\nx = 1\n".parse().unwrap();
        let b: ConfigDocument = "[a]\nx = 1\n".parse().unwrap();
        let c: ConfigDocument = "[a]\nx =  1\n".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
