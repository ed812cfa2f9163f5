//! Recursive document value model.
//!
//! # Responsibility
//! - Represent a loaded manifest as a closed Dictionary/List/Scalar tree.
//! - Provide the single dotted-path lookup every extractor goes through.
//!
//! # Invariants
//! - Absence is never a variant; lookups report it as `None`.
//! - Lookup only descends through dictionaries.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Path separator used by dotted key paths such as `widget.privilege`.
pub const PATH_SEPARATOR: char = '.';

/// One node of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Dictionary(BTreeMap<String, Document>),
    List(Vec<Document>),
    Scalar(String),
}

impl Document {
    /// Creates an empty dictionary node.
    pub fn empty_dictionary() -> Self {
        Self::Dictionary(BTreeMap::new())
    }

    /// Creates a scalar node.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Converts a JSON tree into a document.
    ///
    /// Numbers and booleans become scalars holding their JSON text. `null`
    /// values are dropped, both as dictionary entries and as list elements, so a
    /// key mapped to `null` reads as absent.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(entries) => Self::Dictionary(
                entries
                    .into_iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| (key, Self::from_json(value)))
                    .collect(),
            ),
            serde_json::Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .filter(|item| !item.is_null())
                    .map(Self::from_json)
                    .collect(),
            ),
            serde_json::Value::String(text) => Self::Scalar(text),
            serde_json::Value::Bool(flag) => Self::Scalar(flag.to_string()),
            serde_json::Value::Number(number) => Self::Scalar(number.to_string()),
            serde_json::Value::Null => Self::empty_dictionary(),
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Self::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the direct child stored under `key`, if this is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_dictionary().and_then(|entries| entries.get(key))
    }

    /// Resolves a dotted key path.
    ///
    /// Returns `Ok(None)` when the last existing dictionary has no entry for
    /// the next segment, and `Err` when a segment has to be looked up inside
    /// a node that is not a dictionary.
    pub fn lookup(&self, path: &str) -> Result<Option<&Document>, PathError> {
        let mut current = self;
        let mut walked = 0usize;
        for segment in path.split(PATH_SEPARATOR) {
            let Some(entries) = current.as_dictionary() else {
                return Err(PathError {
                    path: path.to_string(),
                    parent: path[..walked.saturating_sub(1)].to_string(),
                });
            };
            match entries.get(segment) {
                Some(child) => current = child,
                None => return Ok(None),
            }
            walked += segment.len() + PATH_SEPARATOR.len_utf8();
        }
        Ok(Some(current))
    }
}

/// Lookup failure: an intermediate node on the path is not a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    /// Full path that was being resolved.
    pub path: String,
    /// Prefix of `path` that resolved to the non-dictionary node.
    pub parent: String,
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot resolve `{}`: `{}` is not a dictionary",
            self.path, self.parent
        )
    }
}

impl Error for PathError {}
