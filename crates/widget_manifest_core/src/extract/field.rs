//! Field extraction over loaded manifest documents.
//!
//! # Responsibility
//! - Resolve required, optional and repeated scalar fields by key path.
//! - Apply the absent / single dictionary / list-of-dictionaries rule
//!   identically to every repeated field.
//!
//! # Invariants
//! - Extractors are pure: they read the document and never retain it.
//! - A repeated field either yields every item in document order or fails;
//!   partial lists are never returned.

use crate::document::{Document, PathError};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_VALUE_NOT_FOUND: &str = "Value not found. Value name: ";
const MSG_NOT_CONTAINER: &str = "Cannot get key value as a dictionary/list. Key name: ";
const MSG_NOT_STRING: &str = "Cannot get key value as a string. Key name: ";
const MSG_NO_MANDATORY_KEY: &str = "Cannot find mandatory key. Key name: ";

/// Node kind a field extraction expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A dictionary or list, on the way to or at a repeated group.
    Container,
    /// A string at the end of a scalar field path.
    Scalar,
}

/// Field extraction failure. `Display` renders the caller-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A required scalar resolved to nothing.
    MissingKey(String),
    /// A node on the path had the wrong shape.
    WrongShape { key: String, expected: ExpectedShape },
    /// An item of a repeated field lacks its designated sub-key.
    MissingSubKey(String),
}

impl FieldError {
    /// Key name the message refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingKey(key) | Self::MissingSubKey(key) => key,
            Self::WrongShape { key, .. } => key,
        }
    }

    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey(_) => "missing_key",
            Self::WrongShape { .. } => "wrong_shape",
            Self::MissingSubKey(_) => "missing_sub_key",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::MissingKey(_) => MSG_VALUE_NOT_FOUND,
            Self::WrongShape {
                expected: ExpectedShape::Container,
                ..
            } => MSG_NOT_CONTAINER,
            Self::WrongShape {
                expected: ExpectedShape::Scalar,
                ..
            } => MSG_NOT_STRING,
            Self::MissingSubKey(_) => MSG_NO_MANDATORY_KEY,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.key())
    }
}

impl Error for FieldError {}

/// A shape failure while resolving a group path is reported against the
/// whole group key.
impl From<PathError> for FieldError {
    fn from(value: PathError) -> Self {
        Self::WrongShape {
            key: value.path,
            expected: ExpectedShape::Container,
        }
    }
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Extracts a scalar that must be present.
pub fn extract_required_scalar(document: &Document, key_path: &str) -> FieldResult<String> {
    match document.lookup(key_path)? {
        Some(Document::Scalar(value)) => Ok(value.clone()),
        Some(_) => Err(FieldError::WrongShape {
            key: key_path.to_string(),
            expected: ExpectedShape::Scalar,
        }),
        None => Err(FieldError::MissingKey(key_path.to_string())),
    }
}

/// Extracts a scalar that may be absent; absence yields an empty string.
pub fn extract_optional_scalar(document: &Document, key_path: &str) -> FieldResult<String> {
    match extract_required_scalar(document, key_path) {
        Err(FieldError::MissingKey(_)) => Ok(String::new()),
        other => other,
    }
}

/// Extracts a repeated scalar such as the privilege or icon list.
///
/// - absent group: empty list
/// - one dictionary: one-element list with its `item_key`
/// - list: every element's `item_key`, in document order
/// - anything else at the group path: empty list
pub fn extract_repeated_scalar(
    document: &Document,
    group_key_path: &str,
    item_key: &str,
) -> FieldResult<Vec<String>> {
    match document.lookup(group_key_path)? {
        None => Ok(Vec::new()),
        Some(item @ Document::Dictionary(_)) => Ok(vec![item_value(item, item_key)?]),
        Some(Document::List(items)) => items
            .iter()
            .map(|item| match item {
                Document::Dictionary(_) => item_value(item, item_key),
                _ => Err(FieldError::WrongShape {
                    key: group_key_path.to_string(),
                    expected: ExpectedShape::Container,
                }),
            })
            .collect(),
        Some(Document::Scalar(_)) => Ok(Vec::new()),
    }
}

fn item_value(item: &Document, item_key: &str) -> FieldResult<String> {
    item.get(item_key)
        .and_then(Document::as_scalar)
        .map(str::to_string)
        .ok_or_else(|| FieldError::MissingSubKey(item_key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        extract_optional_scalar, extract_repeated_scalar, extract_required_scalar, ExpectedShape,
        FieldError,
    };
    use crate::document::Document;
    use serde_json::json;

    const GROUP: &str = "widget.privilege";
    const ITEM: &str = "@name";

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(value)
    }

    #[test]
    fn required_scalar_resolves_or_reports_missing_key() {
        let document = doc(json!({ "name": "MyApp" }));
        assert_eq!(extract_required_scalar(&document, "name").unwrap(), "MyApp");

        let err = extract_required_scalar(&document, "version").unwrap_err();
        assert_eq!(err, FieldError::MissingKey("version".to_string()));
        assert_eq!(err.to_string(), "Value not found. Value name: version");
    }

    #[test]
    fn required_scalar_rejects_non_scalar_terminal() {
        let document = doc(json!({ "name": { "#text": "MyApp" } }));
        let err = extract_required_scalar(&document, "name").unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongShape {
                key: "name".to_string(),
                expected: ExpectedShape::Scalar,
            }
        );
        assert_eq!(
            err.to_string(),
            "Cannot get key value as a string. Key name: name"
        );
    }

    #[test]
    fn optional_scalar_maps_absence_to_empty_but_keeps_shape_errors() {
        let document = doc(json!({ "shortName": ["a"] }));
        assert_eq!(extract_optional_scalar(&document, "missing").unwrap(), "");
        assert!(matches!(
            extract_optional_scalar(&document, "shortName"),
            Err(FieldError::WrongShape { .. })
        ));
    }

    #[test]
    fn repeated_absent_group_is_empty() {
        let document = doc(json!({ "widget": {} }));
        assert!(extract_repeated_scalar(&document, GROUP, ITEM).unwrap().is_empty());
        let document = doc(json!({}));
        assert!(extract_repeated_scalar(&document, GROUP, ITEM).unwrap().is_empty());
    }

    #[test]
    fn repeated_single_dictionary_yields_one_item() {
        let document = doc(json!({ "widget": { "privilege": { "@name": "X" } } }));
        assert_eq!(
            extract_repeated_scalar(&document, GROUP, ITEM).unwrap(),
            vec!["X".to_string()]
        );
    }

    #[test]
    fn repeated_list_preserves_document_order() {
        let document = doc(json!({
            "widget": {
                "privilege": [
                    { "@name": "http://tizen.org/privilege/c" },
                    { "@name": "http://tizen.org/privilege/a" },
                    { "@name": "http://tizen.org/privilege/b" }
                ]
            }
        }));
        assert_eq!(
            extract_repeated_scalar(&document, GROUP, ITEM).unwrap(),
            vec![
                "http://tizen.org/privilege/c".to_string(),
                "http://tizen.org/privilege/a".to_string(),
                "http://tizen.org/privilege/b".to_string(),
            ]
        );
    }

    #[test]
    fn repeated_item_without_sub_key_fails_whole_list() {
        let document = doc(json!({
            "widget": { "privilege": [{ "@name": "ok" }, { "@other": "x" }] }
        }));
        let err = extract_repeated_scalar(&document, GROUP, ITEM).unwrap_err();
        assert_eq!(err, FieldError::MissingSubKey("@name".to_string()));
        assert_eq!(err.to_string(), "Cannot find mandatory key. Key name: @name");

        let single = doc(json!({ "widget": { "privilege": { "@name": ["x"] } } }));
        assert_eq!(
            extract_repeated_scalar(&single, GROUP, ITEM).unwrap_err(),
            FieldError::MissingSubKey("@name".to_string())
        );
    }

    #[test]
    fn null_entries_in_repeated_group_are_skipped() {
        let document = doc(json!({
            "widget": { "privilege": [{ "@name": "a" }, null, { "@name": "b" }] }
        }));
        assert_eq!(
            extract_repeated_scalar(&document, GROUP, ITEM).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn repeated_bare_scalar_group_is_tolerated_as_empty() {
        let document = doc(json!({ "widget": { "privilege": "internet" } }));
        assert!(extract_repeated_scalar(&document, GROUP, ITEM).unwrap().is_empty());
    }

    #[test]
    fn repeated_group_shape_errors_name_the_offending_key() {
        let nested = doc(json!({ "widget": ["not", "a", "dictionary"] }));
        let err = extract_repeated_scalar(&nested, GROUP, ITEM).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot get key value as a dictionary/list. Key name: widget.privilege"
        );

        let scalar_item = doc(json!({ "widget": { "privilege": [{ "@name": "a" }, "b"] } }));
        let err = extract_repeated_scalar(&scalar_item, GROUP, ITEM).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot get key value as a dictionary/list. Key name: widget.privilege"
        );
    }
}
