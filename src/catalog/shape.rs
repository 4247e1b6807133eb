//! Structural classification of parsed catalog files.
//!
//! Catalog files come in three top-level shapes:
//!
//! - a plain sequence of tag records,
//! - a mapping whose `content` key holds such a sequence,
//! - a mapping from tag name to tag attributes, optionally nested under
//!   `content` (the legacy layout).
//!
//! The first two are already in record form and are returned as authored. The
//! name-keyed layout is flattened, with each key prepended to its `alias` list.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::catalog::record::TagRecord;
use crate::constants::{ALIAS_KEY, CONTENT_KEY};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("top-level value must be a sequence or a mapping, found {0}")]
    UnsupportedTopLevel(&'static str),

    #[error("'content' must be a sequence or a mapping, found {0}")]
    UnsupportedContent(&'static str),

    #[error("tag '{name}' must be a mapping, found {found}")]
    TagNotMapping { name: String, found: &'static str },

    #[error("alias of tag '{name}' must be a sequence or a string, found {found}")]
    InvalidAlias { name: String, found: &'static str },
}

/// A parsed catalog file, classified by its top-level shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCatalog {
    List(Vec<Value>),
    WrappedList(Vec<Value>),
    NameKeyed(Map<String, Value>),
}

impl RawCatalog {
    /// Inspect the document once and decide which shape it is.
    ///
    /// A null document (empty file) and a null `content` both classify as an
    /// empty name-keyed mapping.
    pub fn classify(document: Value) -> Result<Self, ShapeError> {
        match document {
            Value::Array(items) => Ok(RawCatalog::List(items)),
            Value::Null => Ok(RawCatalog::NameKeyed(Map::new())),
            Value::Object(mut map) => match map.get_mut(CONTENT_KEY).map(Value::take) {
                None => Ok(RawCatalog::NameKeyed(map)),
                Some(Value::Array(items)) => Ok(RawCatalog::WrappedList(items)),
                Some(Value::Object(content)) => Ok(RawCatalog::NameKeyed(content)),
                Some(Value::Null) => Ok(RawCatalog::NameKeyed(Map::new())),
                Some(other) => Err(ShapeError::UnsupportedContent(value_kind(&other))),
            },
            other => Err(ShapeError::UnsupportedTopLevel(value_kind(&other))),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            RawCatalog::List(_) => "list",
            RawCatalog::WrappedList(_) => "wrapped_list",
            RawCatalog::NameKeyed(_) => "name_keyed",
        }
    }

    /// Flatten into tag records. List shapes pass through without alias fix-up.
    pub fn normalize(self) -> Result<Vec<TagRecord>, ShapeError> {
        match self {
            RawCatalog::List(items) | RawCatalog::WrappedList(items) => {
                Ok(items.into_iter().map(TagRecord::from).collect())
            }
            RawCatalog::NameKeyed(entries) => entries
                .into_iter()
                .map(|(name, attrs)| normalize_entry(name, attrs))
                .collect(),
        }
    }
}

fn normalize_entry(name: String, attrs: Value) -> Result<TagRecord, ShapeError> {
    let mut fields = match attrs {
        Value::Object(fields) => fields,
        // `cat:` with nothing after it
        Value::Null => Map::new(),
        other => {
            return Err(ShapeError::TagNotMapping {
                name,
                found: value_kind(&other),
            })
        }
    };

    // Existing `alias` keeps its position among the author's fields
    let alias = fields
        .entry(ALIAS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));
    let mut aliases = match alias.take() {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::String(single) => vec![Value::String(single)],
        other => {
            return Err(ShapeError::InvalidAlias {
                name,
                found: value_kind(&other),
            })
        }
    };
    aliases.insert(0, Value::String(name));
    *alias = Value::Array(aliases);

    Ok(TagRecord::from(Value::Object(fields)))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
