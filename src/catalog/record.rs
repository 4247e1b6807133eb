use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ALIAS_KEY;

/// A single selectable tag as returned to clients.
///
/// Author-supplied fields are carried through untouched; only `alias` has a
/// meaning here. Records produced from name-keyed catalogs always have the
/// entry name as `alias[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagRecord(Value);

impl TagRecord {
    /// The explicit `name` field, if the author wrote one.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.0
            .get(ALIAS_KEY)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for TagRecord {
    fn from(value: Value) -> Self {
        TagRecord(value)
    }
}
