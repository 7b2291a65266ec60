//! Schemaless JSON records as entities.
//!
//! Entities are JSON objects, keyed by one of their fields and optionally
//! ordered by another. A JSON object of changes merges onto an entity the
//! way an object spread does: listed fields overwrite, the rest stay.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::models::Changes;

/// Shallow merge: each field in the changes replaces the entity's field.
impl Changes<Value> for Map<String, Value> {
    fn apply(&self, entity: &Value) -> Value {
        let mut merged = match entity {
            Value::Object(fields) => fields.clone(),
            _ => Map::new(),
        };
        for (field, value) in self {
            merged.insert(field.clone(), value.clone());
        }
        Value::Object(merged)
    }

    fn into_entity(self) -> Option<Value> {
        Some(Value::Object(self))
    }
}

/// Key of `entity` read from `field`.
///
/// Strings are used as-is; any other value uses its JSON text. A missing
/// field yields `"null"`, which is then a key like any other.
pub fn key_of(entity: &Value, field: &str) -> String {
    match entity.get(field) {
        Some(Value::String(key)) => key.clone(),
        Some(other) => other.to_string(),
        None => Value::Null.to_string(),
    }
}

/// Compare two entities by `field`.
///
/// Strings compare lexicographically and numbers numerically. Values of
/// different types order by type: null, bool, number, string, array,
/// object. A missing field counts as null.
pub fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let a = a.get(field).unwrap_or(&Value::Null);
    let b = b.get(field).unwrap_or(&Value::Null);

    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
