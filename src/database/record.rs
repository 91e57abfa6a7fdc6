//! Entity records: the `Resource` capability set shared by every CRUD entity,
//! typed field decoding for request bodies, and updatable-key tables that
//! drive PATCH semantics.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, PgPool, Postgres,
};

use crate::database::manager::DatabaseError;

/// Errors that can occur while decoding, patching or validating a record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidFieldType { field: String, expected: &'static str },
    #[error("Field '{field}' references unknown id {id}")]
    UnknownReference { field: String, id: i64 },
    #[error("Invalid updatable keys for {resource}: {reason}")]
    InvalidUpdatableKeys { resource: &'static str, reason: String },
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type QueryAsRow<'q, T> = QueryAs<'q, Postgres, T, PgArguments>;

/// An entity exposed through the generic CRUD controller.
///
/// `COLUMNS` lists the mutable columns in the order `bind_columns` binds them;
/// `id` is always generated by the store.
#[async_trait]
pub trait Resource:
    for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + Sized + 'static
{
    /// Singular name used in log lines and not-found messages
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    /// Decode a create/replace body. Required fields must be present.
    fn from_json(body: &Value) -> Result<Self, RecordError>;

    fn updatable_keys() -> &'static [UpdatableKey<Self>];

    /// Overwrite this record's replaceable attributes with those of `new`
    fn replace_with(&mut self, new: Self);

    fn bind_columns<'q>(&'q self, query: QueryAsRow<'q, Self>) -> QueryAsRow<'q, Self>;

    /// Check references to other entities before a write.
    ///
    /// `previous` is the stored row on update/replace; references it already
    /// held are not re-checked, so orphaned rows stay editable.
    async fn validate(&self, _pool: &PgPool, _previous: Option<&Self>) -> Result<(), RecordError> {
        Ok(())
    }

    /// Response representation; may embed related records
    async fn to_json(&self, _pool: &PgPool) -> Result<Value, RecordError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Typed setter invoked when its key is present in a PATCH body
pub enum Setter<T> {
    Text(fn(&mut T, String)),
    Integer(fn(&mut T, i64)),
    Float(fn(&mut T, f64)),
    Identifier(fn(&mut T, i64)),
}

pub struct UpdatableKey<T> {
    pub key: &'static str,
    pub setter: Setter<T>,
}

impl<T> Setter<T> {
    fn apply(&self, target: &mut T, key: &str, value: &Value) -> Result<(), RecordError> {
        match self {
            Setter::Text(set) => set(target, as_text(key, value)?),
            Setter::Integer(set) => set(target, as_integer(key, value)?),
            Setter::Float(set) => set(target, as_float(key, value)?),
            Setter::Identifier(set) => set(target, as_identifier(key, value)?),
        }
        Ok(())
    }
}

/// Apply every updatable key present in `body` to `target`.
///
/// Unknown keys and `null` values are ignored. Returns the keys that were applied.
pub fn apply_patch<T: Resource>(target: &mut T, body: &Value) -> Result<Vec<&'static str>, RecordError> {
    let map = body
        .as_object()
        .ok_or_else(|| RecordError::InvalidJson("Expected JSON object".to_string()))?;

    let mut applied = Vec::new();
    for updatable in T::updatable_keys() {
        match map.get(updatable.key) {
            None | Some(Value::Null) => continue,
            Some(value) => {
                updatable.setter.apply(target, updatable.key, value)?;
                applied.push(updatable.key);
            }
        }
    }
    Ok(applied)
}

/// Reject key tables with empty or duplicate keys; run when a resource is routed
pub fn validate_updatable_keys<T: Resource>() -> Result<(), RecordError> {
    let mut seen = HashSet::new();
    for updatable in T::updatable_keys() {
        if updatable.key.is_empty() {
            return Err(RecordError::InvalidUpdatableKeys {
                resource: T::NAME,
                reason: "empty key".to_string(),
            });
        }
        if !seen.insert(updatable.key) {
            return Err(RecordError::InvalidUpdatableKeys {
                resource: T::NAME,
                reason: format!("duplicate key '{}'", updatable.key),
            });
        }
    }
    Ok(())
}

/// Typed accessors over a JSON request body
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, RecordError> {
        match body {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(RecordError::InvalidJson("Expected JSON object".to_string())),
        }
    }

    /// First non-null value among `keys`
    fn get<'k>(&self, keys: &[&'k str]) -> Option<(&'k str, &'a Value)> {
        keys.iter().find_map(|key| match self.map.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some((*key, value)),
        })
    }

    pub fn required_text(&self, key: &str) -> Result<String, RecordError> {
        match self.get(&[key]) {
            Some((key, value)) => as_text(key, value),
            None => Err(RecordError::MissingRequiredField(key.to_string())),
        }
    }

    pub fn text_or_default(&self, key: &str) -> Result<String, RecordError> {
        self.get(&[key])
            .map(|(key, value)| as_text(key, value))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn integer_or_default(&self, key: &str) -> Result<i64, RecordError> {
        self.get(&[key])
            .map(|(key, value)| as_integer(key, value))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn float_or_default(&self, key: &str) -> Result<f64, RecordError> {
        self.get(&[key])
            .map(|(key, value)| as_float(key, value))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Identifier under any of `keys` (column name first, then aliases)
    pub fn identifier_or_default(&self, keys: &[&str]) -> Result<i64, RecordError> {
        self.get(keys)
            .map(|(key, value)| as_identifier(key, value))
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

fn as_text(key: &str, value: &Value) -> Result<String, RecordError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid_type(key, "string"))
}

fn as_integer(key: &str, value: &Value) -> Result<i64, RecordError> {
    value.as_i64().ok_or_else(|| invalid_type(key, "integer"))
}

fn as_float(key: &str, value: &Value) -> Result<f64, RecordError> {
    value.as_f64().ok_or_else(|| invalid_type(key, "number"))
}

fn as_identifier(key: &str, value: &Value) -> Result<i64, RecordError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid_type(key, "identifier"))
}

fn invalid_type(key: &str, expected: &'static str) -> RecordError {
    RecordError::InvalidFieldType {
        field: key.to_string(),
        expected,
    }
}
