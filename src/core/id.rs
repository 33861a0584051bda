use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::Entity;

/// Default identifier field of an entity record.
pub const DEFAULT_ID_KEY: &str = "id";

/// Identifier of an entity, unique within one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// Reads an identifier out of a JSON value.
    ///
    /// Only integers and strings qualify; floats, booleans, null and
    /// composite values are not identifiers.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n.as_i64().map(Self::Int),
            JsonValue::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Int(i) => JsonValue::from(*i),
            Self::Text(s) => JsonValue::String(s.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&EntityId> for EntityId {
    fn from(value: &EntityId) -> Self {
        value.clone()
    }
}

pub type IdExtractor = Arc<dyn Fn(&Entity) -> Option<EntityId> + Send + Sync>;

/// How a collection derives identifiers from its entities.
#[derive(Clone)]
pub enum IdPolicy {
    /// Read the identifier from a top-level field.
    Field(String),
    /// Derive the identifier with a caller supplied function.
    Custom(IdExtractor),
}

impl IdPolicy {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn custom<F>(extractor: F) -> Self
    where
        F: Fn(&Entity) -> Option<EntityId> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(extractor))
    }

    pub fn extract(&self, entity: &Entity) -> Option<EntityId> {
        match self {
            Self::Field(name) => entity.get(name).and_then(EntityId::from_json),
            Self::Custom(extractor) => extractor(entity),
        }
    }

    /// Name of the identifier field, if the policy is field based.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Custom(_) => None,
        }
    }
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self::Field(DEFAULT_ID_KEY.to_string())
    }
}

impl fmt::Debug for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
