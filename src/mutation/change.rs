use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::core::entity::json_kind;
use crate::core::{Entity, Record, Result, StoreError};

pub type Transform = Arc<dyn Fn(&Entity) -> Entity + Send + Sync>;

/// How an update rewrites a matched entity.
#[derive(Clone)]
pub enum Change {
    /// Shallow-merge these fields onto the entity.
    Patch(Record),
    /// Replace the entity with the function's output.
    Transform(Transform),
}

impl Change {
    /// Partial record from a JSON object.
    ///
    /// ```
    /// use memoentity::Change;
    /// use serde_json::json;
    ///
    /// assert!(Change::patch(json!({ "completed": true })).is_ok());
    /// assert!(Change::patch(json!("completed")).is_err());
    /// ```
    pub fn patch(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(record) => Ok(Self::Patch(record)),
            other => Err(StoreError::InvalidEntity(format!(
                "patch must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&Entity) -> Entity + Send + Sync + 'static,
    {
        Self::Transform(Arc::new(f))
    }

    pub fn apply(&self, entity: &Entity) -> Entity {
        match self {
            Self::Patch(patch) => entity.merged(patch),
            Self::Transform(transform) => transform(entity),
        }
    }
}

impl From<Record> for Change {
    fn from(record: Record) -> Self {
        Self::Patch(record)
    }
}

impl TryFrom<JsonValue> for Change {
    type Error = StoreError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::patch(value)
    }
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch(patch) => f.debug_tuple("Patch").field(patch).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}
