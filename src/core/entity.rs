use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::{Result, StoreError};

/// A flat JSON object: the shape of entities and of partial patches.
pub type Record = serde_json::Map<String, JsonValue>;

/// Immutable entity record.
///
/// Cloning shares the underlying record, so two clones are `ptr_eq`.
/// Every modifying method returns a fresh `Entity` and leaves `self` as is.
#[derive(Clone, PartialEq)]
pub struct Entity(Arc<Record>);

impl Entity {
    pub fn new(record: Record) -> Self {
        Self(Arc::new(record))
    }

    /// Builds an entity from a JSON value, which must be an object.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(record) => Ok(Self::new(record)),
            other => Err(StoreError::InvalidEntity(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    pub fn record(&self) -> &Record {
        &self.0
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object((*self.0).clone())
    }

    /// Shallow merge: every top-level field of `patch` overwrites the
    /// field of the same name, nested objects included.
    pub fn merged(&self, patch: &Record) -> Self {
        let mut record = (*self.0).clone();
        for (key, value) in patch {
            record.insert(key.clone(), value.clone());
        }
        Self::new(record)
    }

    /// Returns a copy with one field replaced.
    pub fn with(&self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let mut record = (*self.0).clone();
        record.insert(field.into(), value.into());
        Self::new(record)
    }

    /// Identity comparison; `==` compares field values.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Record> for Entity {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

impl TryFrom<JsonValue> for Entity {
    type Error = StoreError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_json(value)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Record::deserialize(deserializer).map(Self::new)
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow_and_copying() {
        let entity = Entity::from_json(json!({
            "id": 1,
            "meta": { "a": 1, "b": 2 },
            "title": "todo 1"
        }))
        .unwrap();
        let patch = json!({ "meta": { "a": 9 }, "completed": true });

        let merged = entity.merged(patch.as_object().unwrap());

        assert_eq!(
            merged.to_json(),
            json!({ "id": 1, "meta": { "a": 9 }, "title": "todo 1", "completed": true })
        );
        assert_eq!(entity.get("completed"), None);
        assert!(!merged.ptr_eq(&entity));
    }

    #[test]
    fn test_clone_shares_record() {
        let entity = Entity::from_json(json!({ "id": 1 })).unwrap();
        let copy = entity.clone();
        assert!(copy.ptr_eq(&entity));

        let rebuilt = Entity::from_json(json!({ "id": 1 })).unwrap();
        assert_eq!(rebuilt, entity);
        assert!(!rebuilt.ptr_eq(&entity));
    }

    #[test]
    fn test_rejects_non_objects() {
        let err = Entity::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEntity(_)));
    }

    #[test]
    fn test_serde_round_trip_as_plain_object() {
        let entity = Entity::from_json(json!({ "id": 1, "tags": ["a", "b"] })).unwrap();

        let text = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&text).unwrap();

        assert_eq!(serde_json::from_str::<JsonValue>(&text).unwrap(), entity.to_json());
        assert_eq!(back, entity);
    }

    #[test]
    fn test_parse_errors_become_invalid_entity() {
        fn parse(text: &str) -> Result<Entity> {
            Ok(serde_json::from_str(text)?)
        }

        assert!(parse(r#"{ "id": "a" }"#).is_ok());
        assert!(matches!(parse("[1, 2]"), Err(StoreError::InvalidEntity(_))));
        assert!(matches!(parse("{ \"id\": "), Err(StoreError::InvalidEntity(_))));
    }
}
