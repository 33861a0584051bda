use serde_json::Value as JsonValue;

use super::{EntitiesRef, EntityIndex};
use crate::core::IdPolicy;

/// Immutable snapshot of a whole store.
///
/// Holds every entity collection keyed by ref, plus unrelated application
/// props. Cloning is O(1); reducers take a snapshot by value and either hand
/// it back untouched or build a new one.
#[derive(Debug, Clone)]
pub struct StoreState {
    collections: im::HashMap<EntitiesRef, EntityIndex>,
    props: im::HashMap<String, JsonValue>,
    default_policy: IdPolicy,
}

impl StoreState {
    pub fn new(default_policy: IdPolicy) -> Self {
        Self {
            collections: im::HashMap::new(),
            props: im::HashMap::new(),
            default_policy,
        }
    }

    pub fn default_policy(&self) -> &IdPolicy {
        &self.default_policy
    }

    /// Resolves a ref to its collection.
    ///
    /// A ref with no collection yet resolves to an empty index using the
    /// default identifier policy; nothing is registered by the lookup.
    pub fn collection(&self, entities_ref: &EntitiesRef) -> EntityIndex {
        self.collections
            .get(entities_ref)
            .cloned()
            .unwrap_or_else(|| EntityIndex::new(self.default_policy.clone()))
    }

    pub fn has_collection(&self, entities_ref: &EntitiesRef) -> bool {
        self.collections.contains_key(entities_ref)
    }

    /// Refs with a materialized collection, in no particular order.
    pub fn refs(&self) -> impl Iterator<Item = &EntitiesRef> + '_ {
        self.collections.keys()
    }

    /// Returns a snapshot where `entities_ref` points at `index`.
    pub fn with_collection(mut self, entities_ref: EntitiesRef, index: EntityIndex) -> Self {
        self.collections.insert(entities_ref, index);
        self
    }

    pub fn prop(&self, key: &str) -> Option<&JsonValue> {
        self.props.get(key)
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// True when `other` is the very same snapshot, not merely an equal one.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.collections.ptr_eq(&other.collections) && self.props.ptr_eq(&other.props)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
