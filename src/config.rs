use serde_json::Value as JsonValue;

use crate::core::IdPolicy;
use crate::storage::{EntitiesRef, EntityIndex, StoreState};

/// Entity store configuration
///
/// ```
/// use memoentity::{EntitiesRef, IdPolicy, StoreConfig};
///
/// const UI_ENTITIES: EntitiesRef = EntitiesRef::new("UIEntities");
///
/// let config = StoreConfig::new("todos")
///     .id_key("_id")
///     .with_ref_policy(UI_ENTITIES, IdPolicy::field("uid"));
/// assert_eq!(config.refs().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store name, used in log events
    pub name: String,

    /// Identifier policy of the default collection and of refs declared
    /// without one; also used for collections created lazily
    pub id_policy: IdPolicy,

    /// Collections created (empty) at store initialization
    refs: Vec<(EntitiesRef, Option<IdPolicy>)>,

    /// Initial application props
    props: Vec<(String, JsonValue)>,
}

impl StoreConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id_policy: IdPolicy::default(),
            refs: vec![(EntitiesRef::DEFAULT, None)],
            props: Vec::new(),
        }
    }

    /// Read identifiers from `key` instead of `id`
    pub fn id_key(mut self, key: &str) -> Self {
        self.id_policy = IdPolicy::field(key);
        self
    }

    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    /// Declare a named collection using the store's identifier policy
    pub fn with_ref(self, entities_ref: EntitiesRef) -> Self {
        self.declare(entities_ref, None)
    }

    /// Declare a named collection with its own identifier policy
    pub fn with_ref_policy(self, entities_ref: EntitiesRef, policy: IdPolicy) -> Self {
        self.declare(entities_ref, Some(policy))
    }

    /// Set an initial application prop
    pub fn prop(mut self, key: &str, value: JsonValue) -> Self {
        self.props.push((key.to_string(), value));
        self
    }

    pub fn refs(&self) -> Vec<&EntitiesRef> {
        self.refs.iter().map(|(entities_ref, _)| entities_ref).collect()
    }

    /// Builds the snapshot a store starts from.
    pub fn initial_state(&self) -> StoreState {
        let mut state = StoreState::new(self.id_policy.clone());
        for (entities_ref, policy) in &self.refs {
            let policy = policy.clone().unwrap_or_else(|| self.id_policy.clone());
            state = state.with_collection(entities_ref.clone(), EntityIndex::new(policy));
        }
        for (key, value) in &self.props {
            state = state.with_prop(key.clone(), value.clone());
        }
        state
    }

    fn declare(mut self, entities_ref: EntitiesRef, policy: Option<IdPolicy>) -> Self {
        match self.refs.iter_mut().find(|(existing, _)| *existing == entities_ref) {
            Some(slot) => slot.1 = policy,
            None => self.refs.push((entities_ref, policy)),
        }
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("store")
    }
}
