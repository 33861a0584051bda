use std::collections::HashSet;

use tracing::warn;

use crate::core::{Entity, EntityId, IdPolicy, Result, StoreError};

/// One normalized entity collection.
///
/// Lookups go through `entities`; enumeration order is owned by `ids` and
/// never by the map layout. Both are persistent `im` structures, so cloning
/// an index is O(1) and the modifying methods below only copy the paths they
/// touch.
///
/// Invariant: `ids` holds exactly the key set of `entities`, without
/// duplicates.
#[derive(Debug, Clone)]
pub struct EntityIndex {
    entities: im::HashMap<EntityId, Entity>,
    ids: im::Vector<EntityId>,
    policy: IdPolicy,
}

impl EntityIndex {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            entities: im::HashMap::new(),
            ids: im::Vector::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &IdPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn has(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Identifiers in enumeration order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.ids.iter()
    }

    /// Entities in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Identifier/entity pairs in enumeration order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntityId, &Entity)> + '_ {
        self.ids
            .iter()
            .filter_map(|id| self.entities.get(id).map(|entity| (id, entity)))
    }

    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.ids.index_of(id)
    }

    pub fn identify(&self, entity: &Entity) -> Option<EntityId> {
        self.policy.extract(entity)
    }

    /// True when both indexes share the same entity storage and order.
    ///
    /// Small `im::Vector`s are stored inline and never compare by pointer,
    /// hence the fallback to comparing the identifier sequences.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entities.ptr_eq(&other.entities)
            && (self.ids.ptr_eq(&other.ids) || self.ids == other.ids)
    }

    /// Inserts or replaces entities by identifier.
    ///
    /// Identifiers already present keep their position; new ones are
    /// appended in input order. Entities without an identifier are skipped.
    pub fn set_many(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        for entity in entities {
            let Some(id) = self.identify_or_warn(&entity) else {
                continue;
            };
            if self.entities.insert(id.clone(), entity).is_none() {
                self.ids.push_back(id);
            }
        }
        self
    }

    /// Add-only insertion.
    ///
    /// Identifiers already present, and repeats within `entities`, are left
    /// alone. New identifiers go to the end, or to the front in input order
    /// when `prepend` is set.
    pub fn insert_many(mut self, entities: impl IntoIterator<Item = Entity>, prepend: bool) -> Self {
        let mut added = Vec::new();
        for entity in entities {
            let Some(id) = self.identify_or_warn(&entity) else {
                continue;
            };
            if self.entities.contains_key(&id) {
                continue;
            }
            self.entities.insert(id.clone(), entity);
            added.push(id);
        }

        if prepend {
            for id in added.into_iter().rev() {
                self.ids.push_front(id);
            }
        } else {
            self.ids.extend(added);
        }
        self
    }

    /// Removes the given identifiers; absent ones are ignored.
    pub fn remove_many<'a>(mut self, ids: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let mut removed = HashSet::new();
        for id in ids {
            if self.entities.remove(id).is_some() {
                removed.insert(id.clone());
            }
        }
        if !removed.is_empty() {
            self.ids.retain(|id| !removed.contains(id));
        }
        self
    }

    /// Keeps only the entities matching `keep`.
    pub fn retain(self, keep: impl Fn(&Entity) -> bool) -> Self {
        let doomed: Vec<EntityId> = self
            .entries()
            .filter(|(_, entity)| !keep(*entity))
            .map(|(id, _)| id.clone())
            .collect();
        self.remove_many(doomed.iter())
    }

    /// Empty index with the same identifier policy.
    pub fn cleared(&self) -> Self {
        Self::new(self.policy.clone())
    }

    /// Moves `entity` from `old` to `new` in place, keeping its position.
    ///
    /// `old` must be present and `new` must be absent.
    pub fn rekey(mut self, old: &EntityId, new: EntityId, entity: Entity) -> Result<Self> {
        if self.entities.contains_key(&new) {
            return Err(StoreError::DuplicateIdentifier(new, "index".to_string()));
        }
        let position = self.position(old).ok_or_else(|| {
            StoreError::UnsupportedOperation(format!("cannot rekey missing identifier {}", old))
        })?;

        self.entities.remove(old);
        self.entities.insert(new.clone(), entity);
        self.ids.set(position, new);
        Ok(self)
    }

    /// Moves the identifier at `from` to position `to`.
    pub fn move_to(mut self, from: usize, to: usize) -> Result<Self> {
        let len = self.ids.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfBounds { index, len });
            }
        }
        if from != to {
            let id = self.ids.remove(from);
            self.ids.insert(to, id);
        }
        Ok(self)
    }

    fn identify_or_warn(&self, entity: &Entity) -> Option<EntityId> {
        let id = self.policy.extract(entity);
        if id.is_none() {
            warn!(policy = ?self.policy, "skipping entity without identifier: {:?}", entity);
        }
        id
    }
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
