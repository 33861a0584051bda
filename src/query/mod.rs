//! Read-only lookups over a store snapshot.

use crate::core::{Entity, EntityId};
use crate::storage::{EntitiesRef, StoreState};

pub fn get_entity(state: &StoreState, id: impl Into<EntityId>, entities_ref: &EntitiesRef) -> Option<Entity> {
    state.collection(entities_ref).get(&id.into()).cloned()
}

pub fn has_entity(state: &StoreState, id: impl Into<EntityId>, entities_ref: &EntitiesRef) -> bool {
    state.collection(entities_ref).has(&id.into())
}

/// All entities in enumeration order.
pub fn get_all_entities(state: &StoreState, entities_ref: &EntitiesRef) -> Vec<Entity> {
    state.collection(entities_ref).iter().cloned().collect()
}

pub fn get_entity_ids(state: &StoreState, entities_ref: &EntitiesRef) -> Vec<EntityId> {
    state.collection(entities_ref).ids().cloned().collect()
}

pub fn get_entities_count(state: &StoreState, entities_ref: &EntitiesRef) -> usize {
    state.collection(entities_ref).len()
}

pub fn get_entities_by_predicate(
    state: &StoreState,
    predicate: impl Fn(&Entity) -> bool,
    entities_ref: &EntitiesRef,
) -> Vec<Entity> {
    state
        .collection(entities_ref)
        .iter()
        .filter(|entity| predicate(*entity))
        .cloned()
        .collect()
}

pub fn get_entities_count_by_predicate(
    state: &StoreState,
    predicate: impl Fn(&Entity) -> bool,
    entities_ref: &EntitiesRef,
) -> usize {
    state
        .collection(entities_ref)
        .iter()
        .filter(|entity| predicate(*entity))
        .count()
}
