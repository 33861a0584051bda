use tracing::{debug, trace};

use super::{Change, IntoIds, MutationOptions, Reducer, replace_existing};
use crate::core::{Entity, EntityId};
use crate::storage::{EntityIndex, StoreState};

/// Updates the entities stored under `ids`.
///
/// Identifiers missing from the collection are skipped. When none of them
/// exist the reducer returns its input snapshot untouched.
///
/// ```
/// use memoentity::{AddOptions, Change, Entity, EntityStore, MutationOptions, StoreConfig};
/// use memoentity::mutation::{add_entities, update_entities};
/// use serde_json::json;
///
/// # fn main() -> memoentity::Result<()> {
/// let store = EntityStore::new(StoreConfig::new("todos"));
/// let todo = Entity::from_json(json!({ "id": 1, "completed": false }))?;
/// store.reduce(add_entities([todo], AddOptions::new()))?;
///
/// let change = Change::patch(json!({ "completed": true }))?;
/// store.reduce(update_entities(1, change, MutationOptions::new()))?;
/// # Ok(())
/// # }
/// ```
pub fn update_entities(
    ids: impl IntoIds,
    change: impl Into<Change>,
    options: impl Into<MutationOptions>,
) -> Reducer {
    let ids = ids.into_ids();
    let change = change.into();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let updated: Vec<(EntityId, Entity)> = ids
            .iter()
            .filter_map(|id| index.get(id).map(|entity| (id.clone(), change.apply(entity))))
            .collect();

        if updated.is_empty() {
            trace!(entities_ref = %entities_ref, "update_entities: no target exists");
            return Ok(state);
        }

        debug!(entities_ref = %entities_ref, updated = updated.len(), "update_entities");
        match replace_existing(&entities_ref, index, updated)? {
            Some(index) => Ok(state.with_collection(entities_ref, index)),
            None => Ok(state),
        }
    })
}

/// Updates every entity for which `predicate` holds.
///
/// Entities that do not match keep their identity.
pub fn update_entities_by_predicate<P>(
    predicate: P,
    change: impl Into<Change>,
    options: impl Into<MutationOptions>,
) -> Reducer
where
    P: Fn(&Entity) -> bool + Send + 'static,
{
    let change = change.into();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let updated = collect_updates(&index, &change, |entity| predicate(entity));

        if updated.is_empty() {
            trace!(entities_ref = %entities_ref, "update_entities_by_predicate: no match");
            return Ok(state);
        }

        debug!(
            entities_ref = %entities_ref,
            updated = updated.len(),
            "update_entities_by_predicate"
        );
        match replace_existing(&entities_ref, index, updated)? {
            Some(index) => Ok(state.with_collection(entities_ref, index)),
            None => Ok(state),
        }
    })
}

/// Updates every entity of the collection.
pub fn update_all_entities(change: impl Into<Change>, options: impl Into<MutationOptions>) -> Reducer {
    let change = change.into();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        if index.is_empty() {
            trace!(entities_ref = %entities_ref, "update_all_entities: empty collection");
            return Ok(state);
        }

        let updated = collect_updates(&index, &change, |_| true);
        debug!(entities_ref = %entities_ref, updated = updated.len(), "update_all_entities");
        match replace_existing(&entities_ref, index, updated)? {
            Some(index) => Ok(state.with_collection(entities_ref, index)),
            None => Ok(state),
        }
    })
}

fn collect_updates(
    index: &EntityIndex,
    change: &Change,
    matches: impl Fn(&Entity) -> bool,
) -> Vec<(EntityId, Entity)> {
    index
        .entries()
        .filter(|(_, entity)| matches(*entity))
        .map(|(id, entity)| (id.clone(), change.apply(entity)))
        .collect()
}
