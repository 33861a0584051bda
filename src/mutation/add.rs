use tracing::{debug, trace};

use super::{AddOptions, MutationOptions, Reducer};
use crate::core::Entity;
use crate::storage::StoreState;

/// Adds entities whose identifier is not in the collection yet.
///
/// Entities already present are left untouched; use
/// [`super::upsert_entities`] or [`super::update_entities`] to rewrite them.
pub fn add_entities(
    entities: impl IntoIterator<Item = Entity>,
    options: impl Into<AddOptions>,
) -> Reducer {
    let entities: Vec<Entity> = entities.into_iter().collect();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let before = index.len();
        let index = index.insert_many(entities, options.prepend);

        if index.len() == before {
            trace!(entities_ref = %entities_ref, "add_entities: nothing new");
            return Ok(state);
        }

        debug!(
            entities_ref = %entities_ref,
            added = index.len() - before,
            prepend = options.prepend,
            "add_entities"
        );
        Ok(state.with_collection(entities_ref, index))
    })
}

/// Replaces the whole collection with `entities`, in the given order.
pub fn set_entities(
    entities: impl IntoIterator<Item = Entity>,
    options: impl Into<MutationOptions>,
) -> Reducer {
    let entities: Vec<Entity> = entities.into_iter().collect();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref).cleared().set_many(entities);
        debug!(entities_ref = %entities_ref, total = index.len(), "set_entities");
        Ok(state.with_collection(entities_ref, index))
    })
}
