//! Reducer builders over store snapshots.
//!
//! Every function here returns a [`Reducer`]: a one-shot pure function from
//! the current [`StoreState`] to the next one. Builders never touch a store
//! themselves; hand the reducer to [`crate::EntityStore::reduce`] or call it
//! directly on a snapshot.
//!
//! A reducer that changes nothing returns the snapshot it was given, so
//! `StoreState::ptr_eq` can tell real changes from no-ops.

pub mod add;
pub mod change;
pub mod delete;
pub mod ids;
pub mod props;
pub mod targets;
pub mod update;
pub mod upsert;

pub use add::{add_entities, set_entities};
pub use change::{Change, Transform};
pub use delete::{delete_all_entities, delete_entities, delete_entities_by_predicate};
pub use ids::{move_entity, update_entities_ids};
pub use props::set_prop;
pub use targets::IntoIds;
pub use update::{update_all_entities, update_entities, update_entities_by_predicate};
pub use upsert::{UpsertOptions, upsert_entities};

use tracing::warn;

use crate::core::{Entity, EntityId, Result, StoreError};
use crate::storage::{EntitiesRef, EntityIndex, StoreState};

pub type Reducer = Box<dyn FnOnce(StoreState) -> Result<StoreState> + Send>;

/// Options shared by every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOptions {
    pub entities_ref: EntitiesRef,
}

impl MutationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a named collection instead of the default one.
    pub fn with_ref(mut self, entities_ref: EntitiesRef) -> Self {
        self.entities_ref = entities_ref;
        self
    }
}

impl From<EntitiesRef> for MutationOptions {
    fn from(entities_ref: EntitiesRef) -> Self {
        Self { entities_ref }
    }
}

/// Options for [`add_entities`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub prepend: bool,
    pub entities_ref: EntitiesRef,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert new entities at the front instead of the end.
    pub fn prepend(mut self) -> Self {
        self.prepend = true;
        self
    }

    pub fn with_ref(mut self, entities_ref: EntitiesRef) -> Self {
        self.entities_ref = entities_ref;
        self
    }
}

impl From<EntitiesRef> for AddOptions {
    fn from(entities_ref: EntitiesRef) -> Self {
        Self {
            prepend: false,
            entities_ref,
        }
    }
}

/// Checks that `entity` still resolves to `expected`.
///
/// `Ok(false)` means the entity has no identifier at all: it is logged and
/// must be left out of the write. Resolving to another identifier is an error.
pub(crate) fn checked_identity(
    entities_ref: &EntitiesRef,
    index: &EntityIndex,
    expected: &EntityId,
    entity: &Entity,
) -> Result<bool> {
    match index.identify(entity) {
        Some(found) if found == *expected => Ok(true),
        None => {
            warn!(
                entities_ref = %entities_ref,
                id = %expected,
                "entity resolved to no identifier, leaving it out"
            );
            Ok(false)
        }
        found => Err(StoreError::IdentifierMismatch {
            expected: expected.clone(),
            found,
        }),
    }
}

/// Writes already-present entities back into `index`, keeping positions.
///
/// Returns `None` when no entity is left to write.
pub(crate) fn replace_existing(
    entities_ref: &EntitiesRef,
    index: EntityIndex,
    updated: Vec<(EntityId, Entity)>,
) -> Result<Option<EntityIndex>> {
    let mut kept = Vec::with_capacity(updated.len());
    for (id, entity) in updated {
        if checked_identity(entities_ref, &index, &id, &entity)? {
            kept.push(entity);
        }
    }
    if kept.is_empty() {
        return Ok(None);
    }
    Ok(Some(index.set_many(kept)))
}
