use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{IntoIds, Reducer, checked_identity};
use crate::core::{Entity, EntityId};
use crate::storage::{EntitiesRef, StoreState};

pub type Creator = Arc<dyn Fn(&EntityId) -> Entity + Send + Sync>;
pub type Updater = Arc<dyn Fn(&Entity) -> Entity + Send + Sync>;

/// How [`upsert_entities`] builds missing entities and rewrites present ones.
#[derive(Clone)]
pub struct UpsertOptions {
    creator: Creator,
    updater: Updater,
    merge_updater_with_creator: bool,
    entities_ref: EntitiesRef,
}

impl UpsertOptions {
    pub fn new<C, U>(creator: C, updater: U) -> Self
    where
        C: Fn(&EntityId) -> Entity + Send + Sync + 'static,
        U: Fn(&Entity) -> Entity + Send + Sync + 'static,
    {
        Self {
            creator: Arc::new(creator),
            updater: Arc::new(updater),
            merge_updater_with_creator: false,
            entities_ref: EntitiesRef::DEFAULT,
        }
    }

    /// Also run the updater over freshly created entities.
    pub fn merge_updater_with_creator(mut self, merge: bool) -> Self {
        self.merge_updater_with_creator = merge;
        self
    }

    pub fn with_ref(mut self, entities_ref: EntitiesRef) -> Self {
        self.entities_ref = entities_ref;
        self
    }

    fn create(&self, id: &EntityId) -> Entity {
        let created = (self.creator)(id);
        if self.merge_updater_with_creator {
            (self.updater)(&created)
        } else {
            created
        }
    }
}

impl fmt::Debug for UpsertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsertOptions")
            .field("merge_updater_with_creator", &self.merge_updater_with_creator)
            .field("entities_ref", &self.entities_ref)
            .finish_non_exhaustive()
    }
}

/// Updates the entities under `ids` that exist and creates the others.
///
/// Present entities go through the updater and keep their position.
/// Missing ones come from the creator (followed by the updater when
/// `merge_updater_with_creator` is set) and are appended in input order.
pub fn upsert_entities(ids: impl IntoIds, options: UpsertOptions) -> Reducer {
    let ids = ids.into_ids();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref.clone();
        let index = state.collection(&entities_ref);

        let mut next = Vec::with_capacity(ids.len());
        let mut created = 0usize;
        for id in &ids {
            let (entity, is_new) = match index.get(id) {
                Some(existing) => ((options.updater)(existing), false),
                None => (options.create(id), true),
            };
            if !checked_identity(&entities_ref, &index, id, &entity)? {
                continue;
            }
            if is_new {
                created += 1;
            }
            next.push(entity);
        }

        if next.is_empty() {
            trace!(entities_ref = %entities_ref, "upsert_entities: nothing to write");
            return Ok(state);
        }

        debug!(
            entities_ref = %entities_ref,
            updated = next.len() - created,
            created,
            "upsert_entities"
        );
        let index = index.set_many(next);
        Ok(state.with_collection(entities_ref, index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreError;
    use crate::mutation::test_support::*;
    use serde_json::json;

    fn options() -> UpsertOptions {
        UpsertOptions::new(
            |id| match id {
                EntityId::Int(i) => todo(*i),
                EntityId::Text(_) => unreachable!("todos use integer ids"),
            },
            |e| e.with("title", "elf"),
        )
    }

    #[test]
    fn test_adds_missing_entity() {
        let state = state_with([todo(1)]);
        let next = upsert_entities(2, options())(state).unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1, 2]));
        assert_eq!(field(&next, 1, "title"), Some(json!("todo 1")));
        assert_eq!(field(&next, 2, "title"), Some(json!("todo 2")));
    }

    #[test]
    fn test_updates_existing_entity() {
        let state = state_with([todo(1)]);
        let next = upsert_entities(1, options())(state).unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1]));
        assert_eq!(field(&next, 1, "title"), Some(json!("elf")));
    }

    #[test]
    fn test_mixed_upsert_keeps_order() {
        let state = state_with([todo(1)]);
        let next = upsert_entities(vec![1, 2], options())(state).unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1, 2]));
        assert_eq!(field(&next, 1, "title"), Some(json!("elf")));
        assert_eq!(field(&next, 2, "title"), Some(json!("todo 2")));
    }

    #[test]
    fn test_merge_updater_with_creator() {
        let state = state_with([todo(1)]);
        let opts = options().merge_updater_with_creator(true);
        let next = upsert_entities(vec![1, 2], opts)(state).unwrap();
        assert_eq!(field(&next, 1, "title"), Some(json!("elf")));
        assert_eq!(field(&next, 2, "title"), Some(json!("elf")));
    }

    #[test]
    fn test_upsert_with_ref() {
        let state = StoreState::default();
        let index = state.collection(&UI_ENTITIES).set_many([ui_todo(1)]);
        let state = state.with_collection(UI_ENTITIES, index);

        let opts = UpsertOptions::new(
            |id| match id {
                EntityId::Int(i) => ui_todo(*i),
                EntityId::Text(_) => unreachable!("todos use integer ids"),
            },
            |e| e.with("open", true),
        )
        .merge_updater_with_creator(true)
        .with_ref(UI_ENTITIES);
        let next = upsert_entities(vec![1, 2], opts)(state).unwrap();

        let ui = next.collection(&UI_ENTITIES);
        assert_eq!(ids_of(&next, &UI_ENTITIES), eids(&[1, 2]));
        assert!(ui.iter().all(|e| e.get("open") == Some(&json!(true))));
        assert!(next.collection(&EntitiesRef::DEFAULT).is_empty());
    }

    #[test]
    fn test_creator_without_identifier_is_skipped() {
        let state = state_with([todo(1)]);
        let opts = UpsertOptions::new(
            |_| Entity::from_json(json!({ "title": "orphan" })).unwrap(),
            |e| e.clone(),
        );
        let next = upsert_entities(2, opts)(state.clone()).unwrap();
        assert!(next.ptr_eq(&state));
    }

    #[test]
    fn test_creator_with_wrong_identifier_fails() {
        let state = state_with([todo(1)]);
        let opts = UpsertOptions::new(|_| todo(7), |e| e.clone());
        let err = upsert_entities(2, opts)(state).unwrap_err();
        assert_eq!(
            err,
            StoreError::IdentifierMismatch {
                expected: 2.into(),
                found: Some(7.into())
            }
        );
    }

    #[test]
    fn test_updater_without_identifier_keeps_stored_entity() {
        let state = state_with([todo(1)]);
        let opts = UpsertOptions::new(
            |id| match id {
                EntityId::Int(i) => todo(*i),
                EntityId::Text(_) => unreachable!("todos use integer ids"),
            },
            |e| {
                let mut record = e.record().clone();
                record.remove("id");
                Entity::new(record)
            },
        );

        let next = upsert_entities(vec![1, 2], opts)(state.clone()).unwrap();

        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1, 2]));
        assert_eq!(field(&next, 1, "title"), Some(json!("todo 1")));
        let before = state.collection(&EntitiesRef::DEFAULT);
        let after = next.collection(&EntitiesRef::DEFAULT);
        assert!(after.get(&1.into()).unwrap().ptr_eq(before.get(&1.into()).unwrap()));
    }
}
