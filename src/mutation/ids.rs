use std::collections::HashSet;

use tracing::{debug, trace};

use super::{IntoIds, MutationOptions, Reducer};
use crate::core::StoreError;
use crate::storage::StoreState;

/// Renames entities: `old_ids[i]` becomes `new_ids[i]`.
///
/// The new identifier is written into the entity's identifier field and the
/// entity keeps its position. Pairs whose old identifier is absent are
/// skipped. Pairs are applied in order, so a later pair sees earlier renames.
/// Both lists are paired by position; a new identifier may appear only once.
pub fn update_entities_ids(
    old_ids: impl IntoIds,
    new_ids: impl IntoIds,
    options: impl Into<MutationOptions>,
) -> Reducer {
    let old_ids = old_ids.into_id_list();
    let new_ids = new_ids.into_id_list();
    let options = options.into();

    Box::new(move |state: StoreState| {
        if old_ids.len() != new_ids.len() {
            return Err(StoreError::IdCountMismatch(old_ids.len(), new_ids.len()));
        }

        let entities_ref = options.entities_ref;
        let repeated = {
            let mut seen = HashSet::with_capacity(new_ids.len());
            new_ids.iter().find(|id| !seen.insert(*id)).cloned()
        };
        if let Some(repeated) = repeated {
            return Err(StoreError::DuplicateIdentifier(repeated, entities_ref.to_string()));
        }

        let mut index = state.collection(&entities_ref);
        let field = index
            .policy()
            .field_name()
            .ok_or_else(|| {
                StoreError::UnsupportedOperation(format!(
                    "collection '{}' derives identifiers with a custom extractor; ids cannot be rewritten",
                    entities_ref
                ))
            })?
            .to_string();

        let mut renamed = 0usize;
        for (old, new) in old_ids.iter().zip(new_ids) {
            let Some(entity) = index.get(old).cloned() else {
                continue;
            };
            if *old == new {
                continue;
            }
            if index.has(&new) {
                return Err(StoreError::DuplicateIdentifier(new, entities_ref.to_string()));
            }
            let entity = entity.with(field.as_str(), new.to_json());
            index = index.rekey(old, new, entity)?;
            renamed += 1;
        }

        if renamed == 0 {
            trace!(entities_ref = %entities_ref, "update_entities_ids: nothing renamed");
            return Ok(state);
        }

        debug!(entities_ref = %entities_ref, renamed, "update_entities_ids");
        Ok(state.with_collection(entities_ref, index))
    })
}

/// Moves the entity at position `from` to position `to`.
pub fn move_entity(from: usize, to: usize, options: impl Into<MutationOptions>) -> Reducer {
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref).move_to(from, to)?;
        if from == to {
            return Ok(state);
        }
        debug!(entities_ref = %entities_ref, from, to, "move_entity");
        Ok(state.with_collection(entities_ref, index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, IdPolicy};
    use crate::mutation::test_support::*;
    use crate::storage::{EntitiesRef, EntityIndex};
    use serde_json::json;

    #[test]
    fn test_rename_ids_in_place() {
        let state = state_with([todo(1), todo(2), todo(3)]);
        let next = update_entities_ids(vec![2, 5], vec![20, 50], MutationOptions::new())(state)
            .unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1, 20, 3]));
        assert_eq!(field(&next, 20, "id"), Some(json!(20)));
        assert_eq!(field(&next, 20, "title"), Some(json!("todo 2")));
    }

    #[test]
    fn test_rename_count_mismatch() {
        let state = state_with([todo(1)]);
        let err = update_entities_ids(vec![1, 2], 3, MutationOptions::new())(state).unwrap_err();
        assert_eq!(err, StoreError::IdCountMismatch(2, 1));
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let state = state_with([todo(1), todo(2)]);
        let err = update_entities_ids(1, 2, MutationOptions::new())(state).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(id, _) if id == EntityId::Int(2)));
    }

    #[test]
    fn test_rename_with_custom_extractor_unsupported() {
        let state = StoreState::default();
        let policy = IdPolicy::custom(|e| e.get("id").and_then(EntityId::from_json));
        let index = EntityIndex::new(policy).set_many([todo(1)]);
        let state = state.with_collection(EntitiesRef::DEFAULT, index);

        let err = update_entities_ids(1, 2, MutationOptions::new())(state).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_move_entity() {
        let state = state_with([todo(1), todo(2), todo(3)]);
        let next = move_entity(2, 0, MutationOptions::new())(state.clone()).unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[3, 1, 2]));

        let err = move_entity(0, 5, MutationOptions::new())(state).unwrap_err();
        assert_eq!(err, StoreError::IndexOutOfBounds { index: 5, len: 3 });
    }

    #[test]
    fn test_move_in_place_checks_bounds() {
        let state = state_with([todo(1), todo(2)]);
        let same = move_entity(1, 1, MutationOptions::new())(state.clone()).unwrap();
        assert!(same.ptr_eq(&state));

        let err = move_entity(7, 7, MutationOptions::new())(state).unwrap_err();
        assert_eq!(err, StoreError::IndexOutOfBounds { index: 7, len: 2 });
    }

    #[test]
    fn test_rename_pairs_by_position() {
        let state = state_with([todo(1), todo(2)]);
        let err = update_entities_ids(vec![1, 2], vec![3, 3], MutationOptions::new())(state.clone())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateIdentifier(EntityId::Int(3), EntitiesRef::DEFAULT.to_string())
        );

        // the second pair finds 1 already renamed and is skipped
        let next = update_entities_ids(vec![1, 1], vec![5, 6], MutationOptions::new())(state)
            .unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[5, 2]));
    }
}
