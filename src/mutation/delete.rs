use tracing::{debug, trace};

use super::{IntoIds, MutationOptions, Reducer};
use crate::core::Entity;
use crate::storage::{EntitiesRef, EntityIndex, StoreState};

pub fn delete_entities(ids: impl IntoIds, options: impl Into<MutationOptions>) -> Reducer {
    let ids = ids.into_ids();
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let before = index.len();
        let index = index.remove_many(ids.iter());
        Ok(commit_removal(state, entities_ref, before, index, "delete_entities"))
    })
}

pub fn delete_entities_by_predicate<P>(predicate: P, options: impl Into<MutationOptions>) -> Reducer
where
    P: Fn(&Entity) -> bool + Send + 'static,
{
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let before = index.len();
        let index = index.retain(|entity| !predicate(entity));
        Ok(commit_removal(
            state,
            entities_ref,
            before,
            index,
            "delete_entities_by_predicate",
        ))
    })
}

pub fn delete_all_entities(options: impl Into<MutationOptions>) -> Reducer {
    let options = options.into();

    Box::new(move |state: StoreState| {
        let entities_ref = options.entities_ref;
        let index = state.collection(&entities_ref);
        let before = index.len();
        let index = index.cleared();
        Ok(commit_removal(state, entities_ref, before, index, "delete_all_entities"))
    })
}

fn commit_removal(
    state: StoreState,
    entities_ref: EntitiesRef,
    before: usize,
    index: EntityIndex,
    operation: &'static str,
) -> StoreState {
    if index.len() == before {
        trace!(entities_ref = %entities_ref, operation, "nothing removed");
        return state;
    }
    debug!(entities_ref = %entities_ref, removed = before - index.len(), operation, "entities removed");
    state.with_collection(entities_ref, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::test_support::*;
    use serde_json::json;

    #[test]
    fn test_delete_by_ids() {
        let state = state_with([todo(1), todo(2), todo(3)]);
        let next = delete_entities(vec![1, 3, 8], MutationOptions::new())(state).unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[2]));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let state = state_with([todo(1)]);
        let next = delete_entities(2, MutationOptions::new())(state.clone()).unwrap();
        assert!(next.ptr_eq(&state));
    }

    #[test]
    fn test_delete_by_predicate() {
        let state = state_with([todo(1), todo(2)]);
        let next =
            delete_entities_by_predicate(|e| e.get("id") == Some(&json!(2)), MutationOptions::new())(
                state,
            )
            .unwrap();
        assert_eq!(ids_of(&next, &EntitiesRef::DEFAULT), eids(&[1]));
    }

    #[test]
    fn test_delete_all() {
        let state = state_with([todo(1), todo(2)]);
        let next = delete_all_entities(MutationOptions::new())(state).unwrap();
        assert!(next.collection(&EntitiesRef::DEFAULT).is_empty());

        let again = delete_all_entities(MutationOptions::new())(next.clone()).unwrap();
        assert!(again.ptr_eq(&next));
    }
}
