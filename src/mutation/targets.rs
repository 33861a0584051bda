use std::collections::HashSet;

use crate::core::EntityId;

/// One identifier or an ordered sequence of them.
pub trait IntoIds: Sized {
    /// Identifiers in input order, duplicates kept.
    fn into_id_list(self) -> Vec<EntityId>;

    /// Identifiers in input order, duplicates collapsed onto their first
    /// occurrence.
    fn into_ids(self) -> Vec<EntityId> {
        dedup(self.into_id_list())
    }
}

macro_rules! single_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoIds for $ty {
                fn into_id_list(self) -> Vec<EntityId> {
                    vec![EntityId::from(self)]
                }
            }
        )*
    };
}

single_id!(EntityId, &EntityId, i64, i32, u32, &str, String);

impl<T: Into<EntityId>> IntoIds for Vec<T> {
    fn into_id_list(self) -> Vec<EntityId> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<EntityId>, const N: usize> IntoIds for [T; N] {
    fn into_id_list(self) -> Vec<EntityId> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<EntityId> + Clone> IntoIds for &[T] {
    fn into_id_list(self) -> Vec<EntityId> {
        self.iter().cloned().map(Into::into).collect()
    }
}

fn dedup(ids: Vec<EntityId>) -> Vec<EntityId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
