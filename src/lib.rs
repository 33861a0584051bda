// ============================================================================
// memoentity Library
// ============================================================================

//! In-memory normalized entity collections.
//!
//! A store snapshot ([`StoreState`]) holds one or more entity collections,
//! each addressed by an [`EntitiesRef`]. Mutations are built as [`Reducer`]s
//! (pure functions from one snapshot to the next) and committed through an
//! [`EntityStore`].
//!
//! ```
//! use memoentity::mutation::{add_entities, update_entities, upsert_entities};
//! use memoentity::{
//!     AddOptions, Change, Entity, EntityId, EntityStore, MutationOptions, StoreConfig, UpsertOptions,
//! };
//! use serde_json::json;
//!
//! # fn main() -> memoentity::Result<()> {
//! let store = EntityStore::new(StoreConfig::new("todos"));
//! let todo = |id: &EntityId| {
//!     Entity::from_json(json!({ "id": id.to_json(), "title": format!("todo {}", id) }))
//!         .expect("object literal")
//! };
//!
//! store.reduce(add_entities([todo(&1.into())], AddOptions::new()))?;
//! store.reduce(update_entities(1, Change::patch(json!({ "done": true }))?, MutationOptions::new()))?;
//! store.reduce(upsert_entities(
//!     vec![1, 2],
//!     UpsertOptions::new(todo, |e| e.with("title", "elf")),
//! ))?;
//!
//! let state = store.state()?;
//! assert_eq!(memoentity::query::get_entities_count(&state, &Default::default()), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod facade;
pub mod mutation;
pub mod query;
pub mod storage;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use crate::core::{Entity, EntityId, IdPolicy, Record, Result, StoreError};
pub use facade::{EntityStore, SubscriptionId};
pub use mutation::{AddOptions, Change, MutationOptions, Reducer, UpsertOptions};
pub use storage::{EntitiesRef, EntityIndex, StoreState};
