pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Record};
pub use error::{Result, StoreError};
pub use id::{DEFAULT_ID_KEY, EntityId, IdExtractor, IdPolicy};
